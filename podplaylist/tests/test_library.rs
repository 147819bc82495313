use image::{ImageBuffer, Rgb};
use podplaylist::{AddOutcome, Error, Library, PathImport, PersistedState, StateStore};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Env {
    sources: TempDir,
    cache: TempDir,
    config: TempDir,
}

impl Env {
    fn new() -> Self {
        Self {
            sources: tempfile::tempdir().unwrap(),
            cache: tempfile::tempdir().unwrap(),
            config: tempfile::tempdir().unwrap(),
        }
    }

    fn state_path(&self) -> PathBuf {
        self.config.path().join("state.json")
    }

    fn open(&self) -> Library {
        Library::open(self.cache.path(), self.state_path(), "Default Title").unwrap()
    }

    fn audio(&self, name: &str) -> PathBuf {
        let path = self.sources.path().join(name);
        fs::write(&path, b"ID3 fake audio").unwrap();
        path
    }

    fn png(&self, name: &str, width: u32, height: u32) -> PathBuf {
        let path = self.sources.path().join(name);
        let img = ImageBuffer::from_pixel(width, height, Rgb([200u8, 30, 30]));
        img.save(&path).unwrap();
        path
    }

    /// Noms tels que relus depuis le disque
    fn saved_names(&self) -> Vec<String> {
        StateStore::new(self.state_path())
            .load()
            .unwrap()
            .files
            .iter()
            .map(|e| e.display_name().to_string())
            .collect()
    }
}

fn names(library: &Library) -> Vec<&str> {
    library.entries().iter().map(|e| e.display_name()).collect()
}

#[test]
fn test_fresh_library_uses_default_title() {
    let env = Env::new();
    let library = env.open();

    assert!(library.is_empty());
    assert_eq!(library.title(), "Default Title");
    assert!(library.artwork_path().is_none());
    assert!(library.cache_root().is_absolute());
}

#[test]
fn test_every_mutation_is_persisted() {
    let env = Env::new();
    let mut library = env.open();

    library.add_file(env.audio("a.mp3")).unwrap();
    library.add_file(env.audio("b.mp3")).unwrap();
    library.add_file(env.audio("c.mp3")).unwrap();
    assert_eq!(env.saved_names(), vec!["a.mp3", "b.mp3", "c.mp3"]);

    library.reverse();
    assert_eq!(env.saved_names(), vec!["c.mp3", "b.mp3", "a.mp3"]);

    library.move_up(2);
    assert_eq!(env.saved_names(), vec!["c.mp3", "a.mp3", "b.mp3"]);

    library.move_down(0);
    assert_eq!(env.saved_names(), vec!["a.mp3", "c.mp3", "b.mp3"]);

    library.alphabetize();
    assert_eq!(env.saved_names(), vec!["a.mp3", "b.mp3", "c.mp3"]);

    library.rename(1, "middle").unwrap();
    assert_eq!(env.saved_names(), vec!["a.mp3", "middle.mp3", "c.mp3"]);

    library.remove(0);
    assert_eq!(env.saved_names(), vec!["middle.mp3", "c.mp3"]);

    library.set_title("Renamed Show");
    let state = StateStore::new(env.state_path()).load().unwrap();
    assert_eq!(state.podcast_name, "Renamed Show");

    library.clear_all();
    assert!(env.saved_names().is_empty());
}

#[test]
fn test_reopen_restores_playlist_and_title() {
    let env = Env::new();
    {
        let mut library = env.open();
        library.add_file(env.audio("first.mp3")).unwrap();
        library.add_file(env.audio("second.m4b")).unwrap();
        library.set_title("My Audiobook");
    }

    let library = env.open();
    assert_eq!(names(&library), vec!["first.mp3", "second.m4a"]);
    assert_eq!(library.title(), "My Audiobook");
}

#[test]
fn test_reopen_with_empty_saved_title_keeps_default() {
    let env = Env::new();
    {
        let mut library = env.open();
        library.add_file(env.audio("a.mp3")).unwrap();
        library.set_title("");
    }

    assert_eq!(env.open().title(), "Default Title");
}

#[test]
fn test_reopen_after_corruption_starts_empty() {
    let env = Env::new();
    {
        let mut library = env.open();
        library.add_file(env.audio("a.mp3")).unwrap();
    }
    fs::write(env.state_path(), "[[[").unwrap();

    let library = env.open();
    assert!(library.is_empty());
    assert_eq!(library.title(), "Default Title");
}

#[test]
fn test_reopen_drops_entries_outside_cache_root() {
    let env = Env::new();
    let other_cache = tempfile::tempdir().unwrap();
    {
        let mut library =
            Library::open(other_cache.path(), env.state_path(), "Default Title").unwrap();
        library.add_file(env.audio("elsewhere.mp3")).unwrap();
    }

    assert!(env.open().is_empty());
}

#[test]
fn test_reopen_ignores_artwork_outside_cache_root() {
    let env = Env::new();
    let stray = env.sources.path().join("cover.jpg");
    fs::write(&stray, b"not served").unwrap();
    StateStore::new(env.state_path()).save(&PersistedState {
        artwork_path: stray.to_string_lossy().into_owned(),
        ..PersistedState::default()
    });

    assert!(env.open().artwork_path().is_none());
}

#[test]
fn test_duplicate_add_does_not_rewrite_state() {
    let env = Env::new();
    let mut library = env.open();
    let src = env.audio("a.mp3");

    library.add_file(&src).unwrap();
    fs::remove_file(env.state_path()).unwrap();

    assert_eq!(library.add_file(&src).unwrap(), AddOutcome::Duplicate);
    assert!(!env.state_path().exists());
}

#[test]
fn test_set_artwork_produces_square_jpeg() {
    let env = Env::new();
    let mut library = env.open();
    let src = env.png("cover.png", 300, 120);

    library.set_artwork(&src).unwrap();

    let artwork = library.artwork_path().unwrap().to_path_buf();
    assert_eq!(artwork, library.cache_root().join("artwork.jpg"));
    let img = image::open(&artwork).unwrap();
    assert_eq!((img.width(), img.height()), (300, 300));

    // La pochette survit à un redémarrage
    drop(library);
    assert_eq!(env.open().artwork_path(), Some(artwork.as_path()));
}

#[test]
fn test_set_artwork_respects_configured_size() {
    let env = Env::new();
    let mut library = env.open().with_artwork_size(64);

    library.set_artwork(env.png("big.png", 400, 200)).unwrap();

    let img = image::open(library.artwork_path().unwrap()).unwrap();
    assert_eq!((img.width(), img.height()), (64, 64));
}

#[test]
fn test_set_artwork_with_unreadable_image_fails() {
    let env = Env::new();
    let mut library = env.open();
    let bogus = env.sources.path().join("bogus.png");
    fs::write(&bogus, b"definitely not a png").unwrap();

    let err = library.set_artwork(&bogus).unwrap_err();
    assert!(matches!(err, Error::Artwork(_)));
    assert!(library.artwork_path().is_none());
}

#[test]
fn test_delete_artwork() {
    let env = Env::new();
    let mut library = env.open();
    library.set_artwork(env.png("cover.png", 32, 32)).unwrap();
    let artwork = library.artwork_path().unwrap().to_path_buf();

    assert!(library.delete_artwork());
    assert!(library.artwork_path().is_none());
    assert!(!artwork.exists());
    assert!(!library.delete_artwork());

    let state = StateStore::new(env.state_path()).load().unwrap();
    assert_eq!(state.artwork_path, "");
}

#[test]
fn test_missing_artwork_file_is_not_restored() {
    let env = Env::new();
    {
        let mut library = env.open();
        library.set_artwork(env.png("cover.png", 16, 16)).unwrap();
        fs::remove_file(library.artwork_path().unwrap()).unwrap();
    }

    assert!(env.open().artwork_path().is_none());
}

#[test]
fn test_add_path_dispatches_on_kind() {
    let env = Env::new();
    let mut library = env.open();

    let folder = env.sources.path().join("album");
    fs::create_dir(&folder).unwrap();
    fs::write(folder.join("01.mp3"), b"x").unwrap();
    fs::write(folder.join("02.mp3"), b"y").unwrap();

    match library.add_path(&folder).unwrap() {
        PathImport::Folder(report) => assert_eq!(report.added, 2),
        other => panic!("unexpected import: {other:?}"),
    }
    assert!(matches!(
        library.add_path(env.audio("single.m4a")).unwrap(),
        PathImport::File(AddOutcome::Added(_))
    ));
    assert_eq!(
        library.add_path(env.png("art.png", 8, 8)).unwrap(),
        PathImport::Artwork
    );
    assert_eq!(
        library.add_path(env.audio("readme.txt")).unwrap(),
        PathImport::Ignored
    );
    assert_eq!(
        library.add_path(Path::new("/definitely/not/here.mp3")).unwrap(),
        PathImport::Ignored
    );

    assert_eq!(library.len(), 3);
    assert!(library.artwork_path().is_some());
}
