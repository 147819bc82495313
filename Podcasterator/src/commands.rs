//! Commandes de la console et leur exécution

use anyhow::{Context, Result, anyhow, bail};
use podplaylist::{AddOutcome, FolderImport, Library, PathImport, SharedLibrary};
use podserver::{LogHandle, ServerController};
use podutils::truncate_filename;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::PoisonError;
use tracing::{info, warn};

pub const HELP: &str = "\
Commands:
  add <path>           add an audio file or a folder (an image sets the artwork)
  rm <n>               remove episode n
  up <n> / down <n>    move episode n
  rename <n> <name>    rename episode n
  alpha                sort episodes by name
  reverse              reverse the episode order
  clear                remove every episode
  title <text>         set the podcast title
  artwork <path>       set the artwork from an image
  noartwork            delete the artwork
  list                 show the playlist
  launch / stop        start or stop the podcast server
  status               show the server state
  loglevel [level]     show or set the level (error, warn, info, debug, trace)
  help                 show this message
  quit                 stop the server and exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(PathBuf),
    Remove(usize),
    Up(usize),
    Down(usize),
    Rename(usize, String),
    Alphabetize,
    Reverse,
    Clear,
    Title(String),
    Artwork(PathBuf),
    NoArtwork,
    List,
    Launch,
    Stop,
    Status,
    /// Sans argument, affiche le niveau courant
    LogLevel(Option<String>),
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_lowercase().as_str() {
            "add" => Command::Add(parse_path(rest)?),
            "rm" | "remove" => Command::Remove(parse_index(rest)?),
            "up" => Command::Up(parse_index(rest)?),
            "down" => Command::Down(parse_index(rest)?),
            "rename" => {
                let (index, name) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| anyhow!("usage: rename <n> <name>"))?;
                Command::Rename(parse_index(index)?, name.trim().to_string())
            }
            "alpha" | "sort" => Command::Alphabetize,
            "reverse" => Command::Reverse,
            "clear" => Command::Clear,
            "title" => Command::Title(rest.to_string()),
            "artwork" => Command::Artwork(parse_path(rest)?),
            "noartwork" => Command::NoArtwork,
            "list" | "ls" => Command::List,
            "launch" | "start" => Command::Launch,
            "stop" => Command::Stop,
            "status" => Command::Status,
            "loglevel" => Command::LogLevel((!rest.is_empty()).then(|| rest.to_string())),
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "" => bail!("empty command"),
            other => bail!("unknown command '{}', type 'help'", other),
        };
        Ok(command)
    }
}

/// Numéro d'épisode saisi (à partir de 1) vers un index
fn parse_index(input: &str) -> Result<usize> {
    let number: usize = input
        .trim()
        .parse()
        .with_context(|| format!("'{}' is not an episode number", input.trim()))?;
    number
        .checked_sub(1)
        .ok_or_else(|| anyhow!("episode numbers start at 1"))
}

/// Chemin éventuellement entouré de guillemets
fn parse_path(input: &str) -> Result<PathBuf> {
    let path = input.trim();
    let path = path
        .strip_prefix('"')
        .and_then(|p| p.strip_suffix('"'))
        .or_else(|| path.strip_prefix('\'').and_then(|p| p.strip_suffix('\'')))
        .unwrap_or(path);
    if path.is_empty() {
        bail!("a path is required");
    }
    Ok(PathBuf::from(path))
}

/// Suite à donner après une commande
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// État de l'application pilotée par la console
pub struct App {
    library: SharedLibrary,
    controller: ServerController,
    log_handle: LogHandle,
}

impl App {
    pub fn new(library: SharedLibrary, controller: ServerController, log_handle: LogHandle) -> Self {
        Self {
            library,
            controller,
            log_handle,
        }
    }

    /// Exécute une commande jusqu'au bout et affiche son résultat
    pub async fn execute(&self, command: Command) -> Result<Flow> {
        match command {
            Command::Add(path) => {
                let source = path.clone();
                let imported = self.with_library(move |lib| lib.add_path(&source)).await??;
                println!("{}", describe_import(&path, &imported));
            }
            Command::Remove(index) => {
                match self.with_library(move |lib| lib.remove(index)).await? {
                    Some(entry) => println!("Removed {}", entry.display_name()),
                    None => println!("No episode {}", index + 1),
                }
            }
            Command::Up(index) => {
                let moved = self.with_library(move |lib| lib.move_up(index)).await?;
                self.report_move(moved);
            }
            Command::Down(index) => {
                let moved = self.with_library(move |lib| lib.move_down(index)).await?;
                self.report_move(moved);
            }
            Command::Rename(index, name) => {
                if self.with_library(move |lib| lib.rename(index, &name)).await?? {
                    self.print_list();
                } else {
                    println!("Nothing to rename");
                }
            }
            Command::Alphabetize => {
                self.with_library(|lib| lib.alphabetize()).await?;
                self.print_list();
            }
            Command::Reverse => {
                self.with_library(|lib| lib.reverse()).await?;
                self.print_list();
            }
            Command::Clear => {
                let removed = self.with_library(|lib| lib.clear_all()).await?;
                println!("Removed {} episode(s)", removed);
            }
            Command::Title(title) => {
                if title.is_empty() {
                    println!("Title: {}", self.read(|lib| lib.title().to_string()));
                } else {
                    let new_title = title.clone();
                    self.with_library(move |lib| lib.set_title(new_title)).await?;
                    println!("Title set to {}", title);
                    self.warn_if_running().await;
                }
            }
            Command::Artwork(path) => {
                let image = path.clone();
                self.with_library(move |lib| lib.set_artwork(&image)).await??;
                println!("Artwork set from {}", path.display());
            }
            Command::NoArtwork => {
                if self.with_library(|lib| lib.delete_artwork()).await? {
                    println!("Artwork deleted");
                } else {
                    println!("No artwork to delete");
                }
            }
            Command::List => self.print_list(),
            Command::Launch => match self.controller.launch(self.library.clone()).await? {
                Some(url) => println!("Podcast feed: {}", url),
                None if self.controller.is_running().await => println!("Server already running"),
                None => println!("Add some episodes before launching"),
            },
            Command::Stop => {
                if self.controller.stop().await {
                    println!("Server stopped");
                } else {
                    println!("Server is not running");
                }
            }
            Command::Status => match self.controller.feed_url().await {
                Some(url) => println!("Running, feed at {}", url),
                None => println!("Stopped"),
            },
            Command::LogLevel(None) => println!("Log level: {}", self.log_handle.level()),
            Command::LogLevel(Some(level)) => {
                let level = self.log_handle.set_level(&level)?;
                info!("Log level set to {}", level);
                println!("Log level: {}", level);
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Arrête le serveur s'il tourne
    pub async fn shutdown(&self) {
        if self.controller.stop().await {
            info!("Server stopped on exit");
        }
    }

    /// Applique une commande à la bibliothèque hors du runtime
    ///
    /// Copies de fichiers et conversion de pochette sont bloquantes ; le
    /// verrou en écriture n'est tenu que dans le thread dédié.
    async fn with_library<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Library) -> T + Send + 'static,
    {
        let library = self.library.clone();
        let result = tokio::task::spawn_blocking(move || {
            let mut library = library.write().unwrap_or_else(PoisonError::into_inner);
            f(&mut library)
        })
        .await
        .context("library command panicked")?;
        Ok(result)
    }

    fn read<T>(&self, f: impl FnOnce(&Library) -> T) -> T {
        let library = self.library.read().unwrap_or_else(PoisonError::into_inner);
        f(&library)
    }

    fn report_move(&self, moved: bool) {
        if moved {
            self.print_list();
        } else {
            println!("Cannot move that episode");
        }
    }

    async fn warn_if_running(&self) {
        if self.controller.is_running().await {
            warn!("The running feed keeps its old title until the next launch");
        }
    }

    fn print_list(&self) {
        println!("{}", self.read(render_list));
    }
}

fn render_list(library: &Library) -> String {
    let mut out = format!("{} ({} episode(s))", library.title(), library.len());
    if let Some(artwork) = library.artwork_path() {
        out.push_str(&format!("\n  artwork: {}", artwork.display()));
    }
    for (index, entry) in library.entries().iter().enumerate() {
        out.push_str(&format!(
            "\n  {:>3}. {}",
            index + 1,
            truncate_filename(entry.display_name())
        ));
    }
    out
}

fn describe_import(path: &std::path::Path, imported: &PathImport) -> String {
    match imported {
        PathImport::File(AddOutcome::Added(_)) => format!("Added {}", path.display()),
        PathImport::File(AddOutcome::Duplicate) => {
            format!("{} is already in the playlist", path.display())
        }
        PathImport::File(AddOutcome::Unsupported) | PathImport::Ignored => {
            format!("Ignored {} (not a supported file)", path.display())
        }
        PathImport::Folder(FolderImport {
            added,
            duplicates,
            unsupported,
            failed,
        }) => format!(
            "Folder {}: {} added, {} already present, {} unsupported, {} failed",
            path.display(),
            added,
            duplicates,
            unsupported,
            failed
        ),
        PathImport::Artwork => format!("Artwork set from {}", path.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!("list".parse::<Command>().unwrap(), Command::List);
        assert_eq!("  ALPHA ".parse::<Command>().unwrap(), Command::Alphabetize);
        assert_eq!("quit".parse::<Command>().unwrap(), Command::Quit);
        assert_eq!("noartwork".parse::<Command>().unwrap(), Command::NoArtwork);
    }

    #[test]
    fn test_indices_are_one_based() {
        assert_eq!("rm 1".parse::<Command>().unwrap(), Command::Remove(0));
        assert_eq!("up 3".parse::<Command>().unwrap(), Command::Up(2));
        assert_eq!("down 2".parse::<Command>().unwrap(), Command::Down(1));
        assert!("rm 0".parse::<Command>().is_err());
        assert!("rm -1".parse::<Command>().is_err());
        assert!("up x".parse::<Command>().is_err());
    }

    #[test]
    fn test_rename_keeps_spaces_in_name() {
        assert_eq!(
            "rename 2 Chapter  Two".parse::<Command>().unwrap(),
            Command::Rename(1, "Chapter  Two".to_string())
        );
        assert!("rename 2".parse::<Command>().is_err());
    }

    #[test]
    fn test_paths_may_be_quoted() {
        assert_eq!(
            r#"add "/music/My Show/ep 1.mp3""#.parse::<Command>().unwrap(),
            Command::Add(PathBuf::from("/music/My Show/ep 1.mp3"))
        );
        assert_eq!(
            "artwork '/tmp/cover art.png'".parse::<Command>().unwrap(),
            Command::Artwork(PathBuf::from("/tmp/cover art.png"))
        );
        assert!("add".parse::<Command>().is_err());
    }

    #[test]
    fn test_unknown_and_empty_commands() {
        assert!("dance".parse::<Command>().is_err());
        assert!("".parse::<Command>().is_err());
    }

    #[test]
    fn test_loglevel_argument_is_optional() {
        assert_eq!("loglevel".parse::<Command>().unwrap(), Command::LogLevel(None));
        assert_eq!(
            "loglevel debug".parse::<Command>().unwrap(),
            Command::LogLevel(Some("debug".to_string()))
        );
    }
}
