use filetime::FileTime;
use podplaylist::AudioEntry;
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};

/// Date les copies en cache selon leur position dans la playlist
///
/// L'épisode `i` sur `n` reçoit `now + (n - 1 - i)` secondes comme date
/// d'accès et de modification : le premier épisode est le plus récent et
/// les dates décroissent strictement. Un fichier qui ne peut pas être daté
/// est journalisé puis ignoré. Retourne le nombre de fichiers datés.
pub fn assign_publish_order(entries: &[AudioEntry], now: SystemTime) -> usize {
    let count = entries.len();
    let mut stamped = 0;

    for (index, entry) in entries.iter().enumerate() {
        let offset = Duration::from_secs((count - 1 - index) as u64);
        let time = FileTime::from_system_time(now + offset);

        match filetime::set_file_times(entry.cached_path(), time, time) {
            Ok(()) => stamped += 1,
            Err(e) => warn!(
                "Cannot set publish time of {:?}: {}",
                entry.cached_path(),
                e
            ),
        }
    }

    debug!("Stamped {}/{} episodes in playlist order", stamped, count);
    stamped
}
