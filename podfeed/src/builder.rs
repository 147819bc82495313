//! Construction du flux à partir des épisodes de la playlist

use crate::rss::{Channel, Enclosure, Feed, FeedImage, FeedItem, Guid};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use podcovers::ARTWORK_FILE_NAME;
use podplaylist::AudioEntry;
use podutils::content_type_for;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

/// Description fixe du canal
pub const FEED_DESCRIPTION: &str = "Local podcast feed";

/// Construit un [`Feed`] pour un serveur joignable à `base_url`
#[derive(Debug, Clone)]
pub struct FeedBuilder {
    base: Url,
    title: String,
    artwork: Option<PathBuf>,
    built_at: Option<DateTime<Utc>>,
}

impl FeedBuilder {
    /// `base_url` est de la forme `http://{hôte}:{port}`
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let raw = base_url.as_ref();
        let base = Url::parse(raw).map_err(|e| Error::InvalidBaseUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl {
                url: raw.to_string(),
                reason: "not a hierarchical URL".to_string(),
            });
        }

        Ok(Self {
            base,
            title: String::new(),
            artwork: None,
            built_at: None,
        })
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Pochette du podcast ; ignorée si le fichier n'existe pas au moment du build
    pub fn artwork<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        self.artwork = path.map(|p| p.as_ref().to_path_buf());
        self
    }

    /// Date de publication du canal (par défaut l'heure du build)
    pub fn built_at(mut self, at: DateTime<Utc>) -> Self {
        self.built_at = Some(at);
        self
    }

    /// URL de base sans barre finale
    pub fn base_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    /// `{base}/files/{id}/{nom}` avec chaque segment encodé
    pub fn file_url(&self, entry: &AudioEntry) -> String {
        self.url_with_segments(&["files", entry.id(), entry.display_name()])
    }

    pub fn artwork_url(&self) -> String {
        self.url_with_segments(&[ARTWORK_FILE_NAME])
    }

    fn url_with_segments(&self, segments: &[&str]) -> String {
        let mut url = self.base.clone();
        // cannot_be_a_base() est exclu par le constructeur
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.into()
    }

    pub fn build(&self, entries: &[AudioEntry]) -> Feed {
        let link = self.base_url().to_string();
        let built_at = self.built_at.unwrap_or_else(Utc::now);

        let image = self
            .artwork
            .as_ref()
            .filter(|p| p.is_file())
            .map(|_| FeedImage {
                url: self.artwork_url(),
                title: self.title.clone(),
                link: link.clone(),
            });

        let items = entries.iter().filter_map(|e| self.item(e)).collect();

        Feed {
            version: "2.0".to_string(),
            channel: Channel {
                title: self.title.clone(),
                link,
                description: FEED_DESCRIPTION.to_string(),
                pub_date: built_at.to_rfc2822(),
                image,
                items,
            },
        }
    }

    fn item(&self, entry: &AudioEntry) -> Option<FeedItem> {
        let meta = match fs::metadata(entry.cached_path()) {
            Ok(meta) => meta,
            Err(e) => {
                debug!("Skipping {:?} in feed: {}", entry.cached_path(), e);
                return None;
            }
        };
        let modified: DateTime<Utc> = meta.modified().ok()?.into();
        let url = self.file_url(entry);

        Some(FeedItem {
            title: entry.display_name().to_string(),
            link: url.clone(),
            guid: Guid {
                is_perma_link: false,
                value: entry.id().to_string(),
            },
            pub_date: modified.to_rfc2822(),
            enclosure: Enclosure {
                url,
                length: meta.len(),
                mime_type: content_type_for(entry.cached_path()).to_string(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use podplaylist::Playlist;
    use tempfile::TempDir;

    fn playlist(dir: &TempDir, names: &[&str]) -> Playlist {
        let sources = dir.path().join("sources");
        fs::create_dir_all(&sources).unwrap();
        let mut playlist = Playlist::new(dir.path().join("cache"));
        for name in names {
            let src = sources.join(name);
            fs::write(&src, vec![0u8; 1024]).unwrap();
            playlist.add(&src).unwrap();
        }
        playlist
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(FeedBuilder::new("not a url").is_err());
        assert!(FeedBuilder::new("mailto:someone@example.com").is_err());
    }

    #[test]
    fn test_file_url_is_percent_encoded() {
        let dir = tempfile::tempdir().unwrap();
        let playlist = playlist(&dir, &["My Episode #1?.mp3"]);
        let entry = &playlist.entries()[0];

        let url = FeedBuilder::new("http://10.0.0.2:8080")
            .unwrap()
            .file_url(entry);
        assert_eq!(
            url,
            format!(
                "http://10.0.0.2:8080/files/{}/My%20Episode%20%231%3F.mp3",
                entry.id()
            )
        );
    }

    #[test]
    fn test_channel_fields() {
        let dir = tempfile::tempdir().unwrap();
        let playlist = playlist(&dir, &["a.mp3"]);

        let feed = FeedBuilder::new("http://10.0.0.2:8080")
            .unwrap()
            .title("Bedtime Stories")
            .build(playlist.entries());

        assert_eq!(feed.version, "2.0");
        assert_eq!(feed.channel.title, "Bedtime Stories");
        assert_eq!(feed.channel.link, "http://10.0.0.2:8080");
        assert_eq!(feed.channel.description, FEED_DESCRIPTION);
        assert!(feed.channel.image.is_none());
    }

    #[test]
    fn test_items_follow_playlist_with_enclosures() {
        let dir = tempfile::tempdir().unwrap();
        let playlist = playlist(&dir, &["one.mp3", "two.m4b"]);

        let feed = FeedBuilder::new("http://host:9000")
            .unwrap()
            .build(playlist.entries());

        let items = feed.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "one.mp3");
        assert_eq!(items[0].enclosure.mime_type, "audio/mpeg");
        assert_eq!(items[0].enclosure.length, 1024);
        assert_eq!(items[0].guid.value, playlist.entries()[0].id());
        assert!(!items[0].guid.is_perma_link);
        assert_eq!(items[0].link, items[0].enclosure.url);

        assert_eq!(items[1].title, "two.m4a");
        assert_eq!(items[1].enclosure.mime_type, "audio/mp4");
    }

    #[test]
    fn test_missing_cached_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let playlist = playlist(&dir, &["a.mp3", "b.mp3", "c.mp3"]);
        fs::remove_file(playlist.entries()[1].cached_path()).unwrap();

        let feed = FeedBuilder::new("http://host:9000")
            .unwrap()
            .build(playlist.entries());

        let titles: Vec<&str> = feed.items().iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["a.mp3", "c.mp3"]);
    }

    #[test]
    fn test_artwork_only_when_file_exists() {
        let dir = tempfile::tempdir().unwrap();
        let artwork = dir.path().join("artwork.jpg");

        let builder = FeedBuilder::new("http://host:9000")
            .unwrap()
            .title("Show")
            .artwork(Some(&artwork));
        assert!(builder.build(&[]).channel.image.is_none());

        fs::write(&artwork, b"jpeg").unwrap();
        let image = builder.build(&[]).channel.image.unwrap();
        assert_eq!(image.url, "http://host:9000/artwork.jpg");
        assert_eq!(image.title, "Show");
        assert_eq!(image.link, "http://host:9000");
    }

    #[test]
    fn test_to_xml_document() {
        let dir = tempfile::tempdir().unwrap();
        let playlist = playlist(&dir, &["Tom & Jerry.mp3"]);
        let built_at = DateTime::parse_from_rfc2822("Tue, 15 Jul 2025 10:00:00 +0000")
            .unwrap()
            .with_timezone(&Utc);

        let xml = FeedBuilder::new("http://host:9000")
            .unwrap()
            .title("Show")
            .built_at(built_at)
            .build(playlist.entries())
            .to_xml()
            .unwrap();

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?><rss version="2.0">"#));
        assert!(xml.contains("<title>Show</title>"));
        assert!(xml.contains("<description>Local podcast feed</description>"));
        assert!(xml.contains("<pubDate>Tue, 15 Jul 2025 10:00:00 +0000</pubDate>"));
        assert!(xml.contains("<title>Tom &amp; Jerry.mp3</title>"));
        assert!(xml.contains(r#"<guid isPermaLink="false">"#));
        assert!(xml.contains(r#"type="audio/mpeg""#));
        assert!(xml.contains(r#"length="1024""#));
        assert!(xml.contains("Tom%20&amp;%20Jerry.mp3"));
        assert!(!xml.contains("<image>"));
    }
}
