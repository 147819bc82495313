//! Structures RSS 2.0 sérialisées avec quick-xml

use crate::Result;
use serde::Serialize;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Racine d'un document RSS 2.0
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename = "rss")]
pub struct Feed {
    #[serde(rename = "@version")]
    pub version: String,

    pub channel: Channel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Channel {
    pub title: String,

    pub link: String,

    pub description: String,

    #[serde(rename = "pubDate")]
    pub pub_date: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<FeedImage>,

    #[serde(rename = "item")]
    pub items: Vec<FeedItem>,
}

/// Pochette du podcast
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedImage {
    pub url: String,
    pub title: String,
    pub link: String,
}

/// Un épisode publié
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedItem {
    pub title: String,

    pub link: String,

    pub guid: Guid,

    #[serde(rename = "pubDate")]
    pub pub_date: String,

    pub enclosure: Enclosure,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Guid {
    #[serde(rename = "@isPermaLink")]
    pub is_perma_link: bool,

    #[serde(rename = "$text")]
    pub value: String,
}

/// Fichier média attaché à l'épisode
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Enclosure {
    #[serde(rename = "@url")]
    pub url: String,

    #[serde(rename = "@length")]
    pub length: u64,

    #[serde(rename = "@type")]
    pub mime_type: String,
}

impl Feed {
    pub fn items(&self) -> &[FeedItem] {
        &self.channel.items
    }

    /// Sérialise le flux, déclaration XML comprise
    pub fn to_xml(&self) -> Result<String> {
        let body = quick_xml::se::to_string(self)?;
        Ok(format!("{XML_DECLARATION}{body}"))
    }
}
