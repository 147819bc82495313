//! # podfeed - Flux RSS 2.0 d'une playlist
//!
//! Cette crate transforme la playlist en document RSS consommable par une
//! application de podcast :
//! - [`assign_publish_order`] date les copies en cache pour que l'ordre de la
//!   playlist devienne l'ordre de publication
//! - [`FeedBuilder`] construit le [`Feed`] à partir des épisodes
//! - [`Feed::to_xml`] produit le document final
//!
//! ```no_run
//! use podfeed::{FeedBuilder, assign_publish_order};
//! use podplaylist::Library;
//! use std::time::SystemTime;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let library = Library::open("/tmp/pod-cache", "/tmp/state.json", "My Podcast")?;
//! assign_publish_order(library.entries(), SystemTime::now());
//!
//! let feed = FeedBuilder::new("http://192.168.1.20:8080")?
//!     .title(library.title())
//!     .artwork(library.artwork_path())
//!     .build(library.entries());
//! println!("{}", feed.to_xml()?);
//! # Ok(())
//! # }
//! ```

mod builder;
mod error;
mod publish;
mod rss;

pub use builder::{FEED_DESCRIPTION, FeedBuilder};
pub use error::{Error, Result};
pub use publish::assign_publish_order;
pub use rss::{Channel, Enclosure, Feed, FeedImage, FeedItem, Guid};
