//! # podserver - Serveur HTTP local du podcast
//!
//! Cette crate publie la playlist sur le réseau local :
//!
//! - [`ServerController`] : lancement et arrêt d'une session de service
//! - [`routes`] : `/feed.xml`, `/files/{id}/{name}` et `/artwork.jpg`
//! - [`logs`] : initialisation du logging avec niveau réglable à chaud
//!
//! ## Exemple d'utilisation
//!
//! ```rust,no_run
//! use podplaylist::Library;
//! use podserver::ServerController;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut library = Library::open("/tmp/pod-cache", "/tmp/state.json", "My Podcast")?;
//!     library.add_file("/music/episode-01.mp3")?;
//!
//!     let controller = ServerController::new(8080);
//!     if let Some(url) = controller.launch(library.into_shared()).await? {
//!         println!("Subscribe to {url}");
//!     }
//!
//!     tokio::signal::ctrl_c().await?;
//!     controller.stop().await;
//!     Ok(())
//! }
//! ```

mod error;
pub mod logs;
pub mod routes;
pub mod server;

pub use error::{Error, Result};
pub use logs::{LogHandle, LoggingOptions, init_logging};
pub use routes::{FeedState, create_router};
pub use server::{SHUTDOWN_TIMEOUT, ServerController};
