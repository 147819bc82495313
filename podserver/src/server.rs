//! # Cycle de vie du serveur de podcast
//!
//! [`ServerController`] garantit qu'au plus une session HTTP tourne à la fois.
//! Lancer une session date les épisodes dans l'ordre de la playlist, fige le
//! flux RSS puis écoute sur toutes les interfaces. L'arrêt est gracieux, avec
//! un délai au-delà duquel la tâche est interrompue.

use crate::routes::{FeedState, create_router};
use crate::{Error, Result};
use podconfig::Config;
use podfeed::{FeedBuilder, assign_publish_order};
use podplaylist::SharedLibrary;
use podutils::guess_local_ip;
use std::net::SocketAddr;
use std::sync::PoisonError;
use std::time::{Duration, SystemTime};
use tokio::net::TcpListener;
use tokio::sync::{Mutex, oneshot};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Délai accordé aux connexions en cours lors de l'arrêt
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Une session de service en cours
#[derive(Debug)]
struct ServerSession {
    feed_url: String,
    local_addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    join_handle: JoinHandle<()>,
}

impl ServerSession {
    async fn shutdown(self) {
        let _ = self.shutdown.send(());

        let mut join_handle = self.join_handle;
        if tokio::time::timeout(SHUTDOWN_TIMEOUT, &mut join_handle)
            .await
            .is_err()
        {
            warn!("Server did not stop within {:?}, aborting", SHUTDOWN_TIMEOUT);
            join_handle.abort();
        }
    }
}

/// Contrôleur de démarrage / arrêt du serveur
#[derive(Debug)]
pub struct ServerController {
    http_port: u16,
    base_host: Option<String>,
    session: Mutex<Option<ServerSession>>,
}

impl ServerController {
    /// `http_port` à 0 laisse le système choisir un port libre
    pub fn new(http_port: u16) -> Self {
        Self {
            http_port,
            base_host: None,
            session: Mutex::new(None),
        }
    }

    /// Port et hôte pris dans la configuration
    pub fn new_configured(config: &Config) -> Self {
        Self::new(config.get_http_port()).with_base_host(config.get_base_host())
    }

    /// Hôte publié dans les URLs du flux
    ///
    /// Sans hôte, l'adresse locale est détectée à chaque lancement.
    pub fn with_base_host(mut self, host: Option<String>) -> Self {
        self.base_host = host.filter(|h| !h.trim().is_empty());
        self
    }

    pub fn http_port(&self) -> u16 {
        self.http_port
    }

    /// Lance une session de service
    ///
    /// Retourne l'URL du flux, ou `None` si une session tourne déjà ou si la
    /// playlist est vide.
    pub async fn launch(&self, library: SharedLibrary) -> Result<Option<String>> {
        let mut session = self.session.lock().await;
        if session.is_some() {
            return Ok(None);
        }
        let is_empty = library
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty();
        if is_empty {
            return Ok(None);
        }

        let addr = SocketAddr::from(([0, 0, 0, 0], self.http_port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| Error::Bind { addr, source })?;
        let local_addr = listener.local_addr()?;

        let host = self.base_host.clone().unwrap_or_else(guess_local_ip);
        let base_url = format!("http://{}:{}", host, local_addr.port());
        let feed_url = format!("{}/feed.xml", base_url);

        let (cache_root, feed_xml) = {
            let library = library.read().unwrap_or_else(PoisonError::into_inner);
            assign_publish_order(library.entries(), SystemTime::now());
            let feed = FeedBuilder::new(&base_url)?
                .title(library.title())
                .artwork(library.artwork_path())
                .build(library.entries());
            info!(
                "Feed built with {} episode(s) for {:?}",
                feed.items().len(),
                library.title()
            );
            (library.cache_root().to_path_buf(), feed.to_xml()?)
        };

        let router = create_router(FeedState::new(cache_root, feed_xml));
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let join_handle = tokio::spawn(async move {
            let served = axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
            if let Err(e) = served {
                warn!("Server error: {}", e);
            }
        });

        info!("Podcast server listening on {}, feed at {}", local_addr, feed_url);
        *session = Some(ServerSession {
            feed_url: feed_url.clone(),
            local_addr,
            shutdown: shutdown_tx,
            join_handle,
        });
        Ok(Some(feed_url))
    }

    /// Arrête la session en cours ; sans effet s'il n'y en a pas
    ///
    /// Retourne `true` si une session a été arrêtée.
    pub async fn stop(&self) -> bool {
        let Some(session) = self.session.lock().await.take() else {
            return false;
        };

        let addr = session.local_addr;
        session.shutdown().await;
        info!("Podcast server on {} stopped", addr);
        true
    }

    pub async fn is_running(&self) -> bool {
        self.session.lock().await.is_some()
    }

    /// URL du flux de la session en cours
    pub async fn feed_url(&self) -> Option<String> {
        self.session
            .lock()
            .await
            .as_ref()
            .map(|s| s.feed_url.clone())
    }

    pub async fn local_addr(&self) -> Option<SocketAddr> {
        self.session.lock().await.as_ref().map(|s| s.local_addr)
    }
}
