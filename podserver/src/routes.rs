//! Routes HTTP du serveur de podcast
//!
//! - `GET /feed.xml` : le flux RSS figé au lancement
//! - `GET /files/{id}/{name}` : une copie en cache (requêtes `Range` supportées)
//! - `GET /artwork.jpg` : la pochette courante
//!
//! Les handlers ne prennent jamais le verrou de la bibliothèque : les
//! copies et la pochette vivent sous la racine du cache, qui ne change pas
//! pendant une session.

use axum::{
    Router,
    body::Body,
    extract::{Path, Request, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use podcovers::ARTWORK_FILE_NAME;
use podutils::content_type_for;
use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::debug;

pub const FEED_CONTENT_TYPE: &str = "application/rss+xml";
pub const ARTWORK_CONTENT_TYPE: &str = "image/jpeg";

/// État partagé par les handlers
#[derive(Clone)]
pub struct FeedState {
    cache_root: Arc<FsPath>,
    feed_xml: Arc<str>,
}

impl FeedState {
    pub fn new(cache_root: impl Into<PathBuf>, feed_xml: impl Into<Arc<str>>) -> Self {
        let cache_root: PathBuf = cache_root.into();
        Self {
            cache_root: Arc::from(cache_root),
            feed_xml: feed_xml.into(),
        }
    }
}

/// Crée le router du serveur de podcast
pub fn create_router(state: FeedState) -> Router {
    Router::new()
        .route("/feed.xml", get(serve_feed))
        .route("/files/{id}/{name}", get(serve_episode))
        .route("/artwork.jpg", get(serve_artwork))
        .with_state(state)
}

async fn serve_feed(State(state): State<FeedState>) -> Response {
    (
        [(header::CONTENT_TYPE, FEED_CONTENT_TYPE)],
        state.feed_xml.to_string(),
    )
        .into_response()
}

async fn serve_episode(
    State(state): State<FeedState>,
    Path((id, name)): Path<(String, String)>,
    request: Request,
) -> Response {
    if is_unsafe_segment(&id) || is_unsafe_segment(&name) {
        debug!("Rejected file request {:?}/{:?}", id, name);
        return (StatusCode::BAD_REQUEST, "Invalid path").into_response();
    }

    let file_path = state.cache_root.join(&id).join(&name);
    if !file_path.is_file() {
        return (StatusCode::NOT_FOUND, "File not found").into_response();
    }
    // Un lien symbolique placé dans le cache ne doit pas en sortir
    if !is_within(&state.cache_root, &file_path) {
        debug!("File request {:?}/{:?} escapes the cache", id, name);
        return (StatusCode::FORBIDDEN, "Access denied").into_response();
    }

    serve_file(file_path, content_type_for(&name), request).await
}

async fn serve_artwork(State(state): State<FeedState>, request: Request) -> Response {
    let artwork = state.cache_root.join(ARTWORK_FILE_NAME);
    if !artwork.is_file() {
        return (StatusCode::NOT_FOUND, "Artwork not found").into_response();
    }
    serve_file(artwork, ARTWORK_CONTENT_TYPE, request).await
}

/// Sert un fichier via `ServeFile` en imposant le type de contenu
async fn serve_file(path: PathBuf, content_type: &'static str, request: Request) -> Response {
    let response = match ServeFile::new(path).oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };

    let mut response = response.map(Body::new);
    if response.status().is_success() {
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    }
    response
}

/// Un segment est refusé s'il contient `..` ou un séparateur de chemin
fn is_unsafe_segment(segment: &str) -> bool {
    segment.is_empty() || segment.contains("..") || segment.contains(['/', '\\'])
}

/// Vérifie, liens résolus, que `path` existe et reste sous `root`
fn is_within(root: &FsPath, path: &FsPath) -> bool {
    match (root.canonicalize(), path.canonicalize()) {
        (Ok(root), Ok(path)) => path.starts_with(root),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsafe_segments() {
        assert!(is_unsafe_segment(".."));
        assert!(is_unsafe_segment("a..b.mp3"));
        assert!(is_unsafe_segment("a/b"));
        assert!(is_unsafe_segment("a\\b"));
        assert!(is_unsafe_segment(""));
        assert!(!is_unsafe_segment("episode 1.mp3"));
        assert!(!is_unsafe_segment("0f8c3a52-7d4e-4bb8-9a51-2c1e0e7b9f10"));
    }

    #[test]
    fn test_is_within() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("cache");
        std::fs::create_dir_all(root.join("abc")).unwrap();
        std::fs::write(root.join("abc").join("a.mp3"), b"x").unwrap();
        std::fs::write(dir.path().join("outside.mp3"), b"x").unwrap();

        assert!(is_within(&root, &root.join("abc").join("a.mp3")));
        assert!(!is_within(&root, &root.join("abc").join("..").join("..").join("outside.mp3")));
        assert!(!is_within(&root, &root.join("abc").join("missing.mp3")));
    }
}
