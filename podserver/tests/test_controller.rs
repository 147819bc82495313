use podconfig::Config;
use podplaylist::{Library, SharedLibrary};
use podserver::{Error, ServerController};
use std::fs;
use std::time::SystemTime;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

fn library(dir: &TempDir, names: &[&str]) -> SharedLibrary {
    let sources = dir.path().join("sources");
    fs::create_dir_all(&sources).unwrap();

    let mut library = Library::open(
        dir.path().join("cache"),
        dir.path().join("state.json"),
        "Lifecycle Show",
    )
    .unwrap();
    for name in names {
        let src = sources.join(name);
        fs::write(&src, b"fake audio").unwrap();
        library.add_file(&src).unwrap();
    }
    library.into_shared()
}

/// Requête HTTP/1.1 minimale, retourne la réponse brute
async fn http_get(port: u16, path: &str) -> String {
    let mut stream = TcpStream::connect(("127.0.0.1", port)).await.unwrap();
    let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8_lossy(&response).into_owned()
}

#[tokio::test]
async fn test_launch_with_empty_playlist_is_noop() {
    let dir = tempfile::tempdir().unwrap();
    let controller = ServerController::new(0);

    assert_eq!(controller.launch(library(&dir, &[])).await.unwrap(), None);
    assert!(!controller.is_running().await);
    assert!(controller.feed_url().await.is_none());
}

#[tokio::test]
async fn test_stop_without_session_is_noop() {
    let controller = ServerController::new(0);

    assert!(!controller.stop().await);
    assert!(!controller.stop().await);
    assert!(!controller.is_running().await);
}

#[tokio::test]
async fn test_launch_serves_feed_then_stops() {
    let dir = tempfile::tempdir().unwrap();
    let library = library(&dir, &["one.mp3", "two.mp3"]);
    let controller = ServerController::new(0).with_base_host(Some("127.0.0.1".to_string()));

    let feed_url = controller.launch(library.clone()).await.unwrap().unwrap();
    let port = controller.local_addr().await.unwrap().port();
    assert_eq!(feed_url, format!("http://127.0.0.1:{port}/feed.xml"));
    assert!(controller.is_running().await);
    assert_eq!(controller.feed_url().await, Some(feed_url.clone()));

    // Une seule session à la fois
    assert_eq!(controller.launch(library.clone()).await.unwrap(), None);

    let response = http_get(port, "/feed.xml").await;
    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.contains("application/rss+xml"));
    assert!(response.contains("<title>Lifecycle Show</title>"));
    assert!(response.contains(&format!("http://127.0.0.1:{port}/files/")));

    assert!(controller.stop().await);
    assert!(!controller.is_running().await);
    assert!(controller.feed_url().await.is_none());
    assert!(TcpStream::connect(("127.0.0.1", port)).await.is_err());

    // Relance possible après arrêt
    assert!(controller.launch(library).await.unwrap().is_some());
    assert!(controller.stop().await);
}

#[tokio::test]
async fn test_launch_orders_publish_dates() {
    let dir = tempfile::tempdir().unwrap();
    let library = library(&dir, &["c.mp3", "a.mp3", "b.mp3"]);
    let controller = ServerController::new(0).with_base_host(Some("127.0.0.1".to_string()));

    controller.launch(library.clone()).await.unwrap().unwrap();
    controller.stop().await;

    let times: Vec<SystemTime> = library
        .read()
        .unwrap()
        .entries()
        .iter()
        .map(|e| fs::metadata(e.cached_path()).unwrap().modified().unwrap())
        .collect();
    assert!(times.windows(2).all(|pair| pair[0] > pair[1]));
}

#[tokio::test]
async fn test_port_in_use_reports_bind_error() {
    let dir = tempfile::tempdir().unwrap();
    let busy = std::net::TcpListener::bind("0.0.0.0:0").unwrap();
    let port = busy.local_addr().unwrap().port();
    let controller = ServerController::new(port);

    let err = controller.launch(library(&dir, &["a.mp3"])).await.unwrap_err();
    assert!(matches!(err, Error::Bind { .. }));
    assert!(!controller.is_running().await);
}

#[tokio::test]
async fn test_configured_controller_uses_base_host() {
    let dir = tempfile::tempdir().unwrap();
    let config_dir = dir.path().join("config");
    let config = Config::load_config(config_dir.to_str().unwrap()).unwrap();
    config.set_http_port(0).unwrap();
    config.set_base_host("http://127.0.0.1/".to_string()).unwrap();

    let controller = ServerController::new_configured(&config);
    let feed_url = controller.launch(library(&dir, &["a.mp3"])).await.unwrap().unwrap();
    assert!(feed_url.starts_with("http://127.0.0.1:"), "{feed_url}");
    assert!(controller.stop().await);
}
