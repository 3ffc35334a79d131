//! Accept loop over real TCP sockets.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use warden::http::connection::ConnectionSettings;
use warden::server::listener::serve;
use warden::server::shutdown;
use warden::site::{FileIndex, RedirectTable, Site};

const HELLO_200: &[u8] =
    b"HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\nContent-Length: 5\r\n\r\n";

fn test_site(tag: &str) -> Arc<Site> {
    let root = std::env::temp_dir().join(format!("warden-listener-{}-{}", tag, std::process::id()));
    let _ = fs::remove_dir_all(&root);
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("hello"), b"hello").unwrap();

    let index = FileIndex::scan(&root).unwrap();
    Arc::new(Site::new(root, index, RedirectTable::default()))
}

#[tokio::test]
async fn test_serves_concurrent_clients_and_stops() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (trigger, shutdown) = shutdown::channel();
    let server = tokio::spawn(serve(
        listener,
        test_site("concurrent"),
        ConnectionSettings::default(),
        shutdown,
    ));

    // An idle keep-alive client must not block a second client.
    let mut idle = TcpStream::connect(addr).await.unwrap();
    idle.write_all(b"GET /hello HTTP/1.1\r\n\r\n").await.unwrap();
    let mut first = vec![0u8; HELLO_200.len() + 5];
    idle.read_exact(&mut first).await.unwrap();
    assert_eq!(first, [HELLO_200, b"hello"].concat());

    let mut other = TcpStream::connect(addr).await.unwrap();
    other
        .write_all(b"GET /missing HTTP/1.1\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut out = Vec::new();
    other.read_to_end(&mut out).await.unwrap();
    assert_eq!(out, b"HTTP/1.1 404 Not Found\r\n\r\n".to_vec());

    trigger.trigger();

    let mut rest = Vec::new();
    idle.read_to_end(&mut rest).await.unwrap();
    assert_eq!(
        rest,
        b"HTTP/1.1 500 Internal Server Error\r\nConnection: close\r\n\r\n".to_vec()
    );

    tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server did not stop")
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn test_stops_without_clients() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let (trigger, shutdown) = shutdown::channel();
    let server = tokio::spawn(serve(
        listener,
        test_site("idle"),
        ConnectionSettings::default(),
        shutdown,
    ));

    trigger.trigger();

    tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server did not stop")
        .unwrap()
        .unwrap();
}
