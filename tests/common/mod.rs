//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::time::Duration;
use site_edge::config::{EdgeConfig, LocationConfig};
use site_edge::http::HttpServer;
use site_edge::lifecycle::Shutdown;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Start a mock page renderer that answers every request with a JSON echo of
/// the path and headers it received.
pub async fn start_mock_renderer() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    tokio::spawn(handle_renderer_connection(socket));
                }
                Err(_) => break,
            }
        }
    });

    addr
}

async fn handle_renderer_connection(mut socket: TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    let head = String::from_utf8_lossy(&buf).to_string();
    let mut lines = head.split("\r\n");
    let path = lines
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .unwrap_or("")
        .to_string();
    let header = |name: &str| {
        head.split("\r\n")
            .skip(1)
            .filter_map(|l| l.split_once(':'))
            .find(|(k, _)| k.trim().eq_ignore_ascii_case(name))
            .map(|(_, v)| v.trim().to_string())
    };

    let body = serde_json::json!({
        "path": path,
        "host": header("host"),
        "forwarded_host": header("x-forwarded-host"),
        "request_id": header("x-request-id"),
        "original_path": header("x-original-path"),
    })
    .to_string();

    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

/// Start a renderer that accepts connections and never answers.
pub async fn start_stalled_renderer() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    addr
}

/// Location dataset shared by the tests.
pub fn locations() -> Vec<LocationConfig> {
    [("austin", "Austin", "tx"), ("round-rock", "Round Rock", "tx"), ("tulsa", "Tulsa", "ok")]
        .into_iter()
        .map(|(id, name, state)| LocationConfig {
            id: id.into(),
            name: name.into(),
            state: state.into(),
        })
        .collect()
}

/// Start the edge in front of `upstream` and return its address.
pub async fn start_edge(upstream: SocketAddr, shutdown: &Shutdown) -> SocketAddr {
    start_edge_with(upstream, shutdown, |_| {}).await
}

/// Like [`start_edge`], letting the caller adjust the configuration first.
pub async fn start_edge_with(
    upstream: SocketAddr,
    shutdown: &Shutdown,
    customize: impl FnOnce(&mut EdgeConfig),
) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let mut config = EdgeConfig::default();
    config.listener.bind_address = addr.to_string();
    config.upstream.address = upstream.to_string();
    config.locations = locations();
    customize(&mut config);

    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    addr
}

/// Client that never follows redirects.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}

/// HTTP/2 (prior knowledge) client resolving `host` to the edge.
pub fn http2_client(host: &str, edge: SocketAddr) -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .http2_prior_knowledge()
        .resolve(host, edge)
        .build()
        .unwrap()
}

/// GET `path` from the edge with an explicit Host header.
pub async fn get(edge: SocketAddr, host: &str, path: &str) -> reqwest::Response {
    client()
        .get(format!("http://{}{}", edge, path))
        .header("Host", host)
        .send()
        .await
        .expect("Edge unreachable")
}
