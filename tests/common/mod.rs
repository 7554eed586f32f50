//! Shared utilities for integration testing.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::IntoResponse;
use axum::{Json, Router};
use serde_json::json;
use std::fs;
use std::net::SocketAddr;
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use bms_gateway::{GatewayConfig, HttpServer, Shutdown};

pub const INDEX_HTML: &str = "<!doctype html><title>BMS</title>";

/// Start a backend that answers every request with a JSON description of it.
///
/// Paths containing `teapot` get a 418 so status pass-through can be checked.
pub async fn start_echo_backend(name: &'static str) -> SocketAddr {
    let app = Router::new().fallback(move |request: Request<Body>| async move {
        let (parts, body) = request.into_parts();
        let body = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        let status = if parts.uri.path().contains("teapot") {
            StatusCode::IM_A_TEAPOT
        } else {
            StatusCode::OK
        };

        (
            status,
            [("x-backend", name)],
            Json(json!({
                "backend": name,
                "method": parts.method.as_str(),
                "uri": parts.uri.to_string(),
                "host": header("host"),
                "authorization": header("authorization"),
                "request_id": header("x-request-id"),
                "body": String::from_utf8_lossy(&body),
            })),
        )
            .into_response()
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Start a backend that accepts connections and never answers.
pub async fn start_stalled_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    tokio::spawn(async move {
                        let _held = socket;
                        tokio::time::sleep(Duration::from_secs(60)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });
    addr
}

/// Start a backend that sends headers announcing 100 bytes, then `partial`, then stalls.
pub async fn start_partial_body_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let _ = socket
                    .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 100\r\n\r\npartial")
                    .await;
                tokio::time::sleep(Duration::from_secs(60)).await;
            });
        }
    });
    addr
}

/// An address nobody listens on.
pub fn closed_port() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

/// A build directory with an index document and one asset.
pub fn static_site() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("index.html"), INDEX_HTML).unwrap();
    fs::create_dir(dir.path().join("assets")).unwrap();
    fs::write(dir.path().join("assets/logo.png"), [0x89, b'P', b'N', b'G', 0x0d, 0x0a]).unwrap();
    fs::write(dir.path().join("styles.css"), "body { margin: 0 }").unwrap();
    dir
}

pub fn config_for(
    general: SocketAddr,
    scheduling: SocketAddr,
    network: SocketAddr,
    site: &TempDir,
) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.host = "127.0.0.1".into();
    config.listener.port = 0;
    config.backends.general = format!("http://{general}");
    config.backends.scheduling = format!("http://{scheduling}");
    config.backends.network = format!("http://{network}");
    config.static_files.root = site.path().to_path_buf();
    config.timeouts.connect_secs = 1;
    config.timeouts.upstream_secs = 5;
    config
}

/// A running gateway; stops when dropped.
pub struct Gateway {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl Gateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for Gateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn start_gateway(config: GatewayConfig) -> Gateway {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    Gateway { addr, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
