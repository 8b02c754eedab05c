//! Shared utilities for integration tests.

use std::net::SocketAddr;

use dispersion::config::{AppConfig, RouteConfig};
use dispersion::http::HttpServer;
use dispersion::lifecycle::Shutdown;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A server bound to an ephemeral port.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub updates: mpsc::UnboundedSender<AppConfig>,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<std::io::Result<()>>,
}

impl TestServer {
    #[allow(dead_code)]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Build a config from `(pattern, rewrite)` pairs.
pub fn config_with_routes(routes: &[(&str, &str)]) -> AppConfig {
    let mut config = AppConfig::default();
    config.app.base_url = "http://localhost".to_string();
    config.routes = routes
        .iter()
        .map(|(pattern, rewrite)| RouteConfig {
            name: None,
            pattern: pattern.to_string(),
            rewrite: (*rewrite).into(),
        })
        .collect();
    config
}

/// Start a server for `config` on 127.0.0.1:0.
pub async fn spawn_server(config: AppConfig) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(&config).unwrap();
    let (updates, rx) = mpsc::unbounded_channel();
    let shutdown = Shutdown::new();
    let signal = shutdown.subscribe();

    let handle = tokio::spawn(async move { server.run(listener, rx, signal).await });

    TestServer {
        addr,
        updates,
        shutdown,
        handle,
    }
}
