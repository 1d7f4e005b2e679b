//! Shared utilities for integration tests.

use std::io::Write;
use std::net::SocketAddr;

use subscription_merger::config::{AppConfig, SourceMode};
use subscription_merger::{HttpServer, Shutdown};
use tempfile::NamedTempFile;
use tokio::net::TcpListener;

pub const PREFIX: &str = "s3cr3t";

/// A config for tests: remote source list at `source_url`, short timeouts.
pub fn remote_config(source_url: String) -> AppConfig {
    let mut config = AppConfig::default();
    config.route.prefix = PREFIX.to_string();
    config.source_list.url = source_url;
    config.source_list.timeout_ms = 2000;
    config.subscriptions.timeout_ms = 500;
    config
}

/// A config reading the source list from a local file.
pub fn local_config(path: &std::path::Path) -> AppConfig {
    let mut config = remote_config(String::new());
    config.source_list.mode = SourceMode::Local;
    config.source_list.local_path = path.to_path_buf();
    config
}

/// Write a temporary source-list document.
pub fn source_file(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file
}

/// A running merger bound to an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestServer {
    pub async fn start(config: AppConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let shutdown = Shutdown::new();
        let server = HttpServer::new(config).unwrap();
        let rx = shutdown.subscribe();
        tokio::spawn(async move {
            let _ = server.run(listener, rx).await;
        });

        Self { addr, shutdown }
    }

    pub fn url(&self, client_id: Option<&str>) -> String {
        match client_id {
            Some(id) => format!("http://{}/{}/{}", self.addr, PREFIX, id),
            None => format!("http://{}/{}", self.addr, PREFIX),
        }
    }

    pub async fn get(&self, client_id: Option<&str>) -> reqwest::Response {
        client().get(self.url(client_id)).send().await.expect("merger unreachable")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

pub fn b64(data: &[u8]) -> String {
    subscription_merger::codec::encode_payload(data)
}

pub fn unb64(data: &str) -> Vec<u8> {
    subscription_merger::codec::decode_subscription(data).unwrap()
}
