//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::Arc;

use exfil_listener::capture::ChannelSink;
use exfil_listener::{Config, HttpServer, Shutdown};
use tokio::net::TcpListener;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

/// A listener running on an ephemeral local port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub reports: UnboundedReceiver<String>,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Next capture block, failing the test if none shows up in time.
    pub async fn next_report(&mut self) -> String {
        tokio::time::timeout(std::time::Duration::from_secs(5), self.reports.recv())
            .await
            .expect("timed out waiting for capture report")
            .expect("report channel closed")
    }
}

/// Default config bound to an ephemeral loopback port.
pub fn local_config(chain: &str) -> Config {
    let mut config = Config::default();
    config.listener.bind_address = [127, 0, 0, 1].into();
    config.listener.port = 0;
    config.decode.chain = chain.parse().expect("valid chain");
    config
}

/// Start a listener with the given selector string as its decode chain.
pub async fn start_server(chain: &str) -> TestServer {
    start_server_with(local_config(chain)).await
}

/// Start a listener with an explicit config.
pub async fn start_server_with(config: Config) -> TestServer {
    let listener = TcpListener::bind(config.listener.socket_addr()).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (sink, reports) = ChannelSink::new();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, Arc::new(sink));
    let server_shutdown = shutdown.subscribe();
    let handle = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    TestServer {
        addr,
        reports,
        shutdown,
        handle,
    }
}

/// Client without connection pooling or system proxies.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
