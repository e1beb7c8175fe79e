//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use filestore_api::config::ListenerConfig;
use filestore_api::http::HttpServer;
use filestore_api::lifecycle::Shutdown;
use filestore_api::logs::LogManager;
use filestore_api::store::RecordStore;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A server bound to an ephemeral port over scratch directories.
pub struct TestServer {
    pub addr: SocketAddr,
    pub store: RecordStore,
    pub logs: LogManager,
    pub client: reqwest::Client,
    shutdown: Shutdown,
    task: JoinHandle<std::io::Result<()>>,
    _dir: TempDir,
}

impl TestServer {
    pub async fn start() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("data"));
        let logs = LogManager::new(dir.path().join("logs"));

        let server = HttpServer::new(&ListenerConfig::default(), store.clone(), &logs).unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let shutdown = Shutdown::new();
        let task = tokio::spawn(server.run(listener, shutdown.clone()));

        let client = reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        Self {
            addr,
            store,
            logs,
            client,
            shutdown,
            task,
            _dir: dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}/{}", self.addr, path.trim_start_matches('/'))
    }

    #[allow(dead_code)]
    pub fn logs_dir(&self) -> PathBuf {
        self.logs.logs_dir().to_path_buf()
    }

    /// Trigger shutdown and wait for the listener to drain.
    pub async fn stop(self) {
        self.shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(5), self.task)
            .await
            .expect("server did not stop")
            .unwrap()
            .unwrap();
    }
}

/// Poll `check` until it returns true or about two seconds pass.
#[allow(dead_code)]
pub async fn eventually<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..100 {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}
