//! filestore-api server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server (axum, request ID, timeout, body limit)
//!                         │
//!                         ▼
//!                     routing::Router ──▶ handlers::Endpoint
//!                                             │
//!                         ┌───────────────────┴──────────┐
//!                         ▼                              ▼
//!                     store::RecordStore            cache::OnceCache (menu)
//!                     {data_dir}/{collection}/{key}.json
//!
//!     logs::ContextLogger ──▶ logs::LogManager ──▶ {logs_dir}/{stream}.log
//!                                   ▲
//!     logs::LogRotator (interval) ──┘ compress + truncate → {stream}-{hex}.gz.b64
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use filestore_api::config::load_from_env;
use filestore_api::http::{serve_tls, HttpServer};
use filestore_api::lifecycle::{trigger_on_signal, Shutdown};
use filestore_api::logs::{LogManager, LogRotator};
use filestore_api::observability::{logging, metrics};
use filestore_api::store::RecordStore;

#[derive(Parser)]
#[command(name = "filestore-api", version)]
#[command(about = "JSON record service backed by plain files")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_from_env(args.config.as_deref())?;

    logging::init(&config.logging.filter);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = config.environment.as_str(),
        "filestore-api starting"
    );
    tracing::info!(
        bind_address = %config.listener.bind_address,
        data_dir = %config.storage.data_dir.display(),
        logs_dir = %config.logging.logs_dir.display(),
        rotation_interval_secs = config.rotation_interval().as_secs(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    tokio::spawn(trigger_on_signal(shutdown.clone()));

    let logs = LogManager::new(&config.logging.logs_dir);
    let rotator = LogRotator::new(logs.clone(), config.rotation_interval());
    let rotation = tokio::spawn(rotator.run(shutdown.subscribe()));

    let store = RecordStore::new(&config.storage.data_dir);
    let server = HttpServer::new(&config.listener, store, &logs)?;

    let https = config.listener.tls.clone().map(|tls| {
        let app = server.router();
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = serve_tls(app, &tls, shutdown.clone()).await {
                tracing::error!(error = %e, "HTTPS listener failed");
                shutdown.trigger();
            }
        })
    });

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let served = server.run(listener, shutdown.clone()).await;

    // Whatever ended the plain listener, stop everything else too.
    shutdown.trigger();
    if let Some(https) = https {
        let _ = https.await;
    }
    let _ = rotation.await;

    served?;
    tracing::info!("Shutdown complete");
    Ok(())
}
