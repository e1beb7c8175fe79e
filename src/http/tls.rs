//! HTTPS listener.
//!
//! Serves the same router as the plain listener, with certificates loaded
//! from PEM files through `axum-server`'s rustls support.

use std::io;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;

use crate::config::TlsConfig;
use crate::lifecycle::Shutdown;

/// Grace period for in-flight HTTPS requests after shutdown fires.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Load TLS configuration from certificate and key files.
pub async fn load_tls_config(cert_path: &Path, key_path: &Path) -> io::Result<RustlsConfig> {
    for (what, path) in [("Certificate", cert_path), ("Private key", key_path)] {
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{what} file not found: {}", path.display()),
            ));
        }
    }

    RustlsConfig::from_pem_file(cert_path, key_path).await
}

/// Serve `app` over HTTPS until `shutdown` fires.
pub async fn serve_tls(app: axum::Router, config: &TlsConfig, shutdown: Shutdown) -> io::Result<()> {
    let addr: SocketAddr = config.bind_address.parse().map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid TLS bind address {:?}: {e}", config.bind_address),
        )
    })?;
    let rustls = load_tls_config(&config.cert_path, &config.key_path).await?;

    let handle = Handle::new();
    let drain = handle.clone();
    tokio::spawn(async move {
        shutdown.wait().await;
        drain.graceful_shutdown(Some(DRAIN_TIMEOUT));
    });

    tracing::info!(address = %addr, "HTTPS server starting");
    axum_server::bind_rustls(addr, rustls)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;
    tracing::info!(address = %addr, "HTTPS server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_certificate_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_tls_config(&dir.path().join("cert.pem"), &dir.path().join("key.pem"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(err.to_string().contains("Certificate"));
    }

    #[tokio::test]
    async fn test_bad_bind_address_is_rejected() {
        let config = TlsConfig {
            bind_address: "not-an-address".to_string(),
            cert_path: "cert.pem".into(),
            key_path: "key.pem".into(),
        };
        let err = serve_tls(axum::Router::new(), &config, Shutdown::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
