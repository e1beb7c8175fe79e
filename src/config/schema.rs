//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Deployment environment. Selects port and rotation presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Staging,
    Production,
}

impl Environment {
    /// Parse an environment name, case-insensitively. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "staging" => Some(Environment::Staging),
            "production" => Some(Environment::Production),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

/// Root configuration for the service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub environment: Environment,

    /// Listener configuration (bind address, TLS, limits).
    pub listener: ListenerConfig,

    /// Where records are stored.
    pub storage: StorageConfig,

    /// File logs and rotation.
    pub logging: LoggingConfig,

    /// Metrics exporter settings.
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Defaults for the given environment.
    pub fn for_environment(environment: Environment) -> Self {
        let mut config = Self {
            environment,
            ..Self::default()
        };

        if environment == Environment::Production {
            config.listener.bind_address = "0.0.0.0:5000".to_string();
            config.logging.rotation_interval_secs = 60 * 60 * 24; // Once per day
        }

        config
    }

    /// Interval between rotation passes, honouring the debug override.
    pub fn rotation_interval(&self) -> Duration {
        let secs = if self.logging.debug_rotation {
            self.logging.debug_rotation_interval_secs
        } else {
            self.logging.rotation_interval_secs
        };
        Duration::from_secs(secs)
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address for plain HTTP (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Optional HTTPS listener.
    pub tls: Option<TlsConfig>,

    /// Request timeout (total time to produce a response) in seconds.
    pub request_timeout_secs: u64,

    /// Largest accepted request body.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            tls: None,
            request_timeout_secs: 30,
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// TLS configuration for the HTTPS listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Bind address for HTTPS (e.g., "0.0.0.0:3001").
    pub bind_address: String,

    /// Path to certificate file (PEM).
    pub cert_path: PathBuf,

    /// Path to private key file (PEM).
    pub key_path: PathBuf,
}

/// Record storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root directory; each collection is a subdirectory.
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".data"),
        }
    }
}

/// Logging and rotation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for active streams and archives.
    pub logs_dir: PathBuf,

    /// Rotation interval in seconds.
    pub rotation_interval_secs: u64,

    /// Use the short debug interval instead.
    pub debug_rotation: bool,

    /// Rotation interval in seconds when `debug_rotation` is set.
    pub debug_rotation_interval_secs: u64,

    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            logs_dir: PathBuf::from(".logs"),
            rotation_interval_secs: 60 * 60, // Once per hour
            debug_rotation: false,
            debug_rotation_interval_secs: 60,
            filter: "filestore_api=info,tower_http=info".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable the Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Bind address for the scrape endpoint.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9000".to_string(),
        }
    }
}
