//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! APP_ENV → environment preset (staging / production)
//! config file (TOML), optional
//!     → loader.rs (parse, merge over preset, APP_DEBUG overrides)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → handed to each subsystem at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_from_env, resolve_config, ConfigError};
pub use schema::{
    AppConfig, Environment, ListenerConfig, LoggingConfig, ObservabilityConfig, StorageConfig,
    TlsConfig,
};
pub use validation::{validate_config, ValidationError};
