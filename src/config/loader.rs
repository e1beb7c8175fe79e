//! Configuration loading.
//!
//! Resolution order, later wins:
//! 1. environment preset (`staging` unless selected otherwise)
//! 2. values from the TOML file, if one is given
//! 3. `APP_ENV` selects the preset; `APP_DEBUG=workers` enables debug rotation

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{AppConfig, Environment};
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable selecting the preset.
pub const ENV_VAR: &str = "APP_ENV";
/// Environment variable enabling debug behaviour for named modules.
pub const DEBUG_VAR: &str = "APP_DEBUG";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Could not merge configuration: {0}")]
    Merge(#[from] toml::ser::Error),

    #[error("Unknown environment {0:?}")]
    UnknownEnvironment(String),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file, ignoring the process environment.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    resolve_config(Some(path), |_| None)
}

/// Load configuration using the process environment.
pub fn load_from_env(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    resolve_config(path, |name| std::env::var(name).ok())
}

/// Build a validated config from an optional file and an environment lookup.
pub fn resolve_config(
    path: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<AppConfig, ConfigError> {
    let overlay = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            Some(toml::from_str::<toml::Table>(&content)?)
        }
        None => None,
    };

    let environment = match lookup(ENV_VAR) {
        Some(name) => {
            Environment::from_name(&name).ok_or(ConfigError::UnknownEnvironment(name))?
        }
        None => overlay
            .as_ref()
            .and_then(|t| t.get("environment"))
            .and_then(|v| v.as_str())
            .map(|name| {
                Environment::from_name(name)
                    .ok_or_else(|| ConfigError::UnknownEnvironment(name.to_string()))
            })
            .transpose()?
            .unwrap_or_default(),
    };

    let mut config = AppConfig::for_environment(environment);

    if let Some(overlay) = overlay {
        let mut base = match toml::Value::try_from(&config)? {
            toml::Value::Table(table) => table,
            _ => toml::Table::new(),
        };
        merge(&mut base, overlay);
        config = toml::Value::Table(base).try_into()?;
        config.environment = environment;
    }

    if lookup(DEBUG_VAR)
        .map(|modules| modules.split(',').any(|m| m.trim() == "workers"))
        .unwrap_or(false)
    {
        config.logging.debug_rotation = true;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Deep-merge `overlay` into `base`; overlay tables merge, other values replace.
fn merge(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(base_table)), toml::Value::Table(overlay_table)) => {
                merge(base_table, overlay_table);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use std::path::PathBuf;
    use std::time::Duration;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_without_file_or_env() {
        let config = resolve_config(None, |_| None).unwrap();
        assert_eq!(config.environment, Environment::Staging);
        assert_eq!(config.listener.bind_address, "0.0.0.0:3000");
    }

    #[test]
    fn test_env_selects_preset_and_debug() {
        let env = HashMap::from([
            (ENV_VAR.to_string(), "production".to_string()),
            (DEBUG_VAR.to_string(), "server,workers".to_string()),
        ]);
        let config = resolve_config(None, |k| env.get(k).cloned()).unwrap();

        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.listener.bind_address, "0.0.0.0:5000");
        assert_eq!(config.rotation_interval(), Duration::from_secs(60));
    }

    #[test]
    fn test_file_overrides_preset_fields() {
        let file = write_config(
            r#"
            environment = "production"

            [storage]
            data_dir = "/srv/data"

            [logging]
            logs_dir = "/srv/logs"
            "#,
        );
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.environment, Environment::Production);
        // Preset value survives where the file is silent.
        assert_eq!(config.listener.bind_address, "0.0.0.0:5000");
        assert_eq!(config.logging.rotation_interval_secs, 86_400);
        assert_eq!(config.storage.data_dir, PathBuf::from("/srv/data"));
        assert_eq!(config.logging.logs_dir, PathBuf::from("/srv/logs"));
    }

    #[test]
    fn test_unknown_environment_is_rejected() {
        let env = HashMap::from([(ENV_VAR.to_string(), "qa".to_string())]);
        let err = resolve_config(None, |k| env.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownEnvironment(_)));
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let file = write_config(
            r#"
            [listener]
            bind_address = "not an address"

            [logging]
            rotation_interval_secs = 0
            "#,
        );
        match load_config(file.path()) {
            Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
