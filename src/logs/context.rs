//! Per-module audit logger.
//!
//! Each call writes a `{module, time_stamp, param}` JSON line into a stream
//! named after the module (`server`, `server-access`, `server-error`, ...)
//! and mirrors the event to `tracing`. File appends run as detached tasks so
//! request handling never waits on them. When an append fails the failure
//! goes to `tracing` only; it is never written back through this logger.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::logs::error::LogResult;
use crate::logs::manager::{unix_millis, LogManager};

/// One line of an active log stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub module: String,
    pub time_stamp: u64,
    pub param: Value,
}

/// Logger bound to a module name.
#[derive(Debug, Clone)]
pub struct ContextLogger {
    name: String,
    manager: LogManager,
}

impl ContextLogger {
    pub fn new(name: impl Into<String>, manager: LogManager) -> Self {
        Self {
            name: name.into(),
            manager,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stream that `log(suffix, ..)` writes to.
    pub fn stream_for(&self, suffix: Option<&str>) -> String {
        match suffix {
            Some(suffix) if !suffix.is_empty() => format!("{}-{}", self.name, suffix),
            _ => self.name.clone(),
        }
    }

    /// Append an entry and wait for the write to finish.
    pub async fn write(&self, suffix: Option<&str>, param: Value) -> LogResult<()> {
        let stream = self.stream_for(suffix);
        let entry = LogEntry {
            module: self.name.clone(),
            time_stamp: unix_millis(),
            param,
        };
        // A serde_json::Value always serializes.
        let line = serde_json::to_string(&entry).unwrap_or_default();
        self.manager.append(&stream, &line).await
    }

    /// Record an event in `{name}` or `{name}-{suffix}` without waiting.
    pub fn log(&self, suffix: Option<&str>, param: Value) {
        tracing::debug!(module = %self.name, suffix = suffix.unwrap_or(""), %param, "log");
        self.spawn_write(suffix, param);
    }

    /// Record an error in `{name}-error` without waiting. Always reaches the console.
    pub fn error(&self, param: Value) {
        tracing::error!(module = %self.name, %param, "error");
        self.spawn_write(Some("error"), param);
    }

    /// Console-only diagnostic, never written to a stream.
    pub fn debug(&self, message: &str) {
        tracing::debug!(module = %self.name, "{message}");
    }

    fn spawn_write(&self, suffix: Option<&str>, param: Value) {
        let logger = self.clone();
        let suffix = suffix.map(str::to_string);

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(module = %self.name, "No async runtime, log entry dropped");
            return;
        };

        handle.spawn(async move {
            if let Err(e) = logger.write(suffix.as_deref(), param).await {
                tracing::warn!(
                    module = %logger.name,
                    error = %e,
                    "Failed to append log entry"
                );
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test]
    async fn test_entries_are_line_delimited_json() {
        let dir = tempfile::tempdir().unwrap();
        let manager = LogManager::new(dir.path());
        let logger = manager.context("server");

        logger.write(Some("access"), json!({ "path": "ping" })).await.unwrap();
        logger.write(None, json!(["Returning", 200])).await.unwrap();

        let access = std::fs::read_to_string(manager.active_path("server-access")).unwrap();
        let entry: LogEntry = serde_json::from_str(access.trim_end()).unwrap();
        assert_eq!(entry.module, "server");
        assert_eq!(entry.param, json!({ "path": "ping" }));
        assert!(entry.time_stamp > 0);

        assert!(manager.active_path("server").exists());
    }

    #[tokio::test]
    async fn test_error_goes_to_error_stream() {
        let dir = tempfile::tempdir().unwrap();
        let manager = LogManager::new(dir.path());
        let logger = manager.context("workers");

        logger.error(json!({ "message": "boom" }));

        // The append is detached; give it a moment to land.
        let path = manager.active_path("workers-error");
        let mut content = String::new();
        for _ in 0..100 {
            content = std::fs::read_to_string(&path).unwrap_or_default();
            if content.ends_with('\n') {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(content.contains("boom"));
    }

    #[test]
    fn test_stream_names() {
        let logger = LogManager::new("/tmp/unused").context("server");
        assert_eq!(logger.stream_for(None), "server");
        assert_eq!(logger.stream_for(Some("")), "server");
        assert_eq!(logger.stream_for(Some("access")), "server-access");
    }
}
