//! Error types for the log manager.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type LogResult<T> = Result<T, LogError>;

/// Errors from log stream operations.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("invalid stream name {name:?}")]
    InvalidName { name: String },

    #[error("log file {path:?} does not exist")]
    NotFound { path: PathBuf },

    #[error("archive {path:?} already exists")]
    AlreadyExists { path: PathBuf },

    #[error("could not open {path:?}: {source}")]
    OpenFailed { path: PathBuf, source: io::Error },

    #[error("could not read {path:?}: {source}")]
    ReadFailed { path: PathBuf, source: io::Error },

    #[error("could not write {path:?}: {source}")]
    WriteFailed { path: PathBuf, source: io::Error },

    #[error("could not truncate {path:?}: {source}")]
    TruncateFailed { path: PathBuf, source: io::Error },

    #[error("could not close {path:?}: {source}")]
    CloseFailed { path: PathBuf, source: io::Error },

    #[error("could not list log directory {path:?}: {source}")]
    ListDirFailed { path: PathBuf, source: io::Error },

    #[error("could not compress {path:?}: {source}")]
    CompressFailed { path: PathBuf, source: io::Error },

    #[error("could not decompress {path:?}: {reason}")]
    DecompressFailed { path: PathBuf, reason: String },
}

impl LogError {
    /// Short label used for metrics and log fields.
    pub fn kind_str(&self) -> &'static str {
        match self {
            LogError::InvalidName { .. } => "invalid_name",
            LogError::NotFound { .. } => "not_found",
            LogError::AlreadyExists { .. } => "already_exists",
            LogError::OpenFailed { .. } => "open_failed",
            LogError::ReadFailed { .. } => "read_failed",
            LogError::WriteFailed { .. } => "write_failed",
            LogError::TruncateFailed { .. } => "truncate_failed",
            LogError::CloseFailed { .. } => "close_failed",
            LogError::ListDirFailed { .. } => "list_dir_failed",
            LogError::CompressFailed { .. } => "compress_failed",
            LogError::DecompressFailed { .. } => "decompress_failed",
        }
    }
}
