//! Error types for the record store.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias for record store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Stable, copyable classification of a [`StoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    AlreadyExists,
    NotFound,
    InvalidName,
    OpenFailed,
    ReadFailed,
    WriteFailed,
    TruncateFailed,
    CloseFailed,
    DeleteFailed,
    ListDirFailed,
    EncodeFailed,
    DecodeFailed,
}

impl ErrorKind {
    /// Short label used for metrics and log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::AlreadyExists => "already_exists",
            ErrorKind::NotFound => "not_found",
            ErrorKind::InvalidName => "invalid_name",
            ErrorKind::OpenFailed => "open_failed",
            ErrorKind::ReadFailed => "read_failed",
            ErrorKind::WriteFailed => "write_failed",
            ErrorKind::TruncateFailed => "truncate_failed",
            ErrorKind::CloseFailed => "close_failed",
            ErrorKind::DeleteFailed => "delete_failed",
            ErrorKind::ListDirFailed => "list_dir_failed",
            ErrorKind::EncodeFailed => "encode_failed",
            ErrorKind::DecodeFailed => "decode_failed",
        }
    }
}

/// Errors from record store operations.
///
/// Each file stage has its own variant so callers can tell where a
/// multi-stage write stopped.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record {path:?} already exists")]
    AlreadyExists { path: PathBuf },

    #[error("record {path:?} does not exist")]
    NotFound { path: PathBuf },

    #[error("invalid {what} name {name:?}")]
    InvalidName { what: &'static str, name: String },

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

    #[error("could not delete {path:?}: {source}")]
    DeleteFailed { path: PathBuf, source: io::Error },

    #[error("could not list directory {path:?}: {source}")]
    ListDirFailed { path: PathBuf, source: io::Error },

    #[error("could not encode document for {path:?}: {source}")]
    EncodeFailed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("document {path:?} does not have the expected shape: {source}")]
    DecodeFailed {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            StoreError::InvalidName { .. } => ErrorKind::InvalidName,
            StoreError::OpenFailed { .. } => ErrorKind::OpenFailed,
            StoreError::ReadFailed { .. } => ErrorKind::ReadFailed,
            StoreError::WriteFailed { .. } => ErrorKind::WriteFailed,
            StoreError::TruncateFailed { .. } => ErrorKind::TruncateFailed,
            StoreError::CloseFailed { .. } => ErrorKind::CloseFailed,
            StoreError::DeleteFailed { .. } => ErrorKind::DeleteFailed,
            StoreError::ListDirFailed { .. } => ErrorKind::ListDirFailed,
            StoreError::EncodeFailed { .. } => ErrorKind::EncodeFailed,
            StoreError::DecodeFailed { .. } => ErrorKind::DecodeFailed,
        }
    }
}

/// Reject names that would escape their directory.
pub(crate) fn validate_name(what: &'static str, name: &str) -> StoreResult<()> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);

    if invalid {
        return Err(StoreError::InvalidName {
            what,
            name: name.to_string(),
        });
    }
    Ok(())
}
