//! Log management subsystem.
//!
//! # Data Flow
//! ```text
//! ContextLogger::log / error (context.rs)
//!     → LogManager::append (manager.rs) → {logs_dir}/{stream}.log
//!
//! LogRotator tick (rotation.rs)
//!     → LogManager::list(false)
//!     → per stream: compress → {stream}-{hex_ms}.gz.b64, then truncate
//!     → RotationReport (per-stream outcomes)
//! ```
//!
//! # Design Decisions
//! - Streams are append-only between rotations
//! - Rotation is best-effort and scoped per stream
//! - The manager's own failures go to `tracing`, never back into a stream

pub mod context;
pub mod error;
pub mod manager;
pub mod rotation;

pub use context::{ContextLogger, LogEntry};
pub use error::{LogError, LogResult};
pub use manager::LogManager;
pub use rotation::{LogRotator, RotationReport, StreamRotation};
