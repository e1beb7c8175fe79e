//! Record storage subsystem.
//!
//! # Data Flow
//! ```text
//! handler (collection, key, document)
//!     → records.rs (resolve {data_dir}/{collection}/{key}.json)
//!     → tokio::fs (open → truncate → write → close)
//!     → Result<_, StoreError> back to the handler
//! ```
//!
//! # Design Decisions
//! - One file per record, one directory per collection
//! - Each I/O stage maps to its own error kind
//! - Exclusive create is the only concurrency primitive; no locks

pub mod error;
pub mod records;

pub use error::{ErrorKind, StoreError, StoreResult};
pub use records::RecordStore;
