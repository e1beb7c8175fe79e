//! File-backed JSON record service.
//!
//! JSON documents are stored one file per record, requests are dispatched
//! through a compiled path router, and per-module audit logs are appended to
//! line-delimited files that a background task periodically compresses and
//! truncates.

pub mod cache;
pub mod config;
pub mod handlers;
pub mod http;
pub mod lifecycle;
pub mod logs;
pub mod observability;
pub mod routing;
pub mod store;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use logs::LogManager;
pub use store::RecordStore;
