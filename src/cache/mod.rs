//! In-memory caches shared by request handlers.
//!
//! Handlers that serve a dataset read once from storage (the menu) own a
//! [`OnceCache`] instead of reaching for process-wide mutable state.

pub mod once;

pub use once::OnceCache;
