//! HTTP front of the service.
//!
//! # Data Flow
//! ```text
//! TCP / TLS connection
//!     → server.rs (Axum setup, middleware, catch-all dispatch)
//!     → request.rs (request ID, verb, query, permissive JSON payload)
//!     → handlers::Endpoint::handle
//!     → response.rs (status/body normalization, JSON encoding)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;
pub mod tls;

pub use request::{MakeRequestUuid, RequestData, Verb, X_REQUEST_ID};
pub use response::HandlerResponse;
pub use server::{AppState, HttpServer};
pub use tls::{load_tls_config, serve_tls};
