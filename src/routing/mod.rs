//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming path ("/menu/item/7/")
//!     → template.rs (normalize: trim separators, split into words)
//!     → router.rs (scan compiled routes in registration order)
//!     → matcher.rs (compare literals, capture placeholders)
//!     → Return: handler + RouteParams, or the not-found handler
//!
//! Route Compilation (at startup):
//!     ("menu/item/{item}", handler)[]
//!     → Parse templates into literal / placeholder segments
//!     → Compile matchers (arity, literal slots, capture slots)
//!     → Freeze as immutable Router
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (segment comparison only)
//! - Deterministic: same input always matches same route
//! - First match wins (registration order, not specificity)
//! - Resolution never fails; unmatched paths go to the not-found handler

pub mod matcher;
pub mod router;
pub mod template;

pub use matcher::{PathMatcher, RouteParams};
pub use router::{CompiledRoute, Resolved, Router};
pub use template::{normalize_path, split_segments, RouteError, RouteTemplate, Segment};
