//! Request handlers.
//!
//! # Data Flow
//! ```text
//! route_table() (basic + records + menu)
//!     → Router<Endpoint>::register, once at startup
//!
//! request → Router::resolve(path) → Endpoint
//!     → Endpoint::handle(RequestData, &HandlerContext)
//!     → HandlerResponse
//! ```
//!
//! # Design Decisions
//! - Handlers are a closed enum rather than boxed callbacks; the router stays
//!   generic over its handler type
//! - Each feature area exports its own route table; `route_table` only
//!   concatenates them in order

pub mod basic;
pub mod menu;
pub mod records;

use crate::cache::OnceCache;
use crate::http::{HandlerResponse, RequestData};
use crate::logs::ContextLogger;
use crate::routing::{RouteError, Router};
use crate::store::RecordStore;

/// Every handler the service can dispatch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Ping,
    Hello,
    NotFound,
    Collection,
    Record,
    Menu,
}

impl Endpoint {
    pub async fn handle(self, request: RequestData, ctx: &HandlerContext) -> HandlerResponse {
        match self {
            Endpoint::Ping => basic::ping(&request),
            Endpoint::Hello => basic::hello(&request),
            Endpoint::NotFound => basic::not_found(&request),
            Endpoint::Collection => records::collection(&request, ctx).await,
            Endpoint::Record => records::record(&request, ctx).await,
            Endpoint::Menu => menu::menu(&request, ctx).await,
        }
    }
}

/// Shared state handlers read from.
#[derive(Debug)]
pub struct HandlerContext {
    pub store: RecordStore,
    pub menu: OnceCache<menu::Menu>,
    /// Audit logger for handler failures (`handlers-error`).
    pub logger: ContextLogger,
}

impl HandlerContext {
    pub fn new(store: RecordStore, logger: ContextLogger) -> Self {
        Self {
            store,
            menu: OnceCache::new(),
            logger,
        }
    }
}

/// All routes in registration order.
pub fn route_table() -> Vec<(&'static str, Endpoint)> {
    [basic::ROUTES, records::ROUTES, menu::ROUTES].concat()
}

/// Compile [`route_table`] with [`Endpoint::NotFound`] as the fallback.
pub fn build_router() -> Result<Router<Endpoint>, RouteError> {
    Router::register(route_table(), Endpoint::NotFound)
}

#[cfg(test)]
pub(crate) fn test_context() -> (tempfile::TempDir, HandlerContext) {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::new(dir.path().join("data"));
    let logger = crate::logs::LogManager::new(dir.path().join("logs")).context("handlers");
    (dir, HandlerContext::new(store, logger))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Verb;
    use axum::http::StatusCode;

    #[test]
    fn test_route_table_compiles() {
        let router = build_router().unwrap();
        assert_eq!(router.len(), route_table().len());
    }

    #[test]
    fn test_resolution() {
        let router = build_router().unwrap();

        let item = router.resolve("/menu/item/7/");
        assert_eq!(*item.handler, Endpoint::Menu);
        assert_eq!(item.params.get("item"), Some("7"));

        let record = router.resolve("records/users/ada");
        assert_eq!(*record.handler, Endpoint::Record);
        assert_eq!(record.params.get("collection"), Some("users"));
        assert_eq!(record.params.get("key"), Some("ada"));

        assert_eq!(*router.resolve("ping").handler, Endpoint::Ping);
        assert_eq!(*router.resolve("").handler, Endpoint::NotFound);
        assert_eq!(*router.resolve("menu/item").handler, Endpoint::NotFound);
    }

    #[tokio::test]
    async fn test_dispatch() {
        let (_dir, ctx) = test_context();
        let response = Endpoint::NotFound
            .handle(RequestData::new(Verb::Get, "nowhere"), &ctx)
            .await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);

        let response = Endpoint::Ping.handle(RequestData::new(Verb::Get, "ping"), &ctx).await;
        assert_eq!(response.status, StatusCode::OK);
    }
}
