//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with a single catch-all dispatch handler
//! - Wire up middleware (tracing, limits, timeout, request ID)
//! - Resolve each request through the route table and run its handler
//! - Write access and response entries to the `server` log streams
//! - Serve until the shutdown signal fires

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{header, request::Parts, Method, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ListenerConfig;
use crate::handlers::{self, Endpoint, HandlerContext};
use crate::http::request::{parse_payload, parse_query, request_id, MakeRequestUuid, RequestData, Verb};
use crate::http::response::HandlerResponse;
use crate::lifecycle::Shutdown;
use crate::logs::{ContextLogger, LogManager};
use crate::observability::metrics;
use crate::routing::{normalize_path, RouteError, Router};
use crate::store::RecordStore;

/// Application state injected into the dispatch handler.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<Router<Endpoint>>,
    pub context: Arc<HandlerContext>,
    pub logger: ContextLogger,
}

/// HTTP front of the service.
pub struct HttpServer {
    app: axum::Router,
    logger: ContextLogger,
}

impl HttpServer {
    /// Compile the route table and build the middleware stack.
    pub fn new(config: &ListenerConfig, store: RecordStore, logs: &LogManager) -> Result<Self, RouteError> {
        let state = AppState {
            router: Arc::new(handlers::build_router()?),
            context: Arc::new(HandlerContext::new(store, logs.context("handlers"))),
            logger: logs.context("server"),
        };
        let logger = state.logger.clone();

        Ok(Self {
            app: Self::build_router(config, state),
            logger,
        })
    }

    #[allow(deprecated)]
    fn build_router(config: &ListenerConfig, state: AppState) -> axum::Router {
        axum::Router::new()
            .route("/", any(dispatch))
            .route("/{*path}", any(dispatch))
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = request_id(request.headers()).unwrap_or("unknown"),
                )
            }))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered Axum router; shared with the HTTPS listener.
    pub fn router(&self) -> axum::Router {
        self.app.clone()
    }

    /// Serve on `listener` until `shutdown` fires, then drain in-flight requests.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> io::Result<()> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");
        self.logger
            .log(None, json!({ "message": "listening", "address": addr.to_string(), "scheme": "http" }));

        axum::serve(listener, self.app)
            .with_graceful_shutdown(async move { shutdown.wait().await })
            .await?;

        tracing::info!(address = %addr, "HTTP server stopped");
        Ok(())
    }
}

/// Catch-all handler: resolve, build request data, run the endpoint.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let (parts, body) = request.into_parts();
    let path = normalize_path(parts.uri.path()).to_string();
    let request_id = request_id(&parts.headers).unwrap_or("unknown").to_string();

    state.logger.log(Some("access"), access_entry(&parts, &request_id));

    let payload = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => parse_payload(&bytes),
        Err(e) => {
            state.logger.error(json!({
                "message": "request error",
                "request_id": request_id,
                "path": path,
                "error": e.to_string(),
            }));
            let response = HandlerResponse::empty(StatusCode::PAYLOAD_TOO_LARGE);
            return finish(&state, &parts.method, &path, &request_id, response, start);
        }
    };

    let resolved = state.router.resolve(&path);
    let endpoint = *resolved.handler;

    tracing::debug!(
        request_id = %request_id,
        method = %parts.method,
        path = %path,
        template = resolved.template.unwrap_or("<none>"),
        "Dispatching request"
    );

    let data = RequestData {
        path: path.clone(),
        query: parse_query(&parts.uri),
        payload,
        headers: parts.headers.clone(),
        method: Verb::from_method(&parts.method),
        params: resolved.params,
    };

    let response = endpoint.handle(data, &state.context).await;
    finish(&state, &parts.method, &path, &request_id, response, start)
}

fn finish(
    state: &AppState,
    method: &Method,
    path: &str,
    request_id: &str,
    response: HandlerResponse,
    start: Instant,
) -> Response {
    let status = response.status.as_u16();
    state.logger.log(
        None,
        json!({
            "message": "returning response",
            "request_id": request_id,
            "path": path,
            "status": status,
            "body": response.body,
        }),
    );
    metrics::record_request(method.as_str(), status, start);
    response.into_response()
}

fn access_entry(parts: &Parts, request_id: &str) -> Value {
    let get = |name: header::HeaderName| parts.headers.get(name).and_then(|v| v.to_str().ok());

    json!({
        "message": "received request",
        "request_id": request_id,
        "host": get(header::HOST),
        "user-agent": get(header::USER_AGENT),
        "accept-encoding": get(header::ACCEPT_ENCODING),
        "content-length": get(header::CONTENT_LENGTH),
        "cache-control": get(header::CACHE_CONTROL),
        "content-type": get(header::CONTENT_TYPE),
        "path": parts.uri.path(),
        "url": parts.uri.to_string(),
        "method": parts.method.as_str(),
    })
}
