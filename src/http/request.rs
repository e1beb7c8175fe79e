//! Request data handed to handlers.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) when the client sent none
//! - Reduce the HTTP method to the verbs handlers dispatch on
//! - Parse the query string and JSON payload permissively
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - A body that is not valid JSON becomes an empty object, never an error

use std::collections::HashMap;

use axum::extract::Query;
use axum::http::{HeaderMap, HeaderValue, Method, Request, Uri};
use serde_json::{Map, Value};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::routing::RouteParams;

/// Header carrying the request ID in both directions.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates UUID v4 request IDs for `SetRequestIdLayer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// The request ID header value, if present and printable.
pub fn request_id(headers: &HeaderMap) -> Option<&str> {
    headers.get(X_REQUEST_ID).and_then(|v| v.to_str().ok())
}

/// HTTP verbs handlers distinguish. Everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
    Other,
}

impl Verb {
    pub fn from_method(method: &Method) -> Self {
        match *method {
            Method::GET => Verb::Get,
            Method::POST => Verb::Post,
            Method::PUT => Verb::Put,
            Method::DELETE => Verb::Delete,
            _ => Verb::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "get",
            Verb::Post => "post",
            Verb::Put => "put",
            Verb::Delete => "delete",
            Verb::Other => "other",
        }
    }
}

/// Everything a handler gets to see about a request.
#[derive(Debug, Clone)]
pub struct RequestData {
    /// Normalized path, without leading or trailing `/`.
    pub path: String,
    pub query: HashMap<String, String>,
    /// Parsed JSON body; `{}` when absent or unparsable.
    pub payload: Value,
    pub headers: HeaderMap,
    pub method: Verb,
    /// Placeholder captures from the matched route.
    pub params: RouteParams,
}

impl RequestData {
    /// A bodiless request for `path`; mainly useful to drive handlers directly.
    pub fn new(method: Verb, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: HashMap::new(),
            payload: empty_object(),
            headers: HeaderMap::new(),
            method,
            params: RouteParams::new(),
        }
    }

    pub fn with_params(mut self, params: RouteParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    /// Look up a route parameter by placeholder name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }
}

/// Decode the query string. Malformed input yields an empty map.
pub fn parse_query(uri: &Uri) -> HashMap<String, String> {
    Query::<HashMap<String, String>>::try_from_uri(uri)
        .map(|Query(query)| query)
        .unwrap_or_default()
}

/// Decode a request body as JSON. Empty or invalid bodies yield `{}`.
pub fn parse_payload(body: &[u8]) -> Value {
    if body.iter().all(u8::is_ascii_whitespace) {
        return empty_object();
    }
    match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(error = %e, "Request body is not JSON, using empty payload");
            empty_object()
        }
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}
