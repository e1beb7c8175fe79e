//! Handler responses.
//!
//! Handlers return a [`HandlerResponse`] instead of completing a callback, so
//! every request is answered exactly once. Values are normalized on the way
//! in: an unusable status becomes 200 and a body that is not a JSON object or
//! array becomes `{}`.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::{json, Map, Value};

/// Status and JSON body produced by a handler.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl HandlerResponse {
    /// Build from optional raw parts, applying the defaults.
    pub fn from_parts(status: Option<u16>, body: Option<Value>) -> Self {
        let status = status
            .and_then(|code| StatusCode::from_u16(code).ok())
            .unwrap_or(StatusCode::OK);
        let body = match body {
            Some(body @ (Value::Object(_) | Value::Array(_))) => body,
            _ => Value::Object(Map::new()),
        };
        Self { status, body }
    }

    pub fn new(status: StatusCode, body: Value) -> Self {
        Self::from_parts(Some(status.as_u16()), Some(body))
    }

    /// 200 with `body`.
    pub fn ok(body: Value) -> Self {
        Self::new(StatusCode::OK, body)
    }

    /// `status` with an empty object body.
    pub fn empty(status: StatusCode) -> Self {
        Self::from_parts(Some(status.as_u16()), None)
    }

    /// `status` with `{"error": message}`.
    pub fn error(status: StatusCode, message: &str) -> Self {
        Self::new(status, json!({ "error": message }))
    }

    pub fn not_found() -> Self {
        Self::empty(StatusCode::NOT_FOUND)
    }

    pub fn method_not_allowed() -> Self {
        Self::empty(StatusCode::METHOD_NOT_ALLOWED)
    }
}

impl IntoResponse for HandlerResponse {
    fn into_response(self) -> Response {
        let body = serde_json::to_string(&self.body).unwrap_or_else(|_| "{}".to_string());
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response()
    }
}
