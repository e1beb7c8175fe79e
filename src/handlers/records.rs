//! Generic record resource over the record store.
//!
//! `records/{collection}` lists keys; `records/{collection}/{key}` supports
//! GET, POST, PUT and DELETE. Store errors map onto HTTP statuses by kind.

use std::io;

use axum::http::StatusCode;
use serde_json::{json, Value};

use crate::handlers::{Endpoint, HandlerContext};
use crate::http::{HandlerResponse, RequestData, Verb};
use crate::store::{ErrorKind, StoreError};

pub const ROUTES: &[(&str, Endpoint)] = &[
    ("records/{collection}", Endpoint::Collection),
    ("records/{collection}/{key}", Endpoint::Record),
];

/// Status a store error is reported with.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::AlreadyExists => StatusCode::CONFLICT,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::InvalidName => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub async fn collection(request: &RequestData, ctx: &HandlerContext) -> HandlerResponse {
    let Some(collection) = request.param("collection") else {
        return HandlerResponse::not_found();
    };

    match request.method {
        Verb::Get => match ctx.store.list(collection).await {
            Ok(mut keys) => {
                keys.sort();
                HandlerResponse::ok(json!(keys))
            }
            Err(StoreError::ListDirFailed { ref source, .. })
                if source.kind() == io::ErrorKind::NotFound =>
            {
                HandlerResponse::ok(json!([]))
            }
            Err(e) => failure(ctx, request, e),
        },
        _ => HandlerResponse::method_not_allowed(),
    }
}

pub async fn record(request: &RequestData, ctx: &HandlerContext) -> HandlerResponse {
    let (Some(collection), Some(key)) = (request.param("collection"), request.param("key")) else {
        return HandlerResponse::not_found();
    };

    let result = match request.method {
        Verb::Get => ctx
            .store
            .read(collection, key)
            .await
            .map(HandlerResponse::ok),
        Verb::Post => ctx
            .store
            .create(collection, key, &request.payload)
            .await
            .map(|()| HandlerResponse::new(StatusCode::CREATED, request.payload.clone())),
        Verb::Put => ctx
            .store
            .update(collection, key, &request.payload)
            .await
            .map(|()| HandlerResponse::ok(request.payload.clone())),
        Verb::Delete => ctx
            .store
            .delete(collection, key)
            .await
            .map(|()| HandlerResponse::ok(Value::Null)),
        Verb::Other => return HandlerResponse::method_not_allowed(),
    };

    result.unwrap_or_else(|e| failure(ctx, request, e))
}

fn failure(ctx: &HandlerContext, request: &RequestData, error: StoreError) -> HandlerResponse {
    let kind = error.kind();
    let status = status_for(kind);

    if status.is_server_error() {
        ctx.logger.error(json!({
            "message": "record store failure",
            "path": request.path,
            "method": request.method.as_str(),
            "kind": kind.as_str(),
            "error": error.to_string(),
        }));
    }

    HandlerResponse::error(status, kind.as_str())
}
