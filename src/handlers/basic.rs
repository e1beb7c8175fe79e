//! Liveness and greeting endpoints.

use serde_json::json;

use crate::handlers::Endpoint;
use crate::http::{HandlerResponse, RequestData};

pub const ROUTES: &[(&str, Endpoint)] = &[("ping", Endpoint::Ping), ("hello", Endpoint::Hello)];

pub fn ping(_request: &RequestData) -> HandlerResponse {
    HandlerResponse::from_parts(None, None)
}

/// Greets `name` from the JSON payload, else from the query, else the world.
pub fn hello(request: &RequestData) -> HandlerResponse {
    let name = request
        .payload
        .get("name")
        .and_then(|v| v.as_str())
        .or_else(|| request.query.get("name").map(String::as_str))
        .unwrap_or("World");

    HandlerResponse::ok(json!({ "message": format!("Hello {name}!") }))
}

pub fn not_found(_request: &RequestData) -> HandlerResponse {
    HandlerResponse::not_found()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Verb;
    use axum::http::StatusCode;

    #[test]
    fn test_ping() {
        let response = ping(&RequestData::new(Verb::Get, "ping"));
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, json!({}));
    }

    #[test]
    fn test_hello_prefers_payload_over_query() {
        let anonymous = hello(&RequestData::new(Verb::Get, "hello"));
        assert_eq!(anonymous.body, json!({ "message": "Hello World!" }));

        let query = hello(&RequestData::new(Verb::Get, "hello").with_query("name", "Ada"));
        assert_eq!(query.body, json!({ "message": "Hello Ada!" }));

        let both = hello(
            &RequestData::new(Verb::Post, "hello")
                .with_query("name", "Ada")
                .with_payload(json!({ "name": "Grace" })),
        );
        assert_eq!(both.body, json!({ "message": "Hello Grace!" }));
    }

    #[test]
    fn test_not_found() {
        let response = not_found(&RequestData::new(Verb::Get, "nope"));
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.body, json!({}));
    }
}
