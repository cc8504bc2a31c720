//! Request identification and caller context.
//!
//! # Responsibilities
//! - Generate a UUID `x-request-id` when the client did not send one
//! - Open one trace span per request carrying that id
//! - Extract the calling organization from `X-Org-Id`

use axum::body::Body;
use axum::http::{HeaderMap, Request};
use tracing::Span;

pub const X_REQUEST_ID: &str = "x-request-id";
pub const X_ORG_ID: &str = "x-org-id";

/// Span for one HTTP request, keyed by its request id.
pub fn request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    )
}

/// The caller's organization, if the header is present and valid UTF-8.
pub fn org_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(X_ORG_ID)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}
