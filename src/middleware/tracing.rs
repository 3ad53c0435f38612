// ABOUTME: Request tracing helpers for correlation and structured logging
// ABOUTME: Reads or generates request IDs and creates the span wrapping every HTTP request

use std::time::Duration;

use http::HeaderMap;
use tracing::Span;
use uuid::Uuid;

/// Header carrying the request correlation ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request ID supplied by the client or set by the request-id layer
///
/// Falls back to a fresh `req_<uuid>` when the header is absent or not ASCII.
#[must_use]
pub fn request_id_from_headers(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map_or_else(
            || format!("req_{}", Uuid::new_v4().simple()),
            ToOwned::to_owned,
        )
}

/// Create a tracing span for HTTP requests
///
/// `status_code` and `duration_ms` are filled in by [`record_response`].
pub fn create_request_span(method: &str, path: &str, request_id: &str) -> Span {
    tracing::info_span!(
        "http_request",
        method = %method,
        path = %path,
        request_id = %request_id,
        status_code = tracing::field::Empty,
        duration_ms = tracing::field::Empty,
    )
}

/// Record the response status and latency on a request span
pub fn record_response(span: &Span, status_code: u16, latency: Duration) {
    span.record("status_code", status_code);
    span.record("duration_ms", latency.as_millis());
}
