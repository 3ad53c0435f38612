// ABOUTME: HTTP middleware for CORS and request tracing
// ABOUTME: Provides the CORS layer, request ID extraction and the per-request tracing span

pub mod cors;
pub mod tracing;

// CORS configuration
pub use cors::setup_cors;

// Request tracing
pub use tracing::{
    create_request_span, record_response, request_id_from_headers, REQUEST_ID_HEADER,
};
