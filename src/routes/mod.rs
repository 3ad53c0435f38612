// ABOUTME: Route module organization for the workout agent HTTP endpoints
// ABOUTME: Assembles health and fitness routes with CORS, request ID and tracing layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module for the workout agent
//!
//! Each domain module contains only route definitions and thin handlers that
//! delegate to the generation pipeline or the calculator.

/// Fitness analysis routes (`/analyze`, `/bmr`)
pub mod fitness;
/// Service metadata and health check routes (`/`, `/health`)
pub mod health;

/// Fitness analysis route handlers
pub use fitness::FitnessRoutes;
/// Health route handlers
pub use health::HealthRoutes;

use std::time::Duration;

use axum::{body::Body, http::Request, response::Response, Router};
use tracing::Span;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::context::ServerContext;
use crate::middleware::{
    create_request_span, record_response, request_id_from_headers, setup_cors,
};

/// Build the full application router
///
/// Layers, outermost first: request ID assignment, request ID propagation to
/// the response, CORS, then the per-request tracing span.
pub fn build_router(context: ServerContext) -> Router {
    let cors = setup_cors(&context.config().config().cors);

    Router::new()
        .merge(HealthRoutes::routes())
        .merge(FitnessRoutes::routes(context))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    create_request_span(
                        request.method().as_str(),
                        request.uri().path(),
                        &request_id_from_headers(request.headers()),
                    )
                })
                .on_response(|response: &Response, latency: Duration, span: &Span| {
                    record_response(span, response.status().as_u16(), latency);
                }),
        )
        .layer(cors)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
