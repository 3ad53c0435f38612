// ABOUTME: Service metadata and health check route handlers
// ABOUTME: Both endpoints answer without touching the completion backend
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Health check routes for service monitoring
//!
//! `/health` reports healthy whenever the process is serving, regardless of
//! backend reachability or API key presence.

use crate::constants::service_names::{SERVICE_VERSION, WORKOUT_AGENT};

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the root metadata and health check routes
    pub fn routes() -> axum::Router {
        use axum::{routing::get, Json, Router};

        async fn root_handler() -> Json<serde_json::Value> {
            Json(serde_json::json!({
                "message": "Welcome to Workout Agent API",
                "version": SERVICE_VERSION,
                "endpoints": {
                    "/analyze": "POST - Analyze fitness profile and get personalized plan",
                    "/health": "GET - Health check endpoint",
                    "/bmr": "POST - Calculate Basal Metabolic Rate"
                }
            }))
        }

        async fn health_handler() -> Json<serde_json::Value> {
            Json(serde_json::json!({
                "status": "healthy",
                "service": WORKOUT_AGENT
            }))
        }

        Router::new()
            .route("/", get(root_handler))
            .route("/health", get(health_handler))
    }
}
