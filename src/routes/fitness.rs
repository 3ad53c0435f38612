// ABOUTME: Fitness analysis route handlers for report generation and calorie targets
// ABOUTME: Validates the profile before any generation cost and maps core failures to HTTP errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Fitness analysis routes
//!
//! - `POST /analyze`: profile in, generated report out (HTTP 500 on any core error)
//! - `POST /bmr`: profile in, deterministic calorie targets out
//!
//! Malformed or out-of-range profiles are rejected with HTTP 422 before the
//! backend is called.

use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    routing::post,
    Json, Router,
};
use tracing::debug;

use crate::context::ServerContext;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::intelligence::CalorieTargets;
use crate::logging::AppLogger;
use crate::middleware::request_id_from_headers;
use crate::models::{Profile, ProfileInput, Report};

/// Fitness analysis routes
pub struct FitnessRoutes;

impl FitnessRoutes {
    /// Create the analysis routes
    pub fn routes(context: ServerContext) -> Router {
        Router::new()
            .route("/analyze", post(Self::handle_analyze))
            .route("/bmr", post(Self::handle_bmr))
            .with_state(context)
    }

    /// Handle report generation
    async fn handle_analyze(
        State(context): State<ServerContext>,
        headers: HeaderMap,
        payload: Result<Json<ProfileInput>, JsonRejection>,
    ) -> Result<Json<Report>, AppError> {
        let request_id = request_id_from_headers(&headers);
        let profile = parse_profile(payload).map_err(|e| e.with_request_id(&request_id))?;

        let started = Instant::now();
        let result = context
            .generation()
            .orchestrator()
            .generate_report(&profile)
            .await;
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        match result {
            Ok(report) => {
                AppLogger::log_report_generated(
                    &request_id,
                    report.workout_plan.len(),
                    report.nutrition_plan.len(),
                    duration_ms,
                );
                Ok(Json(report))
            }
            Err(error) => {
                AppLogger::log_report_failed(
                    &request_id,
                    error.kind(),
                    duration_ms,
                    &error.to_string(),
                );
                Err(AppError::from(error).with_request_id(request_id))
            }
        }
    }

    /// Handle calorie target calculation
    async fn handle_bmr(
        headers: HeaderMap,
        payload: Result<Json<ProfileInput>, JsonRejection>,
    ) -> Result<Json<CalorieTargets>, AppError> {
        let request_id = request_id_from_headers(&headers);
        let profile = parse_profile(payload).map_err(|e| e.with_request_id(&request_id))?;

        let targets = CalorieTargets::from_profile(&profile);
        debug!(
            request_id = %request_id,
            bmr = targets.bmr,
            activity_level = %targets.activity_level,
            "Calorie targets calculated"
        );
        Ok(Json(targets))
    }
}

/// Turn the extracted body into a validated profile
fn parse_profile(payload: Result<Json<ProfileInput>, JsonRejection>) -> AppResult<Profile> {
    let Json(input) = payload.map_err(|rejection| {
        let code = match &rejection {
            JsonRejection::JsonDataError(_) => ErrorCode::InvalidInput,
            _ => ErrorCode::InvalidFormat,
        };
        AppError::new(code, rejection.body_text())
    })?;
    Profile::try_from(input)
}
