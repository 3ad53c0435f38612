// ABOUTME: Structured report generation pipeline built on the completion client
// ABOUTME: Prompt context, schema descriptors, motivation step, orchestrator and the generation error taxonomy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Report Generation
//!
//! Turns a validated [`Profile`](crate::models::Profile) into a validated
//! [`Report`](crate::models::Report):
//!
//! 1. [`context`] renders the profile as natural-language context
//! 2. [`FitnessReportOrchestrator`] asks the backend for report-shaped JSON,
//!    offering the motivation step as a callable tool
//! 3. [`MotivationGenerator`] answers that tool with a [`MotivationBatch`]
//! 4. [`schema`] extracts and validates the output; malformed output is
//!    retried up to the configured attempt bound
//!
//! Failures surface as [`GenerationError`]: either schema validation that
//! exhausted its attempts, or a transport failure that is never retried here.

pub mod context;
pub mod motivation;
pub mod orchestrator;
pub mod schema;

pub use motivation::{MotivationBatch, MotivationError, MotivationGenerator};
pub use orchestrator::FitnessReportOrchestrator;

use crate::errors::{AppError, ErrorCode};
use thiserror::Error;

/// Terminal failure of a report generation
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Every attempt produced output that failed the report contract
    #[error("report generation failed validation after {attempts} attempt(s): {diagnostic}")]
    Validation {
        /// Attempts made (equals the configured bound)
        attempts: u32,
        /// Diagnostic from the last failed attempt
        diagnostic: String,
        /// Truncated raw output of the last failed attempt, if any was produced
        last_output: Option<String>,
    },

    /// The completion backend was unreachable, timed out or rejected a request
    #[error("completion backend request failed: {source}")]
    Transport {
        /// Underlying backend error
        source: AppError,
    },
}

impl GenerationError {
    /// Short label used in structured logs
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::Transport { .. } => "transport",
        }
    }

    /// Whether this failure came from the backend transport
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

impl From<GenerationError> for AppError {
    fn from(error: GenerationError) -> Self {
        match error {
            GenerationError::Validation {
                attempts,
                diagnostic,
                last_output,
            } => Self::new(
                ErrorCode::GenerationValidationFailed,
                format!(
                    "Error analyzing profile: generated report was invalid after {attempts} attempt(s): {diagnostic}"
                ),
            )
            .with_details(serde_json::json!({
                "attempts": attempts,
                "diagnostic": diagnostic,
                "last_output": last_output,
            })),
            GenerationError::Transport { source } => {
                let upstream_code = source.code;
                Self::new(
                    ErrorCode::GenerationTransportFailed,
                    format!("Error analyzing profile: {}", source.message),
                )
                .with_details(serde_json::json!({ "upstream_code": upstream_code }))
                .with_source(source)
            }
        }
    }
}
