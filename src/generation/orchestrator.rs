// ABOUTME: Fitness report orchestrator driving schema-guided generation with a motivation tool step
// ABOUTME: Bounded retries on invalid output, immediate failure on backend transport errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Fitness Report Orchestrator
//!
//! One attempt is a two-phase exchange with the backend:
//!
//! 1. Send the profile-aware prompt with the report schema and the
//!    `get_motivation` tool on offer.
//! 2. If the response calls the tool, run the [`MotivationGenerator`] once,
//!    hand the batch back as a tool result and ask again with no tools on
//!    offer. Several calls in the same response share that one batch.
//!
//! The final text is extracted, deserialized and checked against the report
//! contract. Anything that fails (including an unknown tool, a second round
//! of tool calls or a malformed motivation batch) makes the attempt invalid
//! and the whole attempt is rerun from scratch until the bound is reached.
//! Transport failures end the run immediately.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, instrument, warn};

use super::context::{build_report_messages, format_tool_result, motivation_tool};
use super::motivation::{MotivationError, MotivationGenerator};
use super::schema::{parse_report, report_schema};
use super::GenerationError;
use crate::config::{GenerationConfig, LlmConfig};
use crate::constants::generation::{MOTIVATION_TOOL_NAME, RAW_OUTPUT_PREVIEW_CHARS};
use crate::constants::llm_defaults::REPORT_MAX_TOKENS;
use crate::errors::AppError;
use crate::llm::{
    ChatMessage, ChatRequest, ChatResponseWithTools, FunctionCall, FunctionResponse, LlmProvider,
};
use crate::models::{Profile, Report};

/// Why a single attempt did not yield a report
enum AttemptFailure {
    /// Output broke the report contract; eligible for another attempt
    Invalid {
        diagnostic: String,
        raw_output: Option<String>,
    },
    /// Backend failure; ends the run
    Transport(AppError),
}

impl AttemptFailure {
    fn invalid(diagnostic: impl Into<String>, raw_output: Option<&str>) -> Self {
        Self::Invalid {
            diagnostic: diagnostic.into(),
            raw_output: raw_output.map(preview),
        }
    }
}

impl From<MotivationError> for AttemptFailure {
    fn from(error: MotivationError) -> Self {
        match error {
            MotivationError::Malformed { reason, raw_output } => Self::invalid(
                format!("{MOTIVATION_TOOL_NAME} returned a malformed batch: {reason}"),
                raw_output.as_deref(),
            ),
            MotivationError::Transport(source) => Self::Transport(source),
        }
    }
}

/// Generates validated fitness reports
///
/// Holds no per-request state; one instance serves concurrent requests.
#[derive(Clone)]
pub struct FitnessReportOrchestrator {
    provider: Arc<dyn LlmProvider>,
    motivation: MotivationGenerator,
    model: String,
    temperature: Option<f32>,
    max_attempts: u32,
}

impl FitnessReportOrchestrator {
    /// Create an orchestrator
    ///
    /// `max_attempts` below 1 is raised to 1.
    #[must_use]
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        motivation: MotivationGenerator,
        model: impl Into<String>,
        temperature: Option<f32>,
        max_attempts: u32,
    ) -> Self {
        Self {
            provider,
            motivation,
            model: model.into(),
            temperature,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Create an orchestrator and its motivation generator from configuration
    #[must_use]
    pub fn from_config(
        provider: Arc<dyn LlmProvider>,
        llm: &LlmConfig,
        generation: &GenerationConfig,
    ) -> Self {
        let motivation = MotivationGenerator::from_config(Arc::clone(&provider), llm, generation);
        Self::new(
            provider,
            motivation,
            llm.model.clone(),
            llm.temperature,
            generation.max_attempts,
        )
    }

    /// Total attempts before a validation failure becomes terminal
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Model used for report requests
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate a report for a validated profile
    ///
    /// # Errors
    ///
    /// - [`GenerationError::Transport`] on the first backend failure, with no retry
    /// - [`GenerationError::Validation`] once every attempt produced invalid output
    #[instrument(skip_all, fields(model = %self.model, max_attempts = self.max_attempts))]
    pub async fn generate_report(&self, profile: &Profile) -> Result<Report, GenerationError> {
        let started = Instant::now();
        let mut last_invalid: Option<(String, Option<String>)> = None;

        for attempt in 1..=self.max_attempts {
            info!(
                attempt,
                max_attempts = self.max_attempts,
                model = %self.model,
                "Starting report generation attempt"
            );

            match self.run_attempt(profile).await {
                Ok(report) => {
                    info!(
                        attempt,
                        duration_ms = started.elapsed().as_millis(),
                        exercises = report.workout_plan.len(),
                        meals = report.nutrition_plan.len(),
                        "Report generated"
                    );
                    return Ok(report);
                }
                Err(AttemptFailure::Transport(source)) => {
                    error!(attempt, error = %source, "Completion backend failure, not retrying");
                    return Err(GenerationError::Transport { source });
                }
                Err(AttemptFailure::Invalid {
                    diagnostic,
                    raw_output,
                }) => {
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        diagnostic = %diagnostic,
                        "Generated report failed validation"
                    );
                    last_invalid = Some((diagnostic, raw_output));
                }
            }
        }

        let (diagnostic, last_output) = last_invalid.unwrap_or_else(|| {
            ("no generation attempt was made".to_owned(), None)
        });
        error!(
            attempts = self.max_attempts,
            diagnostic = %diagnostic,
            "Report generation exhausted its attempts"
        );
        Err(GenerationError::Validation {
            attempts: self.max_attempts,
            diagnostic,
            last_output,
        })
    }

    /// Build a report-shaped request over `messages`
    fn report_request(&self, messages: Vec<ChatMessage>) -> ChatRequest {
        ChatRequest::new(messages)
            .with_model(self.model.as_str())
            .with_temperature(self.temperature)
            .with_max_tokens(REPORT_MAX_TOKENS)
            .with_response_schema(report_schema())
    }

    /// One full attempt, starting from a freshly built context
    async fn run_attempt(&self, profile: &Profile) -> Result<Report, AttemptFailure> {
        let mut messages = build_report_messages(profile);

        let response = self
            .provider
            .complete_with_tools(
                &self.report_request(messages.clone()),
                Some(vec![motivation_tool()]),
            )
            .await
            .map_err(AttemptFailure::Transport)?;

        let response = if response.has_function_calls() {
            let calls = response.function_calls.clone().unwrap_or_default();
            self.answer_tool_calls(profile, &mut messages, &calls, response.text())
                .await?;
            let follow_up = self
                .provider
                .complete_with_tools(&self.report_request(messages), None)
                .await
                .map_err(AttemptFailure::Transport)?;
            if follow_up.has_function_calls() {
                return Err(AttemptFailure::invalid(
                    "backend requested another tool round after the motivation result was supplied",
                    follow_up.text(),
                ));
            }
            follow_up
        } else {
            response
        };

        Self::finish_attempt(&response)
    }

    /// Run the motivation step once and append one tool result per call
    async fn answer_tool_calls(
        &self,
        profile: &Profile,
        messages: &mut Vec<ChatMessage>,
        calls: &[FunctionCall],
        assistant_text: Option<&str>,
    ) -> Result<(), AttemptFailure> {
        if let Some(unknown) = calls.iter().find(|call| call.name != MOTIVATION_TOOL_NAME) {
            return Err(AttemptFailure::invalid(
                format!("backend called unknown tool '{}'", unknown.name),
                None,
            ));
        }

        info!(
            calls = calls.len(),
            model = %self.motivation.model(),
            "Executing motivation step"
        );
        let batch = self.motivation.generate(profile).await?;
        let payload = serde_json::to_value(&batch).map_err(|e| {
            AttemptFailure::invalid(format!("motivation batch could not be encoded: {e}"), None)
        })?;

        if let Some(text) = assistant_text.filter(|text| !text.trim().is_empty()) {
            messages.push(ChatMessage::assistant(text));
        }
        for call in calls {
            messages.push(ChatMessage::user(format_tool_result(&FunctionResponse {
                name: call.name.clone(),
                response: payload.clone(),
            })));
        }
        Ok(())
    }

    /// Validate the final text of an attempt
    fn finish_attempt(response: &ChatResponseWithTools) -> Result<Report, AttemptFailure> {
        let raw = response.text().unwrap_or_default();
        let report = parse_report(raw)
            .map_err(|e| AttemptFailure::invalid(e.message, Some(raw).filter(|r| !r.is_empty())))?;
        debug!(
            finish_reason = ?response.finish_reason,
            usage = ?response.usage,
            "Report output passed validation"
        );
        Ok(report)
    }
}

/// Truncate raw output for diagnostics
fn preview(raw: &str) -> String {
    raw.chars().take(RAW_OUTPUT_PREVIEW_CHARS).collect()
}
