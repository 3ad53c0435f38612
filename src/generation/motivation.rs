// ABOUTME: Motivation sub-generator producing candidate quotes for the report's motivational_quote
// ABOUTME: One completion call per invocation, no retry, no state kept between calls
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};

use super::context::build_motivation_messages;
use super::schema::{motivation_schema, parse_quotes};
use crate::config::{GenerationConfig, LlmConfig};
use crate::constants::llm_defaults::MOTIVATION_MAX_TOKENS;
use crate::errors::AppError;
use crate::llm::{ChatRequest, LlmProvider};
use crate::models::Profile;

/// Failure of a single motivation invocation
#[derive(Debug, Error)]
pub enum MotivationError {
    /// The backend answered but not with a usable batch
    #[error("malformed motivation batch: {reason}")]
    Malformed {
        /// What was wrong with the answer
        reason: String,
        /// Text the backend returned, when there was one
        raw_output: Option<String>,
    },

    /// The backend could not be reached or rejected the request
    #[error("motivation request failed: {0}")]
    Transport(AppError),
}

impl MotivationError {
    /// Attach the backend's answer to a malformed-batch error
    fn with_raw_output(self, raw: &str) -> Self {
        match self {
            Self::Malformed { reason, .. } => Self::Malformed {
                reason,
                raw_output: Some(raw.to_owned()),
            },
            transport @ Self::Transport(_) => transport,
        }
    }
}

/// Non-empty batch of candidate quotes
///
/// Never persisted or returned to API callers; the backend picks one quote
/// from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MotivationBatch {
    quotes: Vec<String>,
}

impl MotivationBatch {
    /// Build a batch, dropping blank candidates
    ///
    /// # Errors
    ///
    /// Returns [`MotivationError::Malformed`] if no candidate survives.
    pub fn new(quotes: Vec<String>) -> Result<Self, MotivationError> {
        let quotes: Vec<String> = quotes
            .into_iter()
            .map(|quote| quote.trim().to_owned())
            .filter(|quote| !quote.is_empty())
            .collect();

        if quotes.is_empty() {
            return Err(MotivationError::Malformed {
                reason: "no non-empty quote candidates".to_owned(),
                raw_output: None,
            });
        }
        Ok(Self { quotes })
    }

    /// Candidate quotes
    #[must_use]
    pub fn quotes(&self) -> &[String] {
        &self.quotes
    }

    /// Number of candidates
    #[must_use]
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// Always false for a constructed batch
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

/// Generates motivational quote candidates for a profile
#[derive(Clone)]
pub struct MotivationGenerator {
    provider: Arc<dyn LlmProvider>,
    model: String,
    temperature: Option<f32>,
    quote_count: usize,
}

impl MotivationGenerator {
    /// Create a generator
    #[must_use]
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        model: impl Into<String>,
        temperature: Option<f32>,
        quote_count: usize,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
            quote_count,
        }
    }

    /// Create a generator from loaded configuration
    #[must_use]
    pub fn from_config(
        provider: Arc<dyn LlmProvider>,
        llm: &LlmConfig,
        generation: &GenerationConfig,
    ) -> Self {
        Self::new(
            provider,
            llm.motivation_model.clone(),
            llm.temperature,
            generation.motivation_quote_count,
        )
    }

    /// Model used for motivation requests
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Produce a fresh batch of candidates for `profile`
    ///
    /// Exactly one backend request per call.
    ///
    /// # Errors
    ///
    /// Returns [`MotivationError::Transport`] when the request fails and
    /// [`MotivationError::Malformed`] when the answer is not a non-empty list
    /// of quotes.
    #[instrument(skip_all, fields(model = %self.model, quote_count = self.quote_count))]
    pub async fn generate(&self, profile: &Profile) -> Result<MotivationBatch, MotivationError> {
        let request = ChatRequest::new(build_motivation_messages(profile, self.quote_count))
            .with_model(self.model.as_str())
            .with_temperature(self.temperature)
            .with_max_tokens(MOTIVATION_MAX_TOKENS)
            .with_response_schema(motivation_schema());

        let response = self
            .provider
            .complete(&request)
            .await
            .map_err(MotivationError::Transport)?;

        let batch = parse_quotes(&response.content)
            .map_err(|e| MotivationError::Malformed {
                reason: e.message,
                raw_output: None,
            })
            .and_then(MotivationBatch::new)
            .map_err(|e| e.with_raw_output(&response.content))?;
        debug!(candidates = batch.len(), "Motivation batch generated");
        Ok(batch)
    }
}
