// ABOUTME: Generation context holding the completion provider and the report orchestrator
// ABOUTME: Built once from configuration, read-only afterwards and safe to share across requests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use tracing::warn;

use crate::config::ServerConfig;
use crate::errors::AppResult;
use crate::generation::FitnessReportOrchestrator;
use crate::llm::{LlmProvider, OpenAiCompatibleProvider};

/// Generation context
///
/// # Dependencies
/// - `orchestrator`: report pipeline (owns the provider and the motivation generator)
#[derive(Clone)]
pub struct GenerationContext {
    orchestrator: Arc<FitnessReportOrchestrator>,
}

impl GenerationContext {
    /// Create a context around an existing provider
    ///
    /// A provider without tool calling and schema-constrained output is
    /// accepted with a warning; `/analyze` will likely fail against it.
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>, config: &ServerConfig) -> Self {
        let capabilities = provider.capabilities();
        if !capabilities.supports_structured_generation() {
            warn!(
                provider = provider.name(),
                capabilities = ?capabilities,
                "Completion provider does not advertise tool calling and JSON-schema output"
            );
        }

        let orchestrator =
            FitnessReportOrchestrator::from_config(provider, &config.llm, &config.generation);
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }

    /// Create a context backed by the `OpenAI`-compatible provider
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &ServerConfig) -> AppResult<Self> {
        let provider: Arc<dyn LlmProvider> =
            Arc::new(OpenAiCompatibleProvider::from_config(&config.llm)?);
        Ok(Self::new(provider, config))
    }

    /// Get the report orchestrator
    #[must_use]
    pub const fn orchestrator(&self) -> &Arc<FitnessReportOrchestrator> {
        &self.orchestrator
    }
}
