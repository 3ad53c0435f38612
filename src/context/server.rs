// ABOUTME: Composed server context used as the HTTP router state
// ABOUTME: Groups the configuration and generation contexts behind cheap clones
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use super::{ConfigContext, GenerationContext};
use crate::config::ServerConfig;
use crate::errors::AppResult;
use crate::llm::LlmProvider;

/// Composed server context
#[derive(Clone)]
pub struct ServerContext {
    config: ConfigContext,
    generation: GenerationContext,
}

impl ServerContext {
    /// Create new server context from focused contexts
    #[must_use]
    pub const fn new(config: ConfigContext, generation: GenerationContext) -> Self {
        Self { config, generation }
    }

    /// Build every dependency from loaded configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the completion provider cannot be created.
    pub fn from_config(config: ServerConfig) -> AppResult<Self> {
        let generation = GenerationContext::from_config(&config)?;
        Ok(Self::new(ConfigContext::new(Arc::new(config)), generation))
    }

    /// Build a context around a caller-supplied provider
    #[must_use]
    pub fn with_provider(config: ServerConfig, provider: Arc<dyn LlmProvider>) -> Self {
        let generation = GenerationContext::new(provider, &config);
        Self::new(ConfigContext::new(Arc::new(config)), generation)
    }

    /// Get configuration context
    #[must_use]
    pub const fn config(&self) -> &ConfigContext {
        &self.config
    }

    /// Get generation context
    #[must_use]
    pub const fn generation(&self) -> &GenerationContext {
        &self.generation
    }
}
