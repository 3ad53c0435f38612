// ABOUTME: Environment-based server configuration for the workout agent
// ABOUTME: Loads network, CORS, completion backend and generation policy settings once at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-only configuration.
//!
//! All settings come from environment variables (optionally seeded from a
//! `.env` file by the binary). Nothing is read again after startup.

use crate::constants::{env_vars, generation, llm_defaults, network};
use crate::errors::{AppError, AppResult, ErrorCode};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated origin list, or `*` to allow any origin
    pub allowed_origins: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: "*".to_owned(),
        }
    }
}

/// Completion backend configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the `OpenAI`-compatible API
    pub base_url: String,
    /// API key; absent keys are tolerated at startup
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Model used for report generation
    pub model: String,
    /// Model used for the motivation step
    pub motivation_model: String,
    /// Sampling temperature, provider default when unset
    pub temperature: Option<f32>,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("motivation_model", &self.motivation_model)
            .field("temperature", &self.temperature)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: llm_defaults::DEFAULT_BASE_URL.to_owned(),
            api_key: None,
            model: llm_defaults::DEFAULT_MODEL.to_owned(),
            motivation_model: llm_defaults::DEFAULT_MODEL.to_owned(),
            temperature: None,
            connect_timeout_secs: llm_defaults::CONNECT_TIMEOUT_SECS,
            request_timeout_secs: llm_defaults::REQUEST_TIMEOUT_SECS,
        }
    }
}

impl LlmConfig {
    /// Load completion backend settings from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable is set but cannot be parsed.
    pub fn from_env() -> AppResult<Self> {
        let model = env_var_or(env_vars::MODEL, llm_defaults::DEFAULT_MODEL);
        let motivation_model = env::var(env_vars::MOTIVATION_MODEL)
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| model.clone());

        Ok(Self {
            base_url: env_var_or(env_vars::OPENAI_BASE_URL, llm_defaults::DEFAULT_BASE_URL),
            api_key: env::var(env_vars::OPENAI_API_KEY)
                .ok()
                .filter(|k| !k.trim().is_empty()),
            model,
            motivation_model,
            temperature: parse_optional_env(env_vars::TEMPERATURE)?,
            connect_timeout_secs: parse_env_or(
                env_vars::CONNECT_TIMEOUT_SECS,
                llm_defaults::CONNECT_TIMEOUT_SECS,
            )?,
            request_timeout_secs: parse_env_or(
                env_vars::REQUEST_TIMEOUT_SECS,
                llm_defaults::REQUEST_TIMEOUT_SECS,
            )?,
        })
    }

    /// Whether an API key was supplied
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Report generation policy
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Total attempts allowed when generated output fails validation
    pub max_attempts: u32,
    /// Number of quote candidates requested from the motivation step
    pub motivation_quote_count: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_attempts: generation::DEFAULT_MAX_ATTEMPTS,
            motivation_quote_count: generation::DEFAULT_MOTIVATION_QUOTE_COUNT,
        }
    }
}

impl GenerationConfig {
    /// Load the generation policy from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be parsed or is zero.
    pub fn from_env() -> AppResult<Self> {
        let config = Self {
            max_attempts: parse_env_or(
                env_vars::REPORT_MAX_ATTEMPTS,
                generation::DEFAULT_MAX_ATTEMPTS,
            )?,
            motivation_quote_count: parse_env_or(
                env_vars::MOTIVATION_QUOTE_COUNT,
                generation::DEFAULT_MOTIVATION_QUOTE_COUNT,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject policies that could never produce a report
    ///
    /// # Errors
    ///
    /// Returns an error if either bound is zero.
    pub fn validate(&self) -> AppResult<()> {
        if self.max_attempts == 0 {
            return Err(AppError::new(
                ErrorCode::ConfigInvalid,
                format!("{} must be at least 1", env_vars::REPORT_MAX_ATTEMPTS),
            ));
        }
        if self.motivation_quote_count == 0 {
            return Err(AppError::new(
                ErrorCode::ConfigInvalid,
                format!("{} must be at least 1", env_vars::MOTIVATION_QUOTE_COUNT),
            ));
        }
        Ok(())
    }
}

/// Top-level server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// HTTP port
    pub http_port: u16,
    /// CORS settings
    pub cors: CorsConfig,
    /// Completion backend settings
    pub llm: LlmConfig,
    /// Report generation policy
    pub generation: GenerationConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: network::DEFAULT_HOST.to_owned(),
            http_port: network::DEFAULT_HTTP_PORT,
            cors: CorsConfig::default(),
            llm: LlmConfig::default(),
            generation: GenerationConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if any variable is present but malformed.
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            host: env_var_or(env_vars::HOST, network::DEFAULT_HOST),
            http_port: parse_env_or(env_vars::HTTP_PORT, network::DEFAULT_HTTP_PORT)?,
            cors: CorsConfig {
                allowed_origins: env_var_or(env_vars::CORS_ALLOWED_ORIGINS, "*"),
            },
            llm: LlmConfig::from_env()?,
            generation: GenerationConfig::from_env()?,
        })
    }

    /// Get a summary of the configuration for logging (never includes secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Workout Agent Configuration:\n\
             - Bind: {}:{}\n\
             - CORS Origins: {}\n\
             - LLM Endpoint: {}\n\
             - Report Model: {}\n\
             - Motivation Model: {}\n\
             - API Key: {}\n\
             - Max Report Attempts: {}\n\
             - Motivation Quotes: {}",
            self.host,
            self.http_port,
            self.cors.allowed_origins,
            self.llm.base_url,
            self.llm.model,
            self.llm.motivation_model,
            if self.llm.has_api_key() {
                "Configured"
            } else {
                "Missing"
            },
            self.generation.max_attempts,
            self.generation.motivation_quote_count,
        )
    }
}

/// Read a variable or fall back to a default
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse a variable, using the default when it is unset
fn parse_env_or<T: FromStr>(key: &str, default: T) -> AppResult<T> {
    parse_optional_env(key).map(|value| value.unwrap_or(default))
}

/// Parse a variable that may be absent
fn parse_optional_env<T: FromStr>(key: &str) -> AppResult<Option<T>> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().parse::<T>().map(Some).map_err(|_| {
            AppError::new(
                ErrorCode::ConfigInvalid,
                format!("Invalid value for {key}: {raw}"),
            )
        }),
        _ => Ok(None),
    }
}
