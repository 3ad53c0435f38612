// ABOUTME: System-wide constants and default configuration values for the workout agent
// ABOUTME: Groups service identity, generation defaults, calorie adjustments and env var names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Constants Module
//!
//! Hardcoded constants and the defaults used when environment configuration
//! is absent.

/// Service identity
pub mod service_names {
    /// Service name reported by `/health` and used in structured logs
    pub const WORKOUT_AGENT: &str = "workout-agent";

    /// Human-readable API title
    pub const API_TITLE: &str = "Workout Agent API";

    /// Service version from Cargo.toml
    pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");
}

/// Network defaults
pub mod network {
    /// Default bind address
    pub const DEFAULT_HOST: &str = "0.0.0.0";

    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 8000;
}

/// Completion backend defaults
pub mod llm_defaults {
    /// Default `OpenAI`-compatible API base URL
    pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

    /// Default model used for both report and motivation generation
    pub const DEFAULT_MODEL: &str = "gpt-4";

    /// Connect timeout for the completion backend
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;

    /// Whole-request timeout for the completion backend
    pub const REQUEST_TIMEOUT_SECS: u64 = 120;

    /// Upper bound on tokens for a full report
    pub const REPORT_MAX_TOKENS: u32 = 2_000;

    /// Upper bound on tokens for a motivation batch
    pub const MOTIVATION_MAX_TOKENS: u32 = 500;
}

/// Generation policy defaults
pub mod generation {
    /// Total report generation attempts before giving up on schema mismatches
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

    /// Number of motivational quote candidates requested per batch
    pub const DEFAULT_MOTIVATION_QUOTE_COUNT: usize = 5;

    /// Name of the motivation step exposed to the backend
    pub const MOTIVATION_TOOL_NAME: &str = "get_motivation";

    /// Schema name for the report output
    pub const REPORT_SCHEMA_NAME: &str = "fitness_report";

    /// Schema name for the motivation batch output
    pub const MOTIVATION_SCHEMA_NAME: &str = "motivation_batch";

    /// Goal text used when the profile carries none
    pub const DEFAULT_FITNESS_GOAL: &str = "general fitness improvement";

    /// Maximum characters of raw output kept in a validation diagnostic
    pub const RAW_OUTPUT_PREVIEW_CHARS: usize = 500;
}

/// Calorie target adjustments applied on top of the daily energy expenditure
pub mod calories {
    /// Daily deficit for the weight loss target (kcal)
    pub const WEIGHT_LOSS_DEFICIT: f64 = 500.0;

    /// Daily surplus for the weight gain target (kcal)
    pub const WEIGHT_GAIN_SURPLUS: f64 = 500.0;
}

/// Profile input bounds
pub mod profile_limits {
    /// Minimum accepted age in years
    pub const MIN_AGE: u32 = 13;

    /// Maximum accepted age in years
    pub const MAX_AGE: u32 = 120;
}

/// Environment variable names
pub mod env_vars {
    /// Bind address
    pub const HOST: &str = "HOST";
    /// HTTP port
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// Comma-separated CORS origins or `*`
    pub const CORS_ALLOWED_ORIGINS: &str = "CORS_ALLOWED_ORIGINS";
    /// API key for the completion backend
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    /// Base URL of the completion backend
    pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
    /// Model for report generation
    pub const MODEL: &str = "WORKOUT_AGENT_MODEL";
    /// Model for motivation generation
    pub const MOTIVATION_MODEL: &str = "WORKOUT_AGENT_MOTIVATION_MODEL";
    /// Sampling temperature
    pub const TEMPERATURE: &str = "LLM_TEMPERATURE";
    /// Connect timeout in seconds
    pub const CONNECT_TIMEOUT_SECS: &str = "LLM_CONNECT_TIMEOUT_SECS";
    /// Request timeout in seconds
    pub const REQUEST_TIMEOUT_SECS: &str = "LLM_REQUEST_TIMEOUT_SECS";
    /// Report attempt bound
    pub const REPORT_MAX_ATTEMPTS: &str = "REPORT_MAX_ATTEMPTS";
    /// Motivation batch size
    pub const MOTIVATION_QUOTE_COUNT: &str = "MOTIVATION_QUOTE_COUNT";
}
