// ABOUTME: Main library entry point for the workout agent fitness report service
// ABOUTME: Exposes the generation pipeline, BMR calculator, configuration and HTTP routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

// Crate-level attributes:
// - deny(unsafe_code): Zero-tolerance unsafe policy
#![deny(unsafe_code)]

//! # Workout Agent
//!
//! Personalized workout and nutrition reports from a physiological profile.
//!
//! ## Features
//!
//! - **Report generation**: schema-guided generation against an
//!   `OpenAI`-compatible backend, with a motivational quote step and bounded
//!   retries on malformed output
//! - **Calorie targets**: Mifflin-St Jeor BMR scaled by activity level
//! - **HTTP API**: `/analyze`, `/bmr`, `/health` and `/`
//!
//! ## Architecture
//!
//! - **Models**: validated profile and report contracts
//! - **LLM**: completion client trait and the `OpenAI`-compatible provider
//! - **Generation**: prompt context, schemas, motivation step, orchestrator
//! - **Intelligence**: deterministic calculations
//! - **Context**: process-wide handles built once at startup
//! - **Routes**: axum boundary layer
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use workout_agent::config::ServerConfig;
//! use workout_agent::context::ServerContext;
//! use workout_agent::errors::AppResult;
//! use workout_agent::models::{ActivityLevel, Profile};
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let context = ServerContext::from_config(ServerConfig::from_env()?)?;
//!     let profile = Profile::new(30, 70.0, 175.0, "male", ActivityLevel::ModeratelyActive, None)?;
//!     let report = context
//!         .generation()
//!         .orchestrator()
//!         .generate_report(&profile)
//!         .await?;
//!     println!("{}", report.motivational_quote);
//!     Ok(())
//! }
//! ```

// ── Public API ──────────────────────────────────────────────────────────
// Used by the binary (src/bin/) and integration tests (tests/).

/// Configuration management
pub mod config;

/// Application constants and defaults
pub mod constants;

/// Process-wide dependency contexts
pub mod context;

/// Unified error handling
pub mod errors;

/// Report generation pipeline
pub mod generation;

/// Deterministic fitness calculations
pub mod intelligence;

/// Completion client abstraction and providers
pub mod llm;

/// Structured logging configuration
pub mod logging;

/// HTTP middleware
pub mod middleware;

/// Profile and report data contracts
pub mod models;

/// HTTP routes
pub mod routes;
