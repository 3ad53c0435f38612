// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Re-exports the environment-driven server, backend and generation configs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module for the workout agent
//!
//! - **Environment**: server, CORS, completion backend and generation policy,
//!   all loaded from environment variables

/// Environment and server configuration
pub mod environment;

pub use environment::{CorsConfig, GenerationConfig, LlmConfig, ServerConfig};
