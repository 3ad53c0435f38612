// ABOUTME: Process-wide dependency contexts built once at startup and shared with every request
// ABOUTME: Splits configuration from the generation handles and composes both into ServerContext
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Dependency injection contexts
//!
//! Handles are constructed once in the binary and cloned cheaply into each
//! request (everything sits behind an `Arc`). Nothing in them is mutable
//! after construction.
//!
//! # Architecture
//!
//! - `ConfigContext`: loaded server configuration
//! - `GenerationContext`: completion provider and report orchestrator
//! - `ServerContext`: both of the above, used as the axum router state

pub mod config;
pub mod generation;
pub mod server;

pub use config::ConfigContext;
pub use generation::GenerationContext;
pub use server::ServerContext;
