// ABOUTME: System prompts for report and motivation generation loaded at compile time
// ABOUTME: Prompt text lives in markdown files next to this module
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # System Prompts
//!
//! Prompts are loaded at compile time from markdown files for easy maintenance.

/// Fitness report advisor system prompt
///
/// Covers:
/// - Workout and nutrition plan sizing
/// - Daily calorie estimation inputs
/// - When to call the motivation tool and how to pick a quote
/// - JSON output rules
pub const REPORT_SYSTEM_PROMPT: &str = include_str!("report_system.md");

/// Motivational quote generator system prompt
pub const MOTIVATION_SYSTEM_PROMPT: &str = include_str!("motivation_system.md");

/// Get the system prompt for report generation
#[must_use]
pub const fn get_report_system_prompt() -> &'static str {
    REPORT_SYSTEM_PROMPT
}

/// Get the system prompt for the motivation step
#[must_use]
pub const fn get_motivation_system_prompt() -> &'static str {
    MOTIVATION_SYSTEM_PROMPT
}
