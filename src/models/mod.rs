// ABOUTME: Data contracts for fitness profiles and generated reports
// ABOUTME: Re-exports the profile input/validated types and the report structures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! - `Profile`: validated physiological inputs and goals, one per request
//! - `Report`: workout plan, nutrition plan, daily calories, quote and
//!   recommendations produced by the generation pipeline

/// User profile and activity level
pub mod profile;

/// Generated report structures
pub mod report;

pub use profile::{ActivityLevel, Profile, ProfileInput};
pub use report::{Exercise, Meal, Report};
