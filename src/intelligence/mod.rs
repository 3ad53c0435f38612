// ABOUTME: Deterministic fitness calculations that never call the generation backend
// ABOUTME: Currently the Mifflin-St Jeor BMR and daily calorie target calculator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// BMR and calorie target calculation
pub mod nutrition_calculator;

pub use nutrition_calculator::{calculate_base_bmr, calculate_bmr, CalorieTargets};
