// ABOUTME: Basal metabolic rate and daily calorie targets from a validated fitness profile
// ABOUTME: Mifflin-St Jeor equation scaled by the activity multiplier, no generation involved
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Nutrition Calculator
//!
//! Deterministic energy expenditure estimates.
//!
//! ## Scientific References
//!
//! - Mifflin, M.D., et al. (1990). A new predictive equation for resting energy expenditure.
//!   *American Journal of Clinical Nutrition*, 51(2), 241-247.
//!   <https://doi.org/10.1093/ajcn/51.2.241>

use crate::constants::calories::{WEIGHT_GAIN_SURPLUS, WEIGHT_LOSS_DEFICIT};
use crate::models::{ActivityLevel, Profile};
use serde::{Deserialize, Serialize};

/// Mifflin-St Jeor weight coefficient (kcal per kg)
const MSJ_WEIGHT_COEF: f64 = 10.0;
/// Mifflin-St Jeor height coefficient (kcal per cm)
const MSJ_HEIGHT_COEF: f64 = 6.25;
/// Mifflin-St Jeor age coefficient (kcal per year)
const MSJ_AGE_COEF: f64 = -5.0;
/// Mifflin-St Jeor constant for men
const MSJ_MALE_CONSTANT: f64 = 5.0;
/// Mifflin-St Jeor constant for everyone else
const MSJ_FEMALE_CONSTANT: f64 = -161.0;

/// Resting metabolic rate using the Mifflin-St Jeor equation (1990)
///
/// Formula: BMR = (10 x `weight_kg`) + (6.25 x `height_cm`) - (5 x age) + `gender_offset`
/// - Men: +5
/// - Everyone else: -161
///
/// The male branch is selected by a case-insensitive match on `"male"`.
#[must_use]
pub fn calculate_base_bmr(profile: &Profile) -> f64 {
    let gender_constant = if profile.is_male() {
        MSJ_MALE_CONSTANT
    } else {
        MSJ_FEMALE_CONSTANT
    };

    MSJ_WEIGHT_COEF * profile.weight()
        + MSJ_HEIGHT_COEF * profile.height()
        + MSJ_AGE_COEF * f64::from(profile.age())
        + gender_constant
}

/// Activity-adjusted BMR (the figure the API reports as `bmr`)
///
/// Mifflin-St Jeor result multiplied by the activity factor:
/// - Sedentary: 1.2
/// - Lightly active: 1.375
/// - Moderately active: 1.55
/// - Very active: 1.725
/// - Extremely active: 1.9
///
/// Pure and deterministic: identical profiles give bit-identical results.
#[must_use]
pub fn calculate_bmr(profile: &Profile) -> f64 {
    calculate_base_bmr(profile) * profile.activity_level().multiplier()
}

/// Daily calorie targets derived from the activity-adjusted BMR
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalorieTargets {
    /// Activity-adjusted BMR, rounded to 2 decimals
    pub bmr: f64,
    /// Maintenance calories
    pub daily_calories: i64,
    /// Maintenance minus the weight loss deficit
    pub weight_loss_calories: i64,
    /// Maintenance plus the weight gain surplus
    pub weight_gain_calories: i64,
    /// Activity level the multiplier came from
    pub activity_level: ActivityLevel,
}

impl CalorieTargets {
    /// Compute the targets for a profile
    ///
    /// Whole-number figures round half to even, so `x.5` lands on the even
    /// neighbour.
    #[must_use]
    pub fn from_profile(profile: &Profile) -> Self {
        let bmr = calculate_bmr(profile);
        Self {
            bmr: round_to_decimals(bmr, 2),
            daily_calories: round_to_whole(bmr),
            weight_loss_calories: round_to_whole(bmr - WEIGHT_LOSS_DEFICIT),
            weight_gain_calories: round_to_whole(bmr + WEIGHT_GAIN_SURPLUS),
            activity_level: profile.activity_level(),
        }
    }
}

/// Round half to even at the given number of decimals
fn round_to_decimals(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Round half to even to a whole number of kcal
fn round_to_whole(value: f64) -> i64 {
    value.round_ties_even() as i64
}
