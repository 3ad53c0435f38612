// ABOUTME: User fitness profile with validated physiological inputs and activity level
// ABOUTME: Profiles can only be built through validation, so downstream code never sees bad bounds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::profile_limits::{MAX_AGE, MIN_AGE};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Self-reported activity level used for both TDEE and prompt context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    LightlyActive,
    /// Moderate exercise 3-5 days/week
    ModeratelyActive,
    /// Hard exercise 6-7 days/week
    VeryActive,
    /// Very hard exercise or a physical job
    ExtremelyActive,
}

impl ActivityLevel {
    /// Wire representation (`snake_case`)
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sedentary => "sedentary",
            Self::LightlyActive => "lightly_active",
            Self::ModeratelyActive => "moderately_active",
            Self::VeryActive => "very_active",
            Self::ExtremelyActive => "extremely_active",
        }
    }

    /// Human-readable phrase for prompts ("moderately active")
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Sedentary => "sedentary",
            Self::LightlyActive => "lightly active",
            Self::ModeratelyActive => "moderately active",
            Self::VeryActive => "very active",
            Self::ExtremelyActive => "extremely active",
        }
    }

    /// Activity multiplier applied to BMR to estimate daily energy expenditure
    #[must_use]
    pub const fn multiplier(&self) -> f64 {
        match self {
            Self::Sedentary => 1.2,
            Self::LightlyActive => 1.375,
            Self::ModeratelyActive => 1.55,
            Self::VeryActive => 1.725,
            Self::ExtremelyActive => 1.9,
        }
    }
}

impl Display for ActivityLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Unvalidated profile as it arrives on the wire
///
/// Deserialize into this and convert with [`Profile::try_from`]; the
/// [`Profile`] deserializer does exactly that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileInput {
    /// Age in years
    pub age: i64,
    /// Weight in kg
    pub weight: f64,
    /// Height in cm
    pub height: f64,
    /// Gender (male/female/other)
    pub gender: String,
    /// Current activity level
    pub activity_level: ActivityLevel,
    /// Specific fitness goals
    #[serde(default)]
    pub fitness_goals: Option<String>,
}

/// Validated fitness profile
///
/// Immutable once built. Every numeric field is within bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProfileInput")]
pub struct Profile {
    age: u32,
    weight: f64,
    height: f64,
    gender: String,
    activity_level: ActivityLevel,
    fitness_goals: Option<String>,
}

impl Profile {
    /// Build a profile, validating all bounds
    ///
    /// # Errors
    ///
    /// Returns `VALUE_OUT_OF_RANGE` if age is outside 13..=120 or weight/height
    /// are not finite positive numbers.
    pub fn new(
        age: i64,
        weight: f64,
        height: f64,
        gender: impl Into<String>,
        activity_level: ActivityLevel,
        fitness_goals: Option<String>,
    ) -> AppResult<Self> {
        Self::try_from(ProfileInput {
            age,
            weight,
            height,
            gender: gender.into(),
            activity_level,
            fitness_goals,
        })
    }

    /// Age in years
    #[must_use]
    pub const fn age(&self) -> u32 {
        self.age
    }

    /// Weight in kg
    #[must_use]
    pub const fn weight(&self) -> f64 {
        self.weight
    }

    /// Height in cm
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Gender as supplied
    #[must_use]
    pub fn gender(&self) -> &str {
        &self.gender
    }

    /// Whether the male branch of the BMR formula applies (case-insensitive)
    #[must_use]
    pub fn is_male(&self) -> bool {
        self.gender.eq_ignore_ascii_case("male")
    }

    /// Activity level
    #[must_use]
    pub const fn activity_level(&self) -> ActivityLevel {
        self.activity_level
    }

    /// Fitness goals, if any were given
    #[must_use]
    pub fn fitness_goals(&self) -> Option<&str> {
        self.fitness_goals.as_deref()
    }
}

impl TryFrom<ProfileInput> for Profile {
    type Error = AppError;

    fn try_from(input: ProfileInput) -> AppResult<Self> {
        let age = u32::try_from(input.age)
            .ok()
            .filter(|age| (MIN_AGE..=MAX_AGE).contains(age))
            .ok_or_else(|| {
                AppError::out_of_range(
                    "age",
                    format!(
                        "must be between {MIN_AGE} and {MAX_AGE} years, got {}",
                        input.age
                    ),
                )
            })?;

        if !(input.weight.is_finite() && input.weight > 0.0) {
            return Err(AppError::out_of_range(
                "weight",
                format!("must be greater than 0 kg, got {}", input.weight),
            ));
        }
        if !(input.height.is_finite() && input.height > 0.0) {
            return Err(AppError::out_of_range(
                "height",
                format!("must be greater than 0 cm, got {}", input.height),
            ));
        }

        Ok(Self {
            age,
            weight: input.weight,
            height: input.height,
            gender: input.gender,
            activity_level: input.activity_level,
            fitness_goals: input
                .fitness_goals
                .map(|goals| goals.trim().to_owned())
                .filter(|goals| !goals.is_empty()),
        })
    }
}
