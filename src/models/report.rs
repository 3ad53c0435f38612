// ABOUTME: Fitness report data contracts produced by the generation pipeline
// ABOUTME: Exercise, Meal and Report types plus the post-generation conformance checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Individual exercise in a workout plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    /// Name of the exercise
    pub name: String,
    /// Number of sets
    pub sets: u32,
    /// Number of repetitions per set
    pub reps: u32,
    /// Rest time in seconds between sets
    pub rest_time: u32,
    /// Exercise instructions
    #[serde(default)]
    pub instructions: Option<String>,
}

/// Individual meal in a nutrition plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    /// Name of the meal
    pub name: String,
    /// Calories per serving
    pub calories: u32,
    /// Protein in grams
    pub protein: f64,
    /// Carbohydrates in grams
    pub carbs: f64,
    /// Fats in grams
    pub fats: f64,
    /// Meal timing (breakfast, lunch, dinner, snack); free text by convention
    pub timing: String,
    /// List of ingredients
    #[serde(default)]
    pub ingredients: Option<Vec<String>>,
}

/// Complete fitness report with workout and nutrition plans
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Customized workout plan
    pub workout_plan: Vec<Exercise>,
    /// Customized nutrition plan
    pub nutrition_plan: Vec<Meal>,
    /// Recommended daily calories
    pub daily_calories: u32,
    /// Personalized motivational quote
    pub motivational_quote: String,
    /// Additional fitness recommendations
    pub recommendations: Vec<String>,
}

impl Exercise {
    fn validate(&self, index: usize) -> AppResult<()> {
        let field = |name: &str| format!("workout_plan[{index}].{name}");
        if self.sets == 0 {
            return Err(AppError::out_of_range(&field("sets"), "must be at least 1"));
        }
        if self.reps == 0 {
            return Err(AppError::out_of_range(&field("reps"), "must be at least 1"));
        }
        Ok(())
    }
}

impl Meal {
    fn validate(&self, index: usize) -> AppResult<()> {
        for (name, grams) in [
            ("protein", self.protein),
            ("carbs", self.carbs),
            ("fats", self.fats),
        ] {
            if !(grams.is_finite() && grams >= 0.0) {
                return Err(AppError::out_of_range(
                    &format!("nutrition_plan[{index}].{name}"),
                    format!("must be a non-negative number of grams, got {grams}"),
                ));
            }
        }
        Ok(())
    }
}

impl Report {
    /// Check every field against the report contract
    ///
    /// Type conformance (presence, integer fields) is enforced by
    /// deserialization; this covers the bounds serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint as a `VALUE_OUT_OF_RANGE` error.
    pub fn validate(&self) -> AppResult<()> {
        if self.workout_plan.is_empty() {
            return Err(AppError::out_of_range(
                "workout_plan",
                "must contain at least one exercise",
            ));
        }
        for (index, exercise) in self.workout_plan.iter().enumerate() {
            exercise.validate(index)?;
        }

        if self.nutrition_plan.is_empty() {
            return Err(AppError::out_of_range(
                "nutrition_plan",
                "must contain at least one meal",
            ));
        }
        for (index, meal) in self.nutrition_plan.iter().enumerate() {
            meal.validate(index)?;
        }

        if self.motivational_quote.trim().is_empty() {
            return Err(AppError::out_of_range(
                "motivational_quote",
                "must not be empty",
            ));
        }

        if self.recommendations.is_empty() {
            return Err(AppError::out_of_range(
                "recommendations",
                "must contain at least one recommendation",
            ));
        }

        Ok(())
    }
}
