// ABOUTME: JSON Schema descriptors for report and motivation output plus post-generation parsing
// ABOUTME: Extracts JSON from free text, deserializes it and applies the report contract checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Schema-guided output handling.
//!
//! The descriptors only use keywords that strict JSON-schema output modes
//! accept (`type`, `properties`, `required`, `items`, `enum`,
//! `additionalProperties`). Numeric bounds and non-empty lists travel in the
//! descriptions and are enforced after generation by [`parse_report`].

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::constants::generation::{MOTIVATION_SCHEMA_NAME, REPORT_SCHEMA_NAME};
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::llm::ResponseSchema;
use crate::models::Report;

/// Schema descriptor for a full report
#[must_use]
pub fn report_schema() -> ResponseSchema {
    let exercise = json!({
        "type": "object",
        "properties": {
            "name": { "type": "string", "description": "Name of the exercise" },
            "sets": { "type": "integer", "description": "Number of sets, at least 1" },
            "reps": { "type": "integer", "description": "Number of repetitions per set, at least 1" },
            "rest_time": { "type": "integer", "description": "Rest time in seconds between sets, at least 0" },
            "instructions": { "type": ["string", "null"], "description": "Exercise instructions" }
        },
        "required": ["name", "sets", "reps", "rest_time", "instructions"],
        "additionalProperties": false
    });

    let meal = json!({
        "type": "object",
        "properties": {
            "name": { "type": "string", "description": "Name of the meal" },
            "calories": { "type": "integer", "description": "Calories per serving, at least 0" },
            "protein": { "type": "number", "description": "Protein in grams, at least 0" },
            "carbs": { "type": "number", "description": "Carbohydrates in grams, at least 0" },
            "fats": { "type": "number", "description": "Fats in grams, at least 0" },
            "timing": { "type": "string", "description": "Meal timing (breakfast, lunch, dinner, snack)" },
            "ingredients": {
                "type": ["array", "null"],
                "items": { "type": "string" },
                "description": "List of ingredients"
            }
        },
        "required": ["name", "calories", "protein", "carbs", "fats", "timing", "ingredients"],
        "additionalProperties": false
    });

    ResponseSchema::strict(
        REPORT_SCHEMA_NAME,
        json!({
            "type": "object",
            "properties": {
                "workout_plan": {
                    "type": "array",
                    "items": exercise,
                    "description": "Customized workout plan, at least one exercise"
                },
                "nutrition_plan": {
                    "type": "array",
                    "items": meal,
                    "description": "Customized nutrition plan, at least one meal"
                },
                "daily_calories": { "type": "integer", "description": "Recommended daily calories" },
                "motivational_quote": { "type": "string", "description": "Personalized motivational quote" },
                "recommendations": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Additional fitness recommendations, at least one"
                }
            },
            "required": [
                "workout_plan",
                "nutrition_plan",
                "daily_calories",
                "motivational_quote",
                "recommendations"
            ],
            "additionalProperties": false
        }),
    )
}

/// Schema descriptor for a motivation batch
#[must_use]
pub fn motivation_schema() -> ResponseSchema {
    ResponseSchema::strict(
        MOTIVATION_SCHEMA_NAME,
        json!({
            "type": "object",
            "properties": {
                "quotes": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Motivational quote candidates"
                }
            },
            "required": ["quotes"],
            "additionalProperties": false
        }),
    )
}

/// Extract a JSON object from generated text that may carry fences or prose
///
/// # Errors
///
/// Returns `INVALID_FORMAT` if no parseable JSON value is found.
pub fn extract_json(response: &str) -> AppResult<String> {
    let trimmed = response.trim();
    if serde_json::from_str::<Value>(trimmed).is_ok() {
        return Ok(trimmed.to_owned());
    }

    // Fenced block, with or without a language tag
    if let Some(start) = trimmed.find("```") {
        let after_fence = &trimmed[start + 3..];
        let content_start = after_fence.find('\n').map_or(0, |i| i + 1);
        if let Some(end) = after_fence[content_start..].find("```") {
            let block = after_fence[content_start..content_start + end].trim();
            if serde_json::from_str::<Value>(block).is_ok() {
                return Ok(block.to_owned());
            }
        }
    }

    // First '{' to last '}'
    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            let candidate = &trimmed[start..=end];
            if serde_json::from_str::<Value>(candidate).is_ok() {
                return Ok(candidate.to_owned());
            }
        }
    }

    Err(AppError::new(
        ErrorCode::InvalidFormat,
        if trimmed.is_empty() {
            "generated output was empty".to_owned()
        } else {
            "could not extract valid JSON from generated output".to_owned()
        },
    ))
}

/// Parse and validate generated report output
///
/// # Errors
///
/// Returns `INVALID_FORMAT` when the output is not report-shaped JSON and
/// `VALUE_OUT_OF_RANGE` when a bound is violated.
pub fn parse_report(raw: &str) -> AppResult<Report> {
    let json = extract_json(raw)?;
    let report: Report = serde_json::from_str(&json).map_err(|e| {
        debug!("Report output did not match the schema: {e}");
        AppError::new(
            ErrorCode::InvalidFormat,
            format!("output does not match the report schema: {e}"),
        )
    })?;
    report.validate()?;
    Ok(report)
}

/// Wire shape of a motivation batch
#[derive(Debug, Deserialize)]
struct QuotesEnvelope {
    quotes: Vec<String>,
}

/// Parse generated motivation output into its quote list
///
/// A bare JSON array of strings is accepted as well as `{"quotes": [...]}`.
///
/// # Errors
///
/// Returns `INVALID_FORMAT` when the output is neither shape.
pub fn parse_quotes(raw: &str) -> AppResult<Vec<String>> {
    let trimmed = raw.trim();
    if let Ok(quotes) = serde_json::from_str::<Vec<String>>(trimmed) {
        return Ok(quotes);
    }

    let json = extract_json(trimmed)?;
    serde_json::from_str::<QuotesEnvelope>(&json)
        .map(|envelope| envelope.quotes)
        .map_err(|e| {
            AppError::new(
                ErrorCode::InvalidFormat,
                format!("output does not match the motivation schema: {e}"),
            )
        })
}
