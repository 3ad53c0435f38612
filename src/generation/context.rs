// ABOUTME: Renders a fitness profile into the natural-language prompts sent to the backend
// ABOUTME: Deterministic text builders for the report instruction, profile context and motivation request
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Prompt construction.
//!
//! Every function here is pure: the same profile always yields the same text,
//! so each attempt sees the current profile and nothing cached.

use std::fmt::Write as _;

use serde_json::json;

use crate::constants::generation::{DEFAULT_FITNESS_GOAL, MOTIVATION_TOOL_NAME};
use crate::llm::prompts::{get_motivation_system_prompt, get_report_system_prompt};
use crate::llm::{ChatMessage, FunctionDeclaration, FunctionResponse, Tool};
use crate::models::Profile;

/// Fixed task given to the backend on every attempt
pub const REPORT_TASK_INSTRUCTION: &str =
    "Create a personalized fitness and nutrition plan based on the user's profile";

/// Render every profile field as descriptive context
#[must_use]
pub fn format_profile_context(profile: &Profile) -> String {
    let mut context = String::from("User fitness profile and goals:\n");
    // Writing to a String cannot fail
    let _ = writeln!(context, "- Age: {} years", profile.age());
    let _ = writeln!(context, "- Weight: {} kg", profile.weight());
    let _ = writeln!(context, "- Height: {} cm", profile.height());
    let _ = writeln!(context, "- Gender: {}", profile.gender());
    let _ = writeln!(
        context,
        "- Activity level: {}",
        profile.activity_level().describe()
    );
    let _ = write!(context, "- Fitness goals: {}", goals_or_default(profile));
    context
}

/// Messages for one report attempt: system prompt merged with the profile context, then the task
#[must_use]
pub fn build_report_messages(profile: &Profile) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(format!(
            "{}\n\n{}",
            get_report_system_prompt().trim_end(),
            format_profile_context(profile)
        )),
        ChatMessage::user(REPORT_TASK_INSTRUCTION),
    ]
}

/// Request text for the motivation step
#[must_use]
pub fn motivation_prompt(profile: &Profile, quote_count: usize) -> String {
    format!(
        "Generate {quote_count} motivational quotes for someone who is:\n\
         - {age} years old\n\
         - {gender}\n\
         - Currently {activity}\n\
         - Goals: {goals}\n\
         \n\
         Make the quotes personal, encouraging, and action-oriented.",
        age = profile.age(),
        gender = profile.gender(),
        activity = profile.activity_level().describe(),
        goals = goals_or_default(profile),
    )
}

/// Messages for one motivation request
#[must_use]
pub fn build_motivation_messages(profile: &Profile, quote_count: usize) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(get_motivation_system_prompt().trim_end()),
        ChatMessage::user(motivation_prompt(profile, quote_count)),
    ]
}

/// Tool declaration for the motivation step (takes no arguments)
#[must_use]
pub fn motivation_tool() -> Tool {
    Tool {
        function_declarations: vec![FunctionDeclaration {
            name: MOTIVATION_TOOL_NAME.to_owned(),
            description: "Get motivational quotes tailored to the user's fitness journey"
                .to_owned(),
            parameters: Some(json!({
                "type": "object",
                "properties": {},
                "additionalProperties": false,
            })),
        }],
    }
}

/// Text of the message that hands a tool result back to the backend
#[must_use]
pub fn format_tool_result(response: &FunctionResponse) -> String {
    format!("[Tool Result for {}]: {}", response.name, response.response)
}

fn goals_or_default(profile: &Profile) -> &str {
    profile.fitness_goals().unwrap_or(DEFAULT_FITNESS_GOAL)
}
