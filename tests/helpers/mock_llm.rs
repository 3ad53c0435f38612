// ABOUTME: Scripted completion provider for exercising generation without a network backend
// ABOUTME: Replays queued responses and records every request for later assertions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};
use workout_agent::errors::AppError;
use workout_agent::llm::{
    ChatRequest, ChatResponse, ChatResponseWithTools, FunctionCall, LlmCapabilities, LlmProvider,
    Tool,
};
use workout_agent::models::{ActivityLevel, Profile};

/// Which trait method a recorded call went through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// `complete` (the motivation step)
    Complete,
    /// `complete_with_tools` (report requests)
    CompleteWithTools,
}

/// One request seen by the mock
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub kind: CallKind,
    pub request: ChatRequest,
    pub tools: Option<Vec<Tool>>,
}

/// Completion provider that replays scripted answers
///
/// Report requests (`complete_with_tools`) and motivation requests
/// (`complete`) draw from separate queues. An exhausted queue answers with an
/// internal error so a test that makes more calls than expected fails loudly.
#[derive(Default)]
pub struct MockLlmProvider {
    report_responses: Mutex<VecDeque<Result<ChatResponseWithTools, AppError>>>,
    motivation_responses: Mutex<VecDeque<Result<ChatResponse, AppError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockLlmProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a plain-text report answer
    pub fn push_report_text(&self, text: impl Into<String>) -> &Self {
        self.report_responses
            .lock()
            .unwrap()
            .push_back(Ok(text_response(text.into())));
        self
    }

    /// Queue a report answer that calls tools instead of answering
    pub fn push_tool_calls(&self, names: &[&str]) -> &Self {
        let calls = names
            .iter()
            .map(|name| FunctionCall {
                name: (*name).to_owned(),
                args: json!({}),
            })
            .collect();
        self.report_responses
            .lock()
            .unwrap()
            .push_back(Ok(ChatResponseWithTools {
                content: None,
                function_calls: Some(calls),
                model: "mock-report".to_owned(),
                usage: None,
                finish_reason: Some("tool_calls".to_owned()),
            }));
        self
    }

    /// Queue a failing report request
    pub fn push_report_error(&self, error: AppError) -> &Self {
        self.report_responses.lock().unwrap().push_back(Err(error));
        self
    }

    /// Queue a motivation answer
    pub fn push_motivation_text(&self, text: impl Into<String>) -> &Self {
        self.motivation_responses
            .lock()
            .unwrap()
            .push_back(Ok(ChatResponse {
                content: text.into(),
                model: "mock-motivation".to_owned(),
                usage: None,
                finish_reason: Some("stop".to_owned()),
            }));
        self
    }

    /// Queue a failing motivation request
    pub fn push_motivation_error(&self, error: AppError) -> &Self {
        self.motivation_responses
            .lock()
            .unwrap()
            .push_back(Err(error));
        self
    }

    /// Every request received so far, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of requests received so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, kind: CallKind, request: &ChatRequest, tools: Option<Vec<Tool>>) {
        self.calls.lock().unwrap().push(RecordedCall {
            kind,
            request: request.clone(),
            tools,
        });
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn display_name(&self) -> &'static str {
        "Mock Provider"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::structured_generation()
    }

    fn default_model(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.record(CallKind::Complete, request, None);
        self.motivation_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::internal("mock motivation script exhausted")))
    }

    async fn complete_with_tools(
        &self,
        request: &ChatRequest,
        tools: Option<Vec<Tool>>,
    ) -> Result<ChatResponseWithTools, AppError> {
        self.record(CallKind::CompleteWithTools, request, tools);
        self.report_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::internal("mock report script exhausted")))
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        Ok(true)
    }
}

fn text_response(text: String) -> ChatResponseWithTools {
    ChatResponseWithTools {
        content: Some(text),
        function_calls: None,
        model: "mock-report".to_owned(),
        usage: None,
        finish_reason: Some("stop".to_owned()),
    }
}

/// Profile used throughout the tests: 30 year old moderately active male
pub fn sample_profile() -> Profile {
    Profile::new(
        30,
        70.0,
        175.0,
        "male",
        ActivityLevel::ModeratelyActive,
        Some("build muscle".to_owned()),
    )
    .unwrap()
}

/// A report that satisfies every contract check
pub fn valid_report(quote: &str) -> Value {
    json!({
        "workout_plan": [
            {
                "name": "Goblet Squat",
                "sets": 3,
                "reps": 12,
                "rest_time": 60,
                "instructions": "Keep your chest up"
            }
        ],
        "nutrition_plan": [
            {
                "name": "Oatmeal with berries",
                "calories": 350,
                "protein": 12.0,
                "carbs": 60.0,
                "fats": 6.5,
                "timing": "breakfast",
                "ingredients": ["oats", "blueberries", "milk"]
            }
        ],
        "daily_calories": 2556,
        "motivational_quote": quote,
        "recommendations": ["Sleep at least 7 hours"]
    })
}

/// [`valid_report`] rendered as backend output text
pub fn valid_report_text(quote: &str) -> String {
    valid_report(quote).to_string()
}
