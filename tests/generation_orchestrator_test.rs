// ABOUTME: Integration tests for the fitness report orchestrator
// ABOUTME: Covers retries, the motivation tool round trip and transport failure handling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod helpers;

use std::sync::Arc;

use helpers::mock_llm::{sample_profile, valid_report, valid_report_text, CallKind, MockLlmProvider};
use serde_json::json;
use workout_agent::errors::{AppError, ErrorCode};
use workout_agent::generation::{FitnessReportOrchestrator, GenerationError, MotivationGenerator};
use workout_agent::llm::{LlmProvider, MessageRole};

// ============================================================================
// Test Helpers
// ============================================================================

fn orchestrator(mock: &Arc<MockLlmProvider>, max_attempts: u32) -> FitnessReportOrchestrator {
    let provider: Arc<dyn LlmProvider> = mock.clone();
    let motivation = MotivationGenerator::new(Arc::clone(&provider), "motivation-model", None, 5);
    FitnessReportOrchestrator::new(provider, motivation, "report-model", Some(0.7), max_attempts)
}

fn empty_workout_plan() -> String {
    let mut report = valid_report("Keep going");
    report["workout_plan"] = json!([]);
    report.to_string()
}

// ============================================================================
// Successful Generation
// ============================================================================

#[tokio::test]
async fn test_valid_output_on_first_attempt() {
    let mock = Arc::new(MockLlmProvider::new());
    mock.push_report_text(valid_report_text("Every rep counts"));

    let report = orchestrator(&mock, 3)
        .generate_report(&sample_profile())
        .await
        .unwrap();

    assert_eq!(report.motivational_quote, "Every rep counts");
    assert_eq!(report.workout_plan[0].name, "Goblet Squat");
    assert_eq!(report.daily_calories, 2556);
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn test_report_request_carries_schema_model_and_tool() {
    let mock = Arc::new(MockLlmProvider::new());
    mock.push_report_text(valid_report_text("Every rep counts"));

    orchestrator(&mock, 3)
        .generate_report(&sample_profile())
        .await
        .unwrap();

    let calls = mock.calls();
    let request = &calls[0].request;
    assert_eq!(calls[0].kind, CallKind::CompleteWithTools);
    assert_eq!(request.model.as_deref(), Some("report-model"));
    assert_eq!(request.temperature, Some(0.7));
    assert_eq!(request.max_tokens, Some(2000));
    assert_eq!(
        request.response_schema.as_ref().map(|s| s.name.as_str()),
        Some("fitness_report")
    );

    assert_eq!(request.messages.len(), 2);
    assert_eq!(request.messages[0].role, MessageRole::System);
    assert!(request.messages[0].content.contains("- Age: 30 years"));
    assert!(request.messages[0].content.contains("- Fitness goals: build muscle"));
    assert_eq!(request.messages[1].role, MessageRole::User);

    let tools = calls[0].tools.as_ref().unwrap();
    assert_eq!(tools[0].function_declarations[0].name, "get_motivation");
}

#[tokio::test]
async fn test_fenced_output_is_accepted() {
    let mock = Arc::new(MockLlmProvider::new());
    mock.push_report_text(format!(
        "Here is your plan:\n```json\n{}\n```",
        valid_report_text("Stay consistent")
    ));

    let report = orchestrator(&mock, 1)
        .generate_report(&sample_profile())
        .await
        .unwrap();
    assert_eq!(report.motivational_quote, "Stay consistent");
}

// ============================================================================
// Motivation Tool Round Trip
// ============================================================================

#[tokio::test]
async fn test_tool_call_runs_motivation_then_follow_up() {
    let mock = Arc::new(MockLlmProvider::new());
    mock.push_tool_calls(&["get_motivation"])
        .push_motivation_text(r#"{"quotes": ["Strong today, stronger tomorrow", "Show up"]}"#)
        .push_report_text(valid_report_text("Strong today, stronger tomorrow"));

    let report = orchestrator(&mock, 3)
        .generate_report(&sample_profile())
        .await
        .unwrap();
    assert_eq!(report.motivational_quote, "Strong today, stronger tomorrow");

    let calls = mock.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0].kind, CallKind::CompleteWithTools);
    assert_eq!(calls[1].kind, CallKind::Complete);
    assert_eq!(calls[2].kind, CallKind::CompleteWithTools);

    let motivation = &calls[1].request;
    assert_eq!(motivation.model.as_deref(), Some("motivation-model"));
    assert_eq!(motivation.max_tokens, Some(500));
    assert_eq!(
        motivation.response_schema.as_ref().map(|s| s.name.as_str()),
        Some("motivation_batch")
    );
    assert!(motivation.messages[1]
        .content
        .starts_with("Generate 5 motivational quotes for someone who is:"));

    let follow_up = &calls[2];
    assert!(follow_up.tools.is_none());
    assert_eq!(follow_up.request.messages.len(), 3);
    assert_eq!(
        follow_up.request.messages[2].content,
        r#"[Tool Result for get_motivation]: {"quotes":["Strong today, stronger tomorrow","Show up"]}"#
    );
}

#[tokio::test]
async fn test_repeated_tool_calls_share_one_motivation_batch() {
    let mock = Arc::new(MockLlmProvider::new());
    mock.push_tool_calls(&["get_motivation", "get_motivation"])
        .push_motivation_text(r#"{"quotes": ["Show up"]}"#)
        .push_report_text(valid_report_text("Show up"));

    orchestrator(&mock, 3)
        .generate_report(&sample_profile())
        .await
        .unwrap();

    let calls = mock.calls();
    let motivation_calls = calls
        .iter()
        .filter(|call| call.kind == CallKind::Complete)
        .count();
    assert_eq!(motivation_calls, 1);
    assert_eq!(calls[2].request.messages.len(), 4);
}

#[tokio::test]
async fn test_empty_motivation_batch_invalidates_attempt() {
    let mock = Arc::new(MockLlmProvider::new());
    mock.push_tool_calls(&["get_motivation"])
        .push_motivation_text(r#"{"quotes": ["  "]}"#);

    let error = orchestrator(&mock, 1)
        .generate_report(&sample_profile())
        .await
        .unwrap_err();

    match error {
        GenerationError::Validation {
            attempts,
            diagnostic,
            last_output,
        } => {
            assert_eq!(attempts, 1);
            assert!(diagnostic.contains("get_motivation"));
            assert_eq!(last_output.as_deref(), Some(r#"{"quotes": ["  "]}"#));
        }
        GenerationError::Transport { .. } => panic!("expected a validation failure"),
    }
    assert_eq!(mock.call_count(), 2);
}

#[tokio::test]
async fn test_unparseable_motivation_answer_is_kept_as_last_output() {
    let mock = Arc::new(MockLlmProvider::new());
    mock.push_tool_calls(&["get_motivation"])
        .push_motivation_text("Stay strong!")
        .push_tool_calls(&["get_motivation"])
        .push_motivation_text(r#"{"quotes": "not a list"}"#);

    let error = orchestrator(&mock, 2)
        .generate_report(&sample_profile())
        .await
        .unwrap_err();

    match error {
        GenerationError::Validation { last_output, .. } => {
            assert_eq!(last_output.as_deref(), Some(r#"{"quotes": "not a list"}"#));
        }
        GenerationError::Transport { .. } => panic!("expected a validation failure"),
    }
    assert_eq!(mock.call_count(), 4);
}

#[tokio::test]
async fn test_motivation_transport_failure_is_not_retried() {
    let mock = Arc::new(MockLlmProvider::new());
    mock.push_tool_calls(&["get_motivation"])
        .push_motivation_error(AppError::external_unavailable(
            "CompletionBackend",
            "request timed out",
        ));

    let error = orchestrator(&mock, 3)
        .generate_report(&sample_profile())
        .await
        .unwrap_err();

    assert!(error.is_transport());
    assert_eq!(mock.call_count(), 2);
}

#[tokio::test]
async fn test_unknown_tool_invalidates_attempt() {
    let mock = Arc::new(MockLlmProvider::new());
    mock.push_tool_calls(&["get_weather"]);

    let error = orchestrator(&mock, 1)
        .generate_report(&sample_profile())
        .await
        .unwrap_err();

    match error {
        GenerationError::Validation { diagnostic, .. } => {
            assert!(diagnostic.contains("get_weather"));
        }
        GenerationError::Transport { .. } => panic!("expected a validation failure"),
    }
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn test_second_tool_round_invalidates_attempt() {
    let mock = Arc::new(MockLlmProvider::new());
    mock.push_tool_calls(&["get_motivation"])
        .push_motivation_text(r#"{"quotes": ["Show up"]}"#)
        .push_tool_calls(&["get_motivation"]);

    let error = orchestrator(&mock, 1)
        .generate_report(&sample_profile())
        .await
        .unwrap_err();

    assert_eq!(error.kind(), "validation");
    assert_eq!(mock.call_count(), 3);
}

// ============================================================================
// Retry Policy
// ============================================================================

#[tokio::test]
async fn test_invalid_output_exhausts_attempts() {
    let mock = Arc::new(MockLlmProvider::new());
    mock.push_report_text("I cannot help with that.")
        .push_report_text(empty_workout_plan())
        .push_report_text("not json");

    let error = orchestrator(&mock, 3)
        .generate_report(&sample_profile())
        .await
        .unwrap_err();

    match error {
        GenerationError::Validation {
            attempts,
            last_output,
            ..
        } => {
            assert_eq!(attempts, 3);
            assert_eq!(last_output.as_deref(), Some("not json"));
        }
        GenerationError::Transport { .. } => panic!("expected a validation failure"),
    }
    assert_eq!(mock.call_count(), 3);
}

#[tokio::test]
async fn test_invalid_then_valid_succeeds() {
    let mock = Arc::new(MockLlmProvider::new());
    mock.push_report_text(empty_workout_plan())
        .push_report_text(valid_report_text("Second time lucky"));

    let report = orchestrator(&mock, 3)
        .generate_report(&sample_profile())
        .await
        .unwrap();

    assert_eq!(report.motivational_quote, "Second time lucky");
    assert_eq!(mock.call_count(), 2);
}

#[tokio::test]
async fn test_out_of_range_field_triggers_retry() {
    let mut zero_sets = valid_report("Keep going");
    zero_sets["workout_plan"][0]["sets"] = json!(0);

    let mock = Arc::new(MockLlmProvider::new());
    mock.push_report_text(zero_sets.to_string())
        .push_report_text(valid_report_text("Keep going"));

    orchestrator(&mock, 2)
        .generate_report(&sample_profile())
        .await
        .unwrap();
    assert_eq!(mock.call_count(), 2);
}

#[tokio::test]
async fn test_every_attempt_starts_from_the_same_context() {
    let mock = Arc::new(MockLlmProvider::new());
    mock.push_tool_calls(&["get_motivation"])
        .push_motivation_text(r#"{"quotes": ["First batch"]}"#)
        .push_report_text("not json")
        .push_tool_calls(&["get_motivation"])
        .push_motivation_text(r#"{"quotes": ["Second batch"]}"#)
        .push_report_text(valid_report_text("Second batch"));

    orchestrator(&mock, 3)
        .generate_report(&sample_profile())
        .await
        .unwrap();

    let calls = mock.calls();
    assert_eq!(calls.len(), 6);
    assert_eq!(calls[0].request.messages, calls[3].request.messages);
    assert_eq!(calls[0].request.messages.len(), 2);

    let motivation_calls = calls
        .iter()
        .filter(|call| call.kind == CallKind::Complete)
        .count();
    assert_eq!(motivation_calls, 2);
    assert!(calls[5].request.messages[2].content.contains("Second batch"));
    assert!(!calls[5].request.messages[2].content.contains("First batch"));
}

#[tokio::test]
async fn test_transport_failure_is_not_retried() {
    let mock = Arc::new(MockLlmProvider::new());
    mock.push_report_error(AppError::new(ErrorCode::ExternalRateLimited, "slow down"))
        .push_report_text(valid_report_text("never reached"));

    let error = orchestrator(&mock, 3)
        .generate_report(&sample_profile())
        .await
        .unwrap_err();

    match error {
        GenerationError::Transport { source } => {
            assert_eq!(source.code, ErrorCode::ExternalRateLimited);
        }
        GenerationError::Validation { .. } => panic!("expected a transport failure"),
    }
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn test_transport_failure_after_invalid_attempt() {
    let mock = Arc::new(MockLlmProvider::new());
    mock.push_report_text("not json").push_report_error(
        AppError::external_unavailable("CompletionBackend", "connection refused"),
    );

    let error = orchestrator(&mock, 3)
        .generate_report(&sample_profile())
        .await
        .unwrap_err();

    assert!(error.is_transport());
    assert_eq!(mock.call_count(), 2);
}

#[tokio::test]
async fn test_zero_attempts_is_raised_to_one() {
    let mock = Arc::new(MockLlmProvider::new());
    mock.push_report_text("not json");

    let orchestrator = orchestrator(&mock, 0);
    assert_eq!(orchestrator.max_attempts(), 1);

    let error = orchestrator
        .generate_report(&sample_profile())
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        GenerationError::Validation { attempts: 1, .. }
    ));
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn test_concurrent_generations_share_one_orchestrator() {
    let mock = Arc::new(MockLlmProvider::new());
    mock.push_report_text(valid_report_text("Same quote"))
        .push_report_text(valid_report_text("Same quote"));

    let orchestrator = orchestrator(&mock, 1);
    let profile = sample_profile();
    let (first, second) = tokio::join!(
        orchestrator.generate_report(&profile),
        orchestrator.generate_report(&profile)
    );

    assert_eq!(first.unwrap(), second.unwrap());
    assert_eq!(mock.call_count(), 2);
}
