// ABOUTME: HTTP-level tests for the OpenAI-compatible completion client
// ABOUTME: Uses a local mockito server to check request shape, tool call parsing and error mapping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::time::Duration;

use mockito::{Matcher, Server};
use serde_json::json;
use workout_agent::errors::ErrorCode;
use workout_agent::generation::context::motivation_tool;
use workout_agent::generation::schema::report_schema;
use workout_agent::llm::{
    ChatMessage, ChatRequest, LlmCapabilities, LlmProvider, OpenAiCompatibleConfig,
    OpenAiCompatibleProvider,
};

// ============================================================================
// Test Helpers
// ============================================================================

fn provider(base_url: &str, api_key: Option<&str>) -> OpenAiCompatibleProvider {
    OpenAiCompatibleProvider::new(OpenAiCompatibleConfig {
        base_url: base_url.to_owned(),
        api_key: api_key.map(str::to_owned),
        default_model: "default-model".to_owned(),
        capabilities: LlmCapabilities::structured_generation(),
        connect_timeout: Duration::from_secs(2),
        request_timeout: Duration::from_secs(5),
    })
    .unwrap()
}

fn request() -> ChatRequest {
    ChatRequest::new(vec![
        ChatMessage::system("You are a coach"),
        ChatMessage::user("Plan my week"),
    ])
}

fn completion_body(message: serde_json::Value, finish_reason: &str) -> String {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "model": "gpt-test",
        "choices": [
            { "index": 0, "message": message, "finish_reason": finish_reason }
        ],
        "usage": { "prompt_tokens": 12, "completion_tokens": 34, "total_tokens": 46 }
    })
    .to_string()
}

// ============================================================================
// Successful Completions
// ============================================================================

#[tokio::test]
async fn test_complete_sends_schema_and_parses_content() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::PartialJson(json!({
            "model": "gpt-test",
            "max_tokens": 2000,
            "messages": [
                { "role": "system", "content": "You are a coach" },
                { "role": "user", "content": "Plan my week" }
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": { "name": "fitness_report", "strict": true }
            }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(
            json!({ "role": "assistant", "content": "{\"ok\": true}" }),
            "stop",
        ))
        .create_async()
        .await;

    let response = provider(&server.url(), Some("test-key"))
        .complete(
            &request()
                .with_model("gpt-test")
                .with_max_tokens(2000)
                .with_response_schema(report_schema()),
        )
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response.content, "{\"ok\": true}");
    assert_eq!(response.model, "gpt-test");
    assert_eq!(response.finish_reason.as_deref(), Some("stop"));
    assert_eq!(response.usage.unwrap().total_tokens, 46);
}

#[tokio::test]
async fn test_default_model_used_when_request_has_none() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({ "model": "default-model" })))
        .with_status(200)
        .with_body(completion_body(
            json!({ "role": "assistant", "content": "hi" }),
            "stop",
        ))
        .create_async()
        .await;

    provider(&server.url(), None)
        .complete(&request())
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_complete_with_tools_offers_and_parses_tool_calls() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({
            "tool_choice": "auto",
            "tools": [
                { "type": "function", "function": { "name": "get_motivation" } }
            ]
        })))
        .with_status(200)
        .with_body(completion_body(
            json!({
                "role": "assistant",
                "content": null,
                "tool_calls": [
                    {
                        "id": "call_1",
                        "type": "function",
                        "function": { "name": "get_motivation", "arguments": "{}" }
                    }
                ]
            }),
            "tool_calls",
        ))
        .create_async()
        .await;

    let response = provider(&server.url(), Some("test-key"))
        .complete_with_tools(&request(), Some(vec![motivation_tool()]))
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(response.has_function_calls());
    assert!(response.text().is_none());
    let calls = response.function_calls.unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].name, "get_motivation");
    assert_eq!(calls[0].args, json!({}));
}

// ============================================================================
// Error Mapping
// ============================================================================

#[tokio::test]
async fn test_unauthorized_maps_to_auth_failure() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_body(
            json!({ "error": { "message": "Incorrect API key provided", "type": "invalid_request_error" } })
                .to_string(),
        )
        .create_async()
        .await;

    let error = provider(&server.url(), Some("bad-key"))
        .complete(&request())
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::ExternalAuthFailed);
    assert!(error.message.contains("Incorrect API key"));
}

#[tokio::test]
async fn test_rate_limit_maps_with_retry_hint() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(429)
        .with_body(
            json!({ "error": { "message": "Rate limit reached. Please try again in 20s.", "type": "requests" } })
                .to_string(),
        )
        .create_async()
        .await;

    let error = provider(&server.url(), None)
        .complete(&request())
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::ExternalRateLimited);
    assert!(error.message.contains("20 seconds"));
}

#[tokio::test]
async fn test_server_error_maps_to_unavailable() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(503)
        .with_body("upstream overloaded")
        .create_async()
        .await;

    let error = provider(&server.url(), None)
        .complete(&request())
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::ExternalServiceUnavailable);
    assert!(error.message.contains("upstream overloaded"));
}

#[tokio::test]
async fn test_unparseable_success_body_is_service_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body("<html>not an api</html>")
        .create_async()
        .await;

    let error = provider(&server.url(), None)
        .complete(&request())
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ExternalServiceError);
}

#[tokio::test]
async fn test_empty_choices_is_service_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(json!({ "model": "gpt-test", "choices": [] }).to_string())
        .create_async()
        .await;

    let error = provider(&server.url(), None)
        .complete(&request())
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ExternalServiceError);
    assert!(error.message.contains("no choices"));
}

#[tokio::test]
async fn test_connection_refused_maps_to_unavailable() {
    let error = provider("http://127.0.0.1:1", None)
        .complete(&request())
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ExternalServiceUnavailable);
}

// ============================================================================
// Health Check
// ============================================================================

#[tokio::test]
async fn test_health_check_reports_status() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/models")
        .with_status(200)
        .with_body(json!({ "data": [] }).to_string())
        .create_async()
        .await;

    assert!(provider(&server.url(), Some("test-key"))
        .health_check()
        .await
        .unwrap());
}

#[tokio::test]
async fn test_health_check_false_on_rejection() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/models")
        .with_status(401)
        .create_async()
        .await;

    assert!(!provider(&server.url(), Some("bad-key"))
        .health_check()
        .await
        .unwrap());
}
