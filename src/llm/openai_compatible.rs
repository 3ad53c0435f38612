// ABOUTME: OpenAI-compatible chat completions client used as the completion backend
// ABOUTME: Adds JSON-schema response format and function tools, classifies HTTP failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # `OpenAI`-Compatible Provider
//!
//! Talks to any endpoint implementing the `OpenAI` `/chat/completions` API
//! (`OpenAI` itself, Azure-style gateways, vLLM, Ollama).
//!
//! ## Configuration
//!
//! Built from [`LlmConfig`]:
//! - `OPENAI_BASE_URL`: Base URL (default: <https://api.openai.com/v1>)
//! - `OPENAI_API_KEY`: Bearer token (optional, requests go out unauthenticated without it)
//! - `LLM_CONNECT_TIMEOUT_SECS` / `LLM_REQUEST_TIMEOUT_SECS`: client timeouts
//!
//! Failures are mapped onto `EXTERNAL_*` error codes. Nothing is retried here.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use super::{
    ChatMessage, ChatRequest, ChatResponse, ChatResponseWithTools, FunctionCall, LlmCapabilities,
    LlmProvider, ResponseSchema, TokenUsage, Tool,
};
use crate::config::LlmConfig;
use crate::errors::{AppError, ErrorCode};

/// Service label used in error messages
const SERVICE_LABEL: &str = "CompletionBackend";

/// Characters of an error body kept in messages and logs
const ERROR_BODY_PREVIEW_CHARS: usize = 200;

// ============================================================================
// API Request/Response Types (OpenAI-compatible format)
// ============================================================================

/// OpenAI-compatible API request structure
#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<OpenAiResponseFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<OpenAiTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<String>,
}

/// `response_format` block requesting JSON-schema output
#[derive(Debug, Serialize)]
struct OpenAiResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
    json_schema: OpenAiJsonSchema,
}

/// Named schema inside `response_format`
#[derive(Debug, Serialize)]
struct OpenAiJsonSchema {
    name: String,
    schema: Value,
    strict: bool,
}

impl From<&ResponseSchema> for OpenAiResponseFormat {
    fn from(schema: &ResponseSchema) -> Self {
        Self {
            format_type: "json_schema",
            json_schema: OpenAiJsonSchema {
                name: schema.name.clone(),
                schema: schema.schema.clone(),
                strict: schema.strict,
            },
        }
    }
}

/// Tool definition for OpenAI-compatible API
#[derive(Debug, Clone, Serialize)]
struct OpenAiTool {
    #[serde(rename = "type")]
    tool_type: String,
    function: OpenAiFunction,
}

/// Function definition within a tool
#[derive(Debug, Clone, Serialize)]
struct OpenAiFunction {
    name: String,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<Value>,
}

/// Message structure for OpenAI-compatible API
#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

impl From<&ChatMessage> for OpenAiMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role.as_str().to_owned(),
            content: msg.content.clone(),
        }
    }
}

/// OpenAI-compatible API response structure
#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
    model: String,
}

/// Choice in response
#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

/// Message in response
#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<OpenAiToolCall>>,
}

/// Tool call in response
#[derive(Debug, Clone, Deserialize)]
struct OpenAiToolCall {
    id: String,
    function: OpenAiFunctionCall,
}

/// Function call details in response
#[derive(Debug, Clone, Deserialize)]
struct OpenAiFunctionCall {
    name: String,
    arguments: String,
}

/// Usage statistics in response
#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    #[serde(rename = "prompt_tokens")]
    prompt: u32,
    #[serde(rename = "completion_tokens")]
    completion: u32,
    #[serde(rename = "total_tokens")]
    total: u32,
}

impl From<OpenAiUsage> for TokenUsage {
    fn from(usage: OpenAiUsage) -> Self {
        Self {
            prompt_tokens: usage.prompt,
            completion_tokens: usage.completion,
            total_tokens: usage.total,
        }
    }
}

/// Error response structure
#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

/// Error detail structure
#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

// ============================================================================
// Provider Configuration
// ============================================================================

/// Configuration for the `OpenAI`-compatible provider
#[derive(Clone)]
pub struct OpenAiCompatibleConfig {
    /// Base URL for the API (e.g., <https://api.openai.com/v1>)
    pub base_url: String,
    /// API key (optional)
    pub api_key: Option<String>,
    /// Default model to use
    pub default_model: String,
    /// Capabilities of this provider
    pub capabilities: LlmCapabilities,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Whole-request timeout
    pub request_timeout: Duration,
}

impl std::fmt::Debug for OpenAiCompatibleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatibleConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("default_model", &self.default_model)
            .field("capabilities", &self.capabilities)
            .field("connect_timeout", &self.connect_timeout)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl From<&LlmConfig> for OpenAiCompatibleConfig {
    fn from(config: &LlmConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            default_model: config.model.clone(),
            capabilities: LlmCapabilities::structured_generation(),
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Generic `OpenAI`-compatible completion provider
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: OpenAiCompatibleConfig,
}

impl OpenAiCompatibleProvider {
    /// Create a new provider with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: OpenAiCompatibleConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Create a provider from the loaded backend configuration
    ///
    /// A missing API key is accepted; the backend will reject calls instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn from_config(config: &LlmConfig) -> Result<Self, AppError> {
        let provider_config = OpenAiCompatibleConfig::from(config);
        info!(
            "Initializing completion provider: base_url={}, model={}, api_key={}",
            provider_config.base_url,
            provider_config.default_model,
            if provider_config.api_key.is_some() {
                "configured"
            } else {
                "missing"
            }
        );
        Self::new(provider_config)
    }

    /// Build the API URL for a given endpoint
    fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint
        )
    }

    /// Resolve the model for a request
    fn model_for<'a>(&'a self, request: &'a ChatRequest) -> &'a str {
        request
            .model
            .as_deref()
            .unwrap_or(&self.config.default_model)
    }

    /// Log message details for debugging backend interactions
    fn log_messages_debug(messages: &[OpenAiMessage], has_tools: bool, has_schema: bool) {
        for (i, msg) in messages.iter().enumerate() {
            debug!(
                "Message[{i}] role={}, content_len={}",
                msg.role,
                msg.content.len()
            );
        }
        debug!(
            "Sending chat completion request with {} messages, tools={has_tools}, schema={has_schema}",
            messages.len()
        );
    }

    /// Parse error response from API
    fn parse_error_response(status: StatusCode, body: &str) -> AppError {
        if let Ok(error_response) = serde_json::from_str::<OpenAiErrorResponse>(body) {
            let error_type = error_response
                .error
                .error_type
                .unwrap_or_else(|| "unknown".to_owned());
            let message = error_response.error.message;

            match status.as_u16() {
                401 | 403 => {
                    AppError::auth_invalid(format!("API authentication failed: {message}"))
                }
                429 => AppError::new(
                    ErrorCode::ExternalRateLimited,
                    Self::extract_rate_limit_message(&message),
                ),
                500..=599 => AppError::external_unavailable(
                    SERVICE_LABEL,
                    format!("Service unavailable ({status}): {message}"),
                ),
                _ => AppError::external_service(
                    SERVICE_LABEL,
                    format!("{error_type} ({status}): {message}"),
                ),
            }
        } else {
            let preview: String = body.chars().take(ERROR_BODY_PREVIEW_CHARS).collect();
            match status.as_u16() {
                401 | 403 => AppError::auth_invalid(format!("API authentication failed: {preview}")),
                429 => AppError::new(
                    ErrorCode::ExternalRateLimited,
                    Self::extract_rate_limit_message(""),
                ),
                500..=599 => AppError::external_unavailable(
                    SERVICE_LABEL,
                    format!("Service unavailable ({status}): {preview}"),
                ),
                _ => AppError::external_service(
                    SERVICE_LABEL,
                    format!("API error ({status}): {preview}"),
                ),
            }
        }
    }

    /// Extract a user-friendly rate limit message
    ///
    /// `OpenAI` rate limit errors usually embed "try again in Xs".
    fn extract_rate_limit_message(message: &str) -> String {
        let lowered = message.to_lowercase();
        if let Some(retry_pos) = lowered.find("try again in ") {
            let after_prefix = &lowered[retry_pos + "try again in ".len()..];
            let end_pos = after_prefix
                .find(|c: char| !c.is_ascii_digit() && c != '.')
                .unwrap_or(after_prefix.len());
            if let Ok(seconds) = after_prefix[..end_pos].parse::<f64>() {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let seconds_int = seconds.ceil() as u64;
                return format!(
                    "Completion backend rate limit reached. Please try again in {seconds_int} seconds."
                );
            }
        }
        "Completion backend rate limit reached. Please wait a moment and try again.".to_owned()
    }

    /// Map a transport-level reqwest failure
    fn map_send_error(&self, e: &reqwest::Error) -> AppError {
        error!("Failed to send request to completion backend: {}", e);
        if e.is_timeout() {
            AppError::external_unavailable(
                SERVICE_LABEL,
                format!(
                    "Request timed out after {}s",
                    self.config.request_timeout.as_secs()
                ),
            )
        } else if e.is_connect() {
            AppError::external_unavailable(
                SERVICE_LABEL,
                format!("Cannot connect to {}", self.config.base_url),
            )
        } else {
            AppError::external_service(SERVICE_LABEL, format!("Failed to send request: {e}"))
        }
    }

    /// Convert internal Tool format to OpenAI-compatible format
    fn convert_tools(tools: &[Tool]) -> Vec<OpenAiTool> {
        tools
            .iter()
            .flat_map(|tool| {
                tool.function_declarations.iter().map(|func| OpenAiTool {
                    tool_type: "function".to_owned(),
                    function: OpenAiFunction {
                        name: func.name.clone(),
                        description: func.description.clone(),
                        parameters: func.parameters.clone(),
                    },
                })
            })
            .collect()
    }

    /// Convert tool calls to internal `FunctionCall` format
    ///
    /// Unparseable arguments become `null`; the caller decides whether the
    /// call is acceptable.
    fn convert_tool_calls(tool_calls: &[OpenAiToolCall]) -> Vec<FunctionCall> {
        tool_calls
            .iter()
            .map(|call| {
                debug!(
                    tool_call_id = %call.id,
                    function_name = %call.function.name,
                    "Converting tool call to FunctionCall"
                );
                let args: Value =
                    serde_json::from_str(&call.function.arguments).unwrap_or_default();
                FunctionCall {
                    name: call.function.name.clone(),
                    args,
                }
            })
            .collect()
    }

    /// Add authorization header if API key is configured
    fn add_auth_header(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(ref api_key) = self.config.api_key {
            request.header("Authorization", format!("Bearer {api_key}"))
        } else {
            request
        }
    }

    /// Build the wire request
    fn build_request(&self, request: &ChatRequest, tools: Option<&[Tool]>) -> OpenAiRequest {
        let messages: Vec<OpenAiMessage> = request.messages.iter().map(OpenAiMessage::from).collect();
        Self::log_messages_debug(
            &messages,
            tools.is_some(),
            request.response_schema.is_some(),
        );

        OpenAiRequest {
            model: self.model_for(request).to_owned(),
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: request
                .response_schema
                .as_ref()
                .map(OpenAiResponseFormat::from),
            tools: tools.map(Self::convert_tools),
            tool_choice: tools.map(|_| "auto".to_owned()),
        }
    }

    /// Send a chat completion and return the first choice
    async fn send_chat(
        &self,
        openai_request: &OpenAiRequest,
    ) -> Result<(OpenAiChoice, String, Option<TokenUsage>), AppError> {
        let http_request = self
            .client
            .post(self.api_url("chat/completions"))
            .header("Content-Type", "application/json")
            .json(openai_request);

        let response = self
            .add_auth_header(http_request)
            .send()
            .await
            .map_err(|e| self.map_send_error(&e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read API response: {}", e);
            AppError::external_service(SERVICE_LABEL, format!("Failed to read response: {e}"))
        })?;

        if !status.is_success() {
            warn!("Completion backend returned {}", status);
            return Err(Self::parse_error_response(status, &body));
        }

        let openai_response: OpenAiResponse = serde_json::from_str(&body).map_err(|e| {
            error!(
                "Failed to parse API response: {} - body: {}",
                e,
                body.chars().take(ERROR_BODY_PREVIEW_CHARS).collect::<String>()
            );
            AppError::external_service(SERVICE_LABEL, format!("Failed to parse response: {e}"))
        })?;

        let usage = openai_response.usage.map(TokenUsage::from);
        let choice = openai_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::external_service(SERVICE_LABEL, "API returned no choices"))?;

        Ok((choice, openai_response.model, usage))
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn display_name(&self) -> &'static str {
        "OpenAI Compatible"
    }

    fn capabilities(&self) -> LlmCapabilities {
        self.config.capabilities
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    #[instrument(skip(self, request), fields(model = %self.model_for(request)))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let openai_request = self.build_request(request, None);
        let (choice, model, usage) = self.send_chat(&openai_request).await?;

        let content = choice.message.content.unwrap_or_default();
        debug!(
            "Received response: {} chars, finish_reason: {:?}",
            content.len(),
            choice.finish_reason
        );

        Ok(ChatResponse {
            content,
            model,
            usage,
            finish_reason: choice.finish_reason,
        })
    }

    #[instrument(skip(self, request, tools), fields(model = %self.model_for(request)))]
    async fn complete_with_tools(
        &self,
        request: &ChatRequest,
        tools: Option<Vec<Tool>>,
    ) -> Result<ChatResponseWithTools, AppError> {
        let openai_request = self.build_request(request, tools.as_deref());
        let (choice, model, usage) = self.send_chat(&openai_request).await?;

        let content = choice.message.content;
        let function_calls = choice.message.tool_calls.map(|calls| {
            info!("Completion backend returned {} tool calls", calls.len());
            Self::convert_tool_calls(&calls)
        });

        debug!(
            "Received response: content={:?}, tool_calls={:?}, finish_reason: {:?}",
            content.as_ref().map(String::len),
            function_calls.as_ref().map(Vec::len),
            choice.finish_reason
        );

        Ok(ChatResponseWithTools {
            content,
            function_calls,
            model,
            usage,
            finish_reason: choice.finish_reason,
        })
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<bool, AppError> {
        debug!("Performing completion backend health check at {}", self.config.base_url);

        let http_request = self.client.get(self.api_url("models"));
        let response = self
            .add_auth_header(http_request)
            .send()
            .await
            .map_err(|e| self.map_send_error(&e))?;

        let healthy = response.status().is_success();
        if healthy {
            debug!("Completion backend health check passed");
        } else {
            warn!(
                "Completion backend health check failed with status: {}",
                response.status()
            );
        }

        Ok(healthy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_message_extracts_seconds() {
        let message = OpenAiCompatibleProvider::extract_rate_limit_message(
            "Rate limit reached for gpt-4. Please try again in 6.5s.",
        );
        assert_eq!(
            message,
            "Completion backend rate limit reached. Please try again in 7 seconds."
        );
    }

    #[test]
    fn test_rate_limit_message_fallback() {
        let message = OpenAiCompatibleProvider::extract_rate_limit_message("slow down");
        assert!(message.contains("wait a moment"));
    }

    #[test]
    fn test_error_classification() {
        let auth = OpenAiCompatibleProvider::parse_error_response(
            StatusCode::UNAUTHORIZED,
            r#"{"error":{"message":"Incorrect API key","type":"invalid_request_error"}}"#,
        );
        assert_eq!(auth.code, ErrorCode::ExternalAuthFailed);

        let unavailable =
            OpenAiCompatibleProvider::parse_error_response(StatusCode::BAD_GATEWAY, "<html>");
        assert_eq!(unavailable.code, ErrorCode::ExternalServiceUnavailable);

        let rejected = OpenAiCompatibleProvider::parse_error_response(
            StatusCode::BAD_REQUEST,
            r#"{"error":{"message":"Invalid schema","type":"invalid_request_error"}}"#,
        );
        assert_eq!(rejected.code, ErrorCode::ExternalServiceError);
    }

    #[test]
    fn test_response_format_serialization() {
        let schema = ResponseSchema::strict("fitness_report", serde_json::json!({"type": "object"}));
        let format = serde_json::to_value(OpenAiResponseFormat::from(&schema)).unwrap();
        assert_eq!(format["type"], "json_schema");
        assert_eq!(format["json_schema"]["name"], "fitness_report");
        assert_eq!(format["json_schema"]["strict"], true);
    }
}
