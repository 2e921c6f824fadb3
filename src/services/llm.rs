// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client for an OpenAI-compatible chat-completions API.
//!
//! Every failure (no key configured, transport, non-2xx, empty reply) is an
//! `UpstreamService` error carrying a message for the caller. There are no
//! retries.

use crate::config::Config;
use crate::error::AppError;
use serde::{Deserialize, Serialize};

const TEMPERATURE: f32 = 0.7;

/// One message of a chat conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// "system", "user" or "assistant"
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// LLM API client.
#[derive(Clone)]
pub struct LlmClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl LlmClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.is_empty()),
            model: model.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.llm_base_url.clone(),
            config.llm_api_key.clone(),
            config.llm_model.clone(),
        )
    }

    /// Send `messages` and return the text of the first choice.
    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        max_tokens: u32,
    ) -> Result<String, AppError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AppError::UpstreamService("OPENAI_API_KEY is not configured".to_string())
        })?;

        let url = format!("{}/chat/completions", self.base_url);
        let body = CompletionRequest {
            model: &self.model,
            messages,
            temperature: TEMPERATURE,
            max_tokens,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::UpstreamService(format!("LLM request failed: {}", e)))?;

        let completion: CompletionResponse = self.check_response_json(response).await?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| AppError::UpstreamService("LLM returned an empty reply".to_string()))?;

        tracing::debug!(model = %self.model, chars = content.len(), "LLM completion received");
        Ok(content)
    }

    /// Check response status and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                tracing::warn!("LLM rate limit hit (429)");
            }

            let message = format!("HTTP {}: {}", status, body);
            return Err(AppError::UpstreamService(message));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::UpstreamService(format!("JSON parse error: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn reply(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        })
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(serde_json::json!({
                "model": "test-model",
                "max_tokens": 50
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(reply("Drink water")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let base_url = format!("{}/", server.uri());
        let client = LlmClient::new(base_url, Some("sk-test".into()), "test-model");
        let text = client
            .complete(&[ChatMessage::user("hi")], 50)
            .await
            .unwrap();

        assert_eq!(text, "Drink water");
    }

    #[tokio::test]
    async fn test_missing_key_is_upstream_error() {
        let client = LlmClient::new("http://127.0.0.1:9", Some(String::new()), "m");
        let err = client.complete(&[], 10).await.unwrap_err();

        match err {
            AppError::UpstreamService(msg) => assert!(msg.contains("OPENAI_API_KEY")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_error_status_carries_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(500).set_body_string("model overloaded"),
            )
            .mount(&server)
            .await;

        let client = LlmClient::new(server.uri(), Some("k".into()), "m");
        let err = client
            .complete(&[ChatMessage::user("hi")], 10)
            .await
            .unwrap_err();

        match err {
            AppError::UpstreamService(msg) => assert!(msg.contains("model overloaded")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_reply_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })),
            )
            .mount(&server)
            .await;

        let client = LlmClient::new(server.uri(), Some("k".into()), "m");
        assert!(matches!(
            client.complete(&[ChatMessage::user("hi")], 10).await,
            Err(AppError::UpstreamService(_))
        ));
    }
}
