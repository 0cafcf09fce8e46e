//! OpenAI-backed caption generator using the chat completions API.

use super::{GenerationRequest, Generator};
use crate::error::BackendError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::trace;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Generator that delegates to an OpenAI-compatible chat endpoint.
pub struct OpenAiGenerator {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiGenerator {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point at a different endpoint, mainly for tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn post_chat(&self, body: Value) -> Result<Value, BackendError> {
        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(BackendError::Status {
                status: resp.status().as_u16(),
            });
        }
        Ok(resp.json().await?)
    }
}

#[async_trait]
impl Generator for OpenAiGenerator {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn generate(&self, req: &GenerationRequest<'_>) -> Result<String, BackendError> {
        trace!("openai generate model={} len={}", self.model, req.input.len());
        let mut body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": req.instruction},
                {"role": "user", "content": req.input},
            ],
            "max_tokens": req.max_tokens,
            "temperature": req.temperature,
        });
        if !req.stop.is_empty() {
            body["stop"] = json!(req.stop);
        }
        let value = self.post_chat(body).await?;
        let content = value["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(BackendError::MalformedResponse)?;
        Ok(content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn sends_prompt_and_reads_content() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/chat/completions")
                .header("authorization", "Bearer test-key")
                .body_contains("Talk like a pirate")
                .body_contains("hello you");
            then.status(200).json_body(serde_json::json!({
                "choices": [{"message": {"content": "Arr! ahoy ye!  "}}]
            }));
        });

        let gen = OpenAiGenerator::new("test-key").with_base_url(server.base_url());
        let req = GenerationRequest {
            instruction: "Talk like a pirate",
            input: "hello you",
            max_tokens: 200,
            temperature: 0.7,
            stop: &[],
        };
        let out = gen.generate(&req).await.unwrap();
        mock.assert_async().await;
        assert_eq!(out, "Arr! ahoy ye!");
    }

    #[tokio::test]
    async fn surfaces_http_status_errors() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(429);
        });

        let gen = OpenAiGenerator::new("test-key").with_base_url(server.base_url());
        let req = GenerationRequest {
            instruction: "x",
            input: "y",
            max_tokens: 10,
            temperature: 0.0,
            stop: &[],
        };
        let err = gen.generate(&req).await.unwrap_err();
        assert!(matches!(err, BackendError::Status { status: 429 }));
    }

    #[tokio::test]
    async fn rejects_responses_without_content() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200).json_body(serde_json::json!({"choices": []}));
        });

        let gen = OpenAiGenerator::new("test-key").with_base_url(server.base_url());
        let req = GenerationRequest {
            instruction: "x",
            input: "y",
            max_tokens: 10,
            temperature: 0.0,
            stop: &[],
        };
        let err = gen.generate(&req).await.unwrap_err();
        assert!(matches!(err, BackendError::MalformedResponse));
    }
}
