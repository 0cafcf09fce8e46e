//! Anthropic-backed caption generator using the messages API.
//! Tried after OpenAI when both are configured, mirroring the engine's
//! backend ordering.

use super::{GenerationRequest, Generator};
use crate::error::BackendError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::trace;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";
const API_VERSION: &str = "2023-06-01";

pub struct AnthropicGenerator {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl AnthropicGenerator {
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

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl Generator for AnthropicGenerator {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn generate(&self, req: &GenerationRequest<'_>) -> Result<String, BackendError> {
        trace!("anthropic generate model={}", self.model);
        let mut body = json!({
            "model": self.model,
            "max_tokens": req.max_tokens,
            "temperature": req.temperature,
            "messages": [{
                "role": "user",
                "content": format!("{}\n\nOriginal caption: {}", req.instruction, req.input),
            }],
        });
        if !req.stop.is_empty() {
            body["stop_sequences"] = json!(req.stop);
        }
        let resp = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(BackendError::Status {
                status: resp.status().as_u16(),
            });
        }
        let value: Value = resp.json().await?;
        let content = value["content"][0]["text"]
            .as_str()
            .ok_or(BackendError::MalformedResponse)?;
        Ok(content.trim().to_string())
    }
}
