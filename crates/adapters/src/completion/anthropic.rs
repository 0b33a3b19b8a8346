//! Anthropic Messages API adapter

use async_trait::async_trait;
use offerbase_domain::{CompletionClient, CompletionError, CompletionRequest, CompletionResponse};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::CompletionConfig;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic completion client using the Messages API
pub struct AnthropicCompletion {
    client: Client,
    api_key: SecretString,
    base_url: String,
    config: CompletionConfig,
}

impl AnthropicCompletion {
    pub fn new(api_key: SecretString, config: CompletionConfig) -> Self {
        Self::with_base_url(api_key, "https://api.anthropic.com".to_string(), config)
    }

    pub fn with_base_url(api_key: SecretString, base_url: String, config: CompletionConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key,
            base_url,
            config,
        }
    }

    async fn call_api(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let body = AnthropicRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_output_tokens,
            temperature: Some(self.config.temperature),
            system: request.system.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content: request.prompt.clone(),
            }],
        };

        let url = format!("{}/v1/messages", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Timeout
                } else {
                    CompletionError::Api(e.to_string())
                }
            })?;

        if response.status() == 429 {
            return Err(CompletionError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Api(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let api_response: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::InvalidFormat(e.to_string()))?;

        let text = api_response
            .content
            .into_iter()
            .filter_map(|block| {
                if block.r#type == "text" {
                    Some(block.text)
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            return Err(CompletionError::InvalidFormat("Empty response".to_string()));
        }

        Ok(text)
    }
}

#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    r#type: String,
    #[serde(default)]
    text: String,
}

#[async_trait]
impl CompletionClient for AnthropicCompletion {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError> {
        let mut last_error = None;
        for attempt in 0..=self.config.retries {
            if attempt > 0 {
                tracing::warn!(attempt = attempt, "Retrying completion");
                tokio::time::sleep(Duration::from_millis(500 * 2_u64.pow(attempt))).await;
            }

            match self.call_api(&request).await {
                Ok(text) => return Ok(CompletionResponse { text }),
                Err(CompletionError::RateLimited) => {
                    return Err(CompletionError::RateLimited);
                }
                Err(e) => {
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| CompletionError::Api("Unknown error".to_string())))
    }
}
