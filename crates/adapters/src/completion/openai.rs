//! OpenAI Responses API adapter

use async_trait::async_trait;
use offerbase_domain::{CompletionClient, CompletionError, CompletionRequest, CompletionResponse};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::CompletionConfig;

/// OpenAI completion client using the Responses API
pub struct OpenAiCompletion {
    client: Client,
    api_key: SecretString,
    base_url: String,
    config: CompletionConfig,
}

impl OpenAiCompletion {
    pub fn new(api_key: SecretString, config: CompletionConfig) -> Self {
        Self::with_base_url(api_key, "https://api.openai.com/v1".to_string(), config)
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
        let body = OpenAiRequest {
            model: self.config.model.clone(),
            input: request.prompt.clone(),
            instructions: request.system.clone(),
            temperature: Some(self.config.temperature),
            max_output_tokens: Some(self.config.max_output_tokens),
        };

        let url = format!("{}/responses", self.base_url);

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
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

        let api_response: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::InvalidFormat(e.to_string()))?;

        let text = api_response
            .output
            .into_iter()
            .filter_map(|item| {
                if item.r#type == "message" {
                    item.content.into_iter().find_map(|c| {
                        if c.r#type == "output_text" {
                            Some(c.text)
                        } else {
                            None
                        }
                    })
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
struct OpenAiRequest {
    model: String,
    input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    output: Vec<OutputItem>,
}

#[derive(Deserialize)]
struct OutputItem {
    r#type: String,
    #[serde(default)]
    content: Vec<ContentItem>,
}

#[derive(Deserialize)]
struct ContentItem {
    r#type: String,
    #[serde(default)]
    text: String,
}

#[async_trait]
impl CompletionClient for OpenAiCompletion {
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

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_request() -> CompletionRequest {
        CompletionRequest {
            prompt: "Write a short description for Office Chair".to_string(),
            system: Some("Plain text only".to_string()),
        }
    }

    fn mock_success_response() -> serde_json::Value {
        serde_json::json!({
            "output": [
                {
                    "type": "message",
                    "content": [
                        {
                            "type": "output_text",
                            "text": "A sturdy chair for long days at the desk."
                        }
                    ]
                }
            ]
        })
    }

    #[tokio::test]
    async fn test_complete_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/responses"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(mock_success_response()))
            .mount(&mock_server)
            .await;

        let client = OpenAiCompletion::with_base_url(
            SecretString::new("test-key".into()),
            mock_server.uri(),
            CompletionConfig::default(),
        );

        let result = client.complete(sample_request()).await.unwrap();
        assert_eq!(result.text, "A sturdy chair for long days at the desk.");
    }

    #[tokio::test]
    async fn test_complete_rate_limited() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/responses"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&mock_server)
            .await;

        let client = OpenAiCompletion::with_base_url(
            SecretString::new("test-key".into()),
            mock_server.uri(),
            CompletionConfig {
                retries: 0,
                ..Default::default()
            },
        );

        let result = client.complete(sample_request()).await;
        assert!(matches!(result, Err(CompletionError::RateLimited)));
    }

    #[tokio::test]
    async fn test_complete_api_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/responses"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal error"))
            .mount(&mock_server)
            .await;

        let client = OpenAiCompletion::with_base_url(
            SecretString::new("test-key".into()),
            mock_server.uri(),
            CompletionConfig {
                retries: 0,
                ..Default::default()
            },
        );

        let result = client.complete(sample_request()).await;
        assert!(matches!(result, Err(CompletionError::Api(_))));
    }
}
