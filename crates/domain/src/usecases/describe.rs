//! Describe use case - generates short product copy via a completion API

use std::sync::Arc;

use crate::ports::{CompletionClient, CompletionError, CompletionRequest};

/// Configuration for the describe use case
#[derive(Debug, Clone)]
pub struct DescribeConfig {
    /// Maximum output characters (None = unlimited)
    pub max_chars: Option<usize>,
}

impl Default for DescribeConfig {
    fn default() -> Self {
        Self {
            max_chars: Some(400),
        }
    }
}

/// Use case for generating product blurbs
pub struct DescribeUseCase<C>
where
    C: CompletionClient + ?Sized,
{
    client: Arc<C>,
    config: DescribeConfig,
}

impl<C> DescribeUseCase<C>
where
    C: CompletionClient + ?Sized,
{
    pub fn new(client: Arc<C>, config: DescribeConfig) -> Self {
        Self { client, config }
    }

    /// Generate a short blurb for a product
    pub async fn describe(&self, title: &str, merchant: &str) -> Result<String, CompletionError> {
        let request = CompletionRequest {
            prompt: build_describe_prompt(title, merchant, self.config.max_chars),
            system: Some(
                "You write concise, factual product copy for an affiliate deals site. \
                 Plain text only, no markdown."
                    .to_string(),
            ),
        };

        tracing::info!(title = %title, merchant = %merchant, "Requesting product copy");

        let response = self.client.complete(request).await?;
        let text = response.text.trim();

        if text.is_empty() {
            return Err(CompletionError::InvalidFormat(
                "Empty completion".to_string(),
            ));
        }

        Ok(enforce_max_chars(text, self.config.max_chars))
    }
}

fn build_describe_prompt(title: &str, merchant: &str, max_chars: Option<usize>) -> String {
    let mut prompt = String::new();

    prompt.push_str("Write a short description for this product offer.\n\n");
    prompt.push_str(&format!("Title: {}\n", title));
    prompt.push_str(&format!("Merchant: {}\n", merchant));

    if let Some(max) = max_chars {
        prompt.push_str(&format!("\nKeep it under {} characters.\n", max));
    }

    prompt
}

fn enforce_max_chars(text: &str, max_chars: Option<usize>) -> String {
    match max_chars {
        Some(max) if text.chars().count() > max => text.chars().take(max).collect(),
        _ => text.to_string(),
    }
}
