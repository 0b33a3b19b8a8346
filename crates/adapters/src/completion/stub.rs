//! Stub completion client for offline use and tests

use async_trait::async_trait;
use offerbase_domain::{CompletionClient, CompletionError, CompletionRequest, CompletionResponse};

/// Stub completion client returning canned responses
pub struct StubCompletion {
    mode: StubMode,
}

enum StubMode {
    /// Always return the same text
    Fixed(String),
    /// Echo the prompt back
    Echo,
    /// Always fail with an API error
    Fail(String),
}

impl StubCompletion {
    /// Stub that always returns the given text
    pub fn fixed(text: impl Into<String>) -> Self {
        Self {
            mode: StubMode::Fixed(text.into()),
        }
    }

    /// Stub that echoes the prompt back
    pub fn echo() -> Self {
        Self {
            mode: StubMode::Echo,
        }
    }

    /// Stub that always fails
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            mode: StubMode::Fail(message.into()),
        }
    }
}

impl Default for StubCompletion {
    fn default() -> Self {
        Self::fixed("Stub description text.")
    }
}

#[async_trait]
impl CompletionClient for StubCompletion {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError> {
        match &self.mode {
            StubMode::Fixed(text) => Ok(CompletionResponse { text: text.clone() }),
            StubMode::Echo => Ok(CompletionResponse {
                text: request.prompt,
            }),
            StubMode::Fail(message) => Err(CompletionError::Api(message.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str) -> CompletionRequest {
        CompletionRequest {
            prompt: prompt.to_string(),
            system: None,
        }
    }

    #[tokio::test]
    async fn test_fixed_returns_canned_text() {
        let stub = StubCompletion::fixed("hello");
        let result = stub.complete(request("anything")).await.unwrap();
        assert_eq!(result.text, "hello");
    }

    #[tokio::test]
    async fn test_echo_returns_prompt() {
        let stub = StubCompletion::echo();
        let result = stub.complete(request("the prompt")).await.unwrap();
        assert_eq!(result.text, "the prompt");
    }

    #[tokio::test]
    async fn test_failing_returns_error() {
        let stub = StubCompletion::failing("boom");
        let result = stub.complete(request("anything")).await;
        assert!(matches!(result, Err(CompletionError::Api(_))));
    }
}
