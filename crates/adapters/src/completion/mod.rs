//! Completion API provider adapters
//!
//! Thin wrappers: a prompt goes in, text comes out. Provider-specific
//! request/response shapes stay inside each adapter.

pub mod anthropic;
pub mod openai;
pub mod stub;

pub use anthropic::AnthropicCompletion;
pub use openai::OpenAiCompletion;
pub use stub::StubCompletion;

use serde::{Deserialize, Serialize};

/// Common completion provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Model name/ID
    pub model: String,
    /// Temperature (0.0-1.0)
    pub temperature: f64,
    /// Maximum output tokens
    pub max_output_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries on failure
    pub retries: u32,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_output_tokens: 300,
            timeout_secs: 45,
            retries: 2,
        }
    }
}
