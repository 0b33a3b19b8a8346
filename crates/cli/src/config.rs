//! Configuration loading and management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub ingest: IngestConfig,

    #[serde(default)]
    pub sites: SitesConfig,

    #[serde(default)]
    pub completion: CompletionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_sites_dir")]
    pub sites_dir: PathBuf,

    #[serde(default = "default_catalog_db_path")]
    pub catalog_db_path: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_true")]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    #[serde(default = "default_min_title_chars")]
    pub min_title_chars: usize,

    #[serde(default)]
    pub ignore_patterns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitesConfig {
    /// Fallback site when nothing else matches
    #[serde(default)]
    pub default_site: Option<String>,

    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_completion_retries")]
    pub retries: u32,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Truncate generated descriptions to this many characters (0 disables)
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    #[serde(default)]
    pub openai: OpenAiConfig,

    #[serde(default)]
    pub anthropic: AnthropicConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAiConfig {
    #[serde(default = "default_openai_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnthropicConfig {
    #[serde(default = "default_anthropic_api_key_env")]
    pub api_key_env: String,
}

// Default value functions
fn default_sites_dir() -> PathBuf {
    PathBuf::from("./sites")
}

fn default_catalog_db_path() -> PathBuf {
    PathBuf::from("./catalog.sqlite")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_min_title_chars() -> usize {
    3
}

fn default_cookie_name() -> String {
    "site_id".to_string()
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_timeout() -> u64 {
    45
}

fn default_completion_retries() -> u32 {
    2
}

fn default_max_output_tokens() -> u32 {
    300
}

fn default_max_chars() -> usize {
    400
}

fn default_openai_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_anthropic_api_key_env() -> String {
    "ANTHROPIC_API_KEY".to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            sites_dir: default_sites_dir(),
            catalog_db_path: default_catalog_db_path(),
            log_level: default_log_level(),
            dry_run: default_true(),
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            min_title_chars: default_min_title_chars(),
            ignore_patterns: vec![],
        }
    }
}

impl Default for SitesConfig {
    fn default() -> Self {
        Self {
            default_site: None,
            cookie_name: default_cookie_name(),
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            temperature: default_temperature(),
            timeout_secs: default_timeout(),
            retries: default_completion_retries(),
            max_output_tokens: default_max_output_tokens(),
            max_chars: default_max_chars(),
            openai: OpenAiConfig::default(),
            anthropic: AnthropicConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        // Try default config path if none specified
        let default_path = PathBuf::from("./config.toml");
        let path = config_path.unwrap_or(&default_path);

        if path.exists() {
            builder = builder.add_source(config::File::from(path));
        } else if config_path.is_some() {
            // User specified a path that doesn't exist
            anyhow::bail!("Config file not found: {}", path.display());
        }

        // Add environment variable overrides
        builder = builder.add_source(
            config::Environment::with_prefix("OFFERBASE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Generate example configuration as TOML string
    pub fn example_toml() -> String {
        r#"# offerbase configuration

[general]
sites_dir = "./sites"
catalog_db_path = "./catalog.sqlite"
log_level = "info"
dry_run = true

[ingest]
min_title_chars = 3
# ignore_patterns = ["(?i)gift card", "^TEST "]

[sites]
# default_site = "deals-us"
cookie_name = "site_id"

[completion]
provider = "openai"  # openai, anthropic, stub
model = "gpt-4o-mini"
temperature = 0.7
timeout_secs = 45
retries = 2
max_output_tokens = 300
# 0 disables truncation
max_chars = 400

[completion.openai]
api_key_env = "OPENAI_API_KEY"
base_url = "https://api.openai.com/v1"

[completion.anthropic]
api_key_env = "ANTHROPIC_API_KEY"
"#
        .to_string()
    }
}
