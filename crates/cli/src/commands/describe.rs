//! Describe command - one-shot product copy generation

use anyhow::{Context, Result, bail};
use offerbase_adapters::completion::{
    AnthropicCompletion, CompletionConfig as AdapterCompletionConfig, OpenAiCompletion,
    StubCompletion,
};
use offerbase_domain::CompletionClient;
use offerbase_domain::usecases::{DescribeConfig, DescribeUseCase};
use secrecy::SecretString;
use std::path::PathBuf;
use std::sync::Arc;

use crate::args::DescribeArgs;
use crate::config::AppConfig;

pub async fn execute(args: DescribeArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref()).unwrap_or_default();

    if args.title.trim().is_empty() {
        bail!("No title provided");
    }

    let merchant = args.merchant.as_deref().unwrap_or("unknown");

    let client = build_completion_client(&config)?;
    let describe_config = DescribeConfig {
        max_chars: match config.completion.max_chars {
            0 => None,
            max => Some(max),
        },
    };

    let client: Arc<dyn CompletionClient> = Arc::from(client);
    let usecase = DescribeUseCase::new(client, describe_config);
    let text = usecase
        .describe(&args.title, merchant)
        .await
        .context("Description generation failed")?;

    if args.json {
        let output = serde_json::json!({
            "title": args.title,
            "merchant": merchant,
            "description": text,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", text);
    }

    Ok(())
}

pub(crate) fn build_completion_client(config: &AppConfig) -> Result<Box<dyn CompletionClient>> {
    let adapter_config = AdapterCompletionConfig {
        model: config.completion.model.clone(),
        temperature: config.completion.temperature,
        max_output_tokens: config.completion.max_output_tokens,
        timeout_secs: config.completion.timeout_secs,
        retries: config.completion.retries,
    };

    match config.completion.provider.as_str() {
        "openai" => {
            let api_key = load_api_key(&config.completion.openai.api_key_env, "openai")?;
            Ok(Box::new(OpenAiCompletion::with_base_url(
                api_key,
                config.completion.openai.base_url.clone(),
                adapter_config,
            )))
        }
        "anthropic" => {
            let api_key = load_api_key(&config.completion.anthropic.api_key_env, "anthropic")?;
            Ok(Box::new(AnthropicCompletion::new(api_key, adapter_config)))
        }
        "stub" => Ok(Box::new(StubCompletion::echo())),
        other => bail!("Unknown completion provider: {}", other),
    }
}

pub(crate) fn load_api_key(env_var: &str, provider: &str) -> Result<SecretString> {
    if env_var.trim().is_empty() {
        bail!("No API key env var configured for provider {}", provider);
    }

    let key = std::env::var(env_var).with_context(|| {
        format!(
            "Missing API key env var {} for provider {}",
            env_var, provider
        )
    })?;

    if key.trim().is_empty() {
        bail!(
            "API key env var {} is empty for provider {}",
            env_var,
            provider
        );
    }

    Ok(SecretString::new(key.into()))
}
