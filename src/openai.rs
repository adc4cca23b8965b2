//! Chat client configuration for OpenAI-compatible endpoints.

use crate::config::LlmSettings;
use crate::error::{InquestorError, Result};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Create a chat client for the configured endpoint, key and timeout.
pub fn create_client(settings: &LlmSettings, api_key: &str) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .build()?;

    let config = OpenAIConfig::new()
        .with_api_base(settings.api_base.trim_end_matches('/'))
        .with_api_key(api_key);

    Ok(Client::with_config(config).with_http_client(http_client))
}

/// Read the API key named by the settings, failing with a hint when unset.
pub fn require_api_key(settings: &LlmSettings) -> Result<String> {
    match std::env::var(&settings.api_key_env) {
        Ok(key) if !key.is_empty() => Ok(key),
        Ok(_) => Err(InquestorError::Config(format!(
            "{} is empty. Set it in your environment or a .env file.",
            settings.api_key_env
        ))),
        Err(_) => Err(InquestorError::Config(format!(
            "{} not set. Set it in your environment or a .env file.",
            settings.api_key_env
        ))),
    }
}
