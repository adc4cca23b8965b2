//! Error types for Inquestor.

use thiserror::Error;

/// Library-level error type for Inquestor operations.
#[derive(Error, Debug)]
pub enum InquestorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Chat API error: {0}")]
    OpenAI(String),

    #[error("Agent error: {0}")]
    Agent(String),

    #[error("Tool failed: {0}")]
    Tool(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Inquestor operations.
pub type Result<T> = std::result::Result<T, InquestorError>;
