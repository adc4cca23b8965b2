//! Configuration settings for Inquestor.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub llm: LlmSettings,
    pub tools: ToolSettings,
    pub output: OutputSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level used when no -v flag is given (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Chat model settings.
///
/// Any OpenAI-compatible endpoint works; the default points at Gemini's.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Base URL of the chat completions API.
    pub api_base: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Model name.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum model calls per query before giving up.
    pub max_iterations: usize,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_base: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            api_key_env: "GOOGLE_API_KEY".to_string(),
            model: "gemini-2.5-flash".to_string(),
            temperature: 0.3,
            max_iterations: 15,
            timeout_secs: 300,
        }
    }
}

/// Settings for the agent's tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    pub wikipedia: WikipediaSettings,
    pub search: SearchSettings,
    /// Offer the save-to-file tool to the agent.
    pub save_enabled: bool,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            wikipedia: WikipediaSettings::default(),
            search: SearchSettings::default(),
            save_enabled: true,
        }
    }
}

/// Wikipedia lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WikipediaSettings {
    pub enabled: bool,
    /// MediaWiki API endpoint.
    pub api_url: String,
    /// Number of pages to summarize per lookup.
    pub top_k_results: usize,
    /// Maximum characters returned to the model.
    pub doc_content_chars_max: usize,
}

impl Default for WikipediaSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            api_url: "https://en.wikipedia.org/w/api.php".to_string(),
            top_k_results: 1,
            doc_content_chars_max: 1000,
        }
    }
}

/// Web search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub enabled: bool,
    /// DuckDuckGo API endpoint.
    pub api_url: String,
    /// Maximum snippets returned per search.
    pub max_results: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            api_url: "https://api.duckduckgo.com/".to_string(),
            max_results: 5,
        }
    }
}

/// Where and whether research output is saved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Append successful results to the log by default.
    pub save_by_default: bool,
    /// Path of the append-only research log.
    pub log_path: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            save_by_default: true,
            log_path: "research_output.txt".to_string(),
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::InquestorError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// The file settings are read from: `explicit` when given, otherwise the default.
    pub fn config_path(explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_config_path)
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("inquestor")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded research log path.
    pub fn log_path(&self) -> PathBuf {
        Self::expand_path(&self.output.log_path)
    }
}
