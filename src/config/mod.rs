//! Configuration module for Inquestor.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{Prompts, ResearchPrompts};
pub use settings::{
    GeneralSettings, LlmSettings, OutputSettings, PromptSettings, SearchSettings, Settings,
    ToolSettings, WikipediaSettings,
};
