//! Research orchestrator for Inquestor.
//!
//! Coordinates one query end to end: agent call, structured extraction and
//! the optional append to the research log.

use crate::agent::{Agent, ResearchAgent, ToolCallRecord, ToolContext};
use crate::config::{Prompts, Settings};
use crate::error::{InquestorError, Result};
use crate::lookup::{DuckDuckGoSearch, WikipediaLookup};
use crate::openai::{create_client, require_api_key};
use crate::research::{extract_with_strategy, Extraction, ResearchExport, ResearchLog, ResearchResult};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Everything produced by one research query.
#[derive(Debug, Clone)]
pub struct ResearchOutcome {
    /// The agent's final text, always kept for display.
    pub raw_text: String,
    /// Structured result recovered from `raw_text`, if any.
    pub extraction: Extraction,
    /// Tools the agent called, in order.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Number of model calls used.
    pub iterations: usize,
    /// Log file the raw text was appended to.
    pub saved_to: Option<PathBuf>,
    /// Why saving failed, when it was requested and did not happen.
    pub save_error: Option<String>,
}

impl ResearchOutcome {
    /// The structured result, if extraction succeeded.
    pub fn structured(&self) -> Option<&ResearchResult> {
        self.extraction.result.as_ref()
    }

    /// The download/transport payload for this outcome.
    pub fn export(&self) -> ResearchExport {
        ResearchExport::new(self.structured(), &self.raw_text)
    }
}

/// Runs research queries against an agent.
pub struct Orchestrator {
    agent: Arc<dyn ResearchAgent>,
    log: ResearchLog,
}

impl Orchestrator {
    /// Create an orchestrator with the agent and tools described by the settings.
    pub fn new(settings: &Settings) -> Result<Self> {
        let api_key = require_api_key(&settings.llm)?;
        let client = create_client(&settings.llm, &api_key)?;

        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let log = ResearchLog::new(settings.log_path());
        let tools = build_tools(settings, &log);

        let agent = Agent::new(client, tools, &settings.llm)
            .with_system_prompt(&prompts.research_system());

        info!(
            "Research agent ready ({} via {}, tools: {})",
            settings.llm.model,
            settings.llm.api_base,
            agent.tool_names().join(", ")
        );

        Ok(Self::with_agent(Arc::new(agent), log))
    }

    /// Create an orchestrator with a custom agent and log.
    pub fn with_agent(agent: Arc<dyn ResearchAgent>, log: ResearchLog) -> Self {
        Self { agent, log }
    }

    /// The research log used for saving.
    pub fn log(&self) -> &ResearchLog {
        &self.log
    }

    /// Run one query. Failing to recover a structured result is not an error.
    ///
    /// When `save` is set and a structured result was recovered, the raw
    /// text is appended to the research log.
    #[instrument(skip(self))]
    pub async fn research(&self, query: &str, save: bool) -> Result<ResearchOutcome> {
        let query = query.trim();
        if query.is_empty() {
            return Err(InquestorError::InvalidInput("Query is empty".to_string()));
        }

        let response = self.agent.invoke(query).await?;
        let extraction = extract_with_strategy(&response.content);

        match extraction.strategy {
            Some(strategy) => info!("Recovered structured result ({})", strategy),
            None => warn!("Agent output did not contain a structured result"),
        }

        let mut outcome = ResearchOutcome {
            raw_text: response.content,
            extraction,
            tool_calls: response.tool_calls,
            iterations: response.iterations,
            saved_to: None,
            save_error: None,
        };

        if save && outcome.extraction.is_structured() {
            match self.log.append(&outcome.raw_text).await {
                Ok(_) => outcome.saved_to = Some(self.log.path().to_path_buf()),
                Err(e) => {
                    warn!("Failed to save research output: {}", e);
                    outcome.save_error = Some(e.to_string());
                }
            }
        }

        Ok(outcome)
    }
}

/// Assemble the tool set enabled in the settings.
fn build_tools(settings: &Settings, log: &ResearchLog) -> ToolContext {
    let mut tools = ToolContext::new();
    if settings.tools.wikipedia.enabled {
        tools = tools.with_wikipedia(Arc::new(WikipediaLookup::new(&settings.tools.wikipedia)));
    }
    if settings.tools.search.enabled {
        tools = tools.with_search(Arc::new(DuckDuckGoSearch::new(&settings.tools.search)));
    }
    if settings.tools.save_enabled {
        tools = tools.with_log(log.clone());
    }
    tools
}
