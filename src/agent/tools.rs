//! Tool definitions and dispatch for the research agent.

use crate::error::{InquestorError, Result};
use crate::lookup::Lookup;
use crate::research::ResearchLog;
use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A parsed tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum ToolCall {
    /// Look up a topic on Wikipedia.
    Wikipedia { query: String },

    /// Search the web.
    Search { query: String },

    /// Append text to the research log.
    SaveTextToFile { data: String },
}

/// The tools available to one agent, with their backends.
///
/// A tool without a backend is neither offered to the model nor executable.
#[derive(Default, Clone)]
pub struct ToolContext {
    wikipedia: Option<Arc<dyn Lookup>>,
    search: Option<Arc<dyn Lookup>>,
    log: Option<ResearchLog>,
}

impl ToolContext {
    /// Create an empty tool set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable the `wikipedia` tool.
    pub fn with_wikipedia(mut self, lookup: Arc<dyn Lookup>) -> Self {
        self.wikipedia = Some(lookup);
        self
    }

    /// Enable the `search` tool.
    pub fn with_search(mut self, lookup: Arc<dyn Lookup>) -> Self {
        self.search = Some(lookup);
        self
    }

    /// Enable the `save_text_to_file` tool.
    pub fn with_log(mut self, log: ResearchLog) -> Self {
        self.log = Some(log);
        self
    }

    /// Names of the enabled tools, in a stable order.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.wikipedia.is_some() {
            names.push("wikipedia");
        }
        if self.search.is_some() {
            names.push("search");
        }
        if self.log.is_some() {
            names.push("save_text_to_file");
        }
        names
    }

    /// Execute a tool call and return the result as a string.
    pub async fn execute(&self, tool: &ToolCall) -> Result<String> {
        match tool {
            ToolCall::Wikipedia { query } => {
                Self::run_lookup(self.wikipedia.as_deref(), "wikipedia", query).await
            }
            ToolCall::Search { query } => {
                Self::run_lookup(self.search.as_deref(), "search", query).await
            }
            ToolCall::SaveTextToFile { data } => match &self.log {
                Some(log) => log.append(data).await,
                None => Err(InquestorError::Tool("save_text_to_file is disabled".to_string())),
            },
        }
    }

    async fn run_lookup(lookup: Option<&dyn Lookup>, name: &str, query: &str) -> Result<String> {
        match lookup {
            Some(lookup) => lookup.lookup(query).await,
            None => Err(InquestorError::Tool(format!("{} is disabled", name))),
        }
    }

    /// OpenAI function definitions for the enabled tools.
    pub fn definitions(&self) -> Vec<ChatCompletionTool> {
        self.names()
            .into_iter()
            .map(|name| match name {
                "wikipedia" => definition(
                    name,
                    "Look up a topic on Wikipedia and return a summary of the best matching page. \
                    Use this for background and established facts.",
                    "query",
                    "The topic or search phrase",
                ),
                "search" => definition(
                    name,
                    "Search the web for information. Use this for recent or niche topics.",
                    "query",
                    "The search query",
                ),
                _ => definition(
                    name,
                    "Saves structured research data to a text file.",
                    "data",
                    "The text to save",
                ),
            })
            .collect()
    }
}

/// A function tool taking a single required string argument.
fn definition(name: &str, description: &str, arg: &str, arg_description: &str) -> ChatCompletionTool {
    let mut properties = serde_json::Map::new();
    properties.insert(
        arg.to_string(),
        serde_json::json!({
            "type": "string",
            "description": arg_description
        }),
    );

    ChatCompletionTool {
        r#type: ChatCompletionToolType::Function,
        function: FunctionObject {
            name: name.to_string(),
            description: Some(description.to_string()),
            parameters: Some(serde_json::json!({
                "type": "object",
                "properties": properties,
                "required": [arg]
            })),
            strict: None,
        },
    }
}

/// Parse a tool call from the OpenAI response format.
pub fn parse_tool_call(name: &str, arguments: &str) -> Result<ToolCall> {
    let args: serde_json::Value = serde_json::from_str(arguments)
        .map_err(|e| InquestorError::Agent(format!("Invalid tool arguments: {}", e)))?;

    let string_arg = |key: &str| -> Result<String> {
        args[key]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| InquestorError::Agent(format!("Missing '{}' argument", key)))
    };

    match name {
        "wikipedia" => Ok(ToolCall::Wikipedia {
            query: string_arg("query")?,
        }),
        "search" => Ok(ToolCall::Search {
            query: string_arg("query")?,
        }),
        "save_text_to_file" => Ok(ToolCall::SaveTextToFile {
            data: string_arg("data")?,
        }),
        _ => Err(InquestorError::Agent(format!("Unknown tool: {}", name))),
    }
}
