//! Research agent: the upstream model call and the tools it may use.
//!
//! The rest of the crate only sees [`ResearchAgent`]: a query goes in, the
//! model's final text comes out along with a record of the tools it called.

mod runner;
mod tools;

pub use runner::Agent;
pub use tools::{parse_tool_call, ToolCall, ToolContext};

use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;

/// The upstream agent call.
#[async_trait]
pub trait ResearchAgent: Send + Sync {
    /// Run the agent to completion on a query.
    async fn invoke(&self, query: &str) -> Result<AgentResponse>;
}

/// Response from an agent run.
#[derive(Debug, Clone, Default)]
pub struct AgentResponse {
    /// The final response content from the agent.
    pub content: String,
    /// Record of all tool calls made during execution, in order.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Number of iterations (LLM calls) used.
    pub iterations: usize,
}

/// Record of a tool call made by the agent.
#[derive(Debug, Clone, Serialize)]
pub struct ToolCallRecord {
    /// Name of the tool called.
    pub name: String,
    /// JSON arguments passed to the tool.
    pub arguments: String,
    /// Result returned by the tool.
    pub result: String,
}

impl std::fmt::Display for ToolCallRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_call_record_display() {
        let record = ToolCallRecord {
            name: "search".to_string(),
            arguments: r#"{"query": "test"}"#.to_string(),
            result: "Found results".to_string(),
        };
        assert_eq!(format!("{}", record), r#"search({"query": "test"})"#);
    }
}
