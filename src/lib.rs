//! Inquestor - research assistant
//!
//! Runs a tool-calling chat model on a research question and recovers a
//! structured answer from whatever text the model returns.
//!
//! # Overview
//!
//! Inquestor allows you to:
//! - Research a topic with an agent that can consult Wikipedia and search the web
//! - Recover a structured result (topic, summary, sources, tools used) from free text
//! - Keep an append-only text log of research output
//! - Export results as JSON from the CLI or the web form
//!
//! # Architecture
//!
//! - `config` - Settings and prompt templates
//! - `research` - Result schema, structured extraction, export and logging
//! - `lookup` - Wikipedia and web search backends
//! - `agent` - The upstream agent call and its tools
//! - `orchestrator` - One query end to end
//! - `cli` - Command line and web front ends
//!
//! # Example
//!
//! ```rust
//! use inquestor::research::extract;
//!
//! let raw = "Here is the answer:\n{\"topic\":\"X\",\"summary\":\"Y\",\"sources\":[\"a\"],\"toolsUsed\":[]}\nHope that helps!";
//! let result = extract(raw).expect("embedded object is recovered");
//! assert_eq!(result.topic, "X");
//! assert_eq!(result.sources, vec!["a"]);
//!
//! assert!(extract("I could not complete the research.").is_none());
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod lookup;
pub mod openai;
pub mod orchestrator;
pub mod research;

pub use error::{InquestorError, Result};
