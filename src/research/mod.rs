//! Research results: schema, recovery from agent text, export and logging.

mod extract;
mod format;
mod log;
mod result;

pub use extract::{extract, extract_with_strategy, ExtractionStrategy, Extraction};
pub use format::{format_instructions, result_schema};
pub use log::ResearchLog;
pub use result::{ResearchExport, ResearchResult};
