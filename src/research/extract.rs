//! Structured result recovery from free-form agent output.
//!
//! Models are asked to answer with a bare JSON object, but they regularly
//! wrap it in prose or a markdown fence. Extraction first tries the text as
//! a whole, then falls back to the span between the first `{` and the last
//! `}`. Failing both is a normal outcome, not an error: callers always keep
//! the raw text for display.

use super::ResearchResult;
use serde::Serialize;
use tracing::debug;

/// Which stage produced the structured result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStrategy {
    /// The whole text parsed as the schema.
    Strict,
    /// The greedy brace span parsed as the schema.
    Lenient,
}

impl std::fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionStrategy::Strict => write!(f, "strict"),
            ExtractionStrategy::Lenient => write!(f, "lenient"),
        }
    }
}

/// Outcome of an extraction attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Extraction {
    pub result: Option<ResearchResult>,
    pub strategy: Option<ExtractionStrategy>,
}

impl Extraction {
    fn found(result: ResearchResult, strategy: ExtractionStrategy) -> Self {
        Self {
            result: Some(result),
            strategy: Some(strategy),
        }
    }

    /// Whether a structured result was recovered.
    pub fn is_structured(&self) -> bool {
        self.result.is_some()
    }
}

/// Recover a `ResearchResult` from raw agent text, if there is one.
pub fn extract(raw_text: &str) -> Option<ResearchResult> {
    extract_with_strategy(raw_text).result
}

/// Recover a `ResearchResult` and report which stage succeeded.
pub fn extract_with_strategy(raw_text: &str) -> Extraction {
    match serde_json::from_str::<ResearchResult>(raw_text) {
        Ok(result) => return Extraction::found(result, ExtractionStrategy::Strict),
        Err(e) => debug!("Strict parse failed: {}", e),
    }

    let Some(span) = brace_span(raw_text) else {
        debug!("No JSON object span in agent output");
        return Extraction::default();
    };

    // Parse to a generic value first so syntax and schema failures log apart.
    let value = match serde_json::from_str::<serde_json::Value>(span) {
        Ok(value) => value,
        Err(e) => {
            debug!("Brace span is not valid JSON: {}", e);
            return Extraction::default();
        }
    };

    match serde_json::from_value::<ResearchResult>(value) {
        Ok(result) => Extraction::found(result, ExtractionStrategy::Lenient),
        Err(e) => {
            debug!("Brace span does not match the schema: {}", e);
            Extraction::default()
        }
    }
}

/// The span from the first `{` to the last `}`, inclusive.
fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
