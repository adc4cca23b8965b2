//! The research result schema and its JSON export shapes.

use serde::{Deserialize, Deserializer, Serialize};

/// Structured shape of the agent's final answer.
///
/// Deserialization is all-or-nothing: every field must be present with the
/// right JSON type and `topic` must not be blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchResult {
    #[serde(deserialize_with = "non_blank")]
    pub topic: String,
    pub summary: String,
    pub sources: Vec<String>,
    #[serde(alias = "tools_used")]
    pub tools_used: Vec<String>,
}

fn non_blank<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    if value.trim().is_empty() {
        return Err(serde::de::Error::custom("topic must not be empty"));
    }
    Ok(value)
}

/// Payload offered for download or transport after a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResearchExport {
    /// The recovered four-field result.
    Structured(ResearchResult),
    /// Extraction failed; only the agent's raw text is available.
    Raw {
        #[serde(rename = "rawText")]
        raw_text: String,
    },
}

impl ResearchExport {
    /// Pick the export shape for a query's outcome.
    pub fn new(structured: Option<&ResearchResult>, raw_text: &str) -> Self {
        match structured {
            Some(result) => ResearchExport::Structured(result.clone()),
            None => ResearchExport::Raw {
                raw_text: raw_text.to_string(),
            },
        }
    }

    /// Pretty-printed JSON, non-ASCII kept as-is.
    pub fn to_json_pretty(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
