//! Web search snippets via the DuckDuckGo Instant Answer API.

use super::Lookup;
use crate::config::SearchSettings;
use crate::error::{InquestorError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

const NO_RESULT: &str = "No good DuckDuckGo Search Result was found";

/// Web search returning newline-joined result snippets.
pub struct DuckDuckGoSearch {
    client: reqwest::Client,
    api_url: String,
    max_results: usize,
}

impl DuckDuckGoSearch {
    /// Create a search client from settings.
    pub fn new(settings: &SearchSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: settings.api_url.clone(),
            max_results: settings.max_results,
        }
    }

    fn request_url(&self, query: &str) -> Result<Url> {
        Url::parse_with_params(
            &self.api_url,
            &[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ],
        )
        .map_err(|e| InquestorError::Config(format!("Invalid search API URL: {}", e)))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InstantAnswer {
    #[serde(default)]
    abstract_text: String,
    #[serde(default)]
    related_topics: Vec<RelatedTopic>,
}

/// Related topics are either results or named groups of results.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RelatedTopic {
    Result {
        #[serde(rename = "Text")]
        text: String,
    },
    Group {
        #[serde(rename = "Topics")]
        topics: Vec<RelatedTopic>,
    },
}

fn collect_snippets(topics: Vec<RelatedTopic>, out: &mut Vec<String>) {
    for topic in topics {
        match topic {
            RelatedTopic::Result { text } => out.push(text),
            RelatedTopic::Group { topics } => collect_snippets(topics, out),
        }
    }
}

/// Abstract first, then related topics, capped at `max_results`.
fn format_snippets(answer: InstantAnswer, max_results: usize) -> String {
    let mut snippets = Vec::new();
    if !answer.abstract_text.trim().is_empty() {
        snippets.push(answer.abstract_text);
    }
    collect_snippets(answer.related_topics, &mut snippets);

    let snippets: Vec<String> = snippets
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .take(max_results)
        .collect();

    if snippets.is_empty() {
        NO_RESULT.to_string()
    } else {
        snippets.join("\n")
    }
}

#[async_trait]
impl Lookup for DuckDuckGoSearch {
    #[instrument(skip(self))]
    async fn lookup(&self, query: &str) -> Result<String> {
        let url = self.request_url(query)?;
        debug!("Search request: {}", url);

        // The API labels its JSON as javascript, so decode the body by hand.
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let answer: InstantAnswer = serde_json::from_str(&body)?;

        Ok(format_snippets(answer, self.max_results))
    }
}
