//! Wikipedia page summaries via the MediaWiki API.

use super::{truncate_chars, Lookup};
use crate::config::WikipediaSettings;
use crate::error::{InquestorError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

const NO_RESULT: &str = "No good Wikipedia Search Result was found";

/// Looks up intro summaries of the best-matching Wikipedia pages.
pub struct WikipediaLookup {
    client: reqwest::Client,
    api_url: String,
    top_k_results: usize,
    doc_content_chars_max: usize,
}

impl WikipediaLookup {
    /// Create a lookup from settings.
    pub fn new(settings: &WikipediaSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: settings.api_url.clone(),
            top_k_results: settings.top_k_results.max(1),
            doc_content_chars_max: settings.doc_content_chars_max,
        }
    }

    /// Build the search-and-extract request URL for a query.
    fn request_url(&self, query: &str) -> Result<Url> {
        let limit = self.top_k_results.to_string();
        Url::parse_with_params(
            &self.api_url,
            &[
                ("action", "query"),
                ("format", "json"),
                ("formatversion", "2"),
                ("generator", "search"),
                ("gsrsearch", query),
                ("gsrlimit", limit.as_str()),
                ("prop", "extracts"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("redirects", "1"),
            ],
        )
        .map_err(|e| InquestorError::Config(format!("Invalid Wikipedia API URL: {}", e)))
    }
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    query: Option<QueryPages>,
}

#[derive(Debug, Deserialize)]
struct QueryPages {
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    title: String,
    /// Search rank within the generator results.
    #[serde(default)]
    index: u32,
    #[serde(default)]
    extract: Option<String>,
}

/// Render pages as `Page:`/`Summary:` blocks in search-rank order.
fn format_pages(response: QueryResponse, top_k: usize, max_chars: usize) -> String {
    let mut pages = response.query.map(|q| q.pages).unwrap_or_default();
    pages.sort_by_key(|p| p.index);

    let blocks: Vec<String> = pages
        .into_iter()
        .filter_map(|p| {
            let extract = p.extract?;
            let extract = extract.trim();
            if extract.is_empty() {
                return None;
            }
            Some(format!("Page: {}\nSummary: {}", p.title, extract))
        })
        .take(top_k)
        .collect();

    if blocks.is_empty() {
        return NO_RESULT.to_string();
    }

    truncate_chars(&blocks.join("\n\n"), max_chars)
}

#[async_trait]
impl Lookup for WikipediaLookup {
    #[instrument(skip(self))]
    async fn lookup(&self, query: &str) -> Result<String> {
        let url = self.request_url(query)?;
        debug!("Wikipedia request: {}", url);

        let response: QueryResponse = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, concat!("inquestor/", env!("CARGO_PKG_VERSION")))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(format_pages(
            response,
            self.top_k_results,
            self.doc_content_chars_max,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> QueryResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_request_url() {
        let lookup = WikipediaLookup::new(&WikipediaSettings::default());
        let url = lookup.request_url("quantum dots & displays").unwrap();

        assert_eq!(url.host_str(), Some("en.wikipedia.org"));
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("gsrsearch".to_string(), "quantum dots & displays".to_string())));
        assert!(pairs.contains(&("gsrlimit".to_string(), "1".to_string())));
    }

    #[test]
    fn test_format_pages_orders_by_index() {
        let response = parse(
            r#"{"query":{"pages":[
                {"pageid":2,"title":"Second","index":2,"extract":"B"},
                {"pageid":1,"title":"First","index":1,"extract":"A"}
            ]}}"#,
        );
        assert_eq!(
            format_pages(response, 2, 1000),
            "Page: First\nSummary: A\n\nPage: Second\nSummary: B"
        );
    }

    #[test]
    fn test_format_pages_respects_top_k_and_length() {
        let response = parse(
            r#"{"query":{"pages":[
                {"title":"Quantum dot","index":1,"extract":"Quantum dots are semiconductor particles."},
                {"title":"Other","index":2,"extract":"Ignored"}
            ]}}"#,
        );
        assert_eq!(format_pages(response, 1, 20), "Page: Quantum dot\nSu");
    }

    #[test]
    fn test_format_pages_no_results() {
        assert_eq!(format_pages(parse(r#"{"batchcomplete":true}"#), 1, 1000), NO_RESULT);
        assert_eq!(
            format_pages(parse(r#"{"query":{"pages":[{"title":"Empty","index":1,"extract":""}]}}"#), 1, 1000),
            NO_RESULT
        );
    }
}
