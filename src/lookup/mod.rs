//! External lookups the agent can call: encyclopedia and web search.
//!
//! Each lookup takes a free-text query and returns plain text for the model.

mod duckduckgo;
mod wikipedia;

pub use duckduckgo::DuckDuckGoSearch;
pub use wikipedia::WikipediaLookup;

use crate::error::Result;
use async_trait::async_trait;

/// A text-in, text-out lookup backing one of the agent's tools.
#[async_trait]
pub trait Lookup: Send + Sync {
    /// Run the lookup and return text for the model.
    async fn lookup(&self, query: &str) -> Result<String>;
}

/// Truncate to at most `max_chars` characters.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
