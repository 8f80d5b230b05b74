//! Capability clients for the research role, plus small text helpers.

pub mod http;
pub mod parse;
pub mod research;
pub mod scrape;
pub mod search;

pub use http::HttpClient;
pub use parse::strip_code_fences;
pub use research::web_research;
pub use scrape::{HttpScraper, extract_text};
pub use search::SerperSearch;

use crate::error::PipelineError;

/// One ranked web search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub snippet: String,
    pub url: String,
}

/// Ranked web search. Implementations must be safe to share between runs.
pub trait WebSearch: Send + Sync {
    fn search(&self, query: &str) -> Result<Vec<SearchHit>, PipelineError>;
}

/// Fetch a page and return its readable text.
pub trait PageScrape: Send + Sync {
    fn scrape(&self, url: &str) -> Result<String, PipelineError>;
}
