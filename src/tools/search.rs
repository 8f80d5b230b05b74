use log::debug;
use serde::Deserialize;

use super::{HttpClient, SearchHit, WebSearch};
use crate::error::PipelineError;

/// [`WebSearch`] backed by the Serper Google search API.
pub struct SerperSearch {
    http: HttpClient,
    api_key: String,
    url: String,
    max_results: usize,
}

impl SerperSearch {
    pub fn new(
        http: HttpClient,
        api_key: impl Into<String>,
        url: impl Into<String>,
        max_results: usize,
    ) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            url: url.into(),
            max_results,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    title: String,
    link: String,
    #[serde(default)]
    snippet: String,
}

fn into_hits(response: SerperResponse, limit: usize) -> Vec<SearchHit> {
    response
        .organic
        .into_iter()
        .take(limit)
        .map(|r| SearchHit {
            title: r.title,
            snippet: r.snippet,
            url: r.link,
        })
        .collect()
}

impl WebSearch for SerperSearch {
    fn search(&self, query: &str) -> Result<Vec<SearchHit>, PipelineError> {
        debug!("serper search: {query}");

        let body = serde_json::json!({ "q": query, "num": self.max_results });
        let response: SerperResponse =
            self.http
                .post_json(&self.url, &[("X-API-KEY", self.api_key.as_str())], &body)?;

        Ok(into_hits(response, self.max_results))
    }
}
