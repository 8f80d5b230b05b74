use std::fmt::Write;

use log::{debug, info};

use super::{PageScrape, WebSearch};
use crate::error::PipelineError;

/// Search for `query`, scrape up to `scrape_pages` of the top hits, and
/// render everything as a numbered findings list for the researcher's prompt.
///
/// Any search or scrape failure is returned as-is; the caller's task fails.
pub fn web_research(
    search: &dyn WebSearch,
    scraper: Option<&dyn PageScrape>,
    query: &str,
    scrape_pages: usize,
) -> Result<String, PipelineError> {
    let hits = search.search(query)?;
    info!("web search for '{query}' returned {} results", hits.len());

    if hits.is_empty() {
        return Ok(format!("No search results were found for \"{query}\"."));
    }

    let mut out = String::new();
    for (i, hit) in hits.iter().enumerate() {
        let _ = writeln!(out, "{}. {} ({})", i + 1, hit.title, hit.url);
        if !hit.snippet.is_empty() {
            let _ = writeln!(out, "   {}", hit.snippet);
        }

        if let Some(scraper) = scraper
            && i < scrape_pages
        {
            let page = scraper.scrape(&hit.url)?;
            debug!("scraped {} chars from {}", page.len(), hit.url);
            if !page.is_empty() {
                let _ = writeln!(out, "   Page excerpt: {page}");
            }
        }
    }

    Ok(out.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::SearchHit;
    use std::sync::Mutex;

    struct FakeSearch(Vec<SearchHit>);
    impl WebSearch for FakeSearch {
        fn search(&self, _query: &str) -> Result<Vec<SearchHit>, PipelineError> {
            Ok(self.0.clone())
        }
    }

    struct FailingSearch;
    impl WebSearch for FailingSearch {
        fn search(&self, _query: &str) -> Result<Vec<SearchHit>, PipelineError> {
            Err(PipelineError::transient("search down"))
        }
    }

    #[derive(Default)]
    struct RecordingScraper {
        urls: Mutex<Vec<String>>,
    }
    impl PageScrape for RecordingScraper {
        fn scrape(&self, url: &str) -> Result<String, PipelineError> {
            self.urls.lock().unwrap().push(url.to_string());
            Ok(format!("text of {url}"))
        }
    }

    struct FailingScraper;
    impl PageScrape for FailingScraper {
        fn scrape(&self, url: &str) -> Result<String, PipelineError> {
            Err(PipelineError::generation(format!("cannot scrape {url}")))
        }
    }

    fn hits(n: usize) -> Vec<SearchHit> {
        (1..=n)
            .map(|i| SearchHit {
                title: format!("Result {i}"),
                snippet: format!("snippet {i}"),
                url: format!("https://example.com/{i}"),
            })
            .collect()
    }

    #[test]
    fn findings_list_every_hit_in_order() {
        let out = web_research(&FakeSearch(hits(3)), None, "q", 2).unwrap();

        let first = out.find("1. Result 1 (https://example.com/1)").unwrap();
        let third = out.find("3. Result 3 (https://example.com/3)").unwrap();
        assert!(first < third);
        assert!(out.contains("   snippet 2"));
        assert!(!out.contains("Page excerpt"));
    }

    #[test]
    fn scrapes_only_top_pages() {
        let scraper = RecordingScraper::default();
        let out = web_research(&FakeSearch(hits(4)), Some(&scraper), "q", 2).unwrap();

        assert_eq!(
            *scraper.urls.lock().unwrap(),
            vec!["https://example.com/1", "https://example.com/2"]
        );
        assert!(out.contains("Page excerpt: text of https://example.com/2"));
        assert!(!out.contains("text of https://example.com/3"));
    }

    #[test]
    fn empty_results_are_reported() {
        let out = web_research(&FakeSearch(vec![]), None, "obscure", 2).unwrap();
        assert!(out.contains("No search results"));
    }

    #[test]
    fn search_failure_propagates() {
        let err = web_research(&FailingSearch, None, "q", 2).err().unwrap();
        assert!(err.is_transient());
    }

    #[test]
    fn scrape_failure_propagates() {
        let err = web_research(&FakeSearch(hits(1)), Some(&FailingScraper), "q", 1)
            .err()
            .unwrap();
        assert!(err.to_string().contains("cannot scrape"));
    }
}
