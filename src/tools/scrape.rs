use log::debug;
use scraper::{Html, Node};

use super::{HttpClient, PageScrape};
use crate::error::PipelineError;

/// Elements whose text never counts as page content.
const CHROME: &[&str] = &[
    "head", "script", "style", "noscript", "nav", "header", "footer", "aside", "form", "svg",
];

/// [`PageScrape`] that fetches a page over HTTP and keeps its readable text.
pub struct HttpScraper {
    http: HttpClient,
    max_chars: usize,
}

impl HttpScraper {
    pub fn new(http: HttpClient, max_chars: usize) -> Self {
        Self { http, max_chars }
    }
}

impl PageScrape for HttpScraper {
    fn scrape(&self, url: &str) -> Result<String, PipelineError> {
        debug!("scraping {url}");
        let html = self.http.get(url)?;
        Ok(extract_text(&html, self.max_chars))
    }
}

/// Strip markup and navigation chrome from an HTML document, collapse
/// whitespace, and cut the result to at most `max_chars` characters.
pub fn extract_text(html: &str, max_chars: usize) -> String {
    let doc = Html::parse_document(html);

    let mut words: Vec<&str> = Vec::new();
    for node in doc.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let in_chrome = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .is_some_and(|el| CHROME.contains(&el.name()))
        });
        if in_chrome {
            continue;
        }

        words.extend(text.split_whitespace());
    }

    words.join(" ").chars().take(max_chars).collect()
}
