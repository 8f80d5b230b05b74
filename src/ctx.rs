use std::sync::Arc;

use crate::agent::AgentRole;
use crate::llm::{LlmRequest, TextGenerator};
use crate::tools::{PageScrape, WebSearch};

/// Execution context for one run: the capability clients tasks may use,
/// plus a log of what happened.
///
/// Clients are shared handles. A fresh `Ctx` per run keeps the log private
/// to that run.
pub struct Ctx {
    generator: Arc<dyn TextGenerator>,
    search: Option<Arc<dyn WebSearch>>,
    scraper: Option<Arc<dyn PageScrape>>,
    scrape_pages: usize,
    log: Vec<String>,
}

impl Ctx {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            search: None,
            scraper: None,
            scrape_pages: 2,
            log: vec![],
        }
    }

    pub fn with_search(mut self, search: Arc<dyn WebSearch>) -> Self {
        self.search = Some(search);
        self
    }

    pub fn with_scraper(mut self, scraper: Arc<dyn PageScrape>) -> Self {
        self.scraper = Some(scraper);
        self
    }

    /// How many of the top search hits get scraped.
    pub fn with_scrape_pages(mut self, pages: usize) -> Self {
        self.scrape_pages = pages;
        self
    }

    /// Start a generation call as `role`.
    pub fn llm<'a>(&'a self, role: &'a AgentRole) -> LlmRequest<'a> {
        LlmRequest::new(self.generator.as_ref(), role)
    }

    pub fn search(&self) -> Option<&dyn WebSearch> {
        self.search.as_deref()
    }

    pub fn scraper(&self) -> Option<&dyn PageScrape> {
        self.scraper.as_deref()
    }

    pub fn scrape_pages(&self) -> usize {
        self.scrape_pages
    }

    pub fn log(&mut self, msg: impl Into<String>) {
        self.log.push(msg.into());
    }

    pub fn logs(&self) -> &[String] {
        &self.log
    }
}
