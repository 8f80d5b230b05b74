use std::sync::Arc;

use log::{info, warn};

use crate::config::Config;
use crate::error::PipelineError;
use crate::llm::{OpenAiGenerator, TextGenerator};
use crate::prompts::{PipelineRequest, build_workflow};
use crate::tools::{HttpClient, HttpScraper, PageScrape, SerperSearch, WebSearch};
use crate::{Ctx, Runner, WorkflowError};

impl From<WorkflowError> for PipelineError {
    fn from(e: WorkflowError) -> Self {
        PipelineError::validation(e.to_string())
    }
}

/// The four-agent documentation pipeline: research, draft, review, train.
///
/// Holds only shared capability clients, so one `Pipeline` can serve any
/// number of independent runs, including concurrent ones.
pub struct Pipeline {
    generator: Arc<dyn TextGenerator>,
    search: Option<Arc<dyn WebSearch>>,
    scraper: Option<Arc<dyn PageScrape>>,
    scrape_pages: usize,
}

impl Pipeline {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            search: None,
            scraper: None,
            scrape_pages: 2,
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

    pub fn with_scrape_pages(mut self, pages: usize) -> Self {
        self.scrape_pages = pages;
        self
    }

    /// Wire the live OpenAI, Serper and scraping clients from `config`.
    ///
    /// Fails with [`PipelineError::MissingCredential`] without a model key.
    /// A missing search key only disables web research.
    pub fn from_config(config: &Config) -> Result<Self, PipelineError> {
        let http = HttpClient::new(config.request_timeout);
        let generator = OpenAiGenerator::from_config(config, http.clone())?;
        info!("using model {}", generator.model());

        let mut pipeline = Pipeline::new(Arc::new(generator))
            .with_scraper(Arc::new(HttpScraper::new(
                http.clone(),
                config.scrape_max_chars,
            )))
            .with_scrape_pages(config.scrape_pages);

        match &config.serper_api_key {
            Some(key) => {
                pipeline = pipeline.with_search(Arc::new(SerperSearch::new(
                    http,
                    key.clone(),
                    config.serper_url.clone(),
                    config.search_results,
                )));
            }
            None => warn!("SERPER_API_KEY is not set; research runs without web search"),
        }

        Ok(pipeline)
    }

    /// A fresh context for one run.
    pub fn ctx(&self) -> Ctx {
        let mut ctx = Ctx::new(Arc::clone(&self.generator)).with_scrape_pages(self.scrape_pages);
        if let Some(search) = &self.search {
            ctx = ctx.with_search(Arc::clone(search));
        }
        if let Some(scraper) = &self.scraper {
            ctx = ctx.with_scraper(Arc::clone(scraper));
        }
        ctx
    }

    /// A single-use runner over the rendered workflow for `request`. Attach
    /// hooks to it for progress reporting, then run it with [`Pipeline::ctx`].
    pub fn runner(&self, request: &PipelineRequest) -> Result<Runner, PipelineError> {
        Ok(Runner::new(build_workflow(request)?))
    }

    /// Validate the inputs, run all four tasks, and return the training
    /// material produced by the last one.
    pub fn run(&self, topic: &str, template: &str, content: &str) -> Result<String, PipelineError> {
        let request = PipelineRequest::parse(topic, template, content)?;
        self.run_request(&request)
    }

    pub fn run_request(&self, request: &PipelineRequest) -> Result<String, PipelineError> {
        info!(
            "generating {} for '{}'",
            request.template(),
            request.topic()
        );
        let mut runner = self.runner(request)?.with_tracing();
        runner.run(&mut self.ctx())
    }
}
