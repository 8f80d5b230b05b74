//! Process-wide configuration.
//!
//! Built once at startup and passed by reference into the pipeline and the
//! capability clients. Nothing below this module reads the environment.

use std::fmt;
use std::time::Duration;

use crate::error::PipelineError;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_SERPER_URL: &str = "https://google.serper.dev/search";

#[derive(Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    /// Optional. Without it the researcher works from the request alone.
    pub serper_api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub openai_base_url: String,
    pub serper_url: String,
    /// Global timeout for each HTTP request made by a capability client.
    pub request_timeout: Duration,
    /// How many search hits the researcher sees.
    pub search_results: usize,
    /// How many of the top hits get scraped.
    pub scrape_pages: usize,
    pub scrape_max_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            serper_api_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            serper_url: DEFAULT_SERPER_URL.to_string(),
            request_timeout: Duration::from_secs(120),
            search_results: 5,
            scrape_pages: 2,
            scrape_max_chars: 8_000,
        }
    }
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, PipelineError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup. Unset and blank values fall
    /// back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, PipelineError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Config {
            openai_api_key: get("OPENAI_API_KEY"),
            serper_api_key: get("SERPER_API_KEY"),
            ..Config::default()
        };

        if let Some(model) = get("DOCWRIGHT_MODEL") {
            config.model = model;
        }
        if let Some(url) = get("OPENAI_BASE_URL") {
            config.openai_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(raw) = get("DOCWRIGHT_TEMPERATURE") {
            config.temperature = raw.parse().map_err(|_| {
                PipelineError::validation(format!("DOCWRIGHT_TEMPERATURE is not a number: {raw}"))
            })?;
        }
        if let Some(raw) = get("DOCWRIGHT_TIMEOUT_SECS") {
            let secs: u64 = raw.parse().map_err(|_| {
                PipelineError::validation(format!(
                    "DOCWRIGHT_TIMEOUT_SECS is not a whole number: {raw}"
                ))
            })?;
            if secs == 0 {
                return Err(PipelineError::validation(
                    "DOCWRIGHT_TIMEOUT_SECS must be at least 1",
                ));
            }
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// The model key, or [`PipelineError::MissingCredential`].
    pub fn require_openai_key(&self) -> Result<&str, PipelineError> {
        self.openai_api_key.as_deref().ok_or_else(|| {
            PipelineError::missing_credential("OPENAI_API_KEY is not set; no model access configured")
        })
    }
}

// Keys stay out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |k: &Option<String>| k.as_ref().map(|_| "<redacted>");
        f.debug_struct("Config")
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("serper_api_key", &redact(&self.serper_api_key))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("openai_base_url", &self.openai_base_url)
            .field("serper_url", &self.serper_url)
            .field("request_timeout", &self.request_timeout)
            .field("search_results", &self.search_results)
            .field("scrape_pages", &self.scrape_pages)
            .field("scrape_max_chars", &self.scrape_max_chars)
            .finish()
    }
}
