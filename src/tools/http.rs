use std::time::Duration;

use serde::de::DeserializeOwned;
use ureq::Agent;

use crate::error::PipelineError;

const USER_AGENT: &str = concat!("docwright/", env!("CARGO_PKG_VERSION"));

/// Blocking HTTP client shared by the capability clients.
///
/// Cloning is cheap and clones share one connection pool, so a single client
/// can serve concurrent runs.
#[derive(Clone)]
pub struct HttpClient {
    agent: Agent,
}

impl HttpClient {
    /// Every request through this client is bounded by `timeout`.
    pub fn new(timeout: Duration) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();

        Self {
            agent: config.into(),
        }
    }

    /// Send a GET request and return the response body as a string.
    pub fn get(&self, url: &str) -> Result<String, PipelineError> {
        let body: String = self
            .agent
            .get(url)
            .header("User-Agent", USER_AGENT)
            .call()?
            .body_mut()
            .read_to_string()?;

        Ok(body)
    }

    /// Send a POST request with a JSON body and decode the JSON response.
    pub fn post_json<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> Result<T, PipelineError> {
        let mut request = self.agent.post(url).header("User-Agent", USER_AGENT);
        for &(name, value) in headers {
            request = request.header(name, value);
        }

        let response = request.send_json(body)?.body_mut().read_json::<T>()?;

        Ok(response)
    }
}
