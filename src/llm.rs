use log::debug;
use serde::Deserialize;

use crate::agent::AgentRole;
use crate::config::Config;
use crate::error::PipelineError;
use crate::tools::HttpClient;

/// Text generation bound to a role's persona.
///
/// Implementations must be safe to share between concurrent runs and must
/// not keep per-run state.
pub trait TextGenerator: Send + Sync {
    fn generate(&self, prompt: &str, role: &AgentRole) -> Result<String, PipelineError>;
}

/// Builder for one generation call, handed out by [`crate::Ctx::llm`].
///
/// The prompt is assembled from sections in the order they are added,
/// separated by blank lines. Section bodies are included verbatim.
pub struct LlmRequest<'a> {
    generator: &'a dyn TextGenerator,
    role: &'a AgentRole,
    sections: Vec<String>,
}

impl<'a> LlmRequest<'a> {
    pub(crate) fn new(generator: &'a dyn TextGenerator, role: &'a AgentRole) -> Self {
        Self {
            generator,
            role,
            sections: Vec::new(),
        }
    }

    /// Append free text to the prompt.
    pub fn user(mut self, text: impl Into<String>) -> Self {
        self.sections.push(text.into());
        self
    }

    /// Append a headed section.
    pub fn section(mut self, heading: &str, body: &str) -> Self {
        self.sections.push(format!("{heading}:\n{body}"));
        self
    }

    /// The prompt as it will be sent.
    pub fn prompt(&self) -> String {
        self.sections.join("\n\n")
    }

    pub fn send(self) -> Result<String, PipelineError> {
        let prompt = self.prompt();
        debug!("generating as '{}' ({} prompt chars)", self.role.name, prompt.len());
        self.generator.generate(&prompt, self.role)
    }
}

// ---------------------------------------------------------------------------
// OpenAI chat completions
// ---------------------------------------------------------------------------

/// [`TextGenerator`] backed by an OpenAI-compatible chat completions endpoint.
pub struct OpenAiGenerator {
    http: HttpClient,
    api_key: String,
    endpoint: String,
    model: String,
    temperature: f32,
}

impl OpenAiGenerator {
    pub fn new(
        http: HttpClient,
        api_key: impl Into<String>,
        base_url: &str,
        model: impl Into<String>,
        temperature: f32,
    ) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            model: model.into(),
            temperature,
        }
    }

    /// Fails with [`PipelineError::MissingCredential`] when no key is configured.
    pub fn from_config(config: &Config, http: HttpClient) -> Result<Self, PipelineError> {
        let key = config.require_openai_key()?;
        Ok(Self::new(
            http,
            key,
            &config.openai_base_url,
            config.model.clone(),
            config.temperature,
        ))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn body(&self, prompt: &str, role: &AgentRole) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "temperature": self.temperature,
            "messages": [
                { "role": "system", "content": role.persona() },
                { "role": "user", "content": prompt },
            ],
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

fn first_content(response: ChatResponse) -> Result<String, PipelineError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| PipelineError::generation("model returned no content"))
}

impl TextGenerator for OpenAiGenerator {
    fn generate(&self, prompt: &str, role: &AgentRole) -> Result<String, PipelineError> {
        let auth = format!("Bearer {}", self.api_key);
        let response: ChatResponse = self.http.post_json(
            &self.endpoint,
            &[("Authorization", auth.as_str())],
            &self.body(prompt, role),
        )?;

        first_content(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{RESEARCHER, TRAINER};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct Echo {
        seen: Mutex<Vec<(String, String)>>,
    }

    impl TextGenerator for Echo {
        fn generate(&self, prompt: &str, role: &AgentRole) -> Result<String, PipelineError> {
            self.seen
                .lock()
                .unwrap()
                .push((role.name.to_string(), prompt.to_string()));
            Ok("ok".into())
        }
    }

    #[test]
    fn request_joins_sections_in_order() {
        let echo = Echo::default();
        let request = LlmRequest::new(&echo, &TRAINER)
            .user("Write it.")
            .section("Context from review", "line one\nline two");

        assert_eq!(
            request.prompt(),
            "Write it.\n\nContext from review:\nline one\nline two"
        );
    }

    #[test]
    fn send_passes_role_and_prompt() {
        let echo = Echo::default();
        let out = LlmRequest::new(&echo, &RESEARCHER).user("hi").send().unwrap();

        assert_eq!(out, "ok");
        let seen = echo.seen.lock().unwrap();
        assert_eq!(seen[0], (RESEARCHER.name.to_string(), "hi".to_string()));
    }

    #[test]
    fn body_carries_persona_and_prompt() {
        let generator = OpenAiGenerator::new(
            HttpClient::new(Duration::from_secs(1)),
            "sk-test",
            "https://api.openai.com/v1/",
            "gpt-4o-mini",
            0.5,
        );
        assert_eq!(generator.endpoint, "https://api.openai.com/v1/chat/completions");

        let body = generator.body("the prompt", &TRAINER);
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["content"], TRAINER.persona());
        assert_eq!(body["messages"][1]["content"], "the prompt");
    }

    #[test]
    fn first_content_picks_first_choice() {
        let response: ChatResponse = serde_json::from_str(
            r##"{"choices": [{"message": {"role": "assistant", "content": "# Doc"}}]}"##,
        )
        .unwrap();
        assert_eq!(first_content(response).unwrap(), "# Doc");
    }

    #[test]
    fn blank_or_missing_content_is_a_failure() {
        let blank: ChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": "  "}}]}"#).unwrap();
        assert!(first_content(blank).is_err());

        let none: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        let err = first_content(none).err().unwrap();
        assert!(!err.is_transient());
    }

    #[test]
    fn from_config_requires_key() {
        let config = Config::default();
        let http = HttpClient::new(Duration::from_secs(1));
        let err = OpenAiGenerator::from_config(&config, http).err().unwrap();
        assert!(matches!(err, PipelineError::MissingCredential(_)));
    }

    #[test]
    fn unreachable_endpoint_is_transient() {
        let generator = OpenAiGenerator::new(
            HttpClient::new(Duration::from_secs(2)),
            "sk-test",
            "http://localhost:1/v1",
            "gpt-4o-mini",
            0.7,
        );
        let err = generator.generate("hi", &TRAINER).err().unwrap();
        assert!(err.is_transient());
    }
}
