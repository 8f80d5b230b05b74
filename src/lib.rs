//! A four-agent documentation pipeline: research, draft, review, train.
//!
//! A [`PipelineRequest`] (topic, [`TemplateKind`], free-text content) is
//! rendered into four [`Task`]s, each bound to a fixed [`AgentRole`]. The
//! [`Runner`] executes them strictly in order, appending the output of each
//! task's declared dependencies to its prompt, and returns the last task's
//! output. Text generation, web search and page scraping come in through the
//! [`TextGenerator`], [`tools::WebSearch`] and [`tools::PageScrape`] traits.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use docwright::{AgentRole, Pipeline, PipelineError, TextGenerator};
//!
//! struct Canned;
//! impl TextGenerator for Canned {
//!     fn generate(&self, _prompt: &str, role: &AgentRole) -> Result<String, PipelineError> {
//!         Ok(format!("written by {}", role.name))
//!     }
//! }
//!
//! let pipeline = Pipeline::new(Arc::new(Canned));
//! let result = pipeline
//!     .run("Release process", "User Guide", "Tag, build, publish.")
//!     .unwrap();
//! assert_eq!(result, "written by Training & Onboarding Specialist");
//! ```
//!
//! With real clients, build a [`Config`] once and call
//! [`Pipeline::from_config`].

mod agent;
mod config;
mod ctx;
mod error;
mod llm;
mod pipeline;
pub mod prompts;
mod runner;
pub mod sink;
pub mod source;
pub mod tools;
mod workflow;

pub use agent::{
    AgentRole, Capability, DOCUMENTATION_SPECIALIST, RESEARCHER, REVIEWER, RoleKind, TRAINER,
};
pub use config::Config;
pub use ctx::Ctx;
pub use error::{FailureKind, PipelineError};
pub use llm::{LlmRequest, OpenAiGenerator, TextGenerator};
pub use pipeline::Pipeline;
pub use prompts::{PipelineRequest, TemplateKind, build_workflow};
pub use runner::{ErrorEvent, RunState, Runner, StepEvent, TaskResult};
pub use workflow::{Task, Workflow, WorkflowBuilder, WorkflowError};
