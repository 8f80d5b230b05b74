//! The request a run starts from, and the four task prompts rendered from it.
//!
//! Rendering is a pure function of the request: the same request always
//! yields the same workflow.

use std::fmt;
use std::str::FromStr;

use log::warn;

use crate::agent::RoleKind;
use crate::error::PipelineError;
use crate::workflow::{Task, Workflow, WorkflowError};

/// The closed set of document kinds the pipeline can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    TechnicalDocumentation,
    MeetingMinutes,
    StandardReport,
    ApiDocumentation,
    UserGuide,
    ProjectProposal,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 6] = [
        TemplateKind::TechnicalDocumentation,
        TemplateKind::MeetingMinutes,
        TemplateKind::StandardReport,
        TemplateKind::ApiDocumentation,
        TemplateKind::UserGuide,
        TemplateKind::ProjectProposal,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::TechnicalDocumentation => "Technical Documentation",
            Self::MeetingMinutes => "Meeting Minutes",
            Self::StandardReport => "Standard Report",
            Self::ApiDocumentation => "API Documentation",
            Self::UserGuide => "User Guide",
            Self::ProjectProposal => "Project Proposal",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts the label in any case, with `-` or `_` standing in for spaces,
/// so `"user-guide"` and `"User Guide"` both parse.
impl FromStr for TemplateKind {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        TemplateKind::ALL
            .into_iter()
            .find(|k| normalize(k.label()) == wanted)
            .ok_or_else(|| {
                let known: Vec<_> = TemplateKind::ALL.iter().map(|k| k.label()).collect();
                PipelineError::validation(format!(
                    "unknown template '{}'; expected one of: {}",
                    s.trim(),
                    known.join(", ")
                ))
            })
    }
}

fn normalize(s: &str) -> String {
    s.split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// PipelineRequest
// ---------------------------------------------------------------------------

/// Everything one run needs from the caller. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineRequest {
    topic: String,
    template: TemplateKind,
    content: String,
}

impl PipelineRequest {
    /// Rejects a blank topic. Blank content is allowed but makes for thin
    /// research, so it is logged.
    pub fn new(
        topic: impl Into<String>,
        template: TemplateKind,
        content: impl Into<String>,
    ) -> Result<Self, PipelineError> {
        let topic = topic.into().trim().to_string();
        if topic.is_empty() {
            return Err(PipelineError::validation("topic must not be empty"));
        }

        let content = content.into();
        if content.trim().is_empty() {
            warn!("no content given for '{topic}'; research will rely on the topic alone");
        }

        Ok(Self {
            topic,
            template,
            content,
        })
    }

    /// Like [`PipelineRequest::new`], parsing the template from its label.
    pub fn parse(topic: &str, template: &str, content: &str) -> Result<Self, PipelineError> {
        Self::new(topic, template.parse()?, content)
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn template(&self) -> TemplateKind {
        self.template
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

// ---------------------------------------------------------------------------
// Task prompts
// ---------------------------------------------------------------------------

pub const RESEARCH: &str = "research";
pub const DOCUMENTATION: &str = "documentation";
pub const REVIEW: &str = "review";
pub const TRAINING: &str = "training";

fn research_task(req: &PipelineRequest) -> Task {
    let description = format!(
        "Research and analyze the following topic:\n\
         \n\
         Topic: {topic}\n\
         Template Type: {template}\n\
         Additional Context: {content}\n\
         \n\
         Your objectives:\n\
         1. Understand the core concepts and context\n\
         2. Identify key features, dimensions, or components\n\
         3. Gather relevant technical details and best practices\n\
         4. Organize findings in a structured format\n\
         \n\
         Provide a comprehensive research summary with all relevant information.",
        topic = req.topic,
        template = req.template,
        content = req.content,
    );

    let expected = "A detailed research report containing:\n\
                    - Executive summary of the topic\n\
                    - Key features and dimensions identified\n\
                    - Technical details and context\n\
                    - Relevant sources and references\n\
                    - Structured findings ready for documentation";

    Task::new(RESEARCH, RoleKind::Researcher.role(), description, expected)
        .with_search_query(req.topic.clone())
}

fn documentation_task(req: &PipelineRequest) -> Task {
    let template = req.template;
    let description = format!(
        "Using the research findings, create professional {template} documentation.\n\
         \n\
         Requirements:\n\
         1. Use clear, professional language\n\
         2. Follow {template} structure and conventions\n\
         3. Include all essential sections\n\
         4. Add examples where appropriate\n\
         5. Ensure logical flow and organization\n\
         \n\
         Create comprehensive documentation that serves as the definitive reference."
    );

    let expected = format!(
        "Complete {template} with:\n\
         - Proper structure and formatting\n\
         - All essential sections filled out\n\
         - Clear explanations and examples\n\
         - Professional language throughout\n\
         - Ready for review"
    );

    Task::new(
        DOCUMENTATION,
        RoleKind::DocumentationSpecialist.role(),
        description,
        expected,
    )
    .with_context([0])
}

fn review_task() -> Task {
    let description = "Review the documentation thoroughly for:\n\
                       \n\
                       1. Technical accuracy\n\
                       2. Completeness (no missing sections)\n\
                       3. Clarity and readability\n\
                       4. Consistency in terminology and style\n\
                       5. Proper grammar and formatting\n\
                       \n\
                       Provide the FINAL REVIEWED VERSION with all improvements incorporated.";

    let expected = "Final reviewed documentation with:\n\
                    - All errors corrected\n\
                    - Improvements implemented\n\
                    - Consistent formatting\n\
                    - Professional quality\n\
                    - Ready for publication\n\
                    \n\
                    IMPORTANT: Output the complete, final version of the documentation, \
                    not a review report.";

    Task::new(REVIEW, RoleKind::Reviewer.role(), description, expected).with_context([0, 1])
}

fn training_task() -> Task {
    let description = "Transform the reviewed documentation into training and onboarding materials.\n\
                       \n\
                       Create:\n\
                       1. Quick start guide\n\
                       2. Key takeaways (bullet points)\n\
                       3. Common scenarios or use cases\n\
                       4. Tips and best practices\n\
                       5. FAQ section\n\
                       \n\
                       Make it engaging and easy to learn from.";

    let expected = "Training materials including:\n\
                    - Quick start guide (step-by-step)\n\
                    - Key takeaways summary\n\
                    - Practical examples and scenarios\n\
                    - Tips and best practices\n\
                    - FAQ with common questions\n\
                    - Formatted for easy learning";

    Task::new(TRAINING, RoleKind::Trainer.role(), description, expected).with_context([2])
}

/// Render the four-task documentation workflow for `req`.
///
/// research → documentation (reads research) → review (reads research and
/// documentation) → training (reads review only).
pub fn build_workflow(req: &PipelineRequest) -> Result<Workflow, WorkflowError> {
    Workflow::builder("documentation")
        .task(research_task(req))
        .task(documentation_task(req))
        .task(review_task())
        .task(training_task())
        .build()
}
