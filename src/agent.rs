use std::fmt;

/// An external operation a role may invoke besides plain text generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Query a web search engine for ranked results.
    WebSearch,
    /// Fetch a page and extract its readable text.
    PageScrape,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WebSearch => write!(f, "web search"),
            Self::PageScrape => write!(f, "page scrape"),
        }
    }
}

/// A fixed persona plus the capabilities it is allowed to use.
///
/// Roles are static configuration. The four built-in roles live in
/// [`RoleKind`]; a [`crate::Task`] holds a `&'static AgentRole`.
#[derive(Debug, PartialEq, Eq)]
pub struct AgentRole {
    /// Display name, also used as the persona title in the system prompt.
    pub name: &'static str,
    /// What the role is trying to achieve.
    pub goal: &'static str,
    /// Persona description handed to the model.
    pub backstory: &'static str,
    /// Capabilities beyond text generation. Empty for most roles.
    pub capabilities: &'static [Capability],
}

impl AgentRole {
    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Render the persona as a system prompt.
    pub fn persona(&self) -> String {
        format!(
            "You are a {}.\nYour goal: {}\n\n{}",
            self.name, self.goal, self.backstory
        )
    }
}

pub static RESEARCHER: AgentRole = AgentRole {
    name: "Technical Researcher",
    goal: "Gather comprehensive information about the topic, analyze context, \
           and identify key features and dimensions",
    backstory: "You are an expert researcher with a keen eye for detail. You excel at \
                finding relevant information, understanding technical concepts, and \
                breaking down complex topics into structured insights. You always verify \
                your sources and provide context-rich analysis.",
    capabilities: &[Capability::WebSearch, Capability::PageScrape],
};

pub static DOCUMENTATION_SPECIALIST: AgentRole = AgentRole {
    name: "Senior Documentation Specialist",
    goal: "Transform research findings into clear, structured, and professional \
           technical documentation",
    backstory: "You are a seasoned technical writer with 10+ years of experience. You \
                know how to take complex information and make it accessible without \
                losing technical accuracy. Your documentation is known for its clarity, \
                organization, and completeness.",
    capabilities: &[],
};

pub static REVIEWER: AgentRole = AgentRole {
    name: "Quality Assurance Reviewer",
    goal: "Review documentation for accuracy, completeness, clarity, and adherence \
           to standards",
    backstory: "You are a meticulous reviewer with an eye for inconsistencies and gaps. \
                You make sure documentation is technically accurate and provides real \
                value to readers. You catch errors others miss and fix them yourself.",
    capabilities: &[],
};

pub static TRAINER: AgentRole = AgentRole {
    name: "Training & Onboarding Specialist",
    goal: "Convert technical documentation into engaging, easy-to-understand \
           training materials",
    backstory: "You are an expert educator who creates onboarding and training content. \
                You understand different learning styles and present information in ways \
                that stick, so new team members quickly become productive.",
    capabilities: &[],
};

/// The four built-in roles, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleKind {
    Researcher,
    DocumentationSpecialist,
    Reviewer,
    Trainer,
}

impl RoleKind {
    pub const ALL: [RoleKind; 4] = [
        RoleKind::Researcher,
        RoleKind::DocumentationSpecialist,
        RoleKind::Reviewer,
        RoleKind::Trainer,
    ];

    pub fn role(self) -> &'static AgentRole {
        match self {
            Self::Researcher => &RESEARCHER,
            Self::DocumentationSpecialist => &DOCUMENTATION_SPECIALIST,
            Self::Reviewer => &REVIEWER,
            Self::Trainer => &TRAINER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_researcher_has_capabilities() {
        assert!(RESEARCHER.has(Capability::WebSearch));
        assert!(RESEARCHER.has(Capability::PageScrape));

        for kind in &RoleKind::ALL[1..] {
            assert!(kind.role().capabilities.is_empty(), "{:?}", kind);
        }
    }

    #[test]
    fn role_names_are_distinct() {
        let mut names: Vec<_> = RoleKind::ALL.iter().map(|k| k.role().name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 4);
    }

    #[test]
    fn persona_includes_name_and_goal() {
        let persona = REVIEWER.persona();
        assert!(persona.starts_with("You are a Quality Assurance Reviewer."));
        assert!(persona.contains(REVIEWER.goal));
        assert!(persona.contains(REVIEWER.backstory));
    }

    #[test]
    fn display_capability() {
        assert_eq!(Capability::WebSearch.to_string(), "web search");
        assert_eq!(Capability::PageScrape.to_string(), "page scrape");
    }
}
