use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use docwright::Config;

/// Turn a topic and some notes into reviewed documentation and training
/// material using four cooperating LLM agents.
#[derive(Debug, Parser)]
#[command(name = "docwright", version, about)]
pub struct Args {
    /// Document title or topic.
    #[arg(short, long, required_unless_present = "list_templates")]
    pub topic: Option<String>,

    /// Kind of document to produce (see --list-templates).
    #[arg(
        short = 'k',
        long,
        env = "DOCWRIGHT_TEMPLATE",
        default_value = "Technical Documentation"
    )]
    pub template: String,

    /// Content to document, typed directly. Wins over --file.
    #[arg(short, long)]
    pub content: Option<String>,

    /// Read content from a .txt, .md or .csv file.
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Write the result to this Markdown file instead of stdout.
    #[arg(short, long, conflicts_with = "save")]
    pub output: Option<PathBuf>,

    /// Write the result to <Topic>_Documentation.md in the current directory.
    #[arg(long)]
    pub save: bool,

    /// Model name, overriding DOCWRIGHT_MODEL.
    #[arg(long)]
    pub model: Option<String>,

    /// Sampling temperature, overriding DOCWRIGHT_TEMPERATURE.
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Per-request timeout in seconds, overriding DOCWRIGHT_TIMEOUT_SECS.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Show the inputs that would be sent, without running the agents.
    #[arg(long)]
    pub preview: bool,

    /// Print the available templates and exit.
    #[arg(long)]
    pub list_templates: bool,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Flags win over values read from the environment.
    pub fn apply(&self, config: &mut Config) {
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(temperature) = self.temperature {
            config.temperature = temperature;
        }
        if let Some(secs) = self.timeout {
            config.request_timeout = Duration::from_secs(secs);
        }
    }
}
