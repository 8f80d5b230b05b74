//! Where the free-text content of a request comes from.

use std::fs;
use std::path::{Path, PathBuf};

use crate::prompts::TemplateKind;

/// Characters of content shown by [`preview`].
const PREVIEW_CHARS: usize = 500;

/// Extensions read as plain text. CSV is passed through as-is; the model
/// reads the table fine without reformatting.
const TEXT_EXTENSIONS: &[&str] = &["txt", "text", "md", "markdown", "csv"];

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("unsupported file type '{extension}' for {path:?}; use a text, markdown or CSV file")]
    Unsupported { path: PathBuf, extension: String },

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    Text(String),
    File(PathBuf),
    Empty,
}

impl ContentSource {
    /// Typed text wins over a file when both are given.
    pub fn pick(text: Option<String>, file: Option<PathBuf>) -> Self {
        match (text, file) {
            (Some(text), _) if !text.trim().is_empty() => ContentSource::Text(text),
            (_, Some(path)) => ContentSource::File(path),
            _ => ContentSource::Empty,
        }
    }

    pub fn load(&self) -> Result<String, SourceError> {
        match self {
            ContentSource::Text(text) => Ok(text.clone()),
            ContentSource::File(path) => read_text_file(path),
            ContentSource::Empty => Ok(String::new()),
        }
    }
}

fn read_text_file(path: &Path) -> Result<String, SourceError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if !TEXT_EXTENSIONS.contains(&extension.as_str()) {
        return Err(SourceError::Unsupported {
            path: path.to_path_buf(),
            extension,
        });
    }

    fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Summarize a request's inputs without running anything.
pub fn preview(topic: &str, template: TemplateKind, content: &str) -> String {
    let excerpt: String = content.chars().take(PREVIEW_CHARS).collect();
    let ellipsis = if content.chars().count() > PREVIEW_CHARS {
        "..."
    } else {
        ""
    };
    let body = if content.trim().is_empty() {
        "(no content)".to_string()
    } else {
        format!("{excerpt}{ellipsis}")
    };

    format!("Topic: {topic}\nTemplate: {template}\n\n{body}")
}
