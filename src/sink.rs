//! Writing a finished result to disk.

use std::fs;
use std::path::{Path, PathBuf};

use crate::tools::strip_code_fences;

#[derive(Debug, thiserror::Error)]
#[error("failed to write {path:?}: {source}")]
pub struct SinkError {
    path: PathBuf,
    source: std::io::Error,
}

/// `<Topic_With_Underscores>_Documentation.md`. Path separators in the topic
/// become underscores too, so the name always stays in the target directory.
pub fn default_file_name(topic: &str) -> String {
    let stem: String = topic
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            c => c,
        })
        .collect();
    format!("{stem}_Documentation.md")
}

/// The document as it should be saved or shown: a code fence wrapping the
/// whole text is removed and a single trailing newline added.
pub fn render_markdown(text: &str) -> String {
    let mut body = strip_code_fences(text);
    body.push('\n');
    body
}

/// Write [`render_markdown`] of `text` to `path`, creating parent directories.
pub fn write_markdown(path: &Path, text: &str) -> Result<(), SinkError> {
    let err = |source| SinkError {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(err)?;
    }

    fs::write(path, render_markdown(text)).map_err(err)
}
