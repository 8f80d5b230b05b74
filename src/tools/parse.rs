/// Remove a code fence wrapping the whole response, such as the
/// ```` ```markdown ```` block models like to put around a finished document.
/// Fences inside the text are left alone.
pub fn strip_code_fences(response: &str) -> String {
    let trimmed = response.trim();
    if !trimmed.starts_with("```") || !trimmed.ends_with("```") {
        return trimmed.to_string();
    }

    let lines: Vec<&str> = trimmed.lines().collect();
    if lines.len() < 2 {
        return trimmed.to_string();
    }
    let inner = &lines[1..lines.len() - 1];
    // An inner fence line means the first and last lines belong to separate blocks.
    if inner.iter().any(|line| line.trim_start().starts_with("```")) {
        return trimmed.to_string();
    }
    inner.join("\n")
}
