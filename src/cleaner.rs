use std::sync::OnceLock;

use regex::Regex;

use crate::error::{SummarizerError, SummarizerResult};

/// Residue of the rendered transcript metadata once special characters are gone.
pub const METADATA_MARKER: &str = "metadata'source'";

struct Patterns {
    brackets: Regex,
    escaped_newline: Regex,
    special: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        brackets: Regex::new(r"\[.*?\]").expect("static regex compile"),
        escaped_newline: Regex::new(r"\\n").expect("static regex compile"),
        special: Regex::new(r"[^\w\s.']").expect("static regex compile"),
    })
}

/// Cleans a raw transcript: drops `[...]` annotations and escaped newlines,
/// collapses whitespace, removes everything but word characters, whitespace,
/// periods and apostrophes, and cuts the trailing metadata. The result holds
/// single spaces only, with no leading or trailing whitespace.
pub fn clean_transcript(transcript: &str) -> SummarizerResult<String> {
    if transcript.is_empty() {
        return Err(SummarizerError::invalid_input("Input text cannot be empty."));
    }
    if !transcript.chars().any(char::is_alphanumeric) {
        return Err(SummarizerError::invalid_input(
            "Input text consists only of special characters.",
        ));
    }

    let patterns = patterns();
    let text = patterns.brackets.replace_all(transcript, "");
    let text = patterns.escaped_newline.replace_all(&text, " ");
    let text = collapse_whitespace(&text);
    let text = patterns.special.replace_all(&text, "");
    // Dropping a lone symbol between spaces leaves a double space behind.
    let text = collapse_whitespace(&text);
    let cleaned = match text.find(METADATA_MARKER) {
        Some(end) => text[..end].trim_end().to_string(),
        None => text,
    };

    tracing::debug!(
        before = transcript.len(),
        after = cleaned.len(),
        "transcript cleaned"
    );
    Ok(cleaned)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<&str>>().join(" ")
}
