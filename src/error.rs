use thiserror::Error;

#[derive(Debug, Error)]
pub enum SummarizerError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("the video doesn't have a transcript")]
    NoTranscript,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),

    // Collaborator failures pass through untouched.
    #[error(transparent)]
    External(#[from] anyhow::Error),
}

impl SummarizerError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        SummarizerError::InvalidInput(message.into())
    }

    /// Stable code for the error class, used by the CLI when reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            SummarizerError::InvalidInput(_) => "INVALID_INPUT",
            SummarizerError::NoTranscript => "NO_TRANSCRIPT",
            SummarizerError::Config(_) | SummarizerError::Io(_) | SummarizerError::Json(_) => {
                "CONFIG"
            }
            SummarizerError::External(_) => "EXTERNAL_FAILURE",
        }
    }
}

pub type SummarizerResult<T> = Result<T, SummarizerError>;

#[cfg(test)]
mod tests {
    use super::SummarizerError;

    #[test]
    fn display_messages_cover_all_variants() {
        let cases = vec![
            (
                SummarizerError::invalid_input("Video URL cannot be empty."),
                "invalid input: Video URL cannot be empty.",
                "INVALID_INPUT",
            ),
            (
                SummarizerError::NoTranscript,
                "the video doesn't have a transcript",
                "NO_TRANSCRIPT",
            ),
            (
                SummarizerError::Config("missing token".to_owned()),
                "invalid configuration: missing token",
                "CONFIG",
            ),
            (
                SummarizerError::Io(std::io::Error::other("disk gone")),
                "io error: disk gone",
                "CONFIG",
            ),
            (
                SummarizerError::Json(serde_json::from_str::<serde_json::Value>("{bad").unwrap_err()),
                "json parse error: ",
                "CONFIG",
            ),
            (
                SummarizerError::External(anyhow::anyhow!("model exploded")),
                "model exploded",
                "EXTERNAL_FAILURE",
            ),
        ];

        for (error, expected_prefix, expected_kind) in cases {
            let display = format!("{error}");
            assert!(
                display.starts_with(expected_prefix),
                "display message `{display}` did not start with `{expected_prefix}`"
            );
            assert_eq!(error.kind(), expected_kind);
        }
    }

    #[test]
    fn external_errors_keep_their_source_chain() {
        let inner = anyhow::anyhow!("connection refused").context("Failed to fetch transcript");
        let error = SummarizerError::from(inner);
        assert_eq!(error.to_string(), "Failed to fetch transcript");
        let root = std::error::Error::source(&error).map(|source| source.to_string());
        assert_eq!(root.as_deref(), Some("connection refused"));
    }
}
