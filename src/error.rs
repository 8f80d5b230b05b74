use std::fmt;

/// Error type for a pipeline run, with variants designed around what the
/// caller can do about them.
///
/// Every variant ends the run. Nothing is retried inside the pipeline; the
/// caller decides whether to start a fresh run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A capability client needed for the run is not configured.
    /// Fix the configuration, retrying won't help.
    #[error("missing credential: {0}")]
    MissingCredential(String),

    /// The request was rejected before any generation happened.
    #[error("invalid request: {0}")]
    Validation(String),

    /// The model or one of the research tools failed, or returned nothing usable.
    #[error("{kind}: {message}")]
    Generation { message: String, kind: FailureKind },
}

/// Whether a generation failure is worth a fresh run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Network, rate limit, timeout.
    Transient,
    /// Rejected request, unusable output.
    Permanent,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transient => write!(f, "transient generation failure"),
            Self::Permanent => write!(f, "generation failed"),
        }
    }
}

impl PipelineError {
    /// Create a [`MissingCredential`](PipelineError::MissingCredential) error.
    pub fn missing_credential(msg: impl Into<String>) -> Self {
        PipelineError::MissingCredential(msg.into())
    }

    /// Create a [`Validation`](PipelineError::Validation) error.
    pub fn validation(msg: impl Into<String>) -> Self {
        PipelineError::Validation(msg.into())
    }

    /// A generation failure that a later, fresh run might not hit
    /// (network, rate limit, timeout).
    pub fn transient(msg: impl Into<String>) -> Self {
        PipelineError::Generation {
            message: msg.into(),
            kind: FailureKind::Transient,
        }
    }

    /// A generation failure that will repeat on a fresh run.
    pub fn generation(msg: impl Into<String>) -> Self {
        PipelineError::Generation {
            message: msg.into(),
            kind: FailureKind::Permanent,
        }
    }

    /// Whether starting the run over has a chance of succeeding.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PipelineError::Generation {
                kind: FailureKind::Transient,
                ..
            }
        )
    }
}

impl From<ureq::Error> for PipelineError {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::StatusCode(code) if code == 429 || code >= 500 => {
                PipelineError::transient(format!("http status {code}"))
            }
            ureq::Error::StatusCode(code) => {
                PipelineError::generation(format!("http status {code}"))
            }
            ureq::Error::Json(e) => PipelineError::generation(format!("unexpected response: {e}")),
            other => PipelineError::transient(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credential_constructor() {
        let err = PipelineError::missing_credential("OPENAI_API_KEY");
        assert!(matches!(err, PipelineError::MissingCredential(msg) if msg == "OPENAI_API_KEY"));
    }

    #[test]
    fn transient_constructor() {
        let err = PipelineError::transient("timeout");
        assert!(err.is_transient());
    }

    #[test]
    fn generation_constructor_is_permanent() {
        let err = PipelineError::generation("empty output");
        assert!(!err.is_transient());
    }

    #[test]
    fn display_validation() {
        let err = PipelineError::validation("topic is empty");
        assert_eq!(err.to_string(), "invalid request: topic is empty");
    }

    #[test]
    fn display_missing_credential() {
        let err = PipelineError::missing_credential("OPENAI_API_KEY is not set");
        assert_eq!(err.to_string(), "missing credential: OPENAI_API_KEY is not set");
    }

    #[test]
    fn display_generation() {
        assert_eq!(
            PipelineError::transient("timeout").to_string(),
            "transient generation failure: timeout"
        );
        assert_eq!(
            PipelineError::generation("nope").to_string(),
            "generation failed: nope"
        );
    }

    #[test]
    fn rate_limit_status_is_transient() {
        let err: PipelineError = ureq::Error::StatusCode(429).into();
        assert!(err.is_transient());
    }

    #[test]
    fn server_error_status_is_transient() {
        let err: PipelineError = ureq::Error::StatusCode(503).into();
        assert!(err.is_transient());
    }

    #[test]
    fn client_error_status_is_permanent() {
        let err: PipelineError = ureq::Error::StatusCode(401).into();
        assert!(!err.is_transient());
        assert!(err.to_string().contains("401"));
    }
}
