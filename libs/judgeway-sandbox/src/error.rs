use std::fmt;

/// Which sandbox call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Submit,
    Poll,
    Languages,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Submit => write!(f, "submit"),
            Stage::Poll => write!(f, "poll"),
            Stage::Languages => write!(f, "languages"),
        }
    }
}

/// Network or service failure talking to the sandbox
///
/// Surfaced straight to the caller of `execute`; nothing here is retried.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("sandbox {stage} request failed: {source}")]
    Request {
        stage: Stage,
        #[source]
        source: reqwest::Error,
    },

    #[error("sandbox {stage} request returned status {status}: {body}")]
    Status { stage: Stage, status: u16, body: String },

    #[error("failed to decode sandbox field {field}: {reason}")]
    Decode { field: &'static str, reason: String },

    #[error("failed to build sandbox HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl TransportError {
    pub fn stage(&self) -> Option<Stage> {
        match self {
            TransportError::Request { stage, .. } | TransportError::Status { stage, .. } => {
                Some(*stage)
            }
            TransportError::Decode { .. } | TransportError::Client(_) => None,
        }
    }
}
