/// Errors raised while building or converting records.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Invalid date '{value}' (expected {expected})")]
    InvalidDate { value: String, expected: &'static str },
}

/// Errors surfaced by a [`crate::DestinationCatalog`] implementation.
///
/// The import pipeline only needs to tell credential problems (which abort a
/// run) apart from everything else (which fails a single record).
#[derive(Debug, thiserror::Error)]
pub enum DestinationError {
    #[error("Destination rejected the session: {0}")]
    Authentication(String),

    #[error("Destination request failed: {0}")]
    Transport(String),

    #[error("Destination rejected the write (HTTP {status})")]
    Rejected { status: u16 },

    #[error("Unexpected destination response: {0}")]
    Response(String),
}

impl DestinationError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn response(msg: impl Into<String>) -> Self {
        Self::Response(msg.into())
    }
}
