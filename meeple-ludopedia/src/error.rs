use meeple_core::DestinationError;

/// Errors that can occur while talking to Ludopedia or handling local config.
#[derive(Debug, thiserror::Error)]
pub enum LudopediaError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Ludopedia rejected the email/password combination")]
    AuthenticationFailed,

    #[error("Server error (HTTP {status}) from {endpoint}")]
    ServerError { endpoint: &'static str, status: u16 },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl LudopediaError {
    pub fn api(msg: impl Into<String>) -> Self {
        Self::Api(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<LudopediaError> for DestinationError {
    fn from(e: LudopediaError) -> Self {
        match e {
            LudopediaError::AuthenticationFailed => Self::Authentication(e.to_string()),
            LudopediaError::ServerError { status, .. } => Self::Rejected { status },
            LudopediaError::Json(_) | LudopediaError::Api(_) => Self::response(e.to_string()),
            other => Self::transport(other.to_string()),
        }
    }
}
