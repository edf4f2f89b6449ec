use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Ludopedia session or request failed
    #[error("Ludopedia error: {0}")]
    Destination(String),

    /// The import run stopped
    #[error("{0}")]
    Import(#[from] meeple_import::ImportError),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

impl From<meeple_ludopedia::LudopediaError> for CliError {
    fn from(e: meeple_ludopedia::LudopediaError) -> Self {
        match e {
            meeple_ludopedia::LudopediaError::Config(msg) => Self::Config(msg),
            other => Self::Destination(other.to_string()),
        }
    }
}
