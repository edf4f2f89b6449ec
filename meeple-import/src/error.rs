use meeple_bgg::BggError;
use meeple_core::DestinationError;
use thiserror::Error;

/// Errors raised while reconciling and writing records.
///
/// Some variants abort the whole run, the rest fail a single record; see
/// [`ImportError::is_fatal`].
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("BoardGameGeek user '{0}' is invalid")]
    InvalidSubject(String),

    #[error("Could not log in to the destination: {0}")]
    Authentication(String),

    #[error("Source error: {0}")]
    Source(BggError),

    #[error("Game not found on the destination: {0}")]
    NoMatchFound(String),

    #[error("Destination did not confirm the write for {0}")]
    WriteRejected(String),

    #[error("Destination error: {0}")]
    Destination(DestinationError),

    #[error("Import cancelled")]
    Cancelled,

    #[error("Pipeline thread panicked")]
    Panicked,
}

impl ImportError {
    /// True if the run must stop. Everything else fails only the current
    /// record.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvalidSubject(_)
                | Self::Authentication(_)
                | Self::Source(_)
                | Self::Cancelled
                | Self::Panicked
        )
    }
}

impl From<BggError> for ImportError {
    fn from(e: BggError) -> Self {
        match e {
            BggError::InvalidSubject(user) => Self::InvalidSubject(user),
            other => Self::Source(other),
        }
    }
}

impl From<DestinationError> for ImportError {
    fn from(e: DestinationError) -> Self {
        match e {
            DestinationError::Authentication(msg) => Self::Authentication(msg),
            other => Self::Destination(other),
        }
    }
}
