use chrono::NaiveDate;

use crate::candidate::DestinationCandidate;
use crate::error::DestinationError;
use crate::record::OwnershipFlags;

/// A play ready to be submitted to the destination catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayWrite {
    pub destination_id: String,
    pub date: NaiveDate,
    pub duration_hours: u32,
    pub duration_minutes: u32,
    pub description: Option<String>,
    /// One entry per player, in the play's player order.
    pub players: Vec<PlayerWrite>,
}

/// The per-player columns of a play write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerWrite {
    /// `"0"` for the importing user's own row, empty for everyone else.
    pub local_id: String,
    /// Destination user id, empty when the player is not mapped.
    pub user_id: String,
    pub name: String,
    pub winner: bool,
    pub score: String,
    pub note: String,
}

/// Operations the importer needs from the destination catalog service.
///
/// Implementations own the authenticated session. All calls are made from a
/// single pipeline thread, one at a time.
pub trait DestinationCatalog {
    /// Search the destination for games matching `query`, in the
    /// destination's own relevance order.
    fn search_games(&self, query: &str) -> Result<Vec<DestinationCandidate>, DestinationError>;

    /// Add or update a game in the user's destination collection.
    fn add_to_collection(
        &self,
        destination_id: &str,
        flags: OwnershipFlags,
    ) -> Result<(), DestinationError>;

    /// Submit a play. Returns the destination's id for the new play, or
    /// `None` when the response carried no success marker.
    fn log_play(&self, play: &PlayWrite) -> Result<Option<String>, DestinationError>;

    /// Resolve a destination username to its numeric user id.
    fn lookup_user_id(&self, username: &str) -> Result<Option<String>, DestinationError>;
}
