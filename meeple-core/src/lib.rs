//! Shared model for moving board game records between catalog services.
//!
//! Source records (collection entries and logged plays) are fetched from the
//! source catalog, reconciled against [`DestinationCandidate`]s found through
//! a [`DestinationCatalog`], and written back as [`PlayWrite`]s or collection
//! updates.

pub mod candidate;
pub mod date;
pub mod destination;
pub mod error;
pub mod record;

pub use candidate::DestinationCandidate;
pub use date::{HUMAN_DATE_FORMAT, WIRE_DATE_FORMAT, format_human, format_wire, parse_human_date, parse_wire_date};
pub use destination::{DestinationCatalog, PlayWrite, PlayerWrite};
pub use error::{DestinationError, RecordError};
pub use record::{
    CollectionEntry, OwnershipFlags, PlayRecord, Player, SourceRecord, order_players,
    split_duration,
};
