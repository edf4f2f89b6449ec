//! Reconciliation and import of BoardGameGeek records into Ludopedia.
//!
//! [`ImportPipeline`] walks a batch of records one at a time: the
//! [`MatchResolver`] finds the destination game (consulting the run's
//! [`IdentityCache`] and, when needed, a human through a [`Disambiguator`]),
//! the [`UserIdentityMap`] attributes players, and the write goes to a
//! [`meeple_core::DestinationCatalog`]. [`spawn_pipeline`] runs all of this on
//! its own thread and hands decisions back over a channel.

pub mod cache;
pub mod disambiguation;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod resolver;
pub mod session;
pub mod users;

pub use cache::IdentityCache;
pub use disambiguation::{
    Answer, Declining, DisambiguationChannel, DisambiguationRequest, Disambiguator,
    PendingRequest, PipelineMessage,
};
pub use error::ImportError;
pub use pipeline::{
    ImportPipeline, ImportSummary, PipelineStage, RecordFailure, build_play_write, player_note,
};
pub use progress::{ChannelProgress, ImportEvent, ImportProgress, SilentProgress};
pub use resolver::{MatchMethod, MatchResolver, Resolution};
pub use session::{PipelineContext, PipelineHandle, spawn_pipeline};
pub use users::{UserIdentityMap, parse_store};
