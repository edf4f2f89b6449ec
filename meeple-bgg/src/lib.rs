//! Read-only client for the BoardGameGeek XML API 2.
//!
//! [`RateLimitedFetcher`] absorbs the API's "busy" responses,
//! [`PaginatedCollector`] turns a [`RecordQuery`] into a lazy stream of
//! [`meeple_core::SourceRecord`]s.

pub mod client;
pub mod collector;
pub mod error;
pub mod thing;
pub mod xml;

pub use client::{Endpoint, HttpTransport, RETRY_INTERVAL, RateLimitedFetcher, SourceResponse, SourceTransport};
pub use collector::{
    PLAYS_PAGE_SIZE, PaginatedCollector, PaginationState, RecordQuery, RecordStream,
    resolve_date_range,
};
pub use error::BggError;
pub use thing::YearLookup;
