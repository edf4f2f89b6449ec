//! Multi-page retrieval of a user's collection or play history.

use std::collections::VecDeque;

use chrono::NaiveDate;
use meeple_core::{SourceRecord, format_wire, order_players, parse_human_date};

use crate::client::{Endpoint, RateLimitedFetcher, SourceTransport};
use crate::error::BggError;
use crate::thing::YearLookup;
use crate::xml::{SourcePage, parse_collection_page, parse_plays_page};

/// Plays per page, fixed by the API.
pub const PLAYS_PAGE_SIZE: usize = 100;

/// What to fetch, and for whom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordQuery {
    Collection {
        username: String,
    },
    Plays {
        username: String,
        min_date: NaiveDate,
        max_date: NaiveDate,
    },
}

impl RecordQuery {
    pub fn collection(username: impl Into<String>) -> Self {
        Self::Collection {
            username: username.into(),
        }
    }

    pub fn plays(username: impl Into<String>, min_date: NaiveDate, max_date: NaiveDate) -> Self {
        Self::Plays {
            username: username.into(),
            min_date,
            max_date,
        }
    }

    pub fn username(&self) -> &str {
        match self {
            Self::Collection { username } | Self::Plays { username, .. } => username,
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        match self {
            Self::Collection { .. } => Endpoint::Collection,
            Self::Plays { .. } => Endpoint::Plays,
        }
    }

    fn params(&self, page: usize) -> Vec<(&'static str, String)> {
        match self {
            Self::Collection { username } => vec![("username", username.clone())],
            Self::Plays {
                username,
                min_date,
                max_date,
            } => vec![
                ("username", username.clone()),
                ("page", page.to_string()),
                ("mindate", format_wire(*min_date)),
                ("maxdate", format_wire(*max_date)),
            ],
        }
    }

    fn parse(&self, body: &str) -> Result<SourcePage, BggError> {
        let page = match self {
            Self::Collection { .. } => parse_collection_page(body),
            Self::Plays { .. } => parse_plays_page(body),
        };
        page.map_err(|e| match e {
            BggError::InvalidSubject(_) => BggError::InvalidSubject(self.username().to_string()),
            other => other,
        })
    }
}

/// Turn the `dd/mm/yyyy` bounds typed by a user into a date range.
///
/// An unparsable start falls back to `today`; an unparsable end falls back to
/// the start.
pub fn resolve_date_range(min_date: &str, max_date: &str, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let min = parse_human_date(min_date).unwrap_or_else(|e| {
        log::warn!("{e}; using today as the start date");
        today
    });
    let max = parse_human_date(max_date).unwrap_or_else(|e| {
        log::warn!("{e}; using the start date as the end date");
        min
    });
    (min, max)
}

/// Progress of one paginated fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    /// 1-based number of the next page to fetch.
    pub page: usize,
    pub page_size: usize,
    /// Declared record count, known once page 1 arrived.
    pub total_expected: Option<usize>,
    pub collected: usize,
}

impl PaginationState {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size,
            total_expected: None,
            collected: 0,
        }
    }

    /// Page count for display. Termination never depends on it.
    pub fn total_pages(&self) -> Option<usize> {
        self.total_expected
            .map(|total| total.div_ceil(self.page_size.max(1)).max(1))
    }

    pub fn is_complete(&self) -> bool {
        self.collected >= self.total_expected.unwrap_or(0)
    }
}

/// Drives page-by-page retrieval over a [`RateLimitedFetcher`].
///
/// The publication-year memo lives as long as the collector, so fetching
/// several record sets with one collector shares the thing lookups.
pub struct PaginatedCollector<T> {
    fetcher: RateLimitedFetcher<T>,
    years: YearLookup,
    page_size: usize,
}

impl<T: SourceTransport> PaginatedCollector<T> {
    pub fn new(fetcher: RateLimitedFetcher<T>) -> Self {
        Self {
            fetcher,
            years: YearLookup::new(),
            page_size: PLAYS_PAGE_SIZE,
        }
    }

    /// Override the assumed page size. Only affects the page count shown in
    /// progress messages.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn fetcher(&self) -> &RateLimitedFetcher<T> {
        &self.fetcher
    }

    /// Start a fresh fetch from page 1. Pages are requested lazily as the
    /// returned stream is consumed.
    pub fn collect(&mut self, query: RecordQuery) -> RecordStream<'_, T> {
        let state = PaginationState::new(self.page_size);
        RecordStream {
            collector: self,
            query,
            state,
            buffer: VecDeque::new(),
            finished: false,
        }
    }

    /// Fetch every record of `query`, stopping at the first error.
    pub fn collect_all(&mut self, query: RecordQuery) -> Result<Vec<SourceRecord>, BggError> {
        self.collect(query).collect()
    }

    fn fill_year(&mut self, record: &mut SourceRecord, object_id: Option<&str>) {
        let SourceRecord::Play(play) = record else {
            return;
        };
        if play.year_published.is_some() {
            return;
        }
        let Some(object_id) = object_id else {
            return;
        };
        play.year_published = match self.years.year_of(&self.fetcher, object_id) {
            Ok(year) => year,
            Err(e) => {
                log::warn!("Could not look up the year of '{}': {}", play.game_name, e);
                None
            }
        };
    }
}

/// Lazy, finite sequence of records produced by [`PaginatedCollector::collect`].
///
/// After an error the stream ends.
pub struct RecordStream<'a, T> {
    collector: &'a mut PaginatedCollector<T>,
    query: RecordQuery,
    state: PaginationState,
    buffer: VecDeque<SourceRecord>,
    finished: bool,
}

impl<T: SourceTransport> RecordStream<'_, T> {
    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    fn fetch_next_page(&mut self) -> Result<(), BggError> {
        let endpoint = self.query.endpoint();
        let params = self.query.params(self.state.page);
        let response = self.collector.fetcher.fetch(endpoint, &params)?;
        if !response.is_ok() {
            return Err(BggError::FetchFailed {
                endpoint: endpoint.to_string(),
                status: response.status,
            });
        }

        let page = self.query.parse(&response.body)?;
        if self.state.page == 1 {
            self.state.total_expected = page.total;
            log::info!(
                "{} record(s) found for {}",
                page.total.unwrap_or(0),
                self.query.username()
            );
        }

        let received = page.items.len();
        for item in page.items {
            let mut record = item.record;
            self.collector.fill_year(&mut record, item.object_id.as_deref());
            if let SourceRecord::Play(play) = &mut record {
                order_players(&mut play.players, self.query.username());
            }
            self.buffer.push_back(record);
        }
        self.state.collected += received;

        log::info!(
            "Fetched {} page {}/{} ({} of {} records)",
            endpoint,
            self.state.page,
            self.state.total_pages().unwrap_or(1),
            self.state.collected,
            self.state.total_expected.unwrap_or(0)
        );

        self.finished = match self.query {
            RecordQuery::Collection { .. } => true,
            RecordQuery::Plays { .. } if self.state.is_complete() => true,
            RecordQuery::Plays { .. } if received == 0 => {
                // A short declared total would otherwise page forever.
                log::warn!(
                    "Page {} was empty with {} of {} records collected; stopping",
                    self.state.page,
                    self.state.collected,
                    self.state.total_expected.unwrap_or(0)
                );
                true
            }
            RecordQuery::Plays { .. } => false,
        };
        if !self.finished {
            self.state.page += 1;
        }
        Ok(())
    }
}

impl<T: SourceTransport> Iterator for RecordStream<'_, T> {
    type Item = Result<SourceRecord, BggError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.buffer.pop_front() {
                return Some(Ok(record));
            }
            if self.finished {
                return None;
            }
            if let Err(e) = self.fetch_next_page() {
                self.finished = true;
                return Some(Err(e));
            }
        }
    }
}
