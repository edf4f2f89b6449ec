use std::collections::HashMap;

use crate::client::{Endpoint, RateLimitedFetcher, SourceTransport};
use crate::error::BggError;
use crate::xml::parse_thing_year;

/// Memoized publication-year lookups against the thing endpoint.
///
/// Plays carry only the game's object id, so the year is fetched per game.
/// Each distinct object id costs at most one request per run, including
/// games that turn out to have no year.
#[derive(Debug, Default)]
pub struct YearLookup {
    years: HashMap<String, Option<i32>>,
}

impl YearLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn year_of<T: SourceTransport>(
        &mut self,
        fetcher: &RateLimitedFetcher<T>,
        object_id: &str,
    ) -> Result<Option<i32>, BggError> {
        if let Some(year) = self.years.get(object_id) {
            return Ok(*year);
        }

        let response = fetcher.fetch(Endpoint::Thing, &[("id", object_id.to_string())])?;
        let year = if response.is_ok() {
            parse_thing_year(&response.body)?
        } else {
            log::warn!(
                "Year lookup for object {} failed with HTTP {}",
                object_id,
                response.status
            );
            None
        };

        self.years.insert(object_id.to_string(), year);
        Ok(year)
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}
