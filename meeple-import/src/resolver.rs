//! Game matching between the source and destination catalogs.

use meeple_core::{DestinationCandidate, DestinationCatalog, SourceRecord};

use crate::cache::IdentityCache;
use crate::disambiguation::Disambiguator;
use crate::error::ImportError;

/// How a destination game was picked for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMethod {
    /// An earlier record with the same game name was already resolved.
    Cached,
    /// First search result with the record's publication year.
    ExactYear,
    /// Picked by a human among the search results.
    Chosen,
    /// Nobody picked, so the first search result was used.
    Fallback,
    /// Picked by a human after searching with a replacement query.
    Researched,
}

impl std::fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cached => write!(f, "cached"),
            Self::ExactYear => write!(f, "exact year"),
            Self::Chosen => write!(f, "chosen"),
            Self::Fallback => write!(f, "first result"),
            Self::Researched => write!(f, "new search"),
        }
    }
}

/// A resolved destination game.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub candidate: DestinationCandidate,
    pub method: MatchMethod,
}

/// Resolves source records to destination games.
///
/// Order of preference: the identity cache, then the first search result
/// whose year matches, then a human choice, then the first search result.
/// An empty search asks a human for a new query once. Every successful
/// resolution is cached under the record's game name.
pub struct MatchResolver<'a, D: ?Sized> {
    destination: &'a D,
}

impl<'a, D: DestinationCatalog + ?Sized> MatchResolver<'a, D> {
    pub fn new(destination: &'a D) -> Self {
        Self { destination }
    }

    /// Returns `Ok(None)` when no destination game could be settled on.
    pub fn resolve(
        &self,
        record: &SourceRecord,
        cache: &mut IdentityCache,
        disambiguator: &mut dyn Disambiguator,
    ) -> Result<Option<Resolution>, ImportError> {
        let game_name = record.game_name();
        if let Some(candidate) = cache.get(game_name) {
            log::debug!("Cache hit: {} -> {}", game_name, candidate.label());
            return Ok(Some(Resolution {
                candidate: candidate.clone(),
                method: MatchMethod::Cached,
            }));
        }

        let candidates = self.destination.search_games(game_name)?;
        let resolution = if candidates.is_empty() {
            self.research(record, disambiguator)?
        } else {
            Some(self.pick(record, candidates, disambiguator)?)
        };

        if let Some(resolution) = &resolution {
            log::debug!(
                "Mapped {} -> {} ({})",
                record.game_label(),
                resolution.candidate.label(),
                resolution.method
            );
            cache.insert(game_name, resolution.candidate.clone());
        }
        Ok(resolution)
    }

    fn pick(
        &self,
        record: &SourceRecord,
        candidates: Vec<DestinationCandidate>,
        disambiguator: &mut dyn Disambiguator,
    ) -> Result<Resolution, ImportError> {
        let year = record.year_published();
        if let Some(exact) = candidates.iter().find(|c| c.matches_year(year)) {
            return Ok(Resolution {
                candidate: exact.clone(),
                method: MatchMethod::ExactYear,
            });
        }

        if let Some(chosen) = disambiguator.choose(record, &candidates, false)? {
            return Ok(Resolution {
                candidate: chosen,
                method: MatchMethod::Chosen,
            });
        }

        // Non-empty, so there is always a first candidate.
        let mut candidates = candidates.into_iter();
        match candidates.next() {
            Some(first) => Ok(Resolution {
                candidate: first,
                method: MatchMethod::Fallback,
            }),
            None => Err(ImportError::NoMatchFound(record.game_label())),
        }
    }

    /// Zero results: ask once for a new query and let a human pick among what
    /// it finds. Declining at either step leaves the record unmatched.
    fn research(
        &self,
        record: &SourceRecord,
        disambiguator: &mut dyn Disambiguator,
    ) -> Result<Option<Resolution>, ImportError> {
        let Some(query) = disambiguator.research(record)? else {
            log::debug!("No replacement search for {}", record.game_label());
            return Ok(None);
        };

        let candidates = self.destination.search_games(&query)?;
        if candidates.is_empty() {
            log::debug!("Replacement search '{}' found nothing", query);
            return Ok(None);
        }

        Ok(disambiguator
            .choose(record, &candidates, true)?
            .map(|candidate| Resolution {
                candidate,
                method: MatchMethod::Researched,
            }))
    }
}
