#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use chrono::NaiveDate;
use meeple_core::{
    CollectionEntry, DestinationCandidate, DestinationCatalog, DestinationError, OwnershipFlags,
    PlayRecord, PlayWrite, Player, SourceRecord,
};
use meeple_import::{Disambiguator, ImportError};

/// In-memory destination that records every call.
#[derive(Default)]
pub struct FakeCatalog {
    pub results: HashMap<String, Vec<DestinationCandidate>>,
    pub users: HashMap<String, String>,
    /// Plays whose write response lacks the success marker, by game id.
    pub unconfirmed_games: Vec<String>,
    pub fail_search_for: Vec<String>,
    pub reject_session: bool,
    pub searches: RefCell<Vec<String>>,
    pub collection_writes: RefCell<Vec<(String, OwnershipFlags)>>,
    pub play_writes: RefCell<Vec<PlayWrite>>,
    pub user_lookups: RefCell<Vec<String>>,
}

impl FakeCatalog {
    pub fn with_results(mut self, query: &str, candidates: Vec<DestinationCandidate>) -> Self {
        self.results.insert(query.to_string(), candidates);
        self
    }

    pub fn search_count(&self, query: &str) -> usize {
        self.searches.borrow().iter().filter(|q| *q == query).count()
    }
}

impl DestinationCatalog for FakeCatalog {
    fn search_games(&self, query: &str) -> Result<Vec<DestinationCandidate>, DestinationError> {
        self.searches.borrow_mut().push(query.to_string());
        if self.reject_session {
            return Err(DestinationError::Authentication("session expired".into()));
        }
        if self.fail_search_for.iter().any(|q| q == query) {
            return Err(DestinationError::transport("connection reset"));
        }
        Ok(self.results.get(query).cloned().unwrap_or_default())
    }

    fn add_to_collection(
        &self,
        destination_id: &str,
        flags: OwnershipFlags,
    ) -> Result<(), DestinationError> {
        self.collection_writes
            .borrow_mut()
            .push((destination_id.to_string(), flags));
        Ok(())
    }

    fn log_play(&self, play: &PlayWrite) -> Result<Option<String>, DestinationError> {
        self.play_writes.borrow_mut().push(play.clone());
        if self.unconfirmed_games.contains(&play.destination_id) {
            return Ok(None);
        }
        Ok(Some(format!("p{}", self.play_writes.borrow().len())))
    }

    fn lookup_user_id(&self, username: &str) -> Result<Option<String>, DestinationError> {
        self.user_lookups.borrow_mut().push(username.to_string());
        if username == "offline" {
            return Err(DestinationError::transport("timeout"));
        }
        Ok(self.users.get(username).cloned())
    }
}

/// Scripted human answers, consumed in order.
#[derive(Default)]
pub struct ScriptedHuman {
    pub queries: VecDeque<Option<String>>,
    pub choices: VecDeque<Option<usize>>,
    pub research_calls: usize,
    pub choose_calls: usize,
    /// `researched` flag of every choose call, in order.
    pub researched: Vec<bool>,
    pub cancel: bool,
}

impl ScriptedHuman {
    pub fn declining() -> Self {
        Self::default()
    }
}

impl Disambiguator for ScriptedHuman {
    fn research(&mut self, _record: &SourceRecord) -> Result<Option<String>, ImportError> {
        self.research_calls += 1;
        if self.cancel {
            return Err(ImportError::Cancelled);
        }
        Ok(self.queries.pop_front().flatten())
    }

    fn choose(
        &mut self,
        _record: &SourceRecord,
        candidates: &[DestinationCandidate],
        researched: bool,
    ) -> Result<Option<DestinationCandidate>, ImportError> {
        self.choose_calls += 1;
        self.researched.push(researched);
        if self.cancel {
            return Err(ImportError::Cancelled);
        }
        Ok(self
            .choices
            .pop_front()
            .flatten()
            .and_then(|i| candidates.get(i).cloned()))
    }
}

pub fn candidate(id: &str, name: &str, year: Option<&str>) -> DestinationCandidate {
    DestinationCandidate::new(id, name, year.map(str::to_string))
}

pub fn entry(name: &str, year: Option<i32>) -> SourceRecord {
    SourceRecord::Collection(CollectionEntry {
        game_name: name.to_string(),
        ownership: OwnershipFlags {
            own: true,
            wishlist: false,
        },
        year_published: year,
    })
}

pub fn play(id: u64, name: &str, year: Option<i32>, players: Vec<Player>) -> SourceRecord {
    SourceRecord::Play(PlayRecord {
        id,
        date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        duration_minutes: 125,
        location: String::new(),
        game_name: name.to_string(),
        year_published: year,
        comment: None,
        players,
    })
}

pub fn player(name: &str, username: &str) -> Player {
    Player {
        name: name.to_string(),
        source_username: username.to_string(),
        ..Default::default()
    }
}

/// Wrap plain records the way a fetched stream yields them.
pub fn fetched(records: Vec<SourceRecord>) -> impl Iterator<Item = Result<SourceRecord, ImportError>> {
    records.into_iter().map(Ok)
}
