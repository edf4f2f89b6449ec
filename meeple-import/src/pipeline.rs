//! Batch import of source records into the destination catalog.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use meeple_core::{
    DestinationCatalog, PlayRecord, PlayWrite, Player, PlayerWrite, SourceRecord, split_duration,
};

use crate::cache::IdentityCache;
use crate::disambiguation::Disambiguator;
use crate::error::ImportError;
use crate::progress::{ImportEvent, ImportProgress};
use crate::resolver::MatchResolver;
use crate::users::UserIdentityMap;

/// Where a batch currently is.
///
/// Each record moves `Fetching -> Resolving -> Writing`. Records are pulled
/// from the source lazily, so `Fetching` also covers the source request
/// behind the next record. A failed record reports `Failed(index)` and the
/// batch goes back to `Fetching` for the next one, or to `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    Fetching,
    Resolving,
    Writing,
    /// The record at this index failed; the batch carries on.
    Failed(usize),
    Done,
}

/// A record that could not be imported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFailure {
    pub index: usize,
    pub label: String,
    pub reason: String,
}

/// Outcome of a completed batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub total: usize,
    pub failures: Vec<RecordFailure>,
}

impl ImportSummary {
    /// `imported/total`.
    pub fn ratio(&self) -> String {
        format!("{}/{}", self.imported, self.total)
    }
}

/// Runs records one at a time through resolution and writing.
///
/// Per-record failures are counted and reported; fatal errors (see
/// [`ImportError::is_fatal`]) stop the batch.
pub struct ImportPipeline<'a, D: ?Sized> {
    destination: &'a D,
    disambiguator: &'a mut dyn Disambiguator,
    progress: &'a dyn ImportProgress,
    cache: IdentityCache,
    cancel: Arc<AtomicBool>,
    stage: PipelineStage,
    warned_users: HashSet<String>,
}

impl<'a, D: DestinationCatalog + ?Sized> ImportPipeline<'a, D> {
    pub fn new(
        destination: &'a D,
        disambiguator: &'a mut dyn Disambiguator,
        progress: &'a dyn ImportProgress,
    ) -> Self {
        Self {
            destination,
            disambiguator,
            progress,
            cache: IdentityCache::new(),
            cancel: Arc::new(AtomicBool::new(false)),
            stage: PipelineStage::Idle,
            warned_users: HashSet::new(),
        }
    }

    /// Stop before the next record once `cancel` is set.
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    pub fn cache(&self) -> &IdentityCache {
        &self.cache
    }

    /// Import every record of `records`, pulling them lazily.
    ///
    /// `my_username` marks the importing user's own row in play writes.
    pub fn run<I, E>(
        &mut self,
        records: I,
        my_username: &str,
        users: &UserIdentityMap,
    ) -> Result<ImportSummary, ImportError>
    where
        I: IntoIterator<Item = Result<SourceRecord, E>>,
        ImportError: From<E>,
    {
        let mut summary = ImportSummary::default();
        let mut records = records.into_iter();

        for index in 0.. {
            if self.cancel.load(Ordering::Relaxed) {
                return Err(self.abort(ImportError::Cancelled));
            }

            self.set_stage(PipelineStage::Fetching);
            let record = match records.next() {
                None => break,
                Some(Ok(record)) => record,
                Some(Err(e)) => return Err(self.abort(ImportError::from(e))),
            };
            summary.total += 1;

            let label = record.describe();
            self.progress.on_event(ImportEvent::RecordStarted {
                index,
                label: label.clone(),
            });

            match self.import_record(index, &record, my_username, users) {
                Ok(()) => {
                    summary.imported += 1;
                    self.progress.on_event(ImportEvent::Imported { index, label });
                }
                Err(e) if e.is_fatal() => return Err(self.abort(e)),
                Err(e) => {
                    log::error!("{}: {}", label, e);
                    self.set_stage(PipelineStage::Failed(index));
                    let reason = e.to_string();
                    self.progress.on_event(ImportEvent::RecordFailed {
                        index,
                        label: label.clone(),
                        error: reason.clone(),
                    });
                    summary.failures.push(RecordFailure { index, label, reason });
                }
            }
        }

        self.set_stage(PipelineStage::Done);
        log::info!("{} record(s) imported", summary.ratio());
        self.progress.on_event(ImportEvent::Done {
            summary: summary.clone(),
        });
        Ok(summary)
    }

    fn import_record(
        &mut self,
        index: usize,
        record: &SourceRecord,
        my_username: &str,
        users: &UserIdentityMap,
    ) -> Result<(), ImportError> {
        self.set_stage(PipelineStage::Resolving);
        let resolver = MatchResolver::new(self.destination);
        let resolution = resolver
            .resolve(record, &mut self.cache, &mut *self.disambiguator)?
            .ok_or_else(|| ImportError::NoMatchFound(record.game_label()))?;

        self.progress.on_event(ImportEvent::Matched {
            index,
            label: record.game_label(),
            destination: resolution.candidate.label(),
            method: resolution.method,
        });

        self.set_stage(PipelineStage::Writing);
        let destination_id = &resolution.candidate.destination_id;
        match record {
            SourceRecord::Collection(entry) => {
                self.destination
                    .add_to_collection(destination_id, entry.ownership)?;
                Ok(())
            }
            SourceRecord::Play(play) => {
                let write = build_play_write(play, destination_id, my_username, users);
                self.warn_unmapped(&play.players, users);
                match self.destination.log_play(&write)? {
                    Some(play_id) => {
                        log::debug!("Play #{} logged as {}", play.id, play_id);
                        Ok(())
                    }
                    None => Err(ImportError::WriteRejected(record.describe())),
                }
            }
        }
    }

    fn warn_unmapped(&mut self, players: &[Player], users: &UserIdentityMap) {
        for player in players {
            let username = player.source_username.trim();
            if username.is_empty() || users.resolve(username).is_some() {
                continue;
            }
            if self.warned_users.insert(username.to_lowercase()) {
                log::warn!("No Ludopedia user mapped for '{}'", username);
                self.progress.on_event(ImportEvent::UnmappedUser {
                    username: username.to_string(),
                });
            }
        }
    }

    fn set_stage(&mut self, stage: PipelineStage) {
        if self.stage != stage {
            log::trace!("{:?} -> {:?}", self.stage, stage);
            self.stage = stage;
            self.progress.on_event(ImportEvent::StageChanged(stage));
        }
    }

    fn abort(&mut self, error: ImportError) -> ImportError {
        log::error!("Import stopped: {}", error);
        self.progress.on_event(ImportEvent::FatalError {
            message: error.to_string(),
        });
        error
    }
}

/// Build the destination write for a play whose game resolved to
/// `destination_id`. Player order is preserved.
pub fn build_play_write(
    play: &PlayRecord,
    destination_id: &str,
    my_username: &str,
    users: &UserIdentityMap,
) -> PlayWrite {
    let (duration_hours, duration_minutes) = split_duration(play.duration_minutes);
    PlayWrite {
        destination_id: destination_id.to_string(),
        date: play.date,
        duration_hours,
        duration_minutes,
        description: play.comment.clone(),
        players: play
            .players
            .iter()
            .map(|p| player_write(p, my_username, users))
            .collect(),
    }
}

fn player_write(player: &Player, my_username: &str, users: &UserIdentityMap) -> PlayerWrite {
    let is_me = player.source_username.eq_ignore_ascii_case(my_username);
    PlayerWrite {
        local_id: if is_me { "0".to_string() } else { String::new() },
        user_id: users
            .resolve(&player.source_username)
            .unwrap_or_default()
            .to_string(),
        name: player.name.clone(),
        winner: player.is_winner,
        score: player.score.clone().unwrap_or_default(),
        note: player_note(player),
    }
}

/// Free-text note for details the destination has no column for.
pub fn player_note(player: &Player) -> String {
    let mut parts = Vec::new();
    if let Some(position) = player.start_position.as_deref().filter(|s| !s.is_empty()) {
        parts.push(format!("Jogador #{position}"));
    }
    if let Some(color) = player.color.as_deref().filter(|s| !s.is_empty()) {
        parts.push(format!("Cor: {color}"));
    }
    if player.is_new {
        parts.push("(Primeira Vez)".to_string());
    }
    parts.join(" - ")
}

#[cfg(test)]
#[path = "tests/pipeline_tests.rs"]
mod tests;
