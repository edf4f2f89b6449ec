//! Human-in-the-loop hand-off between the pipeline and interaction threads.
//!
//! The pipeline thread sends a [`PendingRequest`] down the same channel that
//! carries progress events and then blocks on a oneshot reply slot. Because
//! the pipeline blocks until the reply arrives, at most one request is ever
//! outstanding. Each request carries its own reply slot, so it can be answered
//! only once. Dropping a request unanswered wakes the pipeline with
//! [`ImportError::Cancelled`].

use std::sync::mpsc;

use meeple_core::{DestinationCandidate, SourceRecord};
use tokio::sync::oneshot;

use crate::error::ImportError;
use crate::progress::ImportEvent;

/// What the pipeline needs a human to decide.
#[derive(Debug, Clone)]
pub enum DisambiguationRequest {
    /// The search found nothing: ask for a different search string.
    Research { record_label: String },
    /// Several candidates and no exact year: ask which one to use.
    ///
    /// `researched` is set when the candidates come from a replacement
    /// search; declining then leaves the record unmatched instead of taking
    /// the first candidate.
    Choose {
        record_label: String,
        candidates: Vec<DestinationCandidate>,
        researched: bool,
    },
}

/// A human's answer to a [`DisambiguationRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Replacement search string (research requests).
    Query(String),
    /// Index into the offered candidates (choose requests).
    Choice(usize),
    /// No answer for this record.
    Declined,
    /// Stop the whole run.
    Abort,
}

/// A request waiting for its answer.
#[derive(Debug)]
pub struct PendingRequest {
    pub request: DisambiguationRequest,
    reply: oneshot::Sender<Answer>,
}

impl PendingRequest {
    pub fn respond(self, answer: Answer) {
        if self.reply.send(answer).is_err() {
            log::debug!("Pipeline stopped before the answer arrived");
        }
    }
}

/// Everything the pipeline thread sends to the interaction thread.
#[derive(Debug)]
pub enum PipelineMessage {
    Event(ImportEvent),
    Disambiguate(PendingRequest),
}

/// Source of human decisions for the resolver.
pub trait Disambiguator {
    /// Ask for a new search string for a record whose search came back empty.
    fn research(&mut self, record: &SourceRecord) -> Result<Option<String>, ImportError>;

    /// Ask which of `candidates` the record refers to. `researched` marks
    /// candidates found by a replacement search.
    fn choose(
        &mut self,
        record: &SourceRecord,
        candidates: &[DestinationCandidate],
        researched: bool,
    ) -> Result<Option<DestinationCandidate>, ImportError>;
}

/// [`Disambiguator`] that forwards every question to the interaction thread.
pub struct DisambiguationChannel {
    tx: mpsc::Sender<PipelineMessage>,
}

impl DisambiguationChannel {
    pub fn new(tx: mpsc::Sender<PipelineMessage>) -> Self {
        Self { tx }
    }

    /// Send the request and block until it is answered.
    fn ask(&self, request: DisambiguationRequest) -> Result<Answer, ImportError> {
        let (reply, answer) = oneshot::channel();
        self.tx
            .send(PipelineMessage::Disambiguate(PendingRequest { request, reply }))
            .map_err(|_| ImportError::Cancelled)?;
        match answer.blocking_recv() {
            Ok(Answer::Abort) | Err(_) => Err(ImportError::Cancelled),
            Ok(answer) => Ok(answer),
        }
    }
}

impl Disambiguator for DisambiguationChannel {
    fn research(&mut self, record: &SourceRecord) -> Result<Option<String>, ImportError> {
        let answer = self.ask(DisambiguationRequest::Research {
            record_label: record.game_label(),
        })?;
        Ok(match answer {
            Answer::Query(q) if !q.trim().is_empty() => Some(q.trim().to_string()),
            _ => None,
        })
    }

    fn choose(
        &mut self,
        record: &SourceRecord,
        candidates: &[DestinationCandidate],
        researched: bool,
    ) -> Result<Option<DestinationCandidate>, ImportError> {
        let answer = self.ask(DisambiguationRequest::Choose {
            record_label: record.game_label(),
            candidates: candidates.to_vec(),
            researched,
        })?;
        Ok(match answer {
            Answer::Choice(i) => {
                let chosen = candidates.get(i).cloned();
                if chosen.is_none() {
                    log::warn!("Choice {} is out of range, treating as declined", i);
                }
                chosen
            }
            _ => None,
        })
    }
}

/// Declines every question, for unattended runs.
pub struct Declining;

impl Disambiguator for Declining {
    fn research(&mut self, _record: &SourceRecord) -> Result<Option<String>, ImportError> {
        Ok(None)
    }

    fn choose(
        &mut self,
        _record: &SourceRecord,
        _candidates: &[DestinationCandidate],
        _researched: bool,
    ) -> Result<Option<DestinationCandidate>, ImportError> {
        Ok(None)
    }
}

#[cfg(test)]
#[path = "tests/disambiguation_tests.rs"]
mod tests;
