use std::sync::mpsc;

use crate::disambiguation::PipelineMessage;
use crate::pipeline::{ImportSummary, PipelineStage};
use crate::resolver::MatchMethod;

/// Events emitted while a batch runs, in emission order.
#[derive(Debug, Clone)]
pub enum ImportEvent {
    StageChanged(PipelineStage),
    RecordStarted {
        index: usize,
        label: String,
    },
    Matched {
        index: usize,
        label: String,
        destination: String,
        method: MatchMethod,
    },
    Imported {
        index: usize,
        label: String,
    },
    RecordFailed {
        index: usize,
        label: String,
        error: String,
    },
    UnmappedUser {
        username: String,
    },
    FatalError {
        message: String,
    },
    Done {
        summary: ImportSummary,
    },
}

/// Trait for reporting import progress to callers.
pub trait ImportProgress {
    fn on_event(&self, event: ImportEvent);
}

/// A no-op progress reporter that discards all updates.
pub struct SilentProgress;

impl ImportProgress for SilentProgress {
    fn on_event(&self, _event: ImportEvent) {}
}

/// Forwards events to the interaction thread.
///
/// A closed receiver is ignored: the pipeline keeps running even if nobody
/// is watching.
pub struct ChannelProgress {
    tx: mpsc::Sender<PipelineMessage>,
}

impl ChannelProgress {
    pub fn new(tx: mpsc::Sender<PipelineMessage>) -> Self {
        Self { tx }
    }
}

impl ImportProgress for ChannelProgress {
    fn on_event(&self, event: ImportEvent) {
        let _ = self.tx.send(PipelineMessage::Event(event));
    }
}
