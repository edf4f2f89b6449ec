use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;

use crate::disambiguation::{DisambiguationChannel, PipelineMessage};
use crate::error::ImportError;
use crate::pipeline::ImportSummary;
use crate::progress::ChannelProgress;

/// What the pipeline thread gets to talk back to the interaction thread.
pub struct PipelineContext {
    pub cancel: Arc<AtomicBool>,
    tx: mpsc::Sender<PipelineMessage>,
}

impl PipelineContext {
    pub fn disambiguator(&self) -> DisambiguationChannel {
        DisambiguationChannel::new(self.tx.clone())
    }

    pub fn progress(&self) -> ChannelProgress {
        ChannelProgress::new(self.tx.clone())
    }
}

/// Handle to a running pipeline thread.
///
/// The message channel closes once the pipeline thread has finished and
/// dropped every sender, so draining [`PipelineHandle::messages`] until it
/// ends is how the interaction thread knows the run is over.
pub struct PipelineHandle {
    messages: mpsc::Receiver<PipelineMessage>,
    cancel: Arc<AtomicBool>,
    thread: thread::JoinHandle<Result<ImportSummary, ImportError>>,
}

impl PipelineHandle {
    pub fn messages(&self) -> &mpsc::Receiver<PipelineMessage> {
        &self.messages
    }

    /// Ask the pipeline to stop before its next record.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn cancel_token(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    /// Wait for the pipeline thread and return its result.
    pub fn join(self) -> Result<ImportSummary, ImportError> {
        // Unblocks a pipeline still waiting on a request nobody will answer.
        drop(self.messages);
        self.thread.join().unwrap_or(Err(ImportError::Panicked))
    }
}

/// Spawn the pipeline thread.
///
/// The closure receives a [`PipelineContext`] and runs the whole batch:
/// fetching, resolving and writing all happen on that thread.
pub fn spawn_pipeline<F>(work: F) -> PipelineHandle
where
    F: FnOnce(PipelineContext) -> Result<ImportSummary, ImportError> + Send + 'static,
{
    let cancel = Arc::new(AtomicBool::new(false));
    let (tx, messages) = mpsc::channel();
    let ctx = PipelineContext {
        cancel: cancel.clone(),
        tx,
    };

    let thread = thread::spawn(move || work(ctx));

    PipelineHandle {
        messages,
        cancel,
        thread,
    }
}
