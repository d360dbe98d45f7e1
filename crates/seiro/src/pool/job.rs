use std::sync::Arc;

use tokio::sync::oneshot;
use uuid::Uuid;

use crate::batch::{Sequence, SubBatch};
use crate::error::Result;
use crate::options::TranslationOptions;
use crate::result::TranslationResult;

/// One queued unit of work: a sub-batch paired with the channel its results
/// travel back on.
///
/// A job is consumed by exactly one worker. If the job is dropped before
/// completion (worker panic, pool teardown), the sender drops with it and the
/// requester observes a closed channel rather than hanging.
pub(crate) struct Job {
    id: Uuid,
    sub_batch: SubBatch,
    options: Arc<TranslationOptions>,
    completion: oneshot::Sender<Result<Vec<TranslationResult>>>,
}

impl Job {
    pub(crate) fn new(
        sub_batch: SubBatch,
        options: Arc<TranslationOptions>,
        completion: oneshot::Sender<Result<Vec<TranslationResult>>>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            sub_batch,
            options,
            completion,
        }
    }

    pub(crate) fn id(&self) -> Uuid {
        self.id
    }

    /// Offset of this sub-batch in the parent batch.
    pub(crate) fn offset(&self) -> usize {
        self.sub_batch.offset
    }

    /// Number of sequences in this sub-batch.
    pub(crate) fn len(&self) -> usize {
        self.sub_batch.len()
    }

    pub(crate) fn source(&self) -> &[Sequence] {
        &self.sub_batch.source
    }

    pub(crate) fn target_prefixes(&self) -> &[Sequence] {
        &self.sub_batch.target_prefixes
    }

    pub(crate) fn options(&self) -> Arc<TranslationOptions> {
        self.options.clone()
    }

    /// Sends the outcome back to the requester. A send error only means the
    /// requester gave up waiting; the worker carries on.
    pub(crate) fn complete(
        self,
        outcome: Result<Vec<TranslationResult>>,
    ) -> std::result::Result<(), Result<Vec<TranslationResult>>> {
        self.completion.send(outcome)
    }
}
