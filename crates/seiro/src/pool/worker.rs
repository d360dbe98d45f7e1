use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::{Mutex, Notify};
use tokio::time::error::Elapsed;
use tracing::{debug, warn};

use crate::engine::TranslationEngine;
use crate::error::Error;

use super::job::Job;

/// Shared work queue consumed by the pool's workers.
pub(crate) type JobQueue = Arc<Mutex<VecDeque<Job>>>;

/// The loop run by one worker slot.
///
/// Each worker owns its engine exclusively and executes sub-batches strictly
/// one at a time; parallelism comes from the number of slots. A job's fault is
/// forwarded verbatim to the requester, never retried here.
pub(crate) async fn worker_loop<E: TranslationEngine>(
    slot: usize,
    engine: E,
    running: Arc<AtomicBool>,
    notifier: Arc<Notify>,
    queue: JobQueue,
) {
    loop {
        if !running.load(Ordering::SeqCst) {
            break;
        }

        let job = queue.lock().await.pop_front();
        let Some(job) = job else {
            // A lost wakeup is covered by the timeout; loop back and re-check.
            let _ = timeout_await_notifier(&notifier).await;
            continue;
        };

        debug!(
            slot,
            job = %job.id(),
            offset = job.offset(),
            sequences = job.len(),
            "decoding sub-batch"
        );

        let outcome = engine
            .translate(job.source(), job.target_prefixes(), job.options())
            .await;

        // One result per input sequence is part of the engine contract.
        let outcome = match outcome {
            Ok(results) if results.len() != job.len() => Err(Error::EngineFault(format!(
                "engine returned {} results for {} sequences",
                results.len(),
                job.len()
            ))),
            other => other,
        };

        if let Err(error) = &outcome {
            warn!(slot, job = %job.id(), %error, "sub-batch failed");
        }

        if job.complete(outcome).is_err() {
            debug!(slot, "requester dropped before completion");
        }
    }

    debug!(slot, "worker stopped");
}

#[inline]
async fn timeout_await_notifier(notifier: &Notify) -> Result<(), Elapsed> {
    tokio::time::timeout(Duration::from_millis(100), notifier.notified()).await
}
