use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::future::join_all;
use tokio::sync::{Mutex, Notify, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

use crate::batch::Batch;
use crate::engine::TranslationEngine;
use crate::error::{Error, Result};
use crate::options::TranslationOptions;
use crate::result::TranslationResult;

use super::handle::TranslationHandle;
use super::job::Job;
use super::worker::{JobQueue, worker_loop};

/// Pool-level configuration, independent of any single request.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Sub-batch cap applied when a request's `max_batch_size` is 0.
    /// 0 here means no cap at all.
    pub default_max_batch_size: usize,

    /// Depth of the read-ahead pipeline used by file streaming.
    /// 0 selects `workers + 1`.
    pub max_queued_batches: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            default_max_batch_size: 32,
            max_queued_batches: 0,
        }
    }
}

/// # TranslatorPool
///
/// A fixed set of workers, each owning one inference engine, fed from a
/// shared work queue.
///
/// [`post`](Self::post) carves a batch into contiguous sub-batches, queues
/// them, and returns a [`TranslationHandle`] that resolves once every
/// sub-batch has reported. Results are merged back by each sub-batch's
/// recorded offset, so output order always equals input order no matter
/// which worker finishes first.
///
/// The pool holds no long-lived mutable state beyond the worker set and the
/// queue; a request's bookkeeping lives in its own aggregation task and dies
/// with it. One faulted request never takes the pool down: other in-flight
/// and future requests keep being served.
///
/// Dropping the pool signals the workers to stop and detaches their tasks.
pub struct TranslatorPool {
    /// Sub-batches waiting for a free worker, oldest first.
    queue: JobQueue,

    /// Wakes idle workers when new work arrives.
    notifier: Arc<Notify>,

    /// Cleared on shutdown; workers observe it and drain out.
    running: Arc<AtomicBool>,

    /// One task per worker slot.
    workers: Vec<JoinHandle<()>>,

    config: PoolConfig,
}

impl TranslatorPool {
    /// Starts one worker per engine instance. Engines are owned exclusively
    /// by their slot and never shared, so they need no internal locking.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if `engines` is empty. [`TranslatorBuilder`](crate::TranslatorBuilder)
    /// screens for this earlier and reports it as
    /// [`Error::InvalidArgument`] instead.
    pub fn new<E>(engines: Vec<E>, config: PoolConfig) -> Self
    where
        E: TranslationEngine + 'static,
    {
        assert!(!engines.is_empty(), "pool requires at least one engine");

        let running = Arc::new(AtomicBool::new(true));
        let notifier = Arc::new(Notify::new());
        let queue: JobQueue = Arc::new(Mutex::new(VecDeque::new()));

        let workers: Vec<JoinHandle<()>> = engines
            .into_iter()
            .enumerate()
            .map(|(slot, engine)| {
                tokio::spawn(worker_loop(
                    slot,
                    engine,
                    running.clone(),
                    notifier.clone(),
                    queue.clone(),
                ))
            })
            .collect();

        info!(workers = workers.len(), "translator pool started");

        Self {
            queue,
            notifier,
            running,
            workers,
            config,
        }
    }

    /// Number of worker slots.
    pub fn num_workers(&self) -> usize {
        self.workers.len()
    }

    /// Sub-batch cap applied to requests that do not set their own.
    pub(crate) fn default_max_batch_size(&self) -> usize {
        self.config.default_max_batch_size
    }

    /// Pipeline depth for file streaming.
    pub(crate) fn max_queued_batches(&self) -> usize {
        if self.config.max_queued_batches > 0 {
            self.config.max_queued_batches
        } else {
            self.workers.len() + 1
        }
    }

    /// Submits one batch for translation.
    ///
    /// Validation failures are returned synchronously and no worker is
    /// touched. An empty batch resolves immediately to an empty result list.
    /// Otherwise the returned handle resolves to the full ordered result
    /// list, or to the first fault, in which case results from the request's
    /// other sub-batches are discarded.
    pub async fn post(
        &self,
        batch: Batch,
        options: TranslationOptions,
    ) -> Result<TranslationHandle> {
        if batch.is_empty() {
            return Ok(TranslationHandle::resolved(Ok(vec![])));
        }
        if !self.running.load(Ordering::SeqCst) {
            return Err(Error::PoolClosed);
        }
        batch.validate()?;
        options.validate()?;

        let cap = if options.max_batch_size > 0 {
            options.max_batch_size
        } else {
            self.config.default_max_batch_size
        };

        let request = Uuid::new_v4();
        let options = Arc::new(options);
        let sub_batches = batch.split(cap);
        debug!(
            request = %request,
            sub_batches = sub_batches.len(),
            "posting batch"
        );

        let mut receivers = Vec::with_capacity(sub_batches.len());
        let mut jobs = Vec::with_capacity(sub_batches.len());
        for sub_batch in sub_batches {
            let (tx, rx) = oneshot::channel();
            receivers.push((sub_batch.offset, rx));
            jobs.push(Job::new(sub_batch, options.clone(), tx));
        }

        {
            let mut queue = self.queue.lock().await;
            queue.extend(jobs);
        }
        // Wake as many idle workers as there are new jobs; anyone who misses
        // the wakeup picks the work up on their poll timeout.
        for _ in 0..receivers.len() {
            self.notifier.notify_one();
        }

        let (done_tx, done_rx) = oneshot::channel();
        tokio::spawn(async move {
            let outcomes = join_all(
                receivers
                    .into_iter()
                    .map(|(offset, rx)| async move { (offset, rx.await) }),
            )
            .await;

            let mut merged: BTreeMap<usize, Vec<TranslationResult>> = BTreeMap::new();
            let mut failure: Option<Error> = None;
            for (offset, outcome) in outcomes {
                match outcome {
                    Ok(Ok(results)) => {
                        merged.insert(offset, results);
                    }
                    Ok(Err(error)) => {
                        failure.get_or_insert(error);
                    }
                    // Worker died with the job; surface it as a pool fault.
                    Err(_) => {
                        failure.get_or_insert(Error::PoolClosed);
                    }
                }
            }

            let outcome = match failure {
                Some(error) => {
                    debug!(request = %request, %error, "request aborted");
                    Err(error)
                }
                None => Ok(merged.into_values().flatten().collect()),
            };
            let _ = done_tx.send(outcome);
        });

        Ok(TranslationHandle::new(done_rx))
    }

    /// Submits a batch and waits for its ordered results.
    pub async fn translate_batch(
        &self,
        batch: Batch,
        options: TranslationOptions,
    ) -> Result<Vec<TranslationResult>> {
        self.post(batch, options).await?.await
    }

    fn shutdown(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        self.notifier.notify_waiters();

        for worker in self.workers.drain(..) {
            tokio::spawn(async move {
                let _ = worker.await;
            });
        }
    }
}

impl Drop for TranslatorPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}
