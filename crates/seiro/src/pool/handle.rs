use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::error::{Error, Result};
use crate::result::TranslationResult;

/// # TranslationHandle
///
/// The pending outcome of one submitted batch.
///
/// Awaiting the handle yields the full ordered result list, or the error that
/// aborted the request. The pool resolves it once every sub-batch of the
/// request has reported, merged back into original input order.
pub struct TranslationHandle {
    /// The underlying channel receiver
    receiver: oneshot::Receiver<Result<Vec<TranslationResult>>>,
}

impl TranslationHandle {
    pub(crate) fn new(receiver: oneshot::Receiver<Result<Vec<TranslationResult>>>) -> Self {
        Self { receiver }
    }

    /// A handle that is already resolved, used for requests that never touch
    /// a worker (the empty batch).
    pub(crate) fn resolved(outcome: Result<Vec<TranslationResult>>) -> Self {
        let (tx, rx) = oneshot::channel();
        // The receiver is held right here, the send cannot fail.
        let _ = tx.send(outcome);
        Self { receiver: rx }
    }
}

impl Future for TranslationHandle {
    type Output = Result<Vec<TranslationResult>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.get_mut().receiver).poll(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(_)) => Poll::Ready(Err(Error::PoolClosed)),
            Poll::Pending => Poll::Pending,
        }
    }
}
