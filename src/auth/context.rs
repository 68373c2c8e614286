use std::future::{self, Future};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;
use tokio::time::Instant;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    #[error("context cancelled")]
    Cancelled,

    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// Per-call execution context carrying an optional deadline and a cancellation signal.
///
/// Cloning is cheap; clones observe the same cancellation signal.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    deadline: Option<Instant>,
    cancel: Option<watch::Receiver<bool>>,
}

/// Fires cancellation for every context created from the paired [`RequestContext::with_cancel`].
#[derive(Debug)]
pub struct CancelHandle(watch::Sender<bool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.send_replace(true);
    }
}

impl RequestContext {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_cancel() -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        let ctx = Self {
            deadline: None,
            cancel: Some(rx),
        };
        (ctx, CancelHandle(tx))
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Tightens the deadline; a later deadline than the current one is ignored.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Reports why the context is already done, if it is.
    pub fn err(&self) -> Option<ContextError> {
        if self.cancel.as_ref().is_some_and(|rx| *rx.borrow()) {
            return Some(ContextError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if deadline <= Instant::now() => Some(ContextError::DeadlineExceeded),
            _ => None,
        }
    }

    /// Drives `fut` until it completes, the context is cancelled or the deadline passes,
    /// whichever comes first. A losing `fut` is dropped.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, ContextError> {
        if let Some(err) = self.err() {
            return Err(err);
        }

        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => future::pending().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancelled() => Err(ContextError::Cancelled),
            _ = expired => Err(ContextError::DeadlineExceeded),
            out = fut => Ok(out),
        }
    }

    async fn cancelled(&self) {
        let Some(rx) = &self.cancel else {
            return future::pending().await;
        };
        let mut rx = rx.clone();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            // handle dropped without cancelling
            future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn background_context_runs_to_completion() {
        let ctx = RequestContext::background();
        assert_eq!(ctx.run(async { 42 }).await, Ok(42));
        assert_eq!(ctx.err(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_aborts_pending_future() {
        let ctx = RequestContext::background().with_timeout(Duration::from_millis(50));
        let result = ctx.run(future::pending::<()>()).await;
        assert_eq!(result, Err(ContextError::DeadlineExceeded));
        assert_eq!(ctx.err(), Some(ContextError::DeadlineExceeded));
    }

    #[tokio::test]
    async fn cancel_aborts_pending_future() {
        let (ctx, handle) = RequestContext::with_cancel();
        let task = tokio::spawn({
            let ctx = ctx.clone();
            async move { ctx.run(future::pending::<()>()).await }
        });

        handle.cancel();
        assert_eq!(task.await.unwrap(), Err(ContextError::Cancelled));
        assert_eq!(ctx.err(), Some(ContextError::Cancelled));
    }

    #[tokio::test]
    async fn dropped_handle_does_not_cancel() {
        let (ctx, handle) = RequestContext::with_cancel();
        drop(handle);
        assert_eq!(ctx.run(async { "done" }).await, Ok("done"));
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_only_tightens() {
        let ctx = RequestContext::background().with_timeout(Duration::from_secs(1));
        let first = ctx.deadline().unwrap();
        let ctx = ctx.with_timeout(Duration::from_secs(10));
        assert_eq!(ctx.deadline(), Some(first));
    }
}
