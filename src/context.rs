//! Deadline and cancellation signal for statement execution.
//!
//! A [`Context`] is handed to the `*_context` forwarding functions and to
//! `exec_context` on operations, which pass it straight to the handle. Only
//! the handle adapter looks inside: it races the driver future against the
//! deadline and the cancel signal.

use crate::error::{DbError, DbResult};
use futures_util::future::{self, FutureExt};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

static BACKGROUND: Context = Context {
    deadline: None,
    cancel: Vec::new(),
};

/// Deadline plus any number of inherited cancel signals.
#[derive(Debug, Clone)]
pub struct Context {
    deadline: Option<Instant>,
    cancel: Vec<watch::Receiver<bool>>,
}

/// Cancels every [`Context`] derived from the one that created it.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Context {
    /// The empty context: no deadline, never cancelled.
    pub fn background() -> &'static Context {
        &BACKGROUND
    }

    /// Derive a context that expires `timeout` from now (or earlier, if the
    /// parent already expires sooner).
    pub fn with_timeout(&self, timeout: Duration) -> Context {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Derive a context that expires at `deadline` (or earlier, if the parent
    /// already expires sooner).
    pub fn with_deadline(&self, deadline: Instant) -> Context {
        let deadline = match self.deadline {
            Some(parent) => parent.min(deadline),
            None => deadline,
        };
        Context {
            deadline: Some(deadline),
            cancel: self.cancel.clone(),
        }
    }

    /// Derive a cancellable context. The parent's signals still apply.
    pub fn with_cancel(&self) -> (Context, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        let mut cancel = self.cancel.clone();
        cancel.push(rx);
        (
            Context {
                deadline: self.deadline,
                cancel,
            },
            CancelHandle { tx: Arc::new(tx) },
        )
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.iter().any(|rx| *rx.borrow())
    }

    /// Why this context is already done, if it is.
    pub fn err(&self, operation: &str) -> Option<DbError> {
        if self.is_cancelled() {
            return Some(DbError::cancelled(operation));
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(DbError::timeout(operation, 0)),
            _ => None,
        }
    }

    /// Resolves once any cancel signal fires; never resolves otherwise.
    async fn cancelled(&self) {
        if self.cancel.is_empty() {
            return future::pending().await;
        }

        let waits = self.cancel.iter().cloned().map(|mut rx| {
            async move {
                loop {
                    if *rx.borrow_and_update() {
                        return;
                    }
                    if rx.changed().await.is_err() {
                        // Sender dropped without cancelling.
                        future::pending::<()>().await;
                    }
                }
            }
            .boxed()
        });
        future::select_all(waits).await;
    }

    /// Drive a driver future under this context.
    pub(crate) async fn run<T, F>(&self, operation: &'static str, fut: F) -> DbResult<T>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        if let Some(err) = self.err(operation) {
            return Err(err);
        }

        let start = Instant::now();
        let work = async {
            tokio::select! {
                biased;
                _ = self.cancelled() => Err(DbError::cancelled(operation)),
                result = fut => result.map_err(DbError::from),
            }
        };

        match self.deadline {
            Some(deadline) => match tokio::time::timeout_at(deadline, work).await {
                Ok(result) => result,
                Err(_) => Err(DbError::timeout(
                    operation,
                    start.elapsed().as_millis() as u64,
                )),
            },
            None => work.await,
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        BACKGROUND.clone()
    }
}
