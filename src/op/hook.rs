//! Post-execution hook chains.
//!
//! A hook receives the current outcome and returns the next one. Hooks run
//! right after the wrapped operation, in registration order, so the final
//! outcome is the left fold of the chain over the raw outcome. A hook may
//! turn success into failure or clear an error; later hooks only ever see
//! the latest outcome.

use crate::context::Context;
use crate::db::Ext;
use crate::error::DbResult;
use crate::models::ExecResult;
use crate::op::{Queryer, UpdateOutcome, Updater};
use futures_util::future::BoxFuture;

/// Callback over a read outcome.
pub type QueryHook<'h> = Box<dyn FnMut(DbResult<()>) -> DbResult<()> + Send + 'h>;

/// Callback over a write outcome.
pub type UpdateHook<'h> = Box<dyn FnMut(UpdateOutcome) -> UpdateOutcome + Send + 'h>;

/// A read operation followed by a chain of hooks.
pub struct HookedQueryer<'h, Q> {
    op: Q,
    hooks: Vec<QueryHook<'h>>,
}

impl<'h, Q: Queryer> HookedQueryer<'h, Q> {
    pub fn new(op: Q) -> Self {
        Self {
            op,
            hooks: Vec::new(),
        }
    }

    /// Append a hook that sees every outcome.
    pub fn hook<F>(mut self, f: F) -> Self
    where
        F: FnMut(DbResult<()>) -> DbResult<()> + Send + 'h,
    {
        self.hooks.push(Box::new(f));
        self
    }

    /// Append a hook that only runs when the current outcome is `Ok`.
    /// Errors pass through untouched.
    pub fn on_success<F>(self, mut f: F) -> Self
    where
        F: FnMut() -> DbResult<()> + Send + 'h,
    {
        self.hook(move |outcome| outcome.and_then(|()| f()))
    }
}

impl<Q: Queryer> Queryer for HookedQueryer<'_, Q> {
    fn exec_context<'a>(
        &'a mut self,
        ctx: &'a Context,
        ext: &'a dyn Ext,
    ) -> BoxFuture<'a, DbResult<()>> {
        Box::pin(async move {
            let outcome = self.op.exec_context(ctx, ext).await;
            self.hooks.iter_mut().fold(outcome, |acc, hook| hook(acc))
        })
    }
}

/// A write operation followed by a chain of hooks.
pub struct HookedUpdater<'h, U> {
    op: U,
    hooks: Vec<UpdateHook<'h>>,
}

impl<'h, U: Updater> HookedUpdater<'h, U> {
    pub fn new(op: U) -> Self {
        Self {
            op,
            hooks: Vec::new(),
        }
    }

    /// Append a hook that sees every outcome.
    pub fn hook<F>(mut self, f: F) -> Self
    where
        F: FnMut(UpdateOutcome) -> UpdateOutcome + Send + 'h,
    {
        self.hooks.push(Box::new(f));
        self
    }

    /// Append a hook that only runs when the current outcome is `Ok`; it
    /// receives the current result and returns the next outcome.
    pub fn on_success<F>(self, mut f: F) -> Self
    where
        F: FnMut(Option<ExecResult>) -> UpdateOutcome + Send + 'h,
    {
        self.hook(move |outcome| outcome.and_then(&mut f))
    }
}

impl<U: Updater> Updater for HookedUpdater<'_, U> {
    fn exec_context<'a>(
        &'a mut self,
        ctx: &'a Context,
        ext: &'a dyn Ext,
    ) -> BoxFuture<'a, UpdateOutcome> {
        Box::pin(async move {
            let outcome = self.op.exec_context(ctx, ext).await;
            self.hooks.iter_mut().fold(outcome, |acc, hook| hook(acc))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Handle;
    use crate::error::DbError;
    use crate::op::{nop_queryer, nop_updater};
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn test_hooks_fold_left_to_right() {
        let handle = Handle::connect_url("sqlite::memory:").await.unwrap();
        let trace = Arc::new(Mutex::new(Vec::new()));
        let (t1, t2, t3) = (trace.clone(), trace.clone(), trace.clone());

        let mut op = HookedQueryer::new(nop_queryer())
            .hook(move |outcome| {
                t1.lock().unwrap().push(format!("first:{}", outcome.is_ok()));
                Err(DbError::internal("replaced"))
            })
            .on_success(move || {
                t2.lock().unwrap().push("skipped".to_string());
                Ok(())
            })
            .hook(move |outcome| {
                t3.lock().unwrap().push(format!("last:{}", outcome.is_ok()));
                outcome
            });

        let err = op.exec(&handle).await.unwrap_err();
        assert_eq!(err.to_string(), "Internal error: replaced");
        assert_eq!(*trace.lock().unwrap(), vec!["first:true", "last:false"]);
    }

    #[tokio::test]
    async fn test_cleared_error_runs_on_success() {
        let handle = Handle::connect_url("sqlite::memory:").await.unwrap();
        let mut ran = false;

        let mut op = HookedUpdater::new(nop_updater())
            .hook(|_| Err(DbError::RowNotFound))
            .hook(|outcome| match outcome {
                Err(e) if e.is_row_not_found() => Ok(None),
                other => other,
            })
            .on_success(|result| {
                ran = true;
                Ok(result.or(Some(ExecResult::new(0, None))))
            });

        let result = op.exec(&handle).await.unwrap();
        assert_eq!(result, Some(ExecResult::default()));
        drop(op);
        assert!(ran);
    }
}
