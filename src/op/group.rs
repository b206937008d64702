//! Sequential operation groups.
//!
//! Members run in registration order against the same handle and context.
//! The first error stops the group and is returned as-is; members after it
//! never run. Nothing is rolled back: run the group on a [`TxHandle`] when
//! the writes must be atomic.
//!
//! [`TxHandle`]: crate::db::TxHandle

use crate::context::Context;
use crate::db::Ext;
use crate::error::DbResult;
use crate::models::ExecResult;
use crate::op::{Queryer, UpdateOutcome, Updater};
use futures_util::future::BoxFuture;
use tracing::debug;

/// Ordered reads run as one operation.
#[derive(Default)]
pub struct QueryerGroup<'a> {
    ops: Vec<Box<dyn Queryer + 'a>>,
}

impl<'a> QueryerGroup<'a> {
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    /// Append an operation.
    pub fn with(mut self, op: impl Queryer + 'a) -> Self {
        self.ops.push(Box::new(op));
        self
    }

    pub fn push(&mut self, op: impl Queryer + 'a) {
        self.ops.push(Box::new(op));
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl<'a> FromIterator<Box<dyn Queryer + 'a>> for QueryerGroup<'a> {
    fn from_iter<I: IntoIterator<Item = Box<dyn Queryer + 'a>>>(iter: I) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}

impl Queryer for QueryerGroup<'_> {
    fn exec_context<'a>(
        &'a mut self,
        ctx: &'a Context,
        ext: &'a dyn Ext,
    ) -> BoxFuture<'a, DbResult<()>> {
        Box::pin(async move {
            let total = self.ops.len();
            for (index, op) in self.ops.iter_mut().enumerate() {
                if let Err(e) = op.exec_context(ctx, ext).await {
                    debug!(index, total, error = %e, "Query group aborted");
                    return Err(e);
                }
            }
            Ok(())
        })
    }
}

/// Ordered writes run as one operation.
///
/// On success the outcome is the last result produced by a member, or a
/// zeroed [`ExecResult`](crate::models::ExecResult) when no member produced
/// one (empty group, or only no-ops). When a member fails, the results of
/// the members that ran before it stay readable through
/// [`last_result`](Self::last_result).
#[derive(Default)]
pub struct UpdaterGroup<'a> {
    ops: Vec<Box<dyn Updater + 'a>>,
    last_result: Option<ExecResult>,
}

impl<'a> UpdaterGroup<'a> {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            last_result: None,
        }
    }

    /// Append an operation.
    pub fn with(mut self, op: impl Updater + 'a) -> Self {
        self.ops.push(Box::new(op));
        self
    }

    pub fn push(&mut self, op: impl Updater + 'a) {
        self.ops.push(Box::new(op));
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Last result produced by a member during the most recent run, whether
    /// or not the run succeeded. `None` before the first run, or when no
    /// member produced a result.
    pub fn last_result(&self) -> Option<ExecResult> {
        self.last_result
    }
}

impl<'a> FromIterator<Box<dyn Updater + 'a>> for UpdaterGroup<'a> {
    fn from_iter<I: IntoIterator<Item = Box<dyn Updater + 'a>>>(iter: I) -> Self {
        Self {
            ops: iter.into_iter().collect(),
            last_result: None,
        }
    }
}

impl Updater for UpdaterGroup<'_> {
    fn exec_context<'a>(
        &'a mut self,
        ctx: &'a Context,
        ext: &'a dyn Ext,
    ) -> BoxFuture<'a, UpdateOutcome> {
        Box::pin(async move {
            let total = self.ops.len();
            self.last_result = None;
            for (index, op) in self.ops.iter_mut().enumerate() {
                match op.exec_context(ctx, ext).await {
                    Ok(Some(result)) => self.last_result = Some(result),
                    Ok(None) => {}
                    Err(e) => {
                        debug!(index, total, error = %e, "Update group aborted");
                        return Err(e);
                    }
                }
            }
            Ok(Some(self.last_result.unwrap_or_default()))
        })
    }
}
