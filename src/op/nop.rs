//! Identity operations.
//!
//! A no-op never touches the handle and always succeeds, so optional steps
//! compose without branching: pick either the real operation or a no-op.

use crate::context::Context;
use crate::db::Ext;
use crate::error::DbResult;
use crate::op::{Queryer, UpdateOutcome, Updater};
use futures_util::future::{self, BoxFuture};

#[derive(Debug, Clone, Copy, Default)]
pub struct NopQueryer;

#[derive(Debug, Clone, Copy, Default)]
pub struct NopUpdater;

pub fn nop_queryer() -> NopQueryer {
    NopQueryer
}

/// A write that produces no result; groups skip it when tracking their
/// last result.
pub fn nop_updater() -> NopUpdater {
    NopUpdater
}

impl Queryer for NopQueryer {
    fn exec_context<'a>(
        &'a mut self,
        _ctx: &'a Context,
        _ext: &'a dyn Ext,
    ) -> BoxFuture<'a, DbResult<()>> {
        Box::pin(future::ready(Ok(())))
    }
}

impl Updater for NopUpdater {
    fn exec_context<'a>(
        &'a mut self,
        _ctx: &'a Context,
        _ext: &'a dyn Ext,
    ) -> BoxFuture<'a, UpdateOutcome> {
        Box::pin(future::ready(Ok(None)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Handle;

    #[tokio::test]
    async fn test_nop_ignores_cancelled_context() {
        let handle = Handle::connect_url("sqlite::memory:").await.unwrap();
        let (ctx, cancel) = Context::background().with_cancel();
        cancel.cancel();

        nop_queryer().exec_context(&ctx, &handle).await.unwrap();
        assert_eq!(nop_updater().exec_context(&ctx, &handle).await.unwrap(), None);
    }
}
