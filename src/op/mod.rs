//! Deferred operations.
//!
//! An operation captures *what* to run (statement, arguments and, for
//! reads, a destination) without a handle. The caller picks the handle and
//! optional [`Context`] later by calling `exec` / `exec_context`.
//!
//! Two capabilities:
//! - [`Queryer`]: reads into a destination, outcome `DbResult<()>`
//! - [`Updater`]: writes, outcome [`UpdateOutcome`]
//!
//! Operations compose: [`QueryerGroup`] / [`UpdaterGroup`] run members in
//! order and stop at the first error, [`HookedQueryer`] / [`HookedUpdater`]
//! post-process the outcome, and [`nop_queryer`] / [`nop_updater`] are the
//! identity elements for both.
//!
//! ```no_run
//! use sqlx_ops::op::{Queryer, Updater, UpdaterExt, UpdaterGroup, op_exec, op_get};
//! use sqlx_ops::{Handle, params};
//!
//! # async fn demo(handle: Handle) -> sqlx_ops::DbResult<()> {
//! let mut setup = UpdaterGroup::new()
//!     .with(op_exec("CREATE TABLE t (id INTEGER PRIMARY KEY)", params![]))
//!     .with(op_exec("INSERT INTO t (id) VALUES (?)", params![1]).hooked().on_success(|res| {
//!         tracing::info!(?res, "seeded");
//!         Ok(res)
//!     }));
//! setup.exec(&handle).await?;
//!
//! let mut count = (0i64,);
//! op_get("SELECT COUNT(*) FROM t", &mut count, params![]).exec(&handle).await?;
//! assert_eq!(count.0, 1);
//! # Ok(())
//! # }
//! ```

pub mod group;
pub mod hook;
pub mod nop;
pub mod scan;
pub mod update;

pub use group::{QueryerGroup, UpdaterGroup};
pub use hook::{HookedQueryer, HookedUpdater, QueryHook, UpdateHook};
pub use nop::{NopQueryer, NopUpdater, nop_queryer, nop_updater};
pub use scan::{
    OpGet, OpSelect, op_get, op_named_get, op_named_select, op_rebind_get, op_rebind_select,
    op_select,
};
pub use update::{OpUpdate, op_exec, op_named_exec, op_rebind_exec};

use crate::context::Context;
use crate::db::Ext;
use crate::error::DbResult;
use crate::models::{ExecResult, NamedArgs, QueryParam};
use futures_util::future::BoxFuture;

/// Outcome of an [`Updater`].
///
/// `Ok(None)` means the operation ran without producing a result (a no-op);
/// groups skip it when tracking the last result.
pub type UpdateOutcome = DbResult<Option<ExecResult>>;

/// A deferred read.
pub trait Queryer: Send {
    /// Run against `ext` under `ctx`.
    fn exec_context<'a>(
        &'a mut self,
        ctx: &'a Context,
        ext: &'a dyn Ext,
    ) -> BoxFuture<'a, DbResult<()>>;

    /// Run against `ext` with no deadline or cancellation.
    fn exec<'a>(&'a mut self, ext: &'a dyn Ext) -> BoxFuture<'a, DbResult<()>> {
        self.exec_context(Context::background(), ext)
    }
}

/// A deferred write.
pub trait Updater: Send {
    /// Run against `ext` under `ctx`.
    fn exec_context<'a>(
        &'a mut self,
        ctx: &'a Context,
        ext: &'a dyn Ext,
    ) -> BoxFuture<'a, UpdateOutcome>;

    /// Run against `ext` with no deadline or cancellation.
    fn exec<'a>(&'a mut self, ext: &'a dyn Ext) -> BoxFuture<'a, UpdateOutcome> {
        self.exec_context(Context::background(), ext)
    }
}

impl<Q: Queryer + ?Sized> Queryer for Box<Q> {
    fn exec_context<'a>(
        &'a mut self,
        ctx: &'a Context,
        ext: &'a dyn Ext,
    ) -> BoxFuture<'a, DbResult<()>> {
        (**self).exec_context(ctx, ext)
    }
}

impl<U: Updater + ?Sized> Updater for Box<U> {
    fn exec_context<'a>(
        &'a mut self,
        ctx: &'a Context,
        ext: &'a dyn Ext,
    ) -> BoxFuture<'a, UpdateOutcome> {
        (**self).exec_context(ctx, ext)
    }
}

/// Combinators for any [`Queryer`].
pub trait QueryerExt: Queryer + Sized {
    /// Start a hook chain around this operation.
    fn hooked<'h>(self) -> HookedQueryer<'h, Self> {
        HookedQueryer::new(self)
    }

    /// Erase the concrete type.
    fn boxed<'a>(self) -> Box<dyn Queryer + 'a>
    where
        Self: 'a,
    {
        Box::new(self)
    }
}

impl<Q: Queryer> QueryerExt for Q {}

/// Combinators for any [`Updater`].
pub trait UpdaterExt: Updater + Sized {
    /// Start a hook chain around this operation.
    fn hooked<'h>(self) -> HookedUpdater<'h, Self> {
        HookedUpdater::new(self)
    }

    /// Erase the concrete type.
    fn boxed<'a>(self) -> Box<dyn Updater + 'a>
    where
        Self: 'a,
    {
        Box::new(self)
    }
}

impl<U: Updater> UpdaterExt for U {}

/// How a descriptor's arguments are applied.
#[derive(Debug, Clone)]
pub(crate) enum Args {
    /// Statement already in the handle's dialect.
    Positional(Vec<QueryParam>),
    /// `?` placeholders, rebound by the handle.
    Rebind(Vec<QueryParam>),
    /// `:name` placeholders, expanded by the handle.
    Named(NamedArgs),
}
