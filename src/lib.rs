//! sqlx operations library
//!
//! A thin convenience layer over `sqlx` for SQLite, PostgreSQL and MySQL:
//!
//! - [`query`]: `get` / `select` / `exec` forwarding functions, each with
//!   `rebind_`, `named_` and `_context` variants
//! - [`op`]: deferred read/write operations that can be grouped, hooked and
//!   run later against any handle
//! - [`db`]: the handle adapter ([`Handle`] pools, [`TxHandle`]
//!   transactions) behind the [`Ext`] capability trait
//! - [`context`]: deadline and cancellation passed through to the handle

pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod models;
pub mod op;
pub mod query;

pub use config::{HandleConfig, PoolOptions};
pub use context::{CancelHandle, Context};
pub use db::{DatabaseType, Ext, Handle, Row, ScanTarget, TxHandle};
pub use error::{DbError, DbResult};
pub use models::{ExecResult, NamedArgs, QueryParam};
pub use op::{
    HookedQueryer, HookedUpdater, QueryerExt, QueryerGroup, Queryer, UpdateOutcome, Updater,
    UpdaterExt, UpdaterGroup, nop_queryer, nop_updater, op_exec, op_get, op_named_exec,
    op_named_get, op_named_select, op_rebind_exec, op_rebind_get, op_rebind_select, op_select,
};
