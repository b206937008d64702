//! Write descriptors.

use crate::context::Context;
use crate::db::Ext;
use crate::models::{NamedArgs, QueryParam};
use crate::op::{Args, UpdateOutcome, Updater};
use crate::query;
use futures_util::future::BoxFuture;

/// A single statement run for its side effects.
#[derive(Debug, Clone)]
pub struct OpUpdate {
    sql: String,
    args: Args,
}

impl OpUpdate {
    /// The statement as written.
    pub fn sql(&self) -> &str {
        &self.sql
    }
}

pub fn op_exec(sql: impl Into<String>, args: Vec<QueryParam>) -> OpUpdate {
    OpUpdate {
        sql: sql.into(),
        args: Args::Positional(args),
    }
}

pub fn op_rebind_exec(sql: impl Into<String>, args: Vec<QueryParam>) -> OpUpdate {
    OpUpdate {
        sql: sql.into(),
        args: Args::Rebind(args),
    }
}

pub fn op_named_exec(sql: impl Into<String>, args: NamedArgs) -> OpUpdate {
    OpUpdate {
        sql: sql.into(),
        args: Args::Named(args),
    }
}

impl Updater for OpUpdate {
    fn exec_context<'a>(
        &'a mut self,
        ctx: &'a Context,
        ext: &'a dyn Ext,
    ) -> BoxFuture<'a, UpdateOutcome> {
        Box::pin(async move {
            let result = match &self.args {
                Args::Positional(args) => query::exec_context(ctx, ext, &self.sql, args).await,
                Args::Rebind(args) => query::rebind_exec_context(ctx, ext, &self.sql, args).await,
                Args::Named(args) => query::named_exec_context(ctx, ext, &self.sql, args).await,
            };
            result.map(Some)
        })
    }
}
