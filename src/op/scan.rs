//! Read descriptors.

use crate::context::Context;
use crate::db::{Ext, ScanTarget};
use crate::error::DbResult;
use crate::models::{NamedArgs, QueryParam};
use crate::op::{Args, Queryer};
use crate::query;
use futures_util::future::BoxFuture;

/// Single-row read into a borrowed destination.
pub struct OpGet<'d, T> {
    sql: String,
    dest: &'d mut T,
    args: Args,
}

/// All-rows read appended to a borrowed `Vec`.
pub struct OpSelect<'d, T> {
    sql: String,
    dest: &'d mut Vec<T>,
    args: Args,
}

pub fn op_get<'d, T: ScanTarget>(
    sql: impl Into<String>,
    dest: &'d mut T,
    args: Vec<QueryParam>,
) -> OpGet<'d, T> {
    OpGet {
        sql: sql.into(),
        dest,
        args: Args::Positional(args),
    }
}

pub fn op_rebind_get<'d, T: ScanTarget>(
    sql: impl Into<String>,
    dest: &'d mut T,
    args: Vec<QueryParam>,
) -> OpGet<'d, T> {
    OpGet {
        sql: sql.into(),
        dest,
        args: Args::Rebind(args),
    }
}

pub fn op_named_get<'d, T: ScanTarget>(
    sql: impl Into<String>,
    dest: &'d mut T,
    args: NamedArgs,
) -> OpGet<'d, T> {
    OpGet {
        sql: sql.into(),
        dest,
        args: Args::Named(args),
    }
}

pub fn op_select<'d, T: ScanTarget>(
    sql: impl Into<String>,
    dest: &'d mut Vec<T>,
    args: Vec<QueryParam>,
) -> OpSelect<'d, T> {
    OpSelect {
        sql: sql.into(),
        dest,
        args: Args::Positional(args),
    }
}

pub fn op_rebind_select<'d, T: ScanTarget>(
    sql: impl Into<String>,
    dest: &'d mut Vec<T>,
    args: Vec<QueryParam>,
) -> OpSelect<'d, T> {
    OpSelect {
        sql: sql.into(),
        dest,
        args: Args::Rebind(args),
    }
}

pub fn op_named_select<'d, T: ScanTarget>(
    sql: impl Into<String>,
    dest: &'d mut Vec<T>,
    args: NamedArgs,
) -> OpSelect<'d, T> {
    OpSelect {
        sql: sql.into(),
        dest,
        args: Args::Named(args),
    }
}

impl<T: ScanTarget> Queryer for OpGet<'_, T> {
    fn exec_context<'a>(
        &'a mut self,
        ctx: &'a Context,
        ext: &'a dyn Ext,
    ) -> BoxFuture<'a, DbResult<()>> {
        let Self { sql, dest, args } = self;
        Box::pin(async move {
            match args {
                Args::Positional(args) => query::get_context(ctx, ext, &mut **dest, sql, args).await,
                Args::Rebind(args) => {
                    query::rebind_get_context(ctx, ext, &mut **dest, sql, args).await
                }
                Args::Named(args) => {
                    query::named_get_context(ctx, ext, &mut **dest, sql, args).await
                }
            }
        })
    }
}

impl<T: ScanTarget> Queryer for OpSelect<'_, T> {
    fn exec_context<'a>(
        &'a mut self,
        ctx: &'a Context,
        ext: &'a dyn Ext,
    ) -> BoxFuture<'a, DbResult<()>> {
        let Self { sql, dest, args } = self;
        Box::pin(async move {
            match args {
                Args::Positional(args) => {
                    query::select_context(ctx, ext, &mut **dest, sql, args).await
                }
                Args::Rebind(args) => {
                    query::rebind_select_context(ctx, ext, &mut **dest, sql, args).await
                }
                Args::Named(args) => {
                    query::named_select_context(ctx, ext, &mut **dest, sql, args).await
                }
            }
        })
    }
}

impl<T> std::fmt::Debug for OpGet<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpGet")
            .field("sql", &self.sql)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

impl<T> std::fmt::Debug for OpSelect<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpSelect")
            .field("sql", &self.sql)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}
