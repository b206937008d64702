//! Forwarding functions.
//!
//! Calling-convention shims over [`Ext`]: single-row `get`, all-rows
//! `select` and side-effect `exec`, each in four flavours:
//!
//! - plain: run the statement as written
//! - `rebind_`: rewrite `?` placeholders with [`Ext::rebind`] first
//! - `named_`: expand `:name` placeholders with [`Ext::bind_named`] first;
//!   a binding error is returned before anything is sent to the database
//! - `_context`: take a [`Context`] and hand it to the handle; the plain
//!   forms use [`Context::background`]
//!
//! Errors from the handle are returned unchanged.

use crate::context::Context;
use crate::db::{Ext, ScanTarget};
use crate::error::DbResult;
use crate::models::{ExecResult, NamedArgs, QueryParam};

// =============================================================================
// Get
// =============================================================================

/// Fetch one row into `dest`. `dest` is left untouched on any error.
pub async fn get_context<E, T>(
    ctx: &Context,
    ext: &E,
    dest: &mut T,
    sql: &str,
    args: &[QueryParam],
) -> DbResult<()>
where
    E: Ext + ?Sized,
    T: ScanTarget,
{
    let row = ext.fetch_one(ctx, sql, args).await?;
    *dest = row.scan()?;
    Ok(())
}

pub async fn get<E, T>(ext: &E, dest: &mut T, sql: &str, args: &[QueryParam]) -> DbResult<()>
where
    E: Ext + ?Sized,
    T: ScanTarget,
{
    get_context(Context::background(), ext, dest, sql, args).await
}

pub async fn rebind_get_context<E, T>(
    ctx: &Context,
    ext: &E,
    dest: &mut T,
    sql: &str,
    args: &[QueryParam],
) -> DbResult<()>
where
    E: Ext + ?Sized,
    T: ScanTarget,
{
    let sql = ext.rebind(sql);
    get_context(ctx, ext, dest, &sql, args).await
}

pub async fn rebind_get<E, T>(
    ext: &E,
    dest: &mut T,
    sql: &str,
    args: &[QueryParam],
) -> DbResult<()>
where
    E: Ext + ?Sized,
    T: ScanTarget,
{
    rebind_get_context(Context::background(), ext, dest, sql, args).await
}

pub async fn named_get_context<E, T>(
    ctx: &Context,
    ext: &E,
    dest: &mut T,
    sql: &str,
    args: &NamedArgs,
) -> DbResult<()>
where
    E: Ext + ?Sized,
    T: ScanTarget,
{
    let (sql, argv) = ext.bind_named(sql, args)?;
    get_context(ctx, ext, dest, &sql, &argv).await
}

pub async fn named_get<E, T>(ext: &E, dest: &mut T, sql: &str, args: &NamedArgs) -> DbResult<()>
where
    E: Ext + ?Sized,
    T: ScanTarget,
{
    named_get_context(Context::background(), ext, dest, sql, args).await
}

// =============================================================================
// Select
// =============================================================================

/// Fetch every row and append them to `dest`.
///
/// Rows are decoded before anything is appended, so `dest` only changes when
/// the whole result decodes.
pub async fn select_context<E, T>(
    ctx: &Context,
    ext: &E,
    dest: &mut Vec<T>,
    sql: &str,
    args: &[QueryParam],
) -> DbResult<()>
where
    E: Ext + ?Sized,
    T: ScanTarget,
{
    let rows = ext.fetch_all(ctx, sql, args).await?;
    let decoded = rows.iter().map(|r| r.scan()).collect::<DbResult<Vec<T>>>()?;
    dest.extend(decoded);
    Ok(())
}

pub async fn select<E, T>(
    ext: &E,
    dest: &mut Vec<T>,
    sql: &str,
    args: &[QueryParam],
) -> DbResult<()>
where
    E: Ext + ?Sized,
    T: ScanTarget,
{
    select_context(Context::background(), ext, dest, sql, args).await
}

pub async fn rebind_select_context<E, T>(
    ctx: &Context,
    ext: &E,
    dest: &mut Vec<T>,
    sql: &str,
    args: &[QueryParam],
) -> DbResult<()>
where
    E: Ext + ?Sized,
    T: ScanTarget,
{
    let sql = ext.rebind(sql);
    select_context(ctx, ext, dest, &sql, args).await
}

pub async fn rebind_select<E, T>(
    ext: &E,
    dest: &mut Vec<T>,
    sql: &str,
    args: &[QueryParam],
) -> DbResult<()>
where
    E: Ext + ?Sized,
    T: ScanTarget,
{
    rebind_select_context(Context::background(), ext, dest, sql, args).await
}

pub async fn named_select_context<E, T>(
    ctx: &Context,
    ext: &E,
    dest: &mut Vec<T>,
    sql: &str,
    args: &NamedArgs,
) -> DbResult<()>
where
    E: Ext + ?Sized,
    T: ScanTarget,
{
    let (sql, argv) = ext.bind_named(sql, args)?;
    select_context(ctx, ext, dest, &sql, &argv).await
}

pub async fn named_select<E, T>(
    ext: &E,
    dest: &mut Vec<T>,
    sql: &str,
    args: &NamedArgs,
) -> DbResult<()>
where
    E: Ext + ?Sized,
    T: ScanTarget,
{
    named_select_context(Context::background(), ext, dest, sql, args).await
}

// =============================================================================
// Exec
// =============================================================================

pub async fn exec_context<E>(
    ctx: &Context,
    ext: &E,
    sql: &str,
    args: &[QueryParam],
) -> DbResult<ExecResult>
where
    E: Ext + ?Sized,
{
    ext.execute(ctx, sql, args).await
}

pub async fn exec<E>(ext: &E, sql: &str, args: &[QueryParam]) -> DbResult<ExecResult>
where
    E: Ext + ?Sized,
{
    exec_context(Context::background(), ext, sql, args).await
}

pub async fn rebind_exec_context<E>(
    ctx: &Context,
    ext: &E,
    sql: &str,
    args: &[QueryParam],
) -> DbResult<ExecResult>
where
    E: Ext + ?Sized,
{
    let sql = ext.rebind(sql);
    exec_context(ctx, ext, &sql, args).await
}

pub async fn rebind_exec<E>(ext: &E, sql: &str, args: &[QueryParam]) -> DbResult<ExecResult>
where
    E: Ext + ?Sized,
{
    rebind_exec_context(Context::background(), ext, sql, args).await
}

pub async fn named_exec_context<E>(
    ctx: &Context,
    ext: &E,
    sql: &str,
    args: &NamedArgs,
) -> DbResult<ExecResult>
where
    E: Ext + ?Sized,
{
    let (sql, argv) = ext.bind_named(sql, args)?;
    exec_context(ctx, ext, &sql, &argv).await
}

pub async fn named_exec<E>(ext: &E, sql: &str, args: &NamedArgs) -> DbResult<ExecResult>
where
    E: Ext + ?Sized,
{
    named_exec_context(Context::background(), ext, sql, args).await
}
