//! The handle capability set.
//!
//! [`Ext`] is everything the forwarding layer needs from a live handle:
//! statement execution (with a [`Context`]), placeholder rebinding for the
//! handle's dialect, and named-argument expansion. It is object safe so
//! operations can run against `&dyn Ext`.
//!
//! # Architecture
//!
//! `Handle` runs each statement on its pool; `TxHandle` runs it on the open
//! transaction's connection. Both bind `QueryParam`s through the per-driver
//! helpers in `params` and race the driver future against the context.

use crate::context::Context;
use crate::db::named;
use crate::db::params::{bind_mysql_params, bind_postgres_params, bind_sqlite_params};
use crate::db::rebind;
use crate::db::{DatabaseType, Handle, Row, TxHandle};
use crate::error::DbResult;
use crate::models::{ExecResult, NamedArgs, QueryParam};
use futures_util::future::BoxFuture;
use tracing::debug;

/// A live connection, pool or transaction able to run statements.
pub trait Ext: Send + Sync {
    /// Dialect of the underlying driver.
    fn database_type(&self) -> DatabaseType;

    /// Rewrite `?` placeholders into this handle's dialect.
    fn rebind(&self, sql: &str) -> String {
        rebind::rebind(self.database_type().bind_style(), sql)
    }

    /// Expand `:name` placeholders into this handle's positional syntax,
    /// returning the rewritten statement and its arguments in order.
    fn bind_named(&self, sql: &str, args: &NamedArgs) -> DbResult<(String, Vec<QueryParam>)> {
        named::bind_named(self.database_type().bind_style(), sql, args)
    }

    /// Fetch exactly one row; no row is [`DbError::RowNotFound`](crate::DbError::RowNotFound).
    fn fetch_one<'e>(
        &'e self,
        ctx: &'e Context,
        sql: &'e str,
        params: &'e [QueryParam],
    ) -> BoxFuture<'e, DbResult<Row>>;

    /// Fetch every row.
    fn fetch_all<'e>(
        &'e self,
        ctx: &'e Context,
        sql: &'e str,
        params: &'e [QueryParam],
    ) -> BoxFuture<'e, DbResult<Vec<Row>>>;

    /// Run a statement for its side effects.
    fn execute<'e>(
        &'e self,
        ctx: &'e Context,
        sql: &'e str,
        params: &'e [QueryParam],
    ) -> BoxFuture<'e, DbResult<ExecResult>>;
}

fn log_statement(kind: &str, db_type: DatabaseType, sql: &str, params: &[QueryParam]) {
    debug!(
        kind,
        db_type = %db_type,
        sql = %sql,
        params = params.len(),
        "Executing statement"
    );
}

impl Ext for Handle {
    fn database_type(&self) -> DatabaseType {
        self.db_type()
    }

    fn fetch_one<'e>(
        &'e self,
        ctx: &'e Context,
        sql: &'e str,
        params: &'e [QueryParam],
    ) -> BoxFuture<'e, DbResult<Row>> {
        Box::pin(async move {
            log_statement("fetch_one", self.db_type(), sql, params);
            impl_db_dispatch!(Handle, self, {
                MySql(p) => ctx
                    .run("fetch_one", bind_mysql_params(sqlx::query(sql), params).fetch_one(p))
                    .await
                    .map(Row::MySql),
                Postgres(p) => ctx
                    .run("fetch_one", bind_postgres_params(sqlx::query(sql), params).fetch_one(p))
                    .await
                    .map(Row::Postgres),
                SQLite(p) => ctx
                    .run("fetch_one", bind_sqlite_params(sqlx::query(sql), params).fetch_one(p))
                    .await
                    .map(Row::SQLite),
            })
        })
    }

    fn fetch_all<'e>(
        &'e self,
        ctx: &'e Context,
        sql: &'e str,
        params: &'e [QueryParam],
    ) -> BoxFuture<'e, DbResult<Vec<Row>>> {
        Box::pin(async move {
            log_statement("fetch_all", self.db_type(), sql, params);
            impl_db_dispatch!(Handle, self, {
                MySql(p) => ctx
                    .run("fetch_all", bind_mysql_params(sqlx::query(sql), params).fetch_all(p))
                    .await
                    .map(|rows| rows.into_iter().map(Row::MySql).collect()),
                Postgres(p) => ctx
                    .run("fetch_all", bind_postgres_params(sqlx::query(sql), params).fetch_all(p))
                    .await
                    .map(|rows| rows.into_iter().map(Row::Postgres).collect()),
                SQLite(p) => ctx
                    .run("fetch_all", bind_sqlite_params(sqlx::query(sql), params).fetch_all(p))
                    .await
                    .map(|rows| rows.into_iter().map(Row::SQLite).collect()),
            })
        })
    }

    fn execute<'e>(
        &'e self,
        ctx: &'e Context,
        sql: &'e str,
        params: &'e [QueryParam],
    ) -> BoxFuture<'e, DbResult<ExecResult>> {
        Box::pin(async move {
            log_statement("execute", self.db_type(), sql, params);
            impl_db_dispatch!(Handle, self, {
                MySql(p) => ctx
                    .run("execute", bind_mysql_params(sqlx::query(sql), params).execute(p))
                    .await
                    .map(ExecResult::from),
                Postgres(p) => ctx
                    .run("execute", bind_postgres_params(sqlx::query(sql), params).execute(p))
                    .await
                    .map(ExecResult::from),
                SQLite(p) => ctx
                    .run("execute", bind_sqlite_params(sqlx::query(sql), params).execute(p))
                    .await
                    .map(ExecResult::from),
            })
        })
    }
}

impl Ext for TxHandle {
    fn database_type(&self) -> DatabaseType {
        self.db_type()
    }

    fn fetch_one<'e>(
        &'e self,
        ctx: &'e Context,
        sql: &'e str,
        params: &'e [QueryParam],
    ) -> BoxFuture<'e, DbResult<Row>> {
        Box::pin(async move {
            log_statement("fetch_one", self.db_type(), sql, params);
            let mut guard = self.lock().await;
            let Some(tx) = guard.as_mut() else {
                return Err(self.finished());
            };
            impl_db_dispatch!(DbTransaction, tx, {
                MySql(tx) => ctx
                    .run("fetch_one", bind_mysql_params(sqlx::query(sql), params).fetch_one(&mut **tx))
                    .await
                    .map(Row::MySql),
                Postgres(tx) => ctx
                    .run("fetch_one", bind_postgres_params(sqlx::query(sql), params).fetch_one(&mut **tx))
                    .await
                    .map(Row::Postgres),
                SQLite(tx) => ctx
                    .run("fetch_one", bind_sqlite_params(sqlx::query(sql), params).fetch_one(&mut **tx))
                    .await
                    .map(Row::SQLite),
            })
        })
    }

    fn fetch_all<'e>(
        &'e self,
        ctx: &'e Context,
        sql: &'e str,
        params: &'e [QueryParam],
    ) -> BoxFuture<'e, DbResult<Vec<Row>>> {
        Box::pin(async move {
            log_statement("fetch_all", self.db_type(), sql, params);
            let mut guard = self.lock().await;
            let Some(tx) = guard.as_mut() else {
                return Err(self.finished());
            };
            impl_db_dispatch!(DbTransaction, tx, {
                MySql(tx) => ctx
                    .run("fetch_all", bind_mysql_params(sqlx::query(sql), params).fetch_all(&mut **tx))
                    .await
                    .map(|rows| rows.into_iter().map(Row::MySql).collect()),
                Postgres(tx) => ctx
                    .run("fetch_all", bind_postgres_params(sqlx::query(sql), params).fetch_all(&mut **tx))
                    .await
                    .map(|rows| rows.into_iter().map(Row::Postgres).collect()),
                SQLite(tx) => ctx
                    .run("fetch_all", bind_sqlite_params(sqlx::query(sql), params).fetch_all(&mut **tx))
                    .await
                    .map(|rows| rows.into_iter().map(Row::SQLite).collect()),
            })
        })
    }

    fn execute<'e>(
        &'e self,
        ctx: &'e Context,
        sql: &'e str,
        params: &'e [QueryParam],
    ) -> BoxFuture<'e, DbResult<ExecResult>> {
        Box::pin(async move {
            log_statement("execute", self.db_type(), sql, params);
            let mut guard = self.lock().await;
            let Some(tx) = guard.as_mut() else {
                return Err(self.finished());
            };
            impl_db_dispatch!(DbTransaction, tx, {
                MySql(tx) => ctx
                    .run("execute", bind_mysql_params(sqlx::query(sql), params).execute(&mut **tx))
                    .await
                    .map(ExecResult::from),
                Postgres(tx) => ctx
                    .run("execute", bind_postgres_params(sqlx::query(sql), params).execute(&mut **tx))
                    .await
                    .map(ExecResult::from),
                SQLite(tx) => ctx
                    .run("execute", bind_sqlite_params(sqlx::query(sql), params).execute(&mut **tx))
                    .await
                    .map(ExecResult::from),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rebind_follows_dialect() {
        let handle = Handle::connect_url("sqlite::memory:").await.unwrap();
        assert_eq!(handle.rebind("SELECT ?"), "SELECT ?");
        assert_eq!(
            handle
                .bind_named("SELECT :a", &NamedArgs::new().with("a", 1))
                .unwrap(),
            ("SELECT ?".to_string(), vec![QueryParam::Int(1)])
        );
    }

    #[tokio::test]
    async fn test_fetch_one_and_execute() {
        let handle = Handle::connect_url("sqlite::memory:").await.unwrap();
        let ctx = Context::background();
        handle
            .execute(ctx, "CREATE TABLE kv (k TEXT PRIMARY KEY, v INTEGER)", &[])
            .await
            .unwrap();
        let result = handle
            .execute(
                ctx,
                "INSERT INTO kv (k, v) VALUES (?, ?)",
                &[QueryParam::from("a"), QueryParam::from(1)],
            )
            .await
            .unwrap();
        assert_eq!(result.rows_affected(), 1);
        assert_eq!(result.last_insert_id(), Some(1));

        let row = handle
            .fetch_one(ctx, "SELECT v FROM kv WHERE k = ?", &[QueryParam::from("a")])
            .await
            .unwrap();
        let (v,): (i64,) = row.scan().unwrap();
        assert_eq!(v, 1);

        let err = handle
            .fetch_one(ctx, "SELECT v FROM kv WHERE k = ?", &[QueryParam::from("zz")])
            .await
            .unwrap_err();
        assert!(err.is_row_not_found());
    }

    #[tokio::test]
    async fn test_transaction_handle_commit_and_rollback() {
        let handle = Handle::connect_url("sqlite::memory:").await.unwrap();
        let ctx = Context::background();
        handle
            .execute(ctx, "CREATE TABLE t (id INTEGER PRIMARY KEY)", &[])
            .await
            .unwrap();

        let tx = handle.begin().await.unwrap();
        assert!(tx.id().starts_with("tx_"));
        tx.execute(ctx, "INSERT INTO t (id) VALUES (1)", &[])
            .await
            .unwrap();
        tx.rollback().await.unwrap();

        let tx = handle.begin().await.unwrap();
        tx.execute(ctx, "INSERT INTO t (id) VALUES (2)", &[])
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let rows = handle
            .fetch_all(ctx, "SELECT id FROM t ORDER BY id", &[])
            .await
            .unwrap();
        let ids: Vec<(i64,)> = rows.iter().map(|r| r.scan().unwrap()).collect();
        assert_eq!(ids, vec![(2,)]);
    }
}
