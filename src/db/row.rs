//! Driver rows and destination decoding.

use crate::db::DatabaseType;
use crate::error::{DbError, DbResult};
use sqlx::FromRow;
use sqlx::mysql::MySqlRow;
use sqlx::postgres::PgRow;
use sqlx::sqlite::SqliteRow;

/// A destination type that can be decoded from a row of any supported driver.
///
/// Implemented automatically for `#[derive(sqlx::FromRow)]` structs and for
/// tuples whose element types decode on every backend.
pub trait ScanTarget:
    for<'r> FromRow<'r, MySqlRow>
    + for<'r> FromRow<'r, PgRow>
    + for<'r> FromRow<'r, SqliteRow>
    + Send
    + Unpin
{
}

impl<T> ScanTarget for T where
    T: for<'r> FromRow<'r, MySqlRow>
        + for<'r> FromRow<'r, PgRow>
        + for<'r> FromRow<'r, SqliteRow>
        + Send
        + Unpin
{
}

/// A row fetched by a handle.
pub enum Row {
    MySql(MySqlRow),
    Postgres(PgRow),
    SQLite(SqliteRow),
}

impl Row {
    /// Decode this row into `T`.
    pub fn scan<T: ScanTarget>(&self) -> DbResult<T> {
        impl_db_dispatch!(Row, self, {
            MySql(r) => <T as FromRow<'_, MySqlRow>>::from_row(r).map_err(DbError::from),
            Postgres(r) => <T as FromRow<'_, PgRow>>::from_row(r).map_err(DbError::from),
            SQLite(r) => <T as FromRow<'_, SqliteRow>>::from_row(r).map_err(DbError::from),
        })
    }

    pub fn db_type(&self) -> DatabaseType {
        match self {
            Row::MySql(_) => DatabaseType::MySQL,
            Row::Postgres(_) => DatabaseType::PostgreSQL,
            Row::SQLite(_) => DatabaseType::SQLite,
        }
    }
}

impl std::fmt::Debug for Row {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use sqlx::Row as _;
        let columns = impl_db_dispatch!(Row, self, {
            MySql(r) => r.len(),
            Postgres(r) => r.len(),
            SQLite(r) => r.len(),
        });
        f.debug_struct("Row")
            .field("db_type", &self.db_type())
            .field("columns", &columns)
            .finish()
    }
}
