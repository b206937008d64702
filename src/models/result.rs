//! Write outcome.

use serde::{Deserialize, Serialize};

/// Outcome of a write statement.
///
/// `Default` is the zero-valued result: no rows affected, no insert id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecResult {
    pub rows_affected: u64,
    /// Filled by MySQL (`LAST_INSERT_ID()`) and SQLite (`last_insert_rowid()`).
    /// PostgreSQL has no equivalent; use `RETURNING` with a read operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_insert_id: Option<i64>,
}

impl ExecResult {
    pub fn new(rows_affected: u64, last_insert_id: Option<i64>) -> Self {
        Self {
            rows_affected,
            last_insert_id,
        }
    }

    pub fn rows_affected(&self) -> u64 {
        self.rows_affected
    }

    pub fn last_insert_id(&self) -> Option<i64> {
        self.last_insert_id
    }
}

impl From<sqlx::mysql::MySqlQueryResult> for ExecResult {
    fn from(r: sqlx::mysql::MySqlQueryResult) -> Self {
        Self::new(r.rows_affected(), i64::try_from(r.last_insert_id()).ok())
    }
}

impl From<sqlx::postgres::PgQueryResult> for ExecResult {
    fn from(r: sqlx::postgres::PgQueryResult) -> Self {
        Self::new(r.rows_affected(), None)
    }
}

impl From<sqlx::sqlite::SqliteQueryResult> for ExecResult {
    fn from(r: sqlx::sqlite::SqliteQueryResult) -> Self {
        Self::new(r.rows_affected(), Some(r.last_insert_rowid()))
    }
}
