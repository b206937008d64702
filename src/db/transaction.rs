//! Transaction handles.
//!
//! A [`TxHandle`] owns one open transaction and its dedicated connection.
//! Statements run through it share that transaction until it is committed or
//! rolled back. Dropping an unfinished handle rolls back (sqlx behaviour).

use crate::db::DatabaseType;
use crate::error::{DbError, DbResult};
use sqlx::{MySql, Postgres, Sqlite, Transaction};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, MutexGuard};
use tracing::info;

static NEXT_TRANSACTION_ID: AtomicU64 = AtomicU64::new(1);

/// Database-specific transaction wrapper.
pub enum DbTransaction {
    /// MySQL transaction
    MySql(Transaction<'static, MySql>),
    /// PostgreSQL transaction
    Postgres(Transaction<'static, Postgres>),
    /// SQLite transaction
    SQLite(Transaction<'static, Sqlite>),
}

impl DbTransaction {
    /// Get the database type for this transaction.
    pub fn db_type(&self) -> DatabaseType {
        match self {
            DbTransaction::MySql(_) => DatabaseType::MySQL,
            DbTransaction::Postgres(_) => DatabaseType::PostgreSQL,
            DbTransaction::SQLite(_) => DatabaseType::SQLite,
        }
    }

    async fn commit(self) -> DbResult<()> {
        impl_db_dispatch!(DbTransaction, self, {
            MySql(tx) => tx.commit().await.map_err(DbError::from),
            Postgres(tx) => tx.commit().await.map_err(DbError::from),
            SQLite(tx) => tx.commit().await.map_err(DbError::from),
        })
    }

    async fn rollback(self) -> DbResult<()> {
        impl_db_dispatch!(DbTransaction, self, {
            MySql(tx) => tx.rollback().await.map_err(DbError::from),
            Postgres(tx) => tx.rollback().await.map_err(DbError::from),
            SQLite(tx) => tx.rollback().await.map_err(DbError::from),
        })
    }
}

/// An open transaction usable as a handle.
pub struct TxHandle {
    id: String,
    db_type: DatabaseType,
    transaction: Mutex<Option<DbTransaction>>,
}

impl TxHandle {
    pub(crate) fn new(transaction: DbTransaction) -> Self {
        let id = format!(
            "tx_{}",
            NEXT_TRANSACTION_ID.fetch_add(1, Ordering::Relaxed)
        );
        Self {
            id,
            db_type: transaction.db_type(),
            transaction: Mutex::new(Some(transaction)),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn db_type(&self) -> DatabaseType {
        self.db_type
    }

    /// Commit the transaction.
    pub async fn commit(self) -> DbResult<()> {
        let tx = self.take().await?;
        tx.commit().await?;
        info!(transaction_id = %self.id, "Transaction committed");
        Ok(())
    }

    /// Roll back the transaction.
    pub async fn rollback(self) -> DbResult<()> {
        let tx = self.take().await?;
        tx.rollback().await?;
        info!(transaction_id = %self.id, "Transaction rolled back");
        Ok(())
    }

    async fn take(&self) -> DbResult<DbTransaction> {
        self.transaction
            .lock()
            .await
            .take()
            .ok_or_else(|| self.finished())
    }

    /// Lock the transaction slot for one statement.
    pub(crate) async fn lock(&self) -> MutexGuard<'_, Option<DbTransaction>> {
        self.transaction.lock().await
    }

    pub(crate) fn finished(&self) -> DbError {
        DbError::transaction("Transaction already finished", &self.id)
    }
}

impl std::fmt::Debug for TxHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TxHandle")
            .field("id", &self.id)
            .field("db_type", &self.db_type)
            .finish()
    }
}
