//! Transaction boundaries
//!
//! Failing to open or commit a transaction is reported as
//! `TransactionFailure` so callers know the whole operation can be retried.

use harmony_core::{error::Result, HarmonyError};
use sqlx::{Sqlite, SqlitePool, Transaction};

pub(crate) async fn begin(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>> {
    pool.begin().await.map_err(HarmonyError::transaction)
}

pub(crate) async fn commit(tx: Transaction<'_, Sqlite>) -> Result<()> {
    tx.commit().await.map_err(HarmonyError::transaction)
}
