//! Transactions for multi-statement writes.
//!
//! Rank assignment on insert and batch reordering run inside a [`TransactionGuard`] so a
//! failure part-way leaves no statement applied.

use sqlx::{PgPool, Postgres, Transaction};
use std::ops::{Deref, DerefMut};
use vitrine_core::AppError;

/// A Postgres transaction that only takes effect through [`TransactionGuard::commit`].
///
/// Dropping the guard rolls back when the connection returns to the pool.
///
/// ```ignore
/// let mut tx = TransactionGuard::begin(&pool).await?;
/// sqlx::query("UPDATE media SET ...").execute(&mut **tx).await?;
/// tx.commit().await?;
/// ```
pub struct TransactionGuard {
    inner: Transaction<'static, Postgres>,
}

impl TransactionGuard {
    pub async fn begin(pool: &PgPool) -> Result<Self, AppError> {
        let inner = pool.begin().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to begin transaction");
            AppError::from(e)
        })?;
        Ok(Self { inner })
    }

    pub async fn commit(self) -> Result<(), AppError> {
        self.inner.commit().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to commit transaction");
            AppError::from(e)
        })
    }
}

impl Deref for TransactionGuard {
    type Target = Transaction<'static, Postgres>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for TransactionGuard {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}
