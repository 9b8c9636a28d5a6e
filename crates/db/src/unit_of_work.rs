//! Transaction facade bundling several repository calls into one commit.
//!
//! Repository methods that accept `impl PgExecutor` can run against either
//! the pool or [`UnitOfWork::conn`]. Dropping a `UnitOfWork` without calling
//! [`UnitOfWork::commit`] rolls the transaction back.

use sqlx::{PgConnection, PgPool, Postgres, Transaction};

pub struct UnitOfWork {
    tx: Transaction<'static, Postgres>,
}

impl UnitOfWork {
    /// Open a transaction on a pooled connection.
    pub async fn begin(pool: &PgPool) -> Result<Self, sqlx::Error> {
        let tx = pool.begin().await?;
        Ok(Self { tx })
    }

    /// Connection bound to this transaction, for passing to repositories.
    pub fn conn(&mut self) -> &mut PgConnection {
        &mut self.tx
    }

    pub async fn commit(self) -> Result<(), sqlx::Error> {
        self.tx.commit().await
    }

    pub async fn rollback(self) -> Result<(), sqlx::Error> {
        self.tx.rollback().await
    }
}
