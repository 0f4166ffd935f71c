//! Postgres [`Database`] clients acquiring their [`Connection`]s lazily.

use std::sync::Arc;

use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard, OnceCell};
use tracerr::Traced;

#[cfg(doc)]
use crate::infra::Database;
use crate::infra::database::{
    self,
    postgres::{self, connection, Connection},
};

use super::connection::impl_connection;

/// Non-transactional Postgres client.
///
/// Acquires a pooled [`Connection`] on its first use and keeps it until
/// dropped. A cloned [`NonTx`] client acquires its own [`Connection`].
#[derive(Debug)]
pub struct NonTx {
    /// [`connection::Pool`] to acquire [`Connection`]s from.
    pool: connection::Pool,

    /// Acquired [`Connection`], if any.
    connection: OnceCell<connection::NonTx>,
}

impl Clone for NonTx {
    fn clone(&self) -> Self {
        Self::from_pool(self.pool.clone())
    }
}

impl NonTx {
    /// Creates a new [`NonTx`] client over the provided [`connection::Pool`].
    #[must_use]
    pub(crate) fn from_pool(pool: connection::Pool) -> Self {
        Self {
            pool,
            connection: OnceCell::new(),
        }
    }

    /// Returns the [`connection::Pool`] of this [`NonTx`] client.
    #[must_use]
    pub(crate) fn pool(&self) -> &connection::Pool {
        &self.pool
    }

    /// Returns the [`Connection`] of this [`NonTx`] client, acquiring it if
    /// required.
    async fn connection(
        &self,
    ) -> Result<&connection::NonTx, Traced<database::Error>> {
        self.connection
            .get_or_try_init(|| acquire(&self.pool))
            .await
    }
}

/// Transactional Postgres client.
///
/// Begins its transaction on the first use. Clones share the same
/// transaction.
#[derive(Clone, Debug)]
pub struct Tx {
    /// [`connection::Pool`] to acquire a [`Connection`] from.
    pool: connection::Pool,

    /// Begun transaction, if any.
    tx: Arc<Mutex<Option<connection::Tx>>>,
}

impl Tx {
    /// Creates a new [`Tx`] client over the provided [`connection::Pool`].
    #[must_use]
    pub(crate) fn from_pool(pool: connection::Pool) -> Self {
        Self {
            pool,
            tx: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns the transaction of this [`Tx`] client, beginning it if
    /// required.
    async fn connection(
        &self,
    ) -> Result<MappedMutexGuard<'_, connection::Tx>, Traced<database::Error>>
    {
        let mut guard = self.tx.lock().await;
        if guard.is_none() {
            let client = acquire(&self.pool).await.map_err(tracerr::wrap!())?;
            *guard = Some(
                connection::Tx::begin(client)
                    .await
                    .map_err(tracerr::wrap!())?,
            );
        }
        MutexGuard::try_map(guard, Option::as_mut)
            .map_err(|_| tracerr::new!(postgres::Error::TxFinished))
            .map_err(tracerr::map_from)
    }

    /// Commits the transaction of this [`Tx`] client.
    ///
    /// Does nothing if the transaction hasn't begun. Next use of this [`Tx`]
    /// client begins a new transaction.
    ///
    /// # Errors
    ///
    /// If failed to commit the transaction.
    pub async fn commit(&self) -> Result<(), Traced<database::Error>> {
        let tx = self.tx.lock().await.take();
        match tx {
            Some(tx) => tx.commit().await.map_err(tracerr::wrap!()),
            None => Ok(()),
        }
    }
}

/// Acquires a new [`connection::NonTx`] from the provided
/// [`connection::Pool`].
async fn acquire(
    pool: &connection::Pool,
) -> Result<connection::NonTx, Traced<database::Error>> {
    pool.get()
        .await
        .map_err(tracerr::from_and_wrap!(=> postgres::Error))
        .map_err(tracerr::map_from)
}

impl_connection!(lazy NonTx => |c| c.connection().await?);
impl_connection!(lazy Tx => |c| c.connection().await?);
