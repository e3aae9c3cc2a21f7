//! Postgres database clients, lazily checking out a [`Connection`] from the
//! [`connection::Pool`] on first use.

use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard};
use tokio_postgres::{types::ToSql, Row};
use tracerr::Traced;
use tracing as log;

use crate::infra::database::{
    self,
    postgres::{self, connection, Connection},
};

/// Non-transactional Postgres database client.
///
/// Each statement is committed on its own.
#[derive(Clone, Debug)]
pub struct NonTx {
    /// [`connection::Pool`] to check out the [`Connection`] from.
    pub(crate) pool: connection::Pool,

    /// Checked out [`Connection`], if any.
    connection: Arc<RwLock<Option<connection::NonTx>>>,
}

impl NonTx {
    /// Creates a new [`NonTx`] client on top of the provided
    /// [`connection::Pool`].
    #[must_use]
    pub(crate) fn from_pool(pool: connection::Pool) -> Self {
        Self {
            pool,
            connection: Arc::new(RwLock::new(None)),
        }
    }

    /// Creates a new [`NonTx`] client sharing the [`connection::Pool`] of
    /// this one, but not its checked out [`Connection`].
    #[must_use]
    pub fn fork(&self) -> Self {
        Self::from_pool(self.pool.clone())
    }

    /// Returns the [`Connection`] of this [`NonTx`] client, checking it out
    /// from the [`connection::Pool`] if there is none yet.
    async fn connection(
        &self,
    ) -> Result<RwLockReadGuard<'_, connection::NonTx>, Traced<database::Error>>
    {
        let guard = self.connection.read().await;
        if guard.is_some() {
            return Ok(RwLockReadGuard::map(guard, |c| {
                c.as_ref().expect("checked above")
            }));
        }
        drop(guard);

        let mut guard = self.connection.write().await;
        if guard.is_none() {
            *guard = Some(checkout(&self.pool).await?);
        }
        Ok(RwLockReadGuard::map(guard.downgrade(), |c| {
            c.as_ref().expect("checked out above")
        }))
    }

    /// Takes the checked out [`Connection`] from this [`NonTx`] client, if
    /// any.
    ///
    /// The next statement run via this [`NonTx`] client checks out a new
    /// [`Connection`].
    pub(crate) async fn take_connection(&self) -> Option<connection::NonTx> {
        self.connection.write().await.take()
    }
}

/// Transactional Postgres database client.
///
/// The transaction is opened lazily with the first statement, and is rolled
/// back unless [`Tx::commit()`]ed.
#[derive(Clone, Debug)]
pub struct Tx {
    /// [`connection::Pool`] to check out the [`Connection`] from.
    pool: connection::Pool,

    /// Shared state of all the clones of this [`Tx`] client.
    inner: Arc<Inner>,
}

/// Shared state of a [`Tx`] client.
#[derive(Debug)]
struct Inner {
    /// [`NonTx`] client this [`Tx`] client is started from, whose
    /// [`Connection`] is reused, if any.
    non_tx: RwLock<Option<NonTx>>,

    /// Opened [`connection::Tx`], until committed.
    tx: RwLock<Option<connection::Tx>>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        if self.tx.get_mut().is_some() {
            log::debug!("uncommitted transaction is rolled back");
        }
    }
}

impl Tx {
    /// Creates a new [`Tx`] client started from the provided [`NonTx`] one.
    #[must_use]
    pub fn from_non_tx(client: NonTx) -> Self {
        Self {
            pool: client.pool.clone(),
            inner: Arc::new(Inner {
                non_tx: RwLock::new(Some(client)),
                tx: RwLock::new(None),
            }),
        }
    }

    /// Returns the [`connection::Tx`] of this [`Tx`] client, opening it if
    /// there is none yet.
    async fn connection(
        &self,
    ) -> Result<RwLockReadGuard<'_, connection::Tx>, Traced<database::Error>>
    {
        let guard = self.inner.tx.read().await;
        if guard.is_some() {
            return Ok(RwLockReadGuard::map(guard, |c| {
                c.as_ref().expect("checked above")
            }));
        }
        drop(guard);

        let mut guard = self.inner.tx.write().await;
        if guard.is_none() {
            let reused = match self.inner.non_tx.write().await.take() {
                Some(client) => client.take_connection().await,
                None => None,
            };
            let conn = match reused {
                Some(conn) => conn,
                None => checkout(&self.pool).await?,
            };
            *guard = Some(
                connection::Tx::from_non_tx(conn)
                    .await
                    .map_err(tracerr::wrap!())?,
            );
        }
        Ok(RwLockReadGuard::map(guard.downgrade(), |c| {
            c.as_ref().expect("opened above")
        }))
    }

    /// Commits the transaction of this [`Tx`] client.
    ///
    /// Does nothing if no statement has been run via this [`Tx`] client.
    ///
    /// # Errors
    ///
    /// If failed to commit the transaction.
    pub async fn commit(&self) -> Result<(), Traced<database::Error>> {
        let Some(tx) = self.inner.tx.write().await.take() else {
            return Ok(());
        };
        tx.commit().await.map_err(tracerr::wrap!())
    }
}

/// Checks out a new [`connection::NonTx`] from the provided
/// [`connection::Pool`].
async fn checkout(
    pool: &connection::Pool,
) -> Result<connection::NonTx, Traced<database::Error>> {
    pool.get()
        .await
        .map_err(tracerr::from_and_wrap!(=> postgres::Error))
        .map_err(tracerr::map_from)
}

impl Connection for NonTx {
    async fn query(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, Traced<database::Error>> {
        let conn = self.connection().await.map_err(tracerr::wrap!())?;
        conn.query(sql, params).await.map_err(tracerr::wrap!())
    }

    async fn query_opt(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Option<Row>, Traced<database::Error>> {
        let conn = self.connection().await.map_err(tracerr::wrap!())?;
        conn.query_opt(sql, params).await.map_err(tracerr::wrap!())
    }

    async fn exec(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<u64, Traced<database::Error>> {
        let conn = self.connection().await.map_err(tracerr::wrap!())?;
        conn.exec(sql, params).await.map_err(tracerr::wrap!())
    }
}

impl Connection for Tx {
    async fn query(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, Traced<database::Error>> {
        let conn = self.connection().await.map_err(tracerr::wrap!())?;
        conn.query(sql, params).await.map_err(tracerr::wrap!())
    }

    async fn query_opt(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Option<Row>, Traced<database::Error>> {
        let conn = self.connection().await.map_err(tracerr::wrap!())?;
        conn.query_opt(sql, params).await.map_err(tracerr::wrap!())
    }

    async fn exec(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<u64, Traced<database::Error>> {
        let conn = self.connection().await.map_err(tracerr::wrap!())?;
        conn.exec(sql, params).await.map_err(tracerr::wrap!())
    }
}
