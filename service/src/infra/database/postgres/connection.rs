//! [`Connection`] definitions.

use std::{fmt, future::Future};

use futures::{FutureExt as _, TryFutureExt as _};
use ouroboros::self_referencing;
use tokio_postgres::{types::ToSql, GenericClient, Row};
use tracerr::Traced;
use tracing as log;

use crate::infra::database::{self, postgres};

pub use deadpool_postgres::{
    Client as NonTx, CreatePoolError as PoolCreationError, Pool, PoolError,
};
pub use tokio_postgres::Error;

/// Transactional Postgres database [`Connection`].
#[self_referencing]
pub struct Tx {
    /// [`NonTx`] [`Connection`] the transaction runs on.
    non_tx: NonTx,

    /// Transaction opened on the [`NonTx`] [`Connection`], until committed.
    #[borrows(mut non_tx)]
    #[not_covariant]
    tx: Option<deadpool_postgres::Transaction<'this>>,
}

impl fmt::Debug for Tx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tx")
            .field("committed", &self.with_tx(|tx| tx.is_none()))
            .finish_non_exhaustive()
    }
}

impl Tx {
    /// Opens a new [`Tx`] on the provided [`NonTx`] [`Connection`].
    ///
    /// # Errors
    ///
    /// If Postgres refuses to begin a transaction.
    pub async fn from_non_tx(
        client: NonTx,
    ) -> Result<Self, Traced<database::Error>> {
        let tx = Self::try_new_async_send(client, |c| {
            c.transaction().map_ok(Some).boxed()
        })
        .await
        .map_err(tracerr::from_and_wrap!(=> postgres::Error))
        .map_err(tracerr::map_from)?;
        log::trace!("transaction started");
        Ok(tx)
    }

    /// Commits this [`Tx`].
    ///
    /// # Errors
    ///
    /// If Postgres fails to commit the transaction, which is rolled back then.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    pub async fn commit(mut self) -> Result<(), Traced<database::Error>> {
        #[expect(
            clippy::redundant_closure_for_method_calls,
            reason = "different variance, see \
                      https://doc.rust-lang.org/nomicon/subtyping.html#variance"
        )]
        self.with_tx_mut(|tx| tx.take())
            .expect("`Tx` is committed only once")
            .commit()
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)?;
        log::trace!("transaction committed");
        Ok(())
    }

    /// Returns the underlying Postgres transaction of this [`Tx`].
    fn client(&self) -> &tokio_postgres::Transaction<'_> {
        self.with_tx(|tx| &**tx.as_ref().expect("`Tx` is already committed"))
    }
}

/// Generic database connection.
///
/// Statements are plain SQL strings, each of them is logged on the `TRACE`
/// level before being sent.
pub trait Connection {
    /// Runs the provided SQL statement with the given parameters and returns
    /// all the resulting rows.
    ///
    /// # Errors
    ///
    /// If the statement fails.
    fn query(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = Result<Vec<Row>, Traced<database::Error>>>;

    /// Runs the provided SQL statement with the given parameters and returns
    /// at most one resulting row.
    ///
    /// # Errors
    ///
    /// If the statement fails or returns more than one row.
    fn query_opt(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = Result<Option<Row>, Traced<database::Error>>>;

    /// Runs the provided SQL statement with the given parameters and returns
    /// the number of affected rows.
    ///
    /// # Errors
    ///
    /// If the statement fails.
    fn exec(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = Result<u64, Traced<database::Error>>>;
}

/// Runs [`Connection::query()`] on the provided Postgres client.
async fn query<C: GenericClient + Sync>(
    client: &C,
    sql: &str,
    params: &[&(dyn ToSql + Sync)],
) -> Result<Vec<Row>, Traced<database::Error>> {
    log::trace!(sql, "query");
    client
        .query(sql, params)
        .await
        .map_err(tracerr::from_and_wrap!(=> postgres::Error))
        .map_err(tracerr::map_from)
}

/// Runs [`Connection::query_opt()`] on the provided Postgres client.
async fn query_opt<C: GenericClient + Sync>(
    client: &C,
    sql: &str,
    params: &[&(dyn ToSql + Sync)],
) -> Result<Option<Row>, Traced<database::Error>> {
    log::trace!(sql, "query_opt");
    client
        .query_opt(sql, params)
        .await
        .map_err(tracerr::from_and_wrap!(=> postgres::Error))
        .map_err(tracerr::map_from)
}

/// Runs [`Connection::exec()`] on the provided Postgres client.
async fn exec<C: GenericClient + Sync>(
    client: &C,
    sql: &str,
    params: &[&(dyn ToSql + Sync)],
) -> Result<u64, Traced<database::Error>> {
    log::trace!(sql, "exec");
    client
        .execute(sql, params)
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
        query(&***self, sql, params).await
    }

    async fn query_opt(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Option<Row>, Traced<database::Error>> {
        query_opt(&***self, sql, params).await
    }

    async fn exec(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<u64, Traced<database::Error>> {
        exec(&***self, sql, params).await
    }
}

impl Connection for Tx {
    async fn query(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, Traced<database::Error>> {
        query(self.client(), sql, params).await
    }

    async fn query_opt(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Option<Row>, Traced<database::Error>> {
        query_opt(self.client(), sql, params).await
    }

    async fn exec(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<u64, Traced<database::Error>> {
        exec(self.client(), sql, params).await
    }
}
