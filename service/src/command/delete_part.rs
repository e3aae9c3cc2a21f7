//! [`Command`] for deleting a [`Part`].

use common::operations::{By, Commit, Delete, Select, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::{Machine, PricedItem};
use crate::{
    domain::{part, Part},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Part`] along with its [`PricedItem`].
///
/// Fails with a [`Database`] error if the [`Part`] is still used by a
/// [`Machine`].
#[derive(Clone, Copy, Debug)]
pub struct DeletePart {
    /// ID of the [`Part`] to delete.
    pub part_id: part::Id,
}

impl<Db> Command<DeletePart> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Part>, part::Id>>,
            Ok = Option<Part>,
            Err = Traced<database::Error>,
        > + Database<Delete<By<Part, part::Id>>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Part;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        DeletePart { part_id }: DeletePart,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let part = tx
            .execute(Select(By::<Option<Part>, _>::new(part_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PartNotExists(part_id))
            .map_err(tracerr::wrap!())?;

        tx.execute(Delete(By::<Part, _>::new(part_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(part)
    }
}

/// Error of [`DeletePart`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Part`] with the provided ID does not exist.
    #[display("`Part(id: {_0})` does not exist")]
    PartNotExists(#[error(not(source))] part::Id),
}
