//! [`Command`] for deleting a [`Machine`].

use common::operations::{By, Commit, Delete, Select, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{machine, Machine},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Machine`].
#[derive(Clone, Copy, Debug)]
pub struct DeleteMachine {
    /// ID of the [`Machine`] to delete.
    pub machine_id: machine::Id,
}

impl<Db> Command<DeleteMachine> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Machine>, machine::Id>>,
            Ok = Option<Machine>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Machine, machine::Id>>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Machine;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        DeleteMachine { machine_id }: DeleteMachine,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let machine = tx
            .execute(Select(By::<Option<Machine>, _>::new(machine_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::MachineNotExists(machine_id))
            .map_err(tracerr::wrap!())?;

        tx.execute(Delete(By::<Machine, _>::new(machine_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(machine)
    }
}

/// Error of [`DeleteMachine`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Machine`] with the provided ID does not exist.
    #[display("`Machine(id: {_0})` does not exist")]
    MachineNotExists(#[error(not(source))] machine::Id),
}
