//! [`Command`] for deleting a [`Material`].

use common::operations::{By, Commit, Delete, Select, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::{Part, PricedItem, PurchaseOrder};
use crate::{
    domain::{material, Material},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Material`] along with its [`PricedItem`].
///
/// Fails with a [`Database`] error if the [`Material`] is still referenced,
/// for example, by a [`Part`] or a [`PurchaseOrder`].
#[derive(Clone, Copy, Debug)]
pub struct DeleteMaterial {
    /// ID of the [`Material`] to delete.
    pub material_id: material::Id,
}

impl<Db> Command<DeleteMaterial> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Material>, material::Id>>,
            Ok = Option<Material>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Material, material::Id>>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Material;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        DeleteMaterial { material_id }: DeleteMaterial,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let material = tx
            .execute(Select(By::<Option<Material>, _>::new(material_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::MaterialNotExists(material_id))
            .map_err(tracerr::wrap!())?;

        tx.execute(Delete(By::<Material, _>::new(material_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(material)
    }
}

/// Error of [`DeleteMaterial`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Material`] with the provided ID does not exist.
    #[display("`Material(id: {_0})` does not exist")]
    MaterialNotExists(#[error(not(source))] material::Id),
}
