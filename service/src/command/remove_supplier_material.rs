//! [`Command`] for removing a [`Material`] from a [`Supplier`]'s catalog.

use common::{
    operations::{By, Commit, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::{Material, Supplier};
use crate::{
    domain::{material, supplier, supplier::CatalogEntry},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for removing a [`Material`] from a [`Supplier`]'s catalog.
#[derive(Clone, Copy, Debug)]
pub struct RemoveSupplierMaterial {
    /// ID of the [`Supplier`] to remove the [`Material`] for.
    pub supplier_id: supplier::Id,

    /// ID of the [`Material`] to remove.
    pub material_id: material::Id,
}

impl<Db> Command<RemoveSupplierMaterial> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<
                By<Option<CatalogEntry>, (supplier::Id, material::Id)>,
            >,
            Ok = Option<CatalogEntry>,
            Err = Traced<database::Error>,
        > + Database<Update<CatalogEntry>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = CatalogEntry;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RemoveSupplierMaterial,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RemoveSupplierMaterial {
            supplier_id,
            material_id,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut entry = tx
            .execute(Select(By::<Option<CatalogEntry>, _>::new((
                supplier_id,
                material_id,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(CatalogEntry::is_active)
            .ok_or(E::MaterialNotSupplied(supplier_id, material_id))
            .map_err(tracerr::wrap!())?;

        entry.deleted_at = Some(DateTime::now().coerce());

        tx.execute(Update(entry))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(entry)
    }
}

/// Error of [`RemoveSupplierMaterial`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Material`] is not in the [`Supplier`]'s catalog.
    #[display("`Material(id: {_1})` is not supplied by `Supplier(id: {_0})`")]
    MaterialNotSupplied(
        #[error(not(source))] supplier::Id,
        #[error(not(source))] material::Id,
    ),
}
