//! [`Command`] for adding a [`Material`] to a [`Supplier`]'s catalog.

use common::{
    operations::{By, Commit, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{material, supplier, supplier::CatalogEntry, Material, Supplier},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for adding a [`Material`] to a [`Supplier`]'s catalog.
///
/// Adding an already supplied [`Material`] is a no-op, while adding a
/// previously removed one restores its [`CatalogEntry`].
#[derive(Clone, Copy, Debug)]
pub struct AddSupplierMaterial {
    /// ID of the [`Supplier`] to add the [`Material`] for.
    pub supplier_id: supplier::Id,

    /// ID of the [`Material`] to add.
    pub material_id: material::Id,
}

impl<Db> Command<AddSupplierMaterial> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Supplier>, supplier::Id>>,
            Ok = Option<Supplier>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Material>, material::Id>>,
            Ok = Option<Material>,
            Err = Traced<database::Error>,
        > + Database<
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
        cmd: AddSupplierMaterial,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AddSupplierMaterial {
            supplier_id,
            material_id,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let supplier = tx
            .execute(Select(By::<Option<Supplier>, _>::new(supplier_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::SupplierNotExists(supplier_id))
            .map_err(tracerr::wrap!())?;
        if supplier.is_deleted() {
            return Err(tracerr::new!(E::SupplierDeleted(supplier_id)));
        }

        tx.execute(Select(By::<Option<Material>, _>::new(material_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::MaterialNotExists(material_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let existing = tx
            .execute(Select(By::<Option<CatalogEntry>, _>::new((
                supplier_id,
                material_id,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if let Some(entry) = existing.filter(CatalogEntry::is_active) {
            return Ok(entry);
        }

        let entry = CatalogEntry {
            supplier_id,
            material_id,
            created_at: DateTime::now().coerce(),
            deleted_at: None,
        };
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

/// Error of [`AddSupplierMaterial`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Material`] with the provided ID does not exist.
    #[display("`Material(id: {_0})` does not exist")]
    MaterialNotExists(#[error(not(source))] material::Id),

    /// [`Supplier`] with the provided ID is deleted.
    #[display("`Supplier(id: {_0})` is deleted")]
    SupplierDeleted(#[error(not(source))] supplier::Id),

    /// [`Supplier`] with the provided ID does not exist.
    #[display("`Supplier(id: {_0})` does not exist")]
    SupplierNotExists(#[error(not(source))] supplier::Id),
}
