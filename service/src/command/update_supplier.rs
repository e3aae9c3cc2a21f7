//! [`Command`] for updating an existing [`Supplier`].

use common::operations::{By, Commit, Select, Transact, Transacted, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::supplier::{Contact, Name};
use crate::{
    domain::{supplier, Supplier},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating the [`Name`] and [`Contact`] details of an
/// existing [`Supplier`].
#[derive(Clone, Debug)]
pub struct UpdateSupplier {
    /// ID of the [`Supplier`] to update.
    pub supplier_id: supplier::Id,

    /// New [`Name`] of the [`Supplier`].
    pub name: supplier::Name,

    /// New [`Contact`] details of the [`Supplier`].
    pub contact: supplier::Contact,
}

impl<Db> Command<UpdateSupplier> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Supplier>, supplier::Id>>,
            Ok = Option<Supplier>,
            Err = Traced<database::Error>,
        > + Database<Update<Supplier>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Supplier;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateSupplier,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateSupplier {
            supplier_id,
            name,
            contact,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut supplier = tx
            .execute(Select(By::<Option<Supplier>, _>::new(supplier_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::SupplierNotExists(supplier_id))
            .map_err(tracerr::wrap!())?;
        if supplier.is_deleted() {
            return Err(tracerr::new!(E::SupplierDeleted(supplier_id)));
        }

        supplier.name = name;
        supplier.contact = contact;

        tx.execute(Update(supplier.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(supplier)
    }
}

/// Error of [`UpdateSupplier`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Supplier`] with the provided ID is deleted.
    #[display("`Supplier(id: {_0})` is deleted")]
    SupplierDeleted(#[error(not(source))] supplier::Id),

    /// [`Supplier`] with the provided ID does not exist.
    #[display("`Supplier(id: {_0})` does not exist")]
    SupplierNotExists(#[error(not(source))] supplier::Id),
}
