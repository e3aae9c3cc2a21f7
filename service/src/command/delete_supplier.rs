//! [`Command`] for deleting a [`Supplier`].

use common::{
    operations::{By, Commit, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::{PurchaseOrder, RequestForQuotation};
use crate::{
    domain::{supplier, Supplier},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Supplier`].
///
/// [`Supplier`]s are only marked as deleted, so their [`PurchaseOrder`]s and
/// [`RequestForQuotation`]s stay intact. Deleting an already deleted
/// [`Supplier`] is a no-op.
#[derive(Clone, Copy, Debug)]
pub struct DeleteSupplier {
    /// ID of the [`Supplier`] to delete.
    pub supplier_id: supplier::Id,
}

impl<Db> Command<DeleteSupplier> for Service<Db>
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
        DeleteSupplier { supplier_id }: DeleteSupplier,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

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
            return Ok(supplier);
        }

        supplier.deleted_at = Some(DateTime::now().coerce());

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

/// Error of [`DeleteSupplier`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Supplier`] with the provided ID does not exist.
    #[display("`Supplier(id: {_0})` does not exist")]
    SupplierNotExists(#[error(not(source))] supplier::Id),
}
