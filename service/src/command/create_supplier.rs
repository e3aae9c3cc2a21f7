//! [`Command`] for creating a new [`Supplier`].

use common::{
    operations::{Commit, Insert, Transact, Transacted},
    DateTime,
};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::supplier::{Contact, Name};
use crate::{
    domain::{supplier, Supplier},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Supplier`].
#[derive(Clone, Debug)]
pub struct CreateSupplier {
    /// [`Name`] of a new [`Supplier`].
    pub name: supplier::Name,

    /// [`Contact`] details of a new [`Supplier`].
    pub contact: supplier::Contact,
}

impl<Db> Command<CreateSupplier> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Supplier>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Supplier;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        CreateSupplier { name, contact }: CreateSupplier,
    ) -> Result<Self::Ok, Self::Err> {
        let supplier = Supplier {
            id: supplier::Id::new(),
            name,
            contact,
            created_at: DateTime::now().coerce(),
            deleted_at: None,
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::wrap!())?;
        tx.execute(Insert(supplier.clone()))
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        Ok(supplier)
    }
}

/// Error of [`CreateSupplier`] [`Command`] execution.
pub type ExecutionError = database::Error;
