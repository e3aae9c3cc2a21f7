//! [`Command`] for sending a new [`RequestForQuotation`].

use std::collections::HashSet;

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime, Quantity,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::{request_for_quotation::Note, Material};
use crate::{
    domain::{
        material, request_for_quotation, supplier, RequestForQuotation,
        Supplier,
    },
    infra::{database, Database},
    read, Service,
};

use super::Command;

/// [`Command`] for sending a new [`RequestForQuotation`] to a [`Supplier`].
#[derive(Clone, Debug)]
pub struct CreateRequestForQuotation {
    /// ID of the [`Supplier`] to send a new [`RequestForQuotation`] to.
    pub supplier_id: supplier::Id,

    /// [`DateTime`] when a new [`RequestForQuotation`] is sent.
    pub requested_at: request_for_quotation::RequestDateTime,

    /// Free-form [`Note`] about a new [`RequestForQuotation`].
    pub note: Option<request_for_quotation::Note>,

    /// [`Material`]s to quote, with their [`Quantity`]s.
    pub materials: Vec<(material::Id, Quantity)>,
}

impl<Db> Command<CreateRequestForQuotation> for Service<Db>
where
    Db: Database<
            Select<By<Option<Supplier>, supplier::Id>>,
            Ok = Option<Supplier>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<read::supplier::Catalog, supplier::Id>>,
            Ok = read::supplier::Catalog,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Insert<RequestForQuotation>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = RequestForQuotation;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateRequestForQuotation,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateRequestForQuotation {
            supplier_id,
            requested_at,
            note,
            materials,
        } = cmd;

        if materials.is_empty() {
            return Err(tracerr::new!(E::NoMaterials));
        }
        let mut seen = HashSet::with_capacity(materials.len());
        if let Some((id, _)) =
            materials.iter().find(|(id, _)| !seen.insert(*id))
        {
            return Err(tracerr::new!(E::DuplicateMaterial(*id)));
        }

        let supplier = self
            .database()
            .execute(Select(By::<Option<Supplier>, _>::new(supplier_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::SupplierNotExists(supplier_id))
            .map_err(tracerr::wrap!())?;
        if supplier.is_deleted() {
            return Err(tracerr::new!(E::SupplierDeleted(supplier_id)));
        }

        let catalog = self
            .database()
            .execute(Select(By::<read::supplier::Catalog, _>::new(supplier_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if let Some((id, _)) =
            materials.iter().find(|(id, _)| !catalog.contains(id))
        {
            return Err(tracerr::new!(E::MaterialNotSupplied(*id)));
        }

        let items = materials
            .into_iter()
            .map(|(material_id, quantity)| request_for_quotation::Item {
                material_id,
                quantity,
                unit_price: None,
            })
            .collect();
        let rfq = RequestForQuotation {
            id: request_for_quotation::Id::new(),
            supplier_id,
            requested_at,
            status: request_for_quotation::Status::Submitted,
            note,
            materials: request_for_quotation::Items::new(items)
                .ok_or(E::NoMaterials)
                .map_err(tracerr::wrap!())?,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(rfq.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(rfq)
    }
}

/// Error of [`CreateRequestForQuotation`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Material`] is requested more than once.
    #[display("`Material(id: {_0})` is requested more than once")]
    DuplicateMaterial(#[error(not(source))] material::Id),

    /// [`Material`] is not in the [`Supplier`]'s catalog.
    #[display("`Material(id: {_0})` is not supplied by the `Supplier`")]
    MaterialNotSupplied(#[error(not(source))] material::Id),

    /// No [`Material`]s are requested.
    #[display("No `Material`s are requested")]
    NoMaterials,

    /// [`Supplier`] with the provided ID is deleted.
    #[display("`Supplier(id: {_0})` is deleted")]
    SupplierDeleted(#[error(not(source))] supplier::Id),

    /// [`Supplier`] with the provided ID does not exist.
    #[display("`Supplier(id: {_0})` does not exist")]
    SupplierNotExists(#[error(not(source))] supplier::Id),
}
