//! [`Command`] for saving a [`Supplier`]'s answer to a
//! [`RequestForQuotation`].

use std::collections::HashMap;

use common::{
    operations::{By, Commit, Select, Transact, Transacted, Update},
    Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::{request_for_quotation::Status, Material, Supplier};
use crate::{
    domain::{material, request_for_quotation, RequestForQuotation},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for saving a [`Supplier`]'s answer to a
/// [`RequestForQuotation`], making it [`Status::Answered`].
///
/// The answer must quote a unit price for every requested [`Material`].
#[derive(Clone, Debug)]
pub struct SaveRequestForQuotationAnswer {
    /// ID of the answered [`RequestForQuotation`].
    pub request_for_quotation_id: request_for_quotation::Id,

    /// Quoted unit prices of the requested [`Material`]s.
    pub prices: Vec<(material::Id, Money)>,
}

impl<Db> Command<SaveRequestForQuotationAnswer> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<
                By<Option<RequestForQuotation>, request_for_quotation::Id>,
            >,
            Ok = Option<RequestForQuotation>,
            Err = Traced<database::Error>,
        > + Database<
            Update<RequestForQuotation>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = RequestForQuotation;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: SaveRequestForQuotationAnswer,
    ) -> Result<Self::Ok, Self::Err> {
        use request_for_quotation::AnswerError;
        use ExecutionError as E;

        let SaveRequestForQuotationAnswer {
            request_for_quotation_id: id,
            prices,
        } = cmd;

        let mut quoted = HashMap::with_capacity(prices.len());
        for (material_id, price) in prices {
            if !price.is_positive() {
                return Err(tracerr::new!(E::NonPositiveUnitPrice(
                    material_id
                )));
            }
            if quoted.insert(material_id, price).is_some() {
                return Err(tracerr::new!(E::DuplicateMaterial(material_id)));
            }
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut rfq = tx
            .execute(Select(By::<Option<RequestForQuotation>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RequestForQuotationNotExists(id))
            .map_err(tracerr::wrap!())?;
        if rfq.status == request_for_quotation::Status::Answered {
            return Err(tracerr::new!(E::AlreadyAnswered(id)));
        }

        rfq.answer(quoted)
            .map_err(|e| match e {
                AnswerError::MissingMaterial(m) => E::IncompleteAnswer(m),
                AnswerError::UnknownMaterial(m) => E::UnknownMaterial(m),
            })
            .map_err(tracerr::wrap!())?;

        tx.execute(Update(rfq.clone()))
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

/// Error of [`SaveRequestForQuotationAnswer`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`RequestForQuotation`] is answered already.
    #[display("`RequestForQuotation(id: {_0})` is answered already")]
    AlreadyAnswered(#[error(not(source))] request_for_quotation::Id),

    /// [`Material`] is quoted more than once.
    #[display("`Material(id: {_0})` is quoted more than once")]
    DuplicateMaterial(#[error(not(source))] material::Id),

    /// Requested [`Material`] is not quoted.
    #[display("`Material(id: {_0})` is not quoted")]
    IncompleteAnswer(#[error(not(source))] material::Id),

    /// Quoted unit price is not positive.
    #[display("Unit price of `Material(id: {_0})` must be positive")]
    NonPositiveUnitPrice(#[error(not(source))] material::Id),

    /// [`RequestForQuotation`] with the provided ID does not exist.
    #[display("`RequestForQuotation(id: {_0})` does not exist")]
    RequestForQuotationNotExists(
        #[error(not(source))] request_for_quotation::Id,
    ),

    /// Quoted [`Material`] is not requested.
    #[display("`Material(id: {_0})` is not requested")]
    UnknownMaterial(#[error(not(source))] material::Id),
}
