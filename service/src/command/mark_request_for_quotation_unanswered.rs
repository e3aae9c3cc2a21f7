//! [`Command`] for marking a [`RequestForQuotation`] as unanswered.

use common::operations::{By, Commit, Select, Transact, Transacted, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::{request_for_quotation::Status, Supplier};
use crate::{
    domain::{request_for_quotation, RequestForQuotation},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for marking a [`Status::Submitted`] [`RequestForQuotation`]
/// as left without an answer by its [`Supplier`].
#[derive(Clone, Copy, Debug)]
pub struct MarkRequestForQuotationUnanswered {
    /// ID of the [`RequestForQuotation`] to mark.
    pub request_for_quotation_id: request_for_quotation::Id,
}

impl<Db> Command<MarkRequestForQuotationUnanswered> for Service<Db>
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
        cmd: MarkRequestForQuotationUnanswered,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let id = cmd.request_for_quotation_id;

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
        if rfq.status != request_for_quotation::Status::Submitted {
            return Err(tracerr::new!(E::NotSubmitted(id)));
        }

        rfq.status = request_for_quotation::Status::Unanswered;
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

/// Error of [`MarkRequestForQuotationUnanswered`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`RequestForQuotation`] is not waiting for an answer.
    #[display("`RequestForQuotation(id: {_0})` is not submitted")]
    NotSubmitted(#[error(not(source))] request_for_quotation::Id),

    /// [`RequestForQuotation`] with the provided ID does not exist.
    #[display("`RequestForQuotation(id: {_0})` does not exist")]
    RequestForQuotationNotExists(
        #[error(not(source))] request_for_quotation::Id,
    ),
}
