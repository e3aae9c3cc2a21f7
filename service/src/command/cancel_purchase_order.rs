//! [`Command`] for cancelling a [`PurchaseOrder`].

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Payment;
use crate::{
    domain::{purchase_order, PurchaseOrder},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for cancelling a [`PurchaseOrder`].
///
/// Only a [`PurchaseOrder`] without any [`Payment`] can be cancelled.
#[derive(Clone, Copy, Debug)]
pub struct CancelPurchaseOrder {
    /// ID of the [`PurchaseOrder`] to cancel.
    pub purchase_order_id: purchase_order::Id,
}

impl<Db> Command<CancelPurchaseOrder> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<PurchaseOrder, purchase_order::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<PurchaseOrder>, purchase_order::Id>>,
            Ok = Option<PurchaseOrder>,
            Err = Traced<database::Error>,
        > + Database<Update<PurchaseOrder>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = PurchaseOrder;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        CancelPurchaseOrder { purchase_order_id }: CancelPurchaseOrder,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid racing with concurrent `Payment`s.
        tx.execute(Lock(By::new(purchase_order_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut order = tx
            .execute(Select(By::<Option<PurchaseOrder>, _>::new(
                purchase_order_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PurchaseOrderNotExists(purchase_order_id))
            .map_err(tracerr::wrap!())?;
        if order.is_cancelled() {
            return Err(tracerr::new!(E::AlreadyCancelled(purchase_order_id)));
        }
        if !order.paid_amount.is_zero() {
            return Err(tracerr::new!(E::AlreadyPaid(purchase_order_id)));
        }

        order.status = purchase_order::Status::Cancelled;
        tx.execute(Update(order.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(order)
    }
}

/// Error of [`CancelPurchaseOrder`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`PurchaseOrder`] is cancelled already.
    #[display("`PurchaseOrder(id: {_0})` is cancelled already")]
    AlreadyCancelled(#[error(not(source))] purchase_order::Id),

    /// [`PurchaseOrder`] has [`Payment`]s registered.
    #[display("`PurchaseOrder(id: {_0})` is paid already")]
    AlreadyPaid(#[error(not(source))] purchase_order::Id),

    /// [`PurchaseOrder`] with the provided ID does not exist.
    #[display("`PurchaseOrder(id: {_0})` does not exist")]
    PurchaseOrderNotExists(#[error(not(source))] purchase_order::Id),
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::{DateTime, Money};

    use crate::{
        command::RegisterPurchaseOrderPayment,
        domain::purchase_order::{payment, Status},
        infra::database::memory::Memory,
        Command as _, Service,
    };

    use super::{CancelPurchaseOrder, ExecutionError};

    #[tokio::test]
    async fn cancels_only_once() {
        let db = Memory::default();
        let a = db.seed_material("A", None);
        let supplier = db.seed_supplier(&[a]);
        let order = db.seed_purchase_order(supplier, &[(a, "1", "10")]);
        let service = Service::new(db.clone());
        let cancel = CancelPurchaseOrder {
            purchase_order_id: order.id,
        };

        let cancelled = service.execute(cancel).await.unwrap();
        assert_eq!(cancelled.status, Status::Cancelled);
        let stored = db.state().purchase_orders[&order.id].status;
        assert_eq!(stored, Status::Cancelled);

        let err = service.execute(cancel).await.unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::AlreadyCancelled(_)));
    }

    #[tokio::test]
    async fn keeps_paid_order() {
        let db = Memory::default();
        let a = db.seed_material("A", None);
        let supplier = db.seed_supplier(&[a]);
        let order = db.seed_purchase_order(supplier, &[(a, "1", "10")]);
        let service = Service::new(db.clone());
        _ = service
            .execute(RegisterPurchaseOrderPayment {
                purchase_order_id: order.id,
                method: payment::Method::Cash,
                amount: Money::from_str("1").unwrap(),
                paid_at: DateTime::now().coerce(),
                notes: None,
            })
            .await
            .unwrap();

        let err = service
            .execute(CancelPurchaseOrder {
                purchase_order_id: order.id,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::AlreadyPaid(id) if *id == order.id,
        ));
        let stored = db.state().purchase_orders[&order.id].status;
        assert_eq!(stored, Status::Active);
    }
}
