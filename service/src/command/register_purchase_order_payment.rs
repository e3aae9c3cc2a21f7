//! [`Command`] for registering a new [`Payment`] of a [`PurchaseOrder`].

use common::{
    operations::{
        By, Commit, Insert, Lock, Select, Transact, Transacted, Update,
    },
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::purchase_order::Balance;
use crate::{
    domain::{
        purchase_order::{self, payment},
        Payment, PurchaseOrder,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for registering a new [`Payment`] of a [`PurchaseOrder`].
///
/// The [`PurchaseOrder`] is locked for the whole [`Command`], so concurrent
/// [`Payment`]s can't overdraw its [`Balance`].
#[derive(Clone, Debug)]
pub struct RegisterPurchaseOrderPayment {
    /// ID of the [`PurchaseOrder`] being paid.
    pub purchase_order_id: purchase_order::Id,

    /// [`payment::Method`] of a new [`Payment`].
    pub method: payment::Method,

    /// Paid amount.
    pub amount: Money,

    /// [`DateTime`] when a new [`Payment`] was made.
    pub paid_at: payment::PaymentDateTime,

    /// Free-form [`payment::Notes`] about a new [`Payment`].
    pub notes: Option<payment::Notes>,
}

impl<Db> Command<RegisterPurchaseOrderPayment> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<PurchaseOrder, purchase_order::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<PurchaseOrder>, purchase_order::Id>>,
            Ok = Option<PurchaseOrder>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Payment>, purchase_order::Id>>,
            Ok = Vec<Payment>,
            Err = Traced<database::Error>,
        > + Database<Insert<Payment>, Err = Traced<database::Error>>
        + Database<Update<PurchaseOrder>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = PurchaseOrder;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RegisterPurchaseOrderPayment,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RegisterPurchaseOrderPayment {
            purchase_order_id,
            method,
            amount,
            paid_at,
            notes,
        } = cmd;

        if !amount.is_positive() {
            return Err(tracerr::new!(E::NonPositiveAmount));
        }
        if !amount.is_cents() {
            return Err(tracerr::new!(E::NonCentAmount));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent payments of the same `PurchaseOrder`.
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
            return Err(tracerr::new!(E::PurchaseOrderCancelled(
                purchase_order_id
            )));
        }

        let payments = tx
            .execute(Select(By::<Vec<Payment>, _>::new(purchase_order_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let balance = purchase_order::total_paid(&payments).map(|total_paid| {
            purchase_order::Balance {
                total_amount: order.total_amount,
                total_paid,
            }
        });
        let Some(paid) = balance.and_then(|b| b.with_payment(amount)) else {
            return Err(tracerr::new!(E::PaymentExceedsTotal(
                balance.map_or(Money::ZERO, |b| b.remaining())
            )));
        };

        let payment = Payment {
            id: payment::Id::new(),
            purchase_order_id,
            method,
            amount,
            paid_at,
            notes,
            created_at: DateTime::now().coerce(),
        };
        tx.execute(Insert(payment))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        order.paid_amount = paid.total_paid;
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

/// Error of [`RegisterPurchaseOrderPayment`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Payment`] amount has fractions of a cent.
    #[display("`Payment` amount must be in whole cents")]
    NonCentAmount,

    /// [`Payment`] amount is not positive.
    #[display("`Payment` amount must be positive")]
    NonPositiveAmount,

    /// [`Payment`] exceeds the amount left to pay.
    #[display("`Payment` exceeds the remaining amount of {_0}")]
    PaymentExceedsTotal(#[error(not(source))] Money),

    /// [`PurchaseOrder`] with the provided ID is cancelled.
    #[display("`PurchaseOrder(id: {_0})` is cancelled")]
    PurchaseOrderCancelled(#[error(not(source))] purchase_order::Id),

    /// [`PurchaseOrder`] with the provided ID does not exist.
    #[display("`PurchaseOrder(id: {_0})` does not exist")]
    PurchaseOrderNotExists(#[error(not(source))] purchase_order::Id),
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::{DateTime, Money, Quantity};

    use crate::{
        command::{
            create_purchase_order::LineItemDraft, CancelPurchaseOrder,
            CreatePurchaseOrder,
        },
        domain::{
            purchase_order::{self, payment, PaymentStatus},
            PurchaseOrder,
        },
        infra::database::memory::Memory,
        Command as _, Service,
    };

    use super::{ExecutionError, RegisterPurchaseOrderPayment};

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    fn pay(
        id: purchase_order::Id,
        amount: &str,
    ) -> RegisterPurchaseOrderPayment {
        RegisterPurchaseOrderPayment {
            purchase_order_id: id,
            method: payment::Method::Transfer,
            amount: money(amount),
            paid_at: DateTime::now().coerce(),
            notes: None,
        }
    }

    async fn order_of_40(service: &Service<Memory>) -> PurchaseOrder {
        let db = service.database();
        let a = db.seed_material("A", None);
        let b = db.seed_material("B", None);
        let supplier = db.seed_supplier(&[a, b]);
        service
            .execute(CreatePurchaseOrder {
                supplier_id: supplier,
                ordered_at: DateTime::now().coerce(),
                note: None,
                materials: vec![
                    LineItemDraft {
                        material_id: a,
                        quantity: Quantity::from_str("3").unwrap(),
                        unit_price: Some(money("10.00")),
                    },
                    LineItemDraft {
                        material_id: b,
                        quantity: Quantity::from_str("2").unwrap(),
                        unit_price: Some(money("5.00")),
                    },
                ],
                request_for_quotation_id: None,
                delivery: None,
                update_stock: false,
                payments: vec![],
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn pays_in_full_and_rejects_overdraw() {
        let service = Service::new(Memory::default());
        let order = order_of_40(&service).await;

        let paid = service.execute(pay(order.id, "15")).await.unwrap();
        assert_eq!(paid.balance().status(), PaymentStatus::PartiallyPaid);
        assert_eq!(paid.balance().remaining(), money("25"));

        let paid = service.execute(pay(order.id, "25")).await.unwrap();
        assert_eq!(paid.paid_amount, money("40.00"));
        assert_eq!(paid.balance().status(), PaymentStatus::FullyPaid);

        let err = service.execute(pay(order.id, "0.01")).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::PaymentExceedsTotal(remaining)
                if remaining.is_zero(),
        ));
        assert_eq!(service.database().state().payments.len(), 2);
    }

    #[tokio::test]
    async fn rejects_non_positive_amount() {
        let service = Service::new(Memory::default());
        let order = order_of_40(&service).await;

        let err = service.execute(pay(order.id, "0")).await.unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::NonPositiveAmount));
    }

    #[tokio::test]
    async fn rejects_fractions_of_cent() {
        let service = Service::new(Memory::default());
        let order = order_of_40(&service).await;

        let err = service.execute(pay(order.id, "39.994")).await.unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::NonCentAmount));

        _ = service.execute(pay(order.id, "39.99")).await.unwrap();
        let err = service.execute(pay(order.id, "0.009")).await.unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::NonCentAmount));

        let paid = service.execute(pay(order.id, "0.01")).await.unwrap();
        assert_eq!(paid.paid_amount, money("40.00"));
        let total = service
            .database()
            .state()
            .payments
            .iter()
            .map(|p| p.amount.amount())
            .sum::<rust_decimal::Decimal>();
        assert_eq!(total, order.total_amount.amount());
    }

    #[tokio::test]
    async fn rejects_overflowing_amount() {
        let service = Service::new(Memory::default());
        let order = order_of_40(&service).await;
        _ = service.execute(pay(order.id, "1")).await.unwrap();

        let err = service
            .execute(pay(order.id, "79228162514264337593543950335"))
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::PaymentExceedsTotal(remaining)
                if *remaining == money("39"),
        ));
    }

    #[tokio::test]
    async fn rejects_cancelled_order() {
        let service = Service::new(Memory::default());
        let order = order_of_40(&service).await;
        _ = service
            .execute(CancelPurchaseOrder {
                purchase_order_id: order.id,
            })
            .await
            .unwrap();

        let err = service.execute(pay(order.id, "1")).await.unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::PurchaseOrderCancelled(id) if *id == order.id,
        ));
    }

    #[tokio::test]
    async fn rejects_unknown_order() {
        let service = Service::new(Memory::default());
        let id = purchase_order::Id::new();

        let err = service.execute(pay(id, "1")).await.unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::PurchaseOrderNotExists(i) if *i == id,
        ));
    }
}
