//! [`Command`] for marking a [`PurchaseOrder`] as delivered.

use std::collections::HashMap;

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::{material::Stock, purchase_order::Delivery};
use crate::{
    domain::{material, purchase_order, Material, PurchaseOrder},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for marking a [`PurchaseOrder`] as delivered.
#[derive(Clone, Debug)]
pub struct MarkPurchaseOrderDelivered {
    /// ID of the delivered [`PurchaseOrder`].
    pub purchase_order_id: purchase_order::Id,

    /// [`Delivery`] details.
    pub delivery: purchase_order::Delivery,

    /// Whether the [`Stock`] of the delivered [`Material`]s should be
    /// increased by the ordered quantities.
    pub update_stock: bool,
}

impl<Db> Command<MarkPurchaseOrderDelivered> for Service<Db>
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
            Select<By<HashMap<material::Id, Material>, Vec<material::Id>>>,
            Ok = HashMap<material::Id, Material>,
            Err = Traced<database::Error>,
        > + Database<Update<PurchaseOrder>, Err = Traced<database::Error>>
        + Database<Update<material::Restock>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = PurchaseOrder;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: MarkPurchaseOrderDelivered,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let MarkPurchaseOrderDelivered {
            purchase_order_id,
            delivery,
            update_stock,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

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
        if order.is_delivered() {
            return Err(tracerr::new!(E::AlreadyDelivered(purchase_order_id)));
        }

        order.delivery = Some(delivery);
        tx.execute(Update(order.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        if update_stock {
            let restocks = order
                .materials
                .iter()
                .map(|item| material::Restock {
                    material_id: item.material_id,
                    quantity: item.quantity,
                })
                .collect::<Vec<_>>();
            let materials = tx
                .execute(Select(By::<HashMap<_, Material>, _>::new(
                    restocks.iter().map(|r| r.material_id).collect(),
                )))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            if let Some(r) = restocks.iter().find(|r| {
                materials.get(&r.material_id).is_some_and(|m| r.overflows(m))
            }) {
                return Err(tracerr::new!(E::StockTooLarge(r.material_id)));
            }
            for restock in restocks {
                tx.execute(Update(restock))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;
            }
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(order)
    }
}

/// Error of [`MarkPurchaseOrderDelivered`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`PurchaseOrder`] is delivered already.
    #[display("`PurchaseOrder(id: {_0})` is delivered already")]
    AlreadyDelivered(#[error(not(source))] purchase_order::Id),

    /// [`PurchaseOrder`] with the provided ID is cancelled.
    #[display("`PurchaseOrder(id: {_0})` is cancelled")]
    PurchaseOrderCancelled(#[error(not(source))] purchase_order::Id),

    /// [`PurchaseOrder`] with the provided ID does not exist.
    #[display("`PurchaseOrder(id: {_0})` does not exist")]
    PurchaseOrderNotExists(#[error(not(source))] purchase_order::Id),

    /// [`Stock`] of the [`Material`] would overflow.
    #[display("`Stock` of `Material(id: {_0})` would be too large")]
    StockTooLarge(#[error(not(source))] material::Id),
}

#[cfg(test)]
mod spec {
    use common::DateTime;
    use rust_decimal::Decimal;

    use crate::{
        domain::{material, purchase_order::Delivery},
        infra::database::memory::Memory,
        Command as _, Service,
    };

    use super::{ExecutionError, MarkPurchaseOrderDelivered};

    fn delivered(
        id: crate::domain::purchase_order::Id,
        update_stock: bool,
    ) -> MarkPurchaseOrderDelivered {
        MarkPurchaseOrderDelivered {
            purchase_order_id: id,
            delivery: Delivery {
                delivered_at: DateTime::now().coerce(),
                note: None,
            },
            update_stock,
        }
    }

    fn current(db: &Memory, id: material::Id) -> Option<Decimal> {
        db.state().materials[&id].stock.map(|s| s.current.value())
    }

    #[tokio::test]
    async fn restocks_once_when_asked() {
        let db = Memory::default();
        let stock = material::Stock {
            current: material::StockQuantity::new(Decimal::TWO).unwrap(),
            alert: material::StockQuantity::new(Decimal::ONE).unwrap(),
        };
        let a = db.seed_material("A", Some(stock));
        let supplier = db.seed_supplier(&[a]);
        let order = db.seed_purchase_order(supplier, &[(a, "2.5", "1")]);
        let service = Service::new(db.clone());

        let order = service.execute(delivered(order.id, true)).await.unwrap();
        assert!(order.is_delivered());
        assert_eq!(current(&db, a), Some(Decimal::new(45, 1)));

        let err = service
            .execute(delivered(order.id, true))
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::AlreadyDelivered(_)));
        assert_eq!(current(&db, a), Some(Decimal::new(45, 1)));
    }

    #[tokio::test]
    async fn leaves_stock_untouched_unless_asked() {
        let db = Memory::default();
        let stock = material::Stock {
            current: material::StockQuantity::new(Decimal::TWO).unwrap(),
            alert: material::StockQuantity::new(Decimal::ONE).unwrap(),
        };
        let a = db.seed_material("A", Some(stock));
        let supplier = db.seed_supplier(&[a]);
        let order = db.seed_purchase_order(supplier, &[(a, "3", "1")]);
        let service = Service::new(db.clone());

        _ = service.execute(delivered(order.id, false)).await.unwrap();

        assert_eq!(current(&db, a), Some(Decimal::TWO));
        assert!(db.state().purchase_orders[&order.id].is_delivered());
    }

    #[tokio::test]
    async fn rejects_overflowing_stock() {
        let db = Memory::default();
        let stock = material::Stock {
            current: material::StockQuantity::new(Decimal::MAX).unwrap(),
            alert: material::StockQuantity::new(Decimal::ONE).unwrap(),
        };
        let a = db.seed_material("A", Some(stock));
        let supplier = db.seed_supplier(&[a]);
        let order = db.seed_purchase_order(supplier, &[(a, "1", "1")]);
        let service = Service::new(db.clone());

        let err = service
            .execute(delivered(order.id, true))
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::StockTooLarge(id) if *id == a,
        ));
        assert_eq!(current(&db, a), Some(Decimal::MAX));
        assert!(!db.state().purchase_orders[&order.id].is_delivered());
    }
}
