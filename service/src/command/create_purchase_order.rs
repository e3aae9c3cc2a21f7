//! [`Command`] for placing a new [`PurchaseOrder`].

use std::collections::{HashMap, HashSet};

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted, Update},
    DateTime, Money, Quantity,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::{
    material::Stock,
    purchase_order::{total_amount, LineItem, Note, Status},
};
use crate::{
    domain::{
        material, purchase_order, purchase_order::payment,
        request_for_quotation, supplier, Material, Payment, PurchaseOrder,
        RequestForQuotation, Supplier,
    },
    infra::{database, Database},
    read, Service,
};

use super::Command;

/// [`Command`] for placing a new [`PurchaseOrder`].
///
/// The [`PurchaseOrder`], its [`Payment`]s and stock updates are written
/// all together or not at all.
#[derive(Clone, Debug)]
pub struct CreatePurchaseOrder {
    /// ID of the [`Supplier`] to place a new [`PurchaseOrder`] with.
    pub supplier_id: supplier::Id,

    /// [`DateTime`] when a new [`PurchaseOrder`] is placed.
    pub ordered_at: purchase_order::OrderDateTime,

    /// Free-form [`Note`] about a new [`PurchaseOrder`].
    pub note: Option<purchase_order::Note>,

    /// [`Material`]s to order.
    pub materials: Vec<LineItemDraft>,

    /// ID of the answered [`RequestForQuotation`] to take the missing unit
    /// prices from.
    pub request_for_quotation_id: Option<request_for_quotation::Id>,

    /// [`purchase_order::Delivery`], if the [`Material`]s are already
    /// delivered.
    pub delivery: Option<purchase_order::Delivery>,

    /// Whether the stock of the delivered [`Material`]s should be updated.
    ///
    /// Has no effect without a [`delivery`](CreatePurchaseOrder::delivery).
    pub update_stock: bool,

    /// [`Payment`]s already made for a new [`PurchaseOrder`].
    pub payments: Vec<PaymentDraft>,
}

/// [`LineItem`] of a [`PurchaseOrder`] to be placed.
#[derive(Clone, Copy, Debug)]
pub struct LineItemDraft {
    /// ID of the [`Material`] to order.
    pub material_id: material::Id,

    /// [`Quantity`] to order.
    pub quantity: Quantity,

    /// Price of a single unit of the [`Material`].
    ///
    /// If [`None`], then it's taken from the
    /// [`RequestForQuotation`].
    pub unit_price: Option<Money>,
}

/// [`Payment`] to be registered along with a new [`PurchaseOrder`].
#[derive(Clone, Debug)]
pub struct PaymentDraft {
    /// [`payment::Method`] of the [`Payment`].
    pub method: payment::Method,

    /// Paid amount.
    pub amount: Money,

    /// [`DateTime`] when the [`Payment`] was made.
    pub paid_at: payment::PaymentDateTime,

    /// Free-form [`payment::Notes`] about the [`Payment`].
    pub notes: Option<payment::Notes>,
}

impl<Db> Command<CreatePurchaseOrder> for Service<Db>
where
    Db: Database<
            Select<By<Option<Supplier>, supplier::Id>>,
            Ok = Option<Supplier>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<read::supplier::Catalog, supplier::Id>>,
            Ok = read::supplier::Catalog,
            Err = Traced<database::Error>,
        > + Database<
            Select<
                By<Option<RequestForQuotation>, request_for_quotation::Id>,
            >,
            Ok = Option<RequestForQuotation>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Insert<PurchaseOrder>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<HashMap<material::Id, Material>, Vec<material::Id>>>,
            Ok = HashMap<material::Id, Material>,
            Err = Traced<database::Error>,
        > + Database<Insert<Payment>, Err = Traced<database::Error>>
        + Database<Update<material::Restock>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = PurchaseOrder;
    type Err = Traced<ExecutionError>;

    #[expect(clippy::too_many_lines, reason = "still readable")]
    async fn execute(
        &self,
        cmd: CreatePurchaseOrder,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreatePurchaseOrder {
            supplier_id,
            ordered_at,
            note,
            materials,
            request_for_quotation_id,
            delivery,
            update_stock,
            payments,
        } = cmd;

        if materials.is_empty() {
            return Err(tracerr::new!(E::NoMaterials));
        }
        let mut seen = HashSet::with_capacity(materials.len());
        for m in &materials {
            if !seen.insert(m.material_id) {
                return Err(tracerr::new!(E::DuplicateMaterial(m.material_id)));
            }
            if m.unit_price.is_some_and(|p| !p.is_positive()) {
                return Err(tracerr::new!(E::NonPositiveUnitPrice(
                    m.material_id
                )));
            }
        }
        if payments.iter().any(|p| !p.amount.is_positive()) {
            return Err(tracerr::new!(E::NonPositivePaymentAmount));
        }
        if payments.iter().any(|p| !p.amount.is_cents()) {
            return Err(tracerr::new!(E::NonCentPaymentAmount));
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
        if let Some(m) =
            materials.iter().find(|m| !catalog.contains(&m.material_id))
        {
            return Err(tracerr::new!(E::MaterialNotSupplied(m.material_id)));
        }

        let quotation = if let Some(id) = request_for_quotation_id {
            let rfq = self
                .database()
                .execute(Select(By::<Option<RequestForQuotation>, _>::new(id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::RequestForQuotationNotExists(id))
                .map_err(tracerr::wrap!())?;
            if rfq.supplier_id != supplier_id {
                return Err(tracerr::new!(E::RequestForQuotationOfOtherSupplier(
                    id
                )));
            }
            if rfq.status != request_for_quotation::Status::Answered {
                return Err(tracerr::new!(E::RequestForQuotationNotAnswered(
                    id
                )));
            }
            Some(rfq)
        } else {
            None
        };

        let line_items = materials
            .into_iter()
            .map(|m| {
                let unit_price = m
                    .unit_price
                    .or_else(|| {
                        quotation.as_ref()?.quoted_price(m.material_id)
                    })
                    .ok_or(E::UnitPriceMissing(m.material_id))?;
                Ok(purchase_order::LineItem {
                    material_id: m.material_id,
                    quantity: m.quantity,
                    unit_price,
                })
            })
            .collect::<Result<Vec<_>, E>>()
            .map_err(tracerr::wrap!())?;
        let total_amount = purchase_order::total_amount(&line_items)
            .ok_or(E::AmountTooLarge)
            .map_err(tracerr::wrap!())?;

        let id = purchase_order::Id::new();
        let payments = payments
            .into_iter()
            .map(|p| Payment {
                id: payment::Id::new(),
                purchase_order_id: id,
                method: p.method,
                amount: p.amount,
                paid_at: p.paid_at,
                notes: p.notes,
                created_at: DateTime::now().coerce(),
            })
            .collect::<Vec<_>>();
        let paid_amount = purchase_order::total_paid(&payments)
            .filter(|paid| *paid <= total_amount)
            .ok_or(E::PaymentExceedsTotal(total_amount))
            .map_err(tracerr::wrap!())?;

        let order = PurchaseOrder {
            id,
            supplier_id,
            ordered_at,
            delivery,
            note,
            status: purchase_order::Status::Active,
            materials: purchase_order::LineItems::new(line_items)
                .ok_or(E::NoMaterials)
                .map_err(tracerr::wrap!())?,
            total_amount,
            paid_amount,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(order.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        for payment in payments {
            tx.execute(Insert(payment))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }
        if order.is_delivered() && update_stock {
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

/// Error of [`CreatePurchaseOrder`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Total amount of the [`PurchaseOrder`] doesn't fit into [`Money`].
    #[display("Total amount of the `PurchaseOrder` is too large")]
    AmountTooLarge,

    /// [`Material`] is ordered more than once.
    #[display("`Material(id: {_0})` is ordered more than once")]
    DuplicateMaterial(#[error(not(source))] material::Id),

    /// [`Material`] is not in the [`Supplier`]'s catalog.
    #[display("`Material(id: {_0})` is not supplied by the `Supplier`")]
    MaterialNotSupplied(#[error(not(source))] material::Id),

    /// No [`Material`]s are ordered.
    #[display("No `Material`s are ordered")]
    NoMaterials,

    /// [`Payment`] amount has fractions of a cent.
    #[display("`Payment` amount must be in whole cents")]
    NonCentPaymentAmount,

    /// [`Payment`] amount is not positive.
    #[display("`Payment` amount must be positive")]
    NonPositivePaymentAmount,

    /// Unit price of the [`Material`] is not positive.
    #[display("Unit price of `Material(id: {_0})` must be positive")]
    NonPositiveUnitPrice(#[error(not(source))] material::Id),

    /// [`Payment`]s exceed the total amount of the [`PurchaseOrder`].
    #[display("`Payment`s exceed the total amount of {_0}")]
    PaymentExceedsTotal(#[error(not(source))] Money),

    /// [`RequestForQuotation`] is not answered yet.
    #[display("`RequestForQuotation(id: {_0})` is not answered")]
    RequestForQuotationNotAnswered(
        #[error(not(source))] request_for_quotation::Id,
    ),

    /// [`RequestForQuotation`] with the provided ID does not exist.
    #[display("`RequestForQuotation(id: {_0})` does not exist")]
    RequestForQuotationNotExists(
        #[error(not(source))] request_for_quotation::Id,
    ),

    /// [`RequestForQuotation`] is sent to another [`Supplier`].
    #[display("`RequestForQuotation(id: {_0})` is sent to another `Supplier`")]
    RequestForQuotationOfOtherSupplier(
        #[error(not(source))] request_for_quotation::Id,
    ),

    /// [`Supplier`] with the provided ID is deleted.
    #[display("`Supplier(id: {_0})` is deleted")]
    SupplierDeleted(#[error(not(source))] supplier::Id),

    /// [`Stock`] of the [`Material`] would overflow.
    #[display("`Stock` of `Material(id: {_0})` would be too large")]
    StockTooLarge(#[error(not(source))] material::Id),

    /// [`Supplier`] with the provided ID does not exist.
    #[display("`Supplier(id: {_0})` does not exist")]
    SupplierNotExists(#[error(not(source))] supplier::Id),

    /// Unit price of the [`Material`] is neither provided nor quoted.
    #[display("Unit price of `Material(id: {_0})` is unknown")]
    UnitPriceMissing(#[error(not(source))] material::Id),
}

#[cfg(test)]
mod spec {
    use std::{collections::HashMap, str::FromStr as _};

    use common::{DateTime, Money, Quantity};
    use rust_decimal::Decimal;

    use crate::{
        command::SaveRequestForQuotationAnswer,
        domain::{
            material, purchase_order, request_for_quotation, supplier,
            RequestForQuotation,
        },
        infra::database::memory::Memory,
        Command as _, Service,
    };

    use super::{CreatePurchaseOrder, ExecutionError, LineItemDraft};

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    fn line(id: material::Id, quantity: &str, price: &str) -> LineItemDraft {
        LineItemDraft {
            material_id: id,
            quantity: Quantity::from_str(quantity).unwrap(),
            unit_price: Some(money(price)),
        }
    }

    fn order(
        supplier_id: supplier::Id,
        materials: Vec<LineItemDraft>,
    ) -> CreatePurchaseOrder {
        CreatePurchaseOrder {
            supplier_id,
            ordered_at: DateTime::now().coerce(),
            note: None,
            materials,
            request_for_quotation_id: None,
            delivery: None,
            update_stock: false,
            payments: vec![],
        }
    }

    fn stock(current: i64) -> material::Stock {
        material::Stock {
            current: material::StockQuantity::new(current.into()).unwrap(),
            alert: material::StockQuantity::new(Decimal::ONE).unwrap(),
        }
    }

    #[tokio::test]
    async fn computes_total_from_lines() {
        let db = Memory::default();
        let a = db.seed_material("A", None);
        let b = db.seed_material("B", None);
        let supplier = db.seed_supplier(&[a, b]);
        let service = Service::new(db.clone());

        let order = service
            .execute(order(
                supplier,
                vec![line(a, "3", "10.00"), line(b, "2", "5.00")],
            ))
            .await
            .unwrap();

        assert_eq!(order.total_amount.to_string(), "40.00");
        assert_eq!(order.paid_amount, Money::ZERO);
        assert_eq!(
            order.balance().status(),
            purchase_order::PaymentStatus::Unpaid,
        );
        assert!(db.state().purchase_orders.contains_key(&order.id));
    }

    #[tokio::test]
    async fn rejects_material_not_supplied() {
        let db = Memory::default();
        let a = db.seed_material("A", None);
        let b = db.seed_material("B", None);
        let supplier = db.seed_supplier(&[a]);
        let service = Service::new(db.clone());

        let err = service
            .execute(order(
                supplier,
                vec![line(a, "1", "1.00"), line(b, "1", "1.00")],
            ))
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::MaterialNotSupplied(id) if *id == b,
        ));
        assert!(db.state().purchase_orders.is_empty());
        assert!(db.state().payments.is_empty());
    }

    #[tokio::test]
    async fn rejects_overpaid_order() {
        let db = Memory::default();
        let a = db.seed_material("A", None);
        let supplier = db.seed_supplier(&[a]);
        let service = Service::new(db.clone());

        let mut cmd = order(supplier, vec![line(a, "4", "10.00")]);
        cmd.payments = vec![super::PaymentDraft {
            method: purchase_order::payment::Method::Cash,
            amount: money("40.01"),
            paid_at: DateTime::now().coerce(),
            notes: None,
        }];
        let err = service.execute(cmd).await.unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::PaymentExceedsTotal(total)
                if *total == money("40"),
        ));
        assert!(db.state().purchase_orders.is_empty());
    }

    #[tokio::test]
    async fn restocks_tracked_materials_on_delivery() {
        let db = Memory::default();
        let tracked = db.seed_material("TRACKED", Some(stock(5)));
        let untracked = db.seed_material("UNTRACKED", None);
        let supplier = db.seed_supplier(&[tracked, untracked]);
        let service = Service::new(db.clone());

        let mut cmd = order(
            supplier,
            vec![line(tracked, "3", "1.00"), line(untracked, "3", "1.00")],
        );
        cmd.delivery = Some(purchase_order::Delivery {
            delivered_at: DateTime::now().coerce(),
            note: None,
        });
        cmd.update_stock = true;
        _ = service.execute(cmd).await.unwrap();

        let state = db.state();
        assert_eq!(
            state.materials[&tracked].stock.map(|s| s.current.value()),
            Some(Decimal::from(8)),
        );
        assert_eq!(state.materials[&untracked].stock, None);
    }

    #[tokio::test]
    async fn takes_unit_prices_from_answered_quotation() {
        let db = Memory::default();
        let a = db.seed_material("A", None);
        let b = db.seed_material("B", None);
        let supplier = db.seed_supplier(&[a, b]);
        let rfq = RequestForQuotation {
            id: request_for_quotation::Id::new(),
            supplier_id: supplier,
            requested_at: DateTime::now().coerce(),
            status: request_for_quotation::Status::Submitted,
            note: None,
            materials: request_for_quotation::Items::new(
                [a, b]
                    .into_iter()
                    .map(|material_id| request_for_quotation::Item {
                        material_id,
                        quantity: Quantity::from_str("1").unwrap(),
                        unit_price: None,
                    })
                    .collect(),
            )
            .unwrap(),
            created_at: DateTime::now().coerce(),
        };
        let rfq_id = rfq.id;
        _ = db.state().requests.insert(rfq_id, rfq);
        let service = Service::new(db.clone());

        let mut cmd = order(
            supplier,
            vec![
                LineItemDraft {
                    unit_price: None,
                    ..line(a, "2", "1")
                },
                line(b, "1", "7.50"),
            ],
        );
        cmd.request_for_quotation_id = Some(rfq_id);
        let err = service.execute(cmd.clone()).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::RequestForQuotationNotAnswered(id) if *id == rfq_id,
        ));

        _ = service
            .execute(SaveRequestForQuotationAnswer {
                request_for_quotation_id: rfq_id,
                prices: vec![(a, money("3.25")), (b, money("9.00"))],
            })
            .await
            .unwrap();
        let order = service.execute(cmd).await.unwrap();

        let prices = order
            .materials
            .iter()
            .map(|i| (i.material_id, i.unit_price))
            .collect::<HashMap<_, _>>();
        assert_eq!(prices[&a], money("3.25"));
        assert_eq!(prices[&b], money("7.50"));
        assert_eq!(order.total_amount, money("14.00"));
    }

    #[tokio::test]
    async fn rejects_overflowing_total() {
        let db = Memory::default();
        let a = db.seed_material("A", None);
        let supplier = db.seed_supplier(&[a]);
        let service = Service::new(db.clone());

        let err = service
            .execute(order(
                supplier,
                vec![line(a, "79228162514264337593543950335", "2")],
            ))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::AmountTooLarge));
        assert!(db.state().purchase_orders.is_empty());
    }

    #[tokio::test]
    async fn rejects_fractions_of_cent_in_payments() {
        let db = Memory::default();
        let a = db.seed_material("A", None);
        let supplier = db.seed_supplier(&[a]);
        let service = Service::new(db.clone());

        let mut cmd = order(supplier, vec![line(a, "4", "10.00")]);
        cmd.payments = vec![super::PaymentDraft {
            method: purchase_order::payment::Method::Cash,
            amount: money("39.994"),
            paid_at: DateTime::now().coerce(),
            notes: None,
        }];
        let err = service.execute(cmd).await.unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::NonCentPaymentAmount));
        assert!(db.state().payments.is_empty());
    }

    #[tokio::test]
    async fn rejects_overflowing_stock() {
        let db = Memory::default();
        let full = material::Stock {
            current: material::StockQuantity::new(Decimal::MAX).unwrap(),
            alert: material::StockQuantity::new(Decimal::ONE).unwrap(),
        };
        let a = db.seed_material("A", Some(full));
        let supplier = db.seed_supplier(&[a]);
        let service = Service::new(db.clone());

        let mut cmd = order(supplier, vec![line(a, "1", "1.00")]);
        cmd.delivery = Some(purchase_order::Delivery {
            delivered_at: DateTime::now().coerce(),
            note: None,
        });
        cmd.update_stock = true;
        let err = service.execute(cmd).await.unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::StockTooLarge(id) if *id == a,
        ));
        assert!(db.state().purchase_orders.is_empty());
        assert_eq!(db.state().materials[&a].stock, Some(full));
    }
}
