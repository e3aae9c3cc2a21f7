//! In-memory [`Database`] to exercise [`Command`]s and [`Query`]s without a
//! running Postgres.
//!
//! [`Command`]: crate::Command
//! [`Query`]: crate::Query

use std::{
    collections::HashMap,
    str::FromStr as _,
    sync::{Arc, Mutex, MutexGuard},
};

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Update},
    DateTime, Money, Quantity,
};
use tracerr::Traced;

use crate::{
    domain::{
        machine, material, part, priced_item, purchase_order,
        request_for_quotation, supplier, Item, Machine, Material, Part,
        PricedItem, PurchaseOrder, RequestForQuotation, Supplier,
    },
    domain::{purchase_order::Payment, supplier::CatalogEntry},
    infra::{database, Database},
    read,
};

/// Rows of all the tables.
#[derive(Clone, Debug, Default)]
pub(crate) struct State {
    pub(crate) materials: HashMap<material::Id, Material>,
    pub(crate) suppliers: HashMap<supplier::Id, Supplier>,
    pub(crate) catalog: HashMap<(supplier::Id, material::Id), CatalogEntry>,
    pub(crate) parts: HashMap<part::Id, Part>,
    pub(crate) machines: HashMap<machine::Id, Machine>,
    pub(crate) priced_items: HashMap<priced_item::Id, PricedItem>,
    pub(crate) purchase_orders: HashMap<purchase_order::Id, PurchaseOrder>,
    pub(crate) payments: Vec<Payment>,
    pub(crate) requests:
        HashMap<request_for_quotation::Id, RequestForQuotation>,
}

/// In-memory [`Database`].
///
/// [`Transact`] works on a snapshot of the committed [`State`], which
/// replaces it on [`Commit`]. Dropping a transaction without committing
/// discards its changes.
#[derive(Clone, Debug, Default)]
pub(crate) struct Memory {
    /// Committed [`State`].
    committed: Arc<Mutex<State>>,

    /// [`State`] of the current transaction, if any.
    staged: Option<Arc<Mutex<State>>>,
}

impl Memory {
    /// Returns the [`State`] visible to this [`Memory`] client.
    pub(crate) fn state(&self) -> MutexGuard<'_, State> {
        self.staged
            .as_ref()
            .unwrap_or(&self.committed)
            .lock()
            .unwrap()
    }

    /// Seeds a new [`Material`] along with its unpriced [`PricedItem`].
    pub(crate) fn seed_material(
        &self,
        code: &str,
        stock: Option<material::Stock>,
    ) -> material::Id {
        let material = Material {
            id: material::Id::new(),
            code: material::Code::from_str(code).unwrap(),
            name: material::Name::from_str(code).unwrap(),
            unit: material::Unit::Piece,
            stock,
            created_at: DateTime::now().coerce(),
        };
        let id = material.id;
        let priced = PricedItem::unpriced(id);

        let mut state = self.state();
        _ = state.materials.insert(id, material);
        _ = state.priced_items.insert(priced.id, priced);
        id
    }

    /// Seeds a new [`Supplier`] actively supplying the provided
    /// [`Material`]s.
    pub(crate) fn seed_supplier(
        &self,
        materials: &[material::Id],
    ) -> supplier::Id {
        let supplier = Supplier {
            id: supplier::Id::new(),
            name: supplier::Name::from_str("ACME").unwrap(),
            contact: supplier::Contact::default(),
            created_at: DateTime::now().coerce(),
            deleted_at: None,
        };
        let id = supplier.id;

        let mut state = self.state();
        _ = state.suppliers.insert(id, supplier);
        for &material_id in materials {
            _ = state.catalog.insert(
                (id, material_id),
                CatalogEntry {
                    supplier_id: id,
                    material_id,
                    created_at: DateTime::now().coerce(),
                    deleted_at: None,
                },
            );
        }
        id
    }

    /// Seeds a new [`purchase_order::Status::Active`] undelivered and unpaid
    /// [`PurchaseOrder`] of the provided `(material, quantity, unit price)`
    /// lines.
    pub(crate) fn seed_purchase_order(
        &self,
        supplier_id: supplier::Id,
        lines: &[(material::Id, &str, &str)],
    ) -> PurchaseOrder {
        let items = lines
            .iter()
            .map(|&(material_id, quantity, unit_price)| {
                purchase_order::LineItem {
                    material_id,
                    quantity: Quantity::from_str(quantity).unwrap(),
                    unit_price: Money::from_str(unit_price).unwrap(),
                }
            })
            .collect::<Vec<_>>();
        let order = PurchaseOrder {
            id: purchase_order::Id::new(),
            supplier_id,
            ordered_at: DateTime::now().coerce(),
            delivery: None,
            note: None,
            status: purchase_order::Status::Active,
            total_amount: purchase_order::total_amount(&items).unwrap(),
            paid_amount: Money::ZERO,
            materials: purchase_order::LineItems::new(items).unwrap(),
            created_at: DateTime::now().coerce(),
        };
        _ = self.state().purchase_orders.insert(order.id, order.clone());
        order
    }

    /// Returns the [`PricedItem`] of the provided [`Item`].
    pub(crate) fn priced_item(&self, item: impl Into<Item>) -> PricedItem {
        let item = item.into();
        *self
            .state()
            .priced_items
            .values()
            .find(|p| p.item == item)
            .unwrap()
    }
}

impl Database<Transact> for Memory {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        if self.staged.is_some() {
            return Ok(self.clone());
        }
        let snapshot = self.committed.lock().unwrap().clone();
        Ok(Self {
            committed: Arc::clone(&self.committed),
            staged: Some(Arc::new(Mutex::new(snapshot))),
        })
    }
}

impl Database<Commit> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        if let Some(staged) = &self.staged {
            let staged = staged.lock().unwrap().clone();
            *self.committed.lock().unwrap() = staged;
        }
        Ok(())
    }
}

/// Implements [`Database`] operations of [`Memory`] over its [`State`].
macro_rules! operations {
    ($(
        $op:ty => $ok:ty,
        |$state:pat_param, $args:pat_param| $body:expr;
    )+) => {$(
        impl Database<$op> for Memory {
            type Ok = $ok;
            type Err = Traced<database::Error>;

            async fn execute(
                &self,
                $args: $op,
            ) -> Result<Self::Ok, Self::Err> {
                let $state = &mut *self.state();
                Ok($body)
            }
        }
    )+};
}

operations! {
    Select<By<Option<Material>, material::Id>> => Option<Material>,
    |s, Select(by)| s.materials.get(&by.into_inner()).cloned();

    Select<By<HashMap<material::Id, Material>, Vec<material::Id>>>
        => HashMap<material::Id, Material>,
    |s, Select(by)| by
        .into_inner()
        .into_iter()
        .filter_map(|id| Some((id, s.materials.get(&id)?.clone())))
        .collect();

    Insert<Material> => (),
    |s, Insert(m)| drop(s.materials.insert(m.id, m));

    Update<material::Restock> => (),
    |s, Update(r)| if let Some(m) = s.materials.get_mut(&r.material_id) {
        if let Some(st) = m.stock {
            m.stock = Some(st.restocked(r.quantity).unwrap());
        }
    };

    Select<By<Option<Supplier>, supplier::Id>> => Option<Supplier>,
    |s, Select(by)| s.suppliers.get(&by.into_inner()).cloned();

    Insert<Supplier> => (),
    |s, Insert(sup)| drop(s.suppliers.insert(sup.id, sup));

    Select<By<read::supplier::Catalog, supplier::Id>>
        => read::supplier::Catalog,
    |s, Select(by)| {
        let id = by.into_inner();
        s.catalog
            .values()
            .filter(|e| e.supplier_id == id && e.is_active())
            .map(|e| e.material_id)
            .collect::<std::collections::HashSet<_>>()
            .into()
    };

    Select<By<Option<CatalogEntry>, (supplier::Id, material::Id)>>
        => Option<CatalogEntry>,
    |s, Select(by)| s.catalog.get(&by.into_inner()).copied();

    Update<CatalogEntry> => (),
    |s, Update(e)| drop(s.catalog.insert((e.supplier_id, e.material_id), e));

    Select<By<Option<Part>, part::Id>> => Option<Part>,
    |s, Select(by)| s.parts.get(&by.into_inner()).cloned();

    Select<By<HashMap<part::Id, Part>, Vec<part::Id>>>
        => HashMap<part::Id, Part>,
    |s, Select(by)| by
        .into_inner()
        .into_iter()
        .filter_map(|id| Some((id, s.parts.get(&id)?.clone())))
        .collect();

    Insert<Part> => (),
    |s, Insert(p)| drop(s.parts.insert(p.id, p));

    Select<By<Option<Machine>, machine::Id>> => Option<Machine>,
    |s, Select(by)| s.machines.get(&by.into_inner()).cloned();

    Insert<Machine> => (),
    |s, Insert(m)| drop(s.machines.insert(m.id, m));

    Select<By<Option<PricedItem>, priced_item::Id>> => Option<PricedItem>,
    |s, Select(by)| s.priced_items.get(&by.into_inner()).copied();

    Select<By<HashMap<Item, PricedItem>, Vec<Item>>>
        => HashMap<Item, PricedItem>,
    |s, Select(by)| {
        let items = by.into_inner();
        s.priced_items
            .values()
            .filter(|p| items.contains(&p.item))
            .map(|p| (p.item, *p))
            .collect()
    };

    Insert<PricedItem> => (),
    |s, Insert(p)| drop(s.priced_items.insert(p.id, p));

    Update<PricedItem> => (),
    |s, Update(p)| drop(s.priced_items.insert(p.id, p));

    Lock<By<PurchaseOrder, purchase_order::Id>> => (),
    |_, _| ();

    Select<By<Option<PurchaseOrder>, purchase_order::Id>>
        => Option<PurchaseOrder>,
    |s, Select(by)| s.purchase_orders.get(&by.into_inner()).cloned();

    Insert<PurchaseOrder> => (),
    |s, Insert(o)| drop(s.purchase_orders.insert(o.id, o));

    Update<PurchaseOrder> => (),
    |s, Update(o)| drop(s.purchase_orders.insert(o.id, o));

    Select<By<Vec<Payment>, purchase_order::Id>> => Vec<Payment>,
    |s, Select(by)| {
        let id = by.into_inner();
        s.payments
            .iter()
            .filter(|p| p.purchase_order_id == id)
            .cloned()
            .collect()
    };

    Insert<Payment> => (),
    |s, Insert(p)| s.payments.push(p);

    Select<By<Option<RequestForQuotation>, request_for_quotation::Id>>
        => Option<RequestForQuotation>,
    |s, Select(by)| s.requests.get(&by.into_inner()).cloned();

    Insert<RequestForQuotation> => (),
    |s, Insert(r)| drop(s.requests.insert(r.id, r));

    Update<RequestForQuotation> => (),
    |s, Update(r)| drop(s.requests.insert(r.id, r));
}

impl<'l> Database<Select<By<Option<Material>, &'l material::Code>>>
    for Memory
{
    type Ok = Option<Material>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Material>, &'l material::Code>>,
    ) -> Result<Self::Ok, Self::Err> {
        let code = by.into_inner();
        Ok(self
            .state()
            .materials
            .values()
            .find(|m| &m.code == code)
            .cloned())
    }
}

impl<'l> Database<Select<By<Option<Part>, &'l part::Code>>> for Memory {
    type Ok = Option<Part>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Part>, &'l part::Code>>,
    ) -> Result<Self::Ok, Self::Err> {
        let code = by.into_inner();
        Ok(self.state().parts.values().find(|p| &p.code == code).cloned())
    }
}

impl<'l> Database<Select<By<Option<Machine>, &'l machine::Code>>>
    for Memory
{
    type Ok = Option<Machine>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Machine>, &'l machine::Code>>,
    ) -> Result<Self::Ok, Self::Err> {
        let code = by.into_inner();
        Ok(self
            .state()
            .machines
            .values()
            .find(|m| &m.code == code)
            .cloned())
    }
}
