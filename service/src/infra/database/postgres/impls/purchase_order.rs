//! [`PurchaseOrder`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Insert, Lock, Select, Update};
use itertools::Itertools as _;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{
        purchase_order::{self, Delivery, LineItem, LineItems, Payment},
        PurchaseOrder,
    },
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

/// Columns of the `purchase_orders` table, in the order [`from_row()`]
/// expects.
const COLUMNS: &str = "\
    id, supplier_id, ordered_at, \
    delivered_at, delivery_note, note, \
    status, total_amount, paid_amount, \
    created_at";

/// Restores a [`PurchaseOrder`] with the provided [`LineItems`] from the
/// provided [`Row`] having [`COLUMNS`].
fn from_row(row: &Row, materials: LineItems) -> PurchaseOrder {
    let delivered_at: Option<purchase_order::DeliveryDateTime> =
        row.get("delivered_at");
    PurchaseOrder {
        id: row.get("id"),
        supplier_id: row.get("supplier_id"),
        ordered_at: row.get("ordered_at"),
        delivery: delivered_at.map(|delivered_at| Delivery {
            delivered_at,
            note: row.get("delivery_note"),
        }),
        note: row.get("note"),
        status: row.get("status"),
        materials,
        total_amount: row.get("total_amount"),
        paid_amount: row.get("paid_amount"),
        created_at: row.get("created_at"),
    }
}

/// Columns of the `purchase_order_payments` table.
const PAYMENT_COLUMNS: &str = "\
    id, purchase_order_id, method, amount, paid_at, notes, created_at";

/// Restores a [`Payment`] from the provided [`Row`] having
/// [`PAYMENT_COLUMNS`].
fn payment_from_row(row: &Row) -> Payment {
    Payment {
        id: row.get("id"),
        purchase_order_id: row.get("purchase_order_id"),
        method: row.get("method"),
        amount: row.get("amount"),
        paid_at: row.get("paid_at"),
        notes: row.get("notes"),
        created_at: row.get("created_at"),
    }
}

impl<C, IDs>
    Database<
        Select<By<HashMap<purchase_order::Id, PurchaseOrder>, IDs>>,
    > for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[purchase_order::Id]>,
{
    type Ok = HashMap<purchase_order::Id, PurchaseOrder>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<HashMap<purchase_order::Id, PurchaseOrder>, IDs>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        let ids: &[purchase_order::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        const MATERIALS_SQL: &str = "\
            SELECT purchase_order_id, material_id, quantity, unit_price \
            FROM purchase_order_materials \
            WHERE purchase_order_id = ANY($1::UUID[]) \
            ORDER BY purchase_order_id, position";
        let mut items = self
            .query(MATERIALS_SQL, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                (
                    row.get::<_, purchase_order::Id>("purchase_order_id"),
                    LineItem {
                        material_id: row.get("material_id"),
                        quantity: row.get("quantity"),
                        unit_price: row.get("unit_price"),
                    },
                )
            })
            .into_group_map();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM purchase_orders \
             WHERE id = ANY($1::UUID[])",
        );
        Ok(self
            .query(&sql, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| {
                let id: purchase_order::Id = row.get("id");
                let materials =
                    LineItems::new(items.remove(&id).unwrap_or_default())
                        .expect("`PurchaseOrder` without `LineItem`s");
                (id, from_row(row, materials))
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<PurchaseOrder>, purchase_order::Id>>>
    for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<
            By<
                HashMap<purchase_order::Id, PurchaseOrder>,
                [purchase_order::Id; 1],
            >,
        >,
        Ok = HashMap<purchase_order::Id, PurchaseOrder>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<PurchaseOrder>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<PurchaseOrder>, purchase_order::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C>
    Database<
        Select<By<Vec<PurchaseOrder>, read::purchase_order::list::Filter>>,
    > for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<
            By<
                HashMap<purchase_order::Id, PurchaseOrder>,
                Vec<purchase_order::Id>,
            >,
        >,
        Ok = HashMap<purchase_order::Id, PurchaseOrder>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<PurchaseOrder>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<PurchaseOrder>, read::purchase_order::list::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::purchase_order::list::Filter {
            supplier_id,
            status,
            delivered,
        } = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM purchase_orders \
            WHERE ($1::UUID IS NULL OR supplier_id = $1::UUID) \
              AND ($2::INT2 IS NULL OR status = $2::INT2) \
              AND ($3::BOOL IS NULL \
                   OR $3::BOOL = (delivered_at IS NOT NULL)) \
            ORDER BY ordered_at DESC, id";
        let ids = self
            .query(SQL, &[&supplier_id, &status, &delivered])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| row.get("id"))
            .collect::<Vec<purchase_order::Id>>();

        let mut orders = self
            .execute(Select(By::<HashMap<_, PurchaseOrder>, _>::new(
                ids.clone(),
            )))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(ids.iter().filter_map(|id| orders.remove(id)).collect())
    }
}

impl<C> Database<Insert<PurchaseOrder>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(order): Insert<PurchaseOrder>,
    ) -> Result<Self::Ok, Self::Err> {
        let PurchaseOrder {
            id,
            supplier_id,
            ordered_at,
            delivery,
            note,
            status,
            materials,
            total_amount,
            paid_amount,
            created_at,
        } = order;
        let delivered_at = delivery.as_ref().map(|d| d.delivered_at);
        let delivery_note = delivery.and_then(|d| d.note);

        const SQL: &str = "\
            INSERT INTO purchase_orders (\
                id, supplier_id, ordered_at, \
                delivered_at, delivery_note, note, \
                status, total_amount, paid_amount, \
                created_at \
            ) VALUES (\
                $1::UUID, $2::UUID, $3::TIMESTAMPTZ, \
                $4::TIMESTAMPTZ, $5::VARCHAR, $6::VARCHAR, \
                $7::INT2, $8::NUMERIC, $9::NUMERIC, \
                $10::TIMESTAMPTZ \
            )";
        self.exec(
            SQL,
            &[
                &id,
                &supplier_id,
                &ordered_at,
                &delivered_at,
                &delivery_note,
                &note,
                &status,
                &total_amount,
                &paid_amount,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)?;

        let material_ids =
            materials.iter().map(|i| i.material_id).collect::<Vec<_>>();
        let quantities =
            materials.iter().map(|i| i.quantity).collect::<Vec<_>>();
        let unit_prices =
            materials.iter().map(|i| i.unit_price).collect::<Vec<_>>();
        const MATERIALS_SQL: &str = "\
            INSERT INTO purchase_order_materials (\
                purchase_order_id, position, \
                material_id, quantity, unit_price \
            ) \
            SELECT $1::UUID, m.position::INT4, \
                   m.material_id, m.quantity, m.unit_price \
            FROM unnest($2::UUID[], $3::NUMERIC[], $4::NUMERIC[]) \
                 WITH ORDINALITY \
                 AS m(material_id, quantity, unit_price, position)";
        self.exec(
            MATERIALS_SQL,
            &[&id, &material_ids, &quantities, &unit_prices],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Update<PurchaseOrder>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(order): Update<PurchaseOrder>,
    ) -> Result<Self::Ok, Self::Err> {
        let delivered_at = order.delivery.as_ref().map(|d| d.delivered_at);
        let delivery_note =
            order.delivery.as_ref().and_then(|d| d.note.as_ref());

        // Line items and amounts are fixed once the order is placed, only the
        // paid amount moves.
        const SQL: &str = "\
            UPDATE purchase_orders \
            SET delivered_at = $2::TIMESTAMPTZ, \
                delivery_note = $3::VARCHAR, \
                note = $4::VARCHAR, \
                status = $5::INT2, \
                paid_amount = $6::NUMERIC \
            WHERE id = $1::UUID";
        self.exec(
            SQL,
            &[
                &order.id,
                &delivered_at,
                &delivery_note,
                &order.note,
                &order.status,
                &order.paid_amount,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<PurchaseOrder, purchase_order::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<PurchaseOrder, purchase_order::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: purchase_order::Id = by.into_inner();

        // Held until the end of the current transaction.
        const SQL: &str = "\
            SELECT id \
            FROM purchase_orders \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<Vec<Payment>, purchase_order::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Payment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Payment>, purchase_order::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: purchase_order::Id = by.into_inner();

        let sql = format!(
            "SELECT {PAYMENT_COLUMNS} \
             FROM purchase_order_payments \
             WHERE purchase_order_id = $1::UUID \
             ORDER BY paid_at, created_at",
        );
        Ok(self
            .query(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(payment_from_row)
            .collect())
    }
}

impl<C, IDs>
    Database<Select<By<HashMap<purchase_order::Id, Vec<Payment>>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[purchase_order::Id]>,
{
    type Ok = HashMap<purchase_order::Id, Vec<Payment>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<HashMap<purchase_order::Id, Vec<Payment>>, IDs>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        let ids: &[purchase_order::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let sql = format!(
            "SELECT {PAYMENT_COLUMNS} \
             FROM purchase_order_payments \
             WHERE purchase_order_id = ANY($1::UUID[]) \
             ORDER BY paid_at, created_at",
        );
        Ok(self
            .query(&sql, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(payment_from_row)
            .map(|p| (p.purchase_order_id, p))
            .into_group_map())
    }
}

impl<C> Database<Insert<Payment>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(payment): Insert<Payment>,
    ) -> Result<Self::Ok, Self::Err> {
        let Payment {
            id,
            purchase_order_id,
            method,
            amount,
            paid_at,
            notes,
            created_at,
        } = payment;

        const SQL: &str = "\
            INSERT INTO purchase_order_payments (\
                id, purchase_order_id, method, amount, \
                paid_at, notes, created_at \
            ) VALUES (\
                $1::UUID, $2::UUID, $3::INT2, $4::NUMERIC, \
                $5::TIMESTAMPTZ, $6::VARCHAR, $7::TIMESTAMPTZ \
            )";
        self.exec(
            SQL,
            &[
                &id,
                &purchase_order_id,
                &method,
                &amount,
                &paid_at,
                &notes,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
