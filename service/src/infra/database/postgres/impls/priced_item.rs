//! [`PricedItem`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Insert, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{priced_item, Item, PricedItem},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

/// Columns of the `priced_items` table, in the order [`from_row()`] expects.
const COLUMNS: &str = "id, kind, material_id, part_id, unit_price, updated_at";

/// Restores a [`PricedItem`] from the provided [`Row`] having [`COLUMNS`].
fn from_row(row: &Row) -> PricedItem {
    PricedItem {
        id: row.get("id"),
        item: Item::from_parts(
            row.get("kind"),
            row.get("material_id"),
            row.get("part_id"),
        )
        .expect("inconsistent `PricedItem`"),
        unit_price: row.get("unit_price"),
        updated_at: row.get("updated_at"),
    }
}

impl<C> Database<Select<By<Option<PricedItem>, priced_item::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<PricedItem>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<PricedItem>, priced_item::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: priced_item::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM priced_items \
             WHERE id = $1::UUID \
             LIMIT 1",
        );
        Ok(self
            .query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C, Items> Database<Select<By<HashMap<Item, PricedItem>, Items>>>
    for Postgres<C>
where
    C: Connection,
    Items: AsRef<[Item]>,
{
    type Ok = HashMap<Item, PricedItem>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<Item, PricedItem>, Items>>,
    ) -> Result<Self::Ok, Self::Err> {
        let items = by.into_inner();
        let items: &[Item] = items.as_ref();
        if items.is_empty() {
            return Ok(HashMap::new());
        }
        let material_ids =
            items.iter().filter_map(Item::material_id).collect::<Vec<_>>();
        let part_ids =
            items.iter().filter_map(Item::part_id).collect::<Vec<_>>();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM priced_items \
             WHERE material_id = ANY($1::UUID[]) \
                OR part_id = ANY($2::UUID[])",
        );
        Ok(self
            .query(&sql, &[&material_ids, &part_ids])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .map(|p| (p.item, p))
            .collect())
    }
}

impl<C> Database<Select<By<Vec<PricedItem>, read::priced_item::list::Filter>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<PricedItem>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<PricedItem>, read::priced_item::list::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::priced_item::list::Filter { kind, unpriced } =
            by.into_inner();

        // Items are listed in the order of their codes, materials first.
        let sql = format!(
            "SELECT {COLUMNS} \
             FROM priced_items \
             WHERE ($1::INT2 IS NULL OR kind = $1::INT2) \
               AND (NOT $2::BOOL OR unit_price IS NULL) \
             ORDER BY kind, \
                      COALESCE(\
                          (SELECT code FROM materials \
                           WHERE id = material_id), \
                          (SELECT code FROM parts WHERE id = part_id) \
                      )",
        );
        Ok(self
            .query(&sql, &[&kind, &unpriced])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Insert<PricedItem>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(priced): Insert<PricedItem>,
    ) -> Result<Self::Ok, Self::Err> {
        let PricedItem {
            id,
            item,
            unit_price,
            updated_at,
        } = priced;

        const SQL: &str = "\
            INSERT INTO priced_items (\
                id, kind, material_id, part_id, unit_price, updated_at \
            ) VALUES (\
                $1::UUID, $2::INT2, $3::UUID, $4::UUID, \
                $5::NUMERIC, $6::TIMESTAMPTZ \
            )";
        self.exec(
            SQL,
            &[
                &id,
                &item.kind(),
                &item.material_id(),
                &item.part_id(),
                &unit_price,
                &updated_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Update<PricedItem>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(priced): Update<PricedItem>,
    ) -> Result<Self::Ok, Self::Err> {
        // The priced `Item` never changes.
        const SQL: &str = "\
            UPDATE priced_items \
            SET unit_price = $2::NUMERIC, \
                updated_at = $3::TIMESTAMPTZ \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&priced.id, &priced.unit_price, &priced.updated_at])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
