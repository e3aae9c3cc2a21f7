//! [`Supplier`]-related [`Database`] implementations.

use std::collections::{HashMap, HashSet};

use common::operations::{By, Insert, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{material, supplier, supplier::CatalogEntry, Supplier},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

/// Columns of the `suppliers` table, in the order [`from_row()`] expects.
const COLUMNS: &str = "\
    id, name, \
    email, phone, address, \
    created_at, deleted_at";

/// Restores a [`Supplier`] from the provided [`Row`] having [`COLUMNS`].
fn from_row(row: &Row) -> Supplier {
    Supplier {
        id: row.get("id"),
        name: row.get("name"),
        contact: supplier::Contact {
            email: row.get("email"),
            phone: row.get("phone"),
            address: row.get("address"),
        },
        created_at: row.get("created_at"),
        deleted_at: row.get("deleted_at"),
    }
}

impl<C, IDs> Database<Select<By<HashMap<supplier::Id, Supplier>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[supplier::Id]>,
{
    type Ok = HashMap<supplier::Id, Supplier>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<supplier::Id, Supplier>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[supplier::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        // Deleted `Supplier`s are still referenced by historical orders.
        let sql = format!(
            "SELECT {COLUMNS} \
             FROM suppliers \
             WHERE id = ANY($1::UUID[])",
        );
        Ok(self
            .query(&sql, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .map(|s| (s.id, s))
            .collect())
    }
}

impl<C> Database<Select<By<Option<Supplier>, supplier::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<supplier::Id, Supplier>, [supplier::Id; 1]>>,
        Ok = HashMap<supplier::Id, Supplier>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Supplier>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Supplier>, supplier::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Select<By<Vec<Supplier>, read::supplier::list::Filter>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Supplier>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Supplier>, read::supplier::list::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::supplier::list::Filter { include_deleted } = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM suppliers \
             WHERE $1::BOOL OR deleted_at IS NULL \
             ORDER BY name, id",
        );
        Ok(self
            .query(&sql, &[&include_deleted])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Select<By<read::supplier::Catalog, supplier::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::supplier::Catalog;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::supplier::Catalog, supplier::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: supplier::Id = by.into_inner();

        const SQL: &str = "\
            SELECT material_id \
            FROM supplier_materials \
            WHERE supplier_id = $1::UUID \
              AND deleted_at IS NULL";
        Ok(self
            .query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| row.get::<_, material::Id>("material_id"))
            .collect::<HashSet<_>>()
            .into())
    }
}

impl<C> Database<Insert<Supplier>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Supplier>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(supplier): Insert<Supplier>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(supplier))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Supplier>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(supplier): Update<Supplier>,
    ) -> Result<Self::Ok, Self::Err> {
        let Supplier {
            id,
            name,
            contact:
                supplier::Contact {
                    email,
                    phone,
                    address,
                },
            created_at,
            deleted_at,
        } = supplier;

        const SQL: &str = "\
            INSERT INTO suppliers (\
                id, name, \
                email, phone, address, \
                created_at, deleted_at \
            ) VALUES (\
                $1::UUID, $2::VARCHAR, \
                $3::VARCHAR, $4::VARCHAR, $5::VARCHAR, \
                $6::TIMESTAMPTZ, $7::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET name = EXCLUDED.name, \
                email = EXCLUDED.email, \
                phone = EXCLUDED.phone, \
                address = EXCLUDED.address, \
                deleted_at = EXCLUDED.deleted_at";
        self.exec(
            SQL,
            &[
                &id,
                &name,
                &email,
                &phone,
                &address,
                &created_at,
                &deleted_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C>
    Database<
        Select<By<Option<CatalogEntry>, (supplier::Id, material::Id)>>,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<CatalogEntry>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Option<CatalogEntry>, (supplier::Id, material::Id)>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let (supplier_id, material_id) = by.into_inner();

        const SQL: &str = "\
            SELECT created_at, deleted_at \
            FROM supplier_materials \
            WHERE supplier_id = $1::UUID \
              AND material_id = $2::UUID";
        Ok(self
            .query_opt(SQL, &[&supplier_id, &material_id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| CatalogEntry {
                supplier_id,
                material_id,
                created_at: row.get("created_at"),
                deleted_at: row.get("deleted_at"),
            }))
    }
}

impl<C> Database<Update<CatalogEntry>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(entry): Update<CatalogEntry>,
    ) -> Result<Self::Ok, Self::Err> {
        let CatalogEntry {
            supplier_id,
            material_id,
            created_at,
            deleted_at,
        } = entry;

        const SQL: &str = "\
            INSERT INTO supplier_materials (\
                supplier_id, material_id, created_at, deleted_at \
            ) VALUES (\
                $1::UUID, $2::UUID, $3::TIMESTAMPTZ, $4::TIMESTAMPTZ \
            ) \
            ON CONFLICT (supplier_id, material_id) DO UPDATE \
            SET created_at = EXCLUDED.created_at, \
                deleted_at = EXCLUDED.deleted_at";
        self.exec(
            SQL,
            &[&supplier_id, &material_id, &created_at, &deleted_at],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
