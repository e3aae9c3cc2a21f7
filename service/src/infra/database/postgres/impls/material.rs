//! [`Material`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Delete, Insert, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{material, Material},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

/// Columns of the `materials` table, in the order [`from_row()`] expects.
const COLUMNS: &str = "\
    id, code, name, unit, \
    current_quantity, alert_quantity, \
    created_at";

/// Restores a [`Material`] from the provided [`Row`] having [`COLUMNS`].
fn from_row(row: &Row) -> Material {
    let current: Option<material::StockQuantity> = row.get("current_quantity");
    let alert: Option<material::StockQuantity> = row.get("alert_quantity");
    Material {
        id: row.get("id"),
        code: row.get("code"),
        name: row.get("name"),
        unit: row.get("unit"),
        stock: current
            .zip(alert)
            .map(|(current, alert)| material::Stock { current, alert }),
        created_at: row.get("created_at"),
    }
}

impl<C, IDs> Database<Select<By<HashMap<material::Id, Material>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[material::Id]>,
{
    type Ok = HashMap<material::Id, Material>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<material::Id, Material>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[material::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM materials \
             WHERE id = ANY($1::UUID[])",
        );
        Ok(self
            .query(&sql, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .map(|m| (m.id, m))
            .collect())
    }
}

impl<C> Database<Select<By<Option<Material>, material::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<material::Id, Material>, [material::Id; 1]>>,
        Ok = HashMap<material::Id, Material>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Material>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Material>, material::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<'l, C> Database<Select<By<Option<Material>, &'l material::Code>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Material>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Material>, &'l material::Code>>,
    ) -> Result<Self::Ok, Self::Err> {
        let code = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM materials \
             WHERE code = $1::VARCHAR \
             LIMIT 1",
        );
        Ok(self
            .query_opt(&sql, &[code])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Select<By<Vec<Material>, read::material::list::Filter>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Material>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Material>, read::material::list::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::material::list::Filter {
            supplier_id,
            low_stock,
        } = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM materials \
             WHERE ($1::UUID IS NULL \
                    OR EXISTS (SELECT 1 \
                               FROM supplier_materials \
                               WHERE material_id = materials.id \
                                 AND supplier_id = $1::UUID \
                                 AND deleted_at IS NULL)) \
               AND (NOT $2::BOOL \
                    OR current_quantity <= alert_quantity) \
             ORDER BY code",
        );
        Ok(self
            .query(&sql, &[&supplier_id, &low_stock])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Select<By<read::material::Suppliers, material::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::material::Suppliers;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::material::Suppliers, material::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: material::Id = by.into_inner();

        const SQL: &str = "\
            SELECT sm.supplier_id \
            FROM supplier_materials AS sm \
            JOIN suppliers AS s ON s.id = sm.supplier_id \
            WHERE sm.material_id = $1::UUID \
              AND sm.deleted_at IS NULL \
              AND s.deleted_at IS NULL \
            ORDER BY s.name";
        Ok(self
            .query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| row.get("supplier_id"))
            .collect::<Vec<_>>()
            .into())
    }
}

impl<C> Database<Insert<Material>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(material): Insert<Material>,
    ) -> Result<Self::Ok, Self::Err> {
        let Material {
            id,
            code,
            name,
            unit,
            stock,
            created_at,
        } = material;
        let current = stock.map(|s| s.current);
        let alert = stock.map(|s| s.alert);

        const SQL: &str = "\
            INSERT INTO materials (\
                id, code, name, unit, \
                current_quantity, alert_quantity, \
                created_at \
            ) VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, $4::INT2, \
                $5::NUMERIC, $6::NUMERIC, \
                $7::TIMESTAMPTZ \
            )";
        self.exec(
            SQL,
            &[&id, &code, &name, &unit, &current, &alert, &created_at],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Update<Material>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(material): Update<Material>,
    ) -> Result<Self::Ok, Self::Err> {
        let current = material.stock.map(|s| s.current);
        let alert = material.stock.map(|s| s.alert);

        // `code` and `created_at` are immutable.
        const SQL: &str = "\
            UPDATE materials \
            SET name = $2::VARCHAR, \
                unit = $3::INT2, \
                current_quantity = $4::NUMERIC, \
                alert_quantity = $5::NUMERIC \
            WHERE id = $1::UUID";
        self.exec(
            SQL,
            &[&material.id, &material.name, &material.unit, &current, &alert],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Update<material::Restock>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(restock): Update<material::Restock>,
    ) -> Result<Self::Ok, Self::Err> {
        let material::Restock {
            material_id,
            quantity,
        } = restock;

        // Not tracked stock stays untouched.
        const SQL: &str = "\
            UPDATE materials \
            SET current_quantity = current_quantity + $2::NUMERIC \
            WHERE id = $1::UUID \
              AND current_quantity IS NOT NULL";
        self.exec(SQL, &[&material_id, &quantity])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Delete<By<Material, material::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Material, material::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: material::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM materials \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
