//! [`Part`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Delete, Insert, Select};
use itertools::Itertools as _;
use tracerr::Traced;

use crate::{
    domain::{part, Part},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<C, IDs> Database<Select<By<HashMap<part::Id, Part>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[part::Id]>,
{
    type Ok = HashMap<part::Id, Part>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<part::Id, Part>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[part::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        const MATERIALS_SQL: &str = "\
            SELECT part_id, material_id, quantity \
            FROM part_materials \
            WHERE part_id = ANY($1::UUID[]) \
            ORDER BY part_id, position";
        let mut components = self
            .query(MATERIALS_SQL, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                (
                    row.get::<_, part::Id>("part_id"),
                    part::Component {
                        material_id: row.get("material_id"),
                        quantity: row.get("quantity"),
                    },
                )
            })
            .into_group_map();

        const SQL: &str = "\
            SELECT id, code, name, created_at \
            FROM parts \
            WHERE id = ANY($1::UUID[])";
        Ok(self
            .query(SQL, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let id: part::Id = row.get("id");
                let materials = components.remove(&id).unwrap_or_default();
                (
                    id,
                    Part {
                        id,
                        code: row.get("code"),
                        name: row.get("name"),
                        materials: part::Components::new(materials)
                            .expect("`Part` without `Component`s"),
                        created_at: row.get("created_at"),
                    },
                )
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Part>, part::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<part::Id, Part>, [part::Id; 1]>>,
        Ok = HashMap<part::Id, Part>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Part>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Part>, part::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<'l, C> Database<Select<By<Option<Part>, &'l part::Code>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<Option<Part>, part::Id>>,
        Ok = Option<Part>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Part>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Part>, &'l part::Code>>,
    ) -> Result<Self::Ok, Self::Err> {
        let code = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM parts \
            WHERE code = $1::VARCHAR \
            LIMIT 1";
        let Some(row) = self
            .query_opt(SQL, &[code])
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        self.execute(Select(By::<Option<Part>, part::Id>::new(row.get("id"))))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Vec<Part>, ()>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<part::Id, Part>, Vec<part::Id>>>,
        Ok = HashMap<part::Id, Part>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<Part>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Part>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT id \
            FROM parts \
            ORDER BY code";
        let ids = self
            .query(SQL, &[])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| row.get("id"))
            .collect::<Vec<part::Id>>();

        let mut parts = self
            .execute(Select(By::<HashMap<_, Part>, _>::new(ids.clone())))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(ids.iter().filter_map(|id| parts.remove(id)).collect())
    }
}

impl<C> Database<Insert<Part>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(part): Insert<Part>,
    ) -> Result<Self::Ok, Self::Err> {
        let Part {
            id,
            code,
            name,
            materials,
            created_at,
        } = part;

        const SQL: &str = "\
            INSERT INTO parts (id, code, name, created_at) \
            VALUES ($1::UUID, $2::VARCHAR, $3::VARCHAR, $4::TIMESTAMPTZ)";
        self.exec(SQL, &[&id, &code, &name, &created_at])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let (material_ids, quantities): (Vec<_>, Vec<_>) = materials
            .iter()
            .map(|c| (c.material_id, c.quantity))
            .unzip();
        const MATERIALS_SQL: &str = "\
            INSERT INTO part_materials (\
                part_id, position, material_id, quantity \
            ) \
            SELECT $1::UUID, m.position::INT4, m.material_id, m.quantity \
            FROM unnest($2::UUID[], $3::NUMERIC[]) \
                 WITH ORDINALITY AS m(material_id, quantity, position)";
        self.exec(MATERIALS_SQL, &[&id, &material_ids, &quantities])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Delete<By<Part, part::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Part, part::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: part::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM parts \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
