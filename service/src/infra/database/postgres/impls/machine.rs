//! [`Machine`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Delete, Insert, Select};
use itertools::Itertools as _;
use tracerr::Traced;

use crate::{
    domain::{machine, Item, Machine},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<C, IDs> Database<Select<By<HashMap<machine::Id, Machine>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[machine::Id]>,
{
    type Ok = HashMap<machine::Id, Machine>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<machine::Id, Machine>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[machine::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        const ELEMENTS_SQL: &str = "\
            SELECT machine_id, kind, material_id, part_id, quantity \
            FROM machine_elements \
            WHERE machine_id = ANY($1::UUID[]) \
            ORDER BY machine_id, position";
        let mut elements = self
            .query(ELEMENTS_SQL, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                (
                    row.get::<_, machine::Id>("machine_id"),
                    machine::Element {
                        item: Item::from_parts(
                            row.get("kind"),
                            row.get("material_id"),
                            row.get("part_id"),
                        )
                        .expect("inconsistent `machine::Element`"),
                        quantity: row.get("quantity"),
                    },
                )
            })
            .into_group_map();

        const SQL: &str = "\
            SELECT id, code, name, created_at \
            FROM machines \
            WHERE id = ANY($1::UUID[])";
        Ok(self
            .query(SQL, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let id: machine::Id = row.get("id");
                let elements = elements.remove(&id).unwrap_or_default();
                (
                    id,
                    Machine {
                        id,
                        code: row.get("code"),
                        name: row.get("name"),
                        elements: machine::Elements::new(elements)
                            .expect("`Machine` without `Element`s"),
                        created_at: row.get("created_at"),
                    },
                )
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Machine>, machine::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<machine::Id, Machine>, [machine::Id; 1]>>,
        Ok = HashMap<machine::Id, Machine>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Machine>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Machine>, machine::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<'l, C> Database<Select<By<Option<Machine>, &'l machine::Code>>>
    for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<Option<Machine>, machine::Id>>,
        Ok = Option<Machine>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Machine>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Machine>, &'l machine::Code>>,
    ) -> Result<Self::Ok, Self::Err> {
        let code = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM machines \
            WHERE code = $1::VARCHAR \
            LIMIT 1";
        let Some(row) = self
            .query_opt(SQL, &[code])
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        self.execute(Select(By::<Option<Machine>, _>::new(
            row.get::<_, machine::Id>("id"),
        )))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Vec<Machine>, ()>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<machine::Id, Machine>, Vec<machine::Id>>>,
        Ok = HashMap<machine::Id, Machine>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<Machine>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Machine>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT id \
            FROM machines \
            ORDER BY code";
        let ids = self
            .query(SQL, &[])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| row.get("id"))
            .collect::<Vec<machine::Id>>();

        let mut machines = self
            .execute(Select(By::<HashMap<_, Machine>, _>::new(ids.clone())))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(ids.iter().filter_map(|id| machines.remove(id)).collect())
    }
}

impl<C> Database<Insert<Machine>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(machine): Insert<Machine>,
    ) -> Result<Self::Ok, Self::Err> {
        let Machine {
            id,
            code,
            name,
            elements,
            created_at,
        } = machine;

        const SQL: &str = "\
            INSERT INTO machines (id, code, name, created_at) \
            VALUES ($1::UUID, $2::VARCHAR, $3::VARCHAR, $4::TIMESTAMPTZ)";
        self.exec(SQL, &[&id, &code, &name, &created_at])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let kinds = elements.iter().map(|e| e.item.kind()).collect::<Vec<_>>();
        let material_ids = elements
            .iter()
            .map(|e| e.item.material_id())
            .collect::<Vec<_>>();
        let part_ids =
            elements.iter().map(|e| e.item.part_id()).collect::<Vec<_>>();
        let quantities =
            elements.iter().map(|e| e.quantity).collect::<Vec<_>>();
        const ELEMENTS_SQL: &str = "\
            INSERT INTO machine_elements (\
                machine_id, position, kind, material_id, part_id, quantity \
            ) \
            SELECT $1::UUID, e.position::INT4, \
                   e.kind, e.material_id, e.part_id, e.quantity \
            FROM unnest($2::INT2[], $3::UUID[], $4::UUID[], $5::NUMERIC[]) \
                 WITH ORDINALITY \
                 AS e(kind, material_id, part_id, quantity, position)";
        self.exec(
            ELEMENTS_SQL,
            &[&id, &kinds, &material_ids, &part_ids, &quantities],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Machine, machine::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Machine, machine::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: machine::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM machines \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
