//! [`RequestForQuotation`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Insert, Select, Update};
use itertools::Itertools as _;
use tracerr::Traced;

use crate::{
    domain::{
        request_for_quotation::{self, Item, Items},
        RequestForQuotation,
    },
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

impl<C, IDs>
    Database<
        Select<
            By<HashMap<request_for_quotation::Id, RequestForQuotation>, IDs>,
        >,
    > for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[request_for_quotation::Id]>,
{
    type Ok = HashMap<request_for_quotation::Id, RequestForQuotation>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<HashMap<request_for_quotation::Id, RequestForQuotation>, IDs>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        let ids: &[request_for_quotation::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        const MATERIALS_SQL: &str = "\
            SELECT request_for_quotation_id, \
                   material_id, quantity, unit_price \
            FROM request_for_quotation_materials \
            WHERE request_for_quotation_id = ANY($1::UUID[]) \
            ORDER BY request_for_quotation_id, position";
        let mut items = self
            .query(MATERIALS_SQL, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                (
                    row.get::<_, request_for_quotation::Id>(
                        "request_for_quotation_id",
                    ),
                    Item {
                        material_id: row.get("material_id"),
                        quantity: row.get("quantity"),
                        unit_price: row.get("unit_price"),
                    },
                )
            })
            .into_group_map();

        const SQL: &str = "\
            SELECT id, supplier_id, requested_at, status, note, created_at \
            FROM requests_for_quotation \
            WHERE id = ANY($1::UUID[])";
        Ok(self
            .query(SQL, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let id: request_for_quotation::Id = row.get("id");
                let materials = items.remove(&id).unwrap_or_default();
                (
                    id,
                    RequestForQuotation {
                        id,
                        supplier_id: row.get("supplier_id"),
                        requested_at: row.get("requested_at"),
                        status: row.get("status"),
                        note: row.get("note"),
                        materials: Items::new(materials).expect(
                            "`RequestForQuotation` without `Item`s",
                        ),
                        created_at: row.get("created_at"),
                    },
                )
            })
            .collect())
    }
}

impl<C>
    Database<
        Select<By<Option<RequestForQuotation>, request_for_quotation::Id>>,
    > for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<
            By<
                HashMap<request_for_quotation::Id, RequestForQuotation>,
                [request_for_quotation::Id; 1],
            >,
        >,
        Ok = HashMap<request_for_quotation::Id, RequestForQuotation>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<RequestForQuotation>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Option<RequestForQuotation>, request_for_quotation::Id>,
        >,
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
        Select<
            By<
                Vec<RequestForQuotation>,
                read::request_for_quotation::list::Filter,
            >,
        >,
    > for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<
            By<
                HashMap<request_for_quotation::Id, RequestForQuotation>,
                Vec<request_for_quotation::Id>,
            >,
        >,
        Ok = HashMap<request_for_quotation::Id, RequestForQuotation>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<RequestForQuotation>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<
                Vec<RequestForQuotation>,
                read::request_for_quotation::list::Filter,
            >,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::request_for_quotation::list::Filter {
            supplier_id,
            status,
        } = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM requests_for_quotation \
            WHERE ($1::UUID IS NULL OR supplier_id = $1::UUID) \
              AND ($2::INT2 IS NULL OR status = $2::INT2) \
            ORDER BY requested_at DESC, id";
        let ids = self
            .query(SQL, &[&supplier_id, &status])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| row.get("id"))
            .collect::<Vec<request_for_quotation::Id>>();

        let mut requests = self
            .execute(Select(By::<HashMap<_, RequestForQuotation>, _>::new(
                ids.clone(),
            )))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(ids.iter().filter_map(|id| requests.remove(id)).collect())
    }
}

impl<C> Database<Insert<RequestForQuotation>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(rfq): Insert<RequestForQuotation>,
    ) -> Result<Self::Ok, Self::Err> {
        let RequestForQuotation {
            id,
            supplier_id,
            requested_at,
            status,
            note,
            materials,
            created_at,
        } = rfq;

        const SQL: &str = "\
            INSERT INTO requests_for_quotation (\
                id, supplier_id, requested_at, status, note, created_at \
            ) VALUES (\
                $1::UUID, $2::UUID, $3::TIMESTAMPTZ, \
                $4::INT2, $5::VARCHAR, $6::TIMESTAMPTZ \
            )";
        self.exec(
            SQL,
            &[&id, &supplier_id, &requested_at, &status, &note, &created_at],
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
            INSERT INTO request_for_quotation_materials (\
                request_for_quotation_id, position, \
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

impl<C> Database<Update<RequestForQuotation>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(rfq): Update<RequestForQuotation>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            UPDATE requests_for_quotation \
            SET status = $2::INT2, \
                note = $3::VARCHAR \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&rfq.id, &rfq.status, &rfq.note])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        // Requested materials are fixed, only their quoted prices change.
        let material_ids =
            rfq.materials.iter().map(|i| i.material_id).collect::<Vec<_>>();
        let unit_prices =
            rfq.materials.iter().map(|i| i.unit_price).collect::<Vec<_>>();
        const PRICES_SQL: &str = "\
            UPDATE request_for_quotation_materials AS r \
            SET unit_price = m.unit_price \
            FROM unnest($2::UUID[], $3::NUMERIC[]) \
                 AS m(material_id, unit_price) \
            WHERE r.request_for_quotation_id = $1::UUID \
              AND r.material_id = m.material_id";
        self.exec(PRICES_SQL, &[&rfq.id, &material_ids, &unit_prices])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
