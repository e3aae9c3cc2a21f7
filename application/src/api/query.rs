//! GraphQL [`Query`]s definitions.

use juniper::graphql_object;
use service::{query, read, Query as _};

use crate::{api, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the `Material` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `MATERIAL_NOT_EXISTS` - the `Material` with the specified ID does
    ///                           not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "material",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn material(
        id: api::material::Id,
        ctx: &Context,
    ) -> Result<api::Material, Error> {
        ctx.material(id.into())
            .await?
            .ok_or_else(|| api::NotExistsError::Material.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Lists `Material`s ordered by their codes.
    ///
    /// If `supplierId` is specified, then only the `Material`s sold by that
    /// `Supplier` are listed. If `lowStock` is `true`, then only the
    /// stock-tracked `Material`s at or below their alert level are listed.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "materials",
            low_stock = ?low_stock,
            otel.name = Self::SPAN_NAME,
            supplier_id = ?supplier_id,
        ),
    )]
    pub async fn materials(
        supplier_id: Option<api::supplier::Id>,
        low_stock: Option<bool>,
        ctx: &Context,
    ) -> Result<Vec<api::Material>, Error> {
        ctx.service()
            .execute(query::material::List::by(read::material::list::Filter {
                supplier_id: supplier_id.map(Into::into),
                low_stock: low_stock.unwrap_or_default(),
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|list| list.into_iter().map(Into::into).collect())
    }

    /// Returns the `Supplier` with the specified ID, even a deleted one.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `SUPPLIER_NOT_EXISTS` - the `Supplier` with the specified ID does
    ///                           not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "supplier",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn supplier(
        id: api::supplier::Id,
        ctx: &Context,
    ) -> Result<api::Supplier, Error> {
        ctx.supplier(id.into())
            .await?
            .ok_or_else(|| api::NotExistsError::Supplier.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Lists `Supplier`s ordered by their names.
    ///
    /// Deleted `Supplier`s are listed only if `includeDeleted` is `true`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "suppliers",
            include_deleted = ?include_deleted,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn suppliers(
        include_deleted: Option<bool>,
        ctx: &Context,
    ) -> Result<Vec<api::Supplier>, Error> {
        ctx.service()
            .execute(query::supplier::List::by(read::supplier::list::Filter {
                include_deleted: include_deleted.unwrap_or_default(),
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|list| list.into_iter().map(Into::into).collect())
    }

    /// Returns the `Part` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PART_NOT_EXISTS` - the `Part` with the specified ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "part",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn part(
        id: api::part::Id,
        ctx: &Context,
    ) -> Result<api::Part, Error> {
        ctx.part(id.into())
            .await?
            .ok_or_else(|| api::NotExistsError::Part.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Lists `Part`s ordered by their codes.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "parts",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn parts(ctx: &Context) -> Result<Vec<api::Part>, Error> {
        ctx.service()
            .execute(query::part::List::by(()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|list| list.into_iter().map(Into::into).collect())
    }

    /// Returns the `Machine` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `MACHINE_NOT_EXISTS` - the `Machine` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "machine",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn machine(
        id: api::machine::Id,
        ctx: &Context,
    ) -> Result<api::Machine, Error> {
        ctx.service()
            .execute(query::machine::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::NotExistsError::Machine.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Lists `Machine`s ordered by their codes.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "machines",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn machines(ctx: &Context) -> Result<Vec<api::Machine>, Error> {
        ctx.service()
            .execute(query::machine::List::by(()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|list| list.into_iter().map(Into::into).collect())
    }

    /// Returns the `PurchaseOrder` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PURCHASE_ORDER_NOT_EXISTS` - the `PurchaseOrder` with the
    ///                                 specified ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "purchaseOrder",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn purchase_order(
        id: api::purchase_order::Id,
        ctx: &Context,
    ) -> Result<api::PurchaseOrder, Error> {
        ctx.service()
            .execute(query::purchase_order::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::NotExistsError::PurchaseOrder.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Lists `PurchaseOrder`s, the most recently placed first.
    ///
    /// Every specified argument narrows the list down.
    #[tracing::instrument(
        skip_all,
        fields(
            delivered = ?delivered,
            gql.name = "purchaseOrders",
            otel.name = Self::SPAN_NAME,
            status = ?status,
            supplier_id = ?supplier_id,
        ),
    )]
    pub async fn purchase_orders(
        supplier_id: Option<api::supplier::Id>,
        status: Option<api::purchase_order::Status>,
        delivered: Option<bool>,
        ctx: &Context,
    ) -> Result<Vec<api::PurchaseOrder>, Error> {
        ctx.service()
            .execute(query::purchase_order::List::by(
                read::purchase_order::list::Filter {
                    supplier_id: supplier_id.map(Into::into),
                    status: status.map(Into::into),
                    delivered,
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|list| list.into_iter().map(Into::into).collect())
    }

    /// Returns the `RequestForQuotation` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `REQUEST_FOR_QUOTATION_NOT_EXISTS` - the `RequestForQuotation` with
    ///                                        the specified ID does not
    ///                                        exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "requestForQuotation",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn request_for_quotation(
        id: api::request_for_quotation::Id,
        ctx: &Context,
    ) -> Result<api::RequestForQuotation, Error> {
        ctx.service()
            .execute(query::request_for_quotation::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::NotExistsError::RequestForQuotation.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Lists `RequestForQuotation`s, the most recent first.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "requestsForQuotation",
            otel.name = Self::SPAN_NAME,
            status = ?status,
            supplier_id = ?supplier_id,
        ),
    )]
    pub async fn requests_for_quotation(
        supplier_id: Option<api::supplier::Id>,
        status: Option<api::request_for_quotation::Status>,
        ctx: &Context,
    ) -> Result<Vec<api::RequestForQuotation>, Error> {
        ctx.service()
            .execute(query::request_for_quotation::List::by(
                read::request_for_quotation::list::Filter {
                    supplier_id: supplier_id.map(Into::into),
                    status: status.map(Into::into),
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|list| list.into_iter().map(Into::into).collect())
    }

    /// Returns the `PricedItem` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PRICED_ITEM_NOT_EXISTS` - the `PricedItem` with the specified ID
    ///                              does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "pricedItem",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn priced_item(
        id: api::item::Id,
        ctx: &Context,
    ) -> Result<api::PricedItem, Error> {
        ctx.service()
            .execute(query::priced_item::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::NotExistsError::PricedItem.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Lists `PricedItem`s.
    ///
    /// If `unpriced` is `true`, then only the ones without a price are
    /// listed.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "pricedItems",
            kind = ?kind,
            otel.name = Self::SPAN_NAME,
            unpriced = ?unpriced,
        ),
    )]
    pub async fn priced_items(
        kind: Option<api::ItemKind>,
        unpriced: Option<bool>,
        ctx: &Context,
    ) -> Result<Vec<api::PricedItem>, Error> {
        ctx.service()
            .execute(query::priced_item::List::by(
                read::priced_item::list::Filter {
                    kind: kind.map(Into::into),
                    unpriced: unpriced.unwrap_or_default(),
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|list| list.into_iter().map(Into::into).collect())
    }
}
