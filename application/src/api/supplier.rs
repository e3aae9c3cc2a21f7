//! [`Supplier`]-related definitions.

use std::future;

use common::{DateTime, Handler as _};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// A supplier.
#[derive(Clone, Debug)]
pub struct Supplier {
    /// ID of this [`Supplier`].
    id: Id,

    /// Underlying [`domain::Supplier`], once loaded.
    supplier: OnceCell<domain::Supplier>,
}

impl From<domain::Supplier> for Supplier {
    fn from(supplier: domain::Supplier) -> Self {
        Self {
            id: supplier.id.into(),
            supplier: OnceCell::new_with(Some(supplier)),
        }
    }
}

impl Supplier {
    /// Creates a new [`Supplier`] with the provided ID, loaded lazily.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Supplier`] with the provided ID exists,
    /// otherwise accessing this [`Supplier`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            supplier: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Supplier`].
    async fn supplier(
        &self,
        ctx: &Context,
    ) -> Result<&domain::Supplier, Error> {
        self.supplier
            .get_or_try_init(|| {
                ctx.supplier(self.id.into()).and_then(|s| {
                    future::ready(s.ok_or_else(|| {
                        ctx.error()(api::NotExistsError::Supplier.into())
                    }))
                })
            })
            .await
    }
}

/// A supplier of `Material`s.
#[graphql_object(context = Context)]
impl Supplier {
    /// Unique identifier of this `Supplier`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Name of this `Supplier`.
    pub async fn name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.supplier(ctx).await?.name.clone().into())
    }

    /// Email of this `Supplier`.
    pub async fn email(&self, ctx: &Context) -> Result<Option<Email>, Error> {
        Ok(self.supplier(ctx).await?.contact.email.clone().map(Into::into))
    }

    /// Phone of this `Supplier`.
    pub async fn phone(&self, ctx: &Context) -> Result<Option<Phone>, Error> {
        Ok(self.supplier(ctx).await?.contact.phone.clone().map(Into::into))
    }

    /// Postal address of this `Supplier`.
    pub async fn address(
        &self,
        ctx: &Context,
    ) -> Result<Option<Address>, Error> {
        Ok(self
            .supplier(ctx)
            .await?
            .contact
            .address
            .clone()
            .map(Into::into))
    }

    /// `Material`s this `Supplier` sells, ordered by their codes.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Supplier.materials",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn materials(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Material>, Error> {
        let catalog = ctx
            .service()
            .execute(query::supplier::Catalog::by(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        let mut materials = ctx
            .service()
            .execute(query::material::ByIds::by(
                catalog.iter().copied().collect(),
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .into_values()
            .collect::<Vec<_>>();
        materials.sort_by_cached_key(|m| m.code.to_string());
        Ok(materials.into_iter().map(Into::into).collect())
    }

    /// Indicator whether this `Supplier` is deleted.
    ///
    /// Deleted `Supplier`s are kept for the orders already placed with them.
    pub async fn is_deleted(&self, ctx: &Context) -> Result<bool, Error> {
        Ok(self.supplier(ctx).await?.is_deleted())
    }

    /// `DateTime` when this `Supplier` was deleted, if it was.
    pub async fn deleted_at(
        &self,
        ctx: &Context,
    ) -> Result<Option<DateTime>, Error> {
        Ok(self.supplier(ctx).await?.deleted_at.map(|d| d.coerce()))
    }

    /// `DateTime` when this `Supplier` was created.
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.supplier(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of a `Supplier`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::supplier::Id)]
#[into(domain::supplier::Id)]
#[graphql(name = "SupplierId", transparent)]
pub struct Id(Uuid);

/// Name of a `Supplier`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "SupplierName",
    with = scalar::Via::<domain::supplier::Name>,
)]
pub struct Name(domain::supplier::Name);

/// Email of a `Supplier`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "SupplierEmail",
    with = scalar::Via::<domain::supplier::Email>,
)]
pub struct Email(domain::supplier::Email);

/// Phone of a `Supplier`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "SupplierPhone",
    with = scalar::Via::<domain::supplier::Phone>,
)]
pub struct Phone(domain::supplier::Phone);

/// Postal address of a `Supplier`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "SupplierAddress",
    with = scalar::Via::<domain::supplier::Address>,
)]
pub struct Address(domain::supplier::Address);

/// Builds the [`domain::supplier::Contact`] from its GraphQL parts.
pub(crate) fn contact(
    email: Option<Email>,
    phone: Option<Phone>,
    address: Option<Address>,
) -> domain::supplier::Contact {
    domain::supplier::Contact {
        email: email.map(Into::into),
        phone: phone.map(Into::into),
        address: address.map(Into::into),
    }
}
