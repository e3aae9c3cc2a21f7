//! [`Material`]-related definitions.

use std::future;

use common::{DateTime, Handler as _};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{
    graphql_object, GraphQLEnum, GraphQLInputObject, GraphQLScalar,
};
use service::{domain, query};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// A material.
#[derive(Clone, Debug)]
pub struct Material {
    /// ID of this [`Material`].
    id: Id,

    /// Underlying [`domain::Material`], once loaded.
    material: OnceCell<domain::Material>,
}

impl From<domain::Material> for Material {
    fn from(material: domain::Material) -> Self {
        Self {
            id: material.id.into(),
            material: OnceCell::new_with(Some(material)),
        }
    }
}

impl Material {
    /// Creates a new [`Material`] with the provided ID, loaded lazily.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Material`] with the provided ID exists,
    /// otherwise accessing this [`Material`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            material: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Material`].
    ///
    /// # Errors
    ///
    /// If the [`domain::Material`] doesn't exist.
    async fn material(
        &self,
        ctx: &Context,
    ) -> Result<&domain::Material, Error> {
        self.material
            .get_or_try_init(|| {
                ctx.material(self.id.into()).and_then(|m| {
                    future::ready(m.ok_or_else(|| {
                        ctx.error()(api::NotExistsError::Material.into())
                    }))
                })
            })
            .await
    }
}

/// A material: raw substance or purchased component, bought from
/// `Supplier`s and used in `Part`s and `Machine`s.
#[graphql_object(context = Context)]
impl Material {
    /// Unique identifier of this `Material`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Unique code of this `Material`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Material.code",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn code(&self, ctx: &Context) -> Result<Code, Error> {
        Ok(self.material(ctx).await?.code.clone().into())
    }

    /// Name of this `Material`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Material.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.material(ctx).await?.name.clone().into())
    }

    /// Unit this `Material` is measured in.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Material.unit",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn unit(&self, ctx: &Context) -> Result<Unit, Error> {
        Ok(self.material(ctx).await?.unit.into())
    }

    /// Stock levels of this `Material`, if it's stock-tracked.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Material.stock",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn stock(&self, ctx: &Context) -> Result<Option<Stock>, Error> {
        Ok(self.material(ctx).await?.stock.map(Stock))
    }

    /// Indicator whether the current stock of this `Material` is at or below
    /// its alert level.
    ///
    /// Always `false` for the not stock-tracked `Material`s.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Material.isLowStock",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn is_low_stock(&self, ctx: &Context) -> Result<bool, Error> {
        Ok(self
            .material(ctx)
            .await?
            .stock
            .is_some_and(|s| s.is_low()))
    }

    /// Non-deleted `Supplier`s selling this `Material`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Material.suppliers",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn suppliers(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Supplier>, Error> {
        let ids = ctx
            .service()
            .execute(query::material::Suppliers::by(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        Ok(ids
            .iter()
            .map(|&id| {
                #[expect(
                    unsafe_code,
                    reason = "`Supplier`s of existing catalog entries exist"
                )]
                unsafe {
                    api::Supplier::new_unchecked(id)
                }
            })
            .collect())
    }

    /// Current price of this `Material`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Material.price",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn price(&self, ctx: &Context) -> Result<api::PricedItem, Error> {
        ctx.price(domain::Item::Material(self.id.into()))
            .await?
            .ok_or_else(|| api::NotExistsError::PricedItem.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// `DateTime` when this `Material` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Material.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.material(ctx).await?.created_at.coerce())
    }
}

/// Stock levels of a `Material`.
#[derive(Clone, Copy, Debug)]
pub struct Stock(domain::material::Stock);

/// Stock levels of a stock-tracked `Material`.
#[graphql_object(name = "MaterialStock", context = Context)]
impl Stock {
    /// Quantity currently in stock.
    #[must_use]
    pub fn current(&self) -> StockQuantity {
        self.0.current.into()
    }

    /// Quantity at or below which the stock is considered low.
    #[must_use]
    pub fn alert(&self) -> StockQuantity {
        self.0.alert.into()
    }
}

/// Stock levels of a stock-tracked `Material`.
#[derive(Clone, Copy, Debug, GraphQLInputObject)]
#[graphql(name = "MaterialStockInput")]
pub struct StockInput {
    /// Quantity currently in stock.
    pub current: StockQuantity,

    /// Quantity at or below which the stock is considered low.
    pub alert: StockQuantity,
}

impl From<StockInput> for domain::material::Stock {
    fn from(input: StockInput) -> Self {
        Self {
            current: input.current.into(),
            alert: input.alert.into(),
        }
    }
}

/// Unique identifier of a `Material`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Hash, Into, PartialEq,
)]
#[from(domain::material::Id)]
#[into(domain::material::Id)]
#[graphql(name = "MaterialId", transparent)]
pub struct Id(Uuid);

/// Unique code of a `Material`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "MaterialCode",
    with = scalar::Via::<domain::material::Code>,
)]
pub struct Code(domain::material::Code);

/// Name of a `Material`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "MaterialName",
    with = scalar::Via::<domain::material::Name>,
)]
pub struct Name(domain::material::Name);

/// Non-negative quantity of a `Material` in stock.
#[derive(AsRef, Clone, Copy, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "StockQuantity",
    with = scalar::Via::<domain::material::StockQuantity>,
)]
pub struct StockQuantity(domain::material::StockQuantity);

/// Unit a `Material` is measured in.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "MaterialUnit")]
pub enum Unit {
    /// Kilograms.
    Kilogram,

    /// Grams.
    Gram,

    /// Liters.
    Liter,

    /// Milliliters.
    Milliliter,

    /// Meters.
    Meter,

    /// Centimeters.
    Centimeter,

    /// Square meters.
    SquareMeter,

    /// Countable pieces.
    Piece,
}

impl From<domain::material::Unit> for Unit {
    fn from(unit: domain::material::Unit) -> Self {
        use domain::material::Unit as U;
        match unit {
            U::Kilogram => Self::Kilogram,
            U::Gram => Self::Gram,
            U::Liter => Self::Liter,
            U::Milliliter => Self::Milliliter,
            U::Meter => Self::Meter,
            U::Centimeter => Self::Centimeter,
            U::SquareMeter => Self::SquareMeter,
            U::Piece => Self::Piece,
        }
    }
}

impl From<Unit> for domain::material::Unit {
    fn from(unit: Unit) -> Self {
        match unit {
            Unit::Kilogram => Self::Kilogram,
            Unit::Gram => Self::Gram,
            Unit::Liter => Self::Liter,
            Unit::Milliliter => Self::Milliliter,
            Unit::Meter => Self::Meter,
            Unit::Centimeter => Self::Centimeter,
            Unit::SquareMeter => Self::SquareMeter,
            Unit::Piece => Self::Piece,
        }
    }
}
