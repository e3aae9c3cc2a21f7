//! [`Part`]-related definitions.

use std::{collections::HashSet, future};

use common::{DateTime, Handler as _, Money, Quantity};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLInputObject, GraphQLScalar};
use service::{domain, query};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// A part.
#[derive(Clone, Debug)]
pub struct Part {
    /// ID of this [`Part`].
    id: Id,

    /// Underlying [`domain::Part`], once loaded.
    part: OnceCell<domain::Part>,
}

impl From<domain::Part> for Part {
    fn from(part: domain::Part) -> Self {
        Self {
            id: part.id.into(),
            part: OnceCell::new_with(Some(part)),
        }
    }
}

impl Part {
    /// Creates a new [`Part`] with the provided ID, loaded lazily.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Part`] with the provided ID exists,
    /// otherwise accessing this [`Part`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            part: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Part`].
    async fn part(&self, ctx: &Context) -> Result<&domain::Part, Error> {
        self.part
            .get_or_try_init(|| {
                ctx.part(self.id.into()).and_then(|p| {
                    future::ready(p.ok_or_else(|| {
                        ctx.error()(api::NotExistsError::Part.into())
                    }))
                })
            })
            .await
    }

    /// Rolls up the price of this [`Part`].
    async fn pricing(
        &self,
        ctx: &Context,
    ) -> Result<domain::priced_item::Rollup<domain::material::Id>, Error> {
        ctx.service()
            .execute(query::part::Pricing {
                part_id: self.id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::NotExistsError::Part.into())
            .map_err(ctx.error())
    }
}

/// An assembly made of `Material`s (a bill of materials).
#[graphql_object(context = Context)]
impl Part {
    /// Unique identifier of this `Part`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Unique code of this `Part`.
    pub async fn code(&self, ctx: &Context) -> Result<Code, Error> {
        Ok(self.part(ctx).await?.code.clone().into())
    }

    /// Name of this `Part`.
    pub async fn name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.part(ctx).await?.name.clone().into())
    }

    /// `Material`s this `Part` is made of.
    pub async fn materials(
        &self,
        ctx: &Context,
    ) -> Result<Vec<Component>, Error> {
        Ok(self
            .part(ctx)
            .await?
            .materials
            .iter()
            .copied()
            .map(Component)
            .collect())
    }

    /// Total price of this `Part`, rolled up from the current prices of its
    /// `Material`s.
    ///
    /// `null` while any of the `Material`s has no price.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMOUNT_TOO_LARGE` - the total price is too large to be computed.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Part.totalPrice",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn total_price(
        &self,
        ctx: &Context,
    ) -> Result<Option<Money>, Error> {
        Ok(self.pricing(ctx).await?.total.and_then(Money::new))
    }

    /// `Material`s of this `Part` having no price.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Part.unpricedMaterials",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn unpriced_materials(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Material>, Error> {
        Ok(self
            .pricing(ctx)
            .await?
            .unpriced
            .into_iter()
            .map(|id| {
                #[expect(
                    unsafe_code,
                    reason = "components reference existing `Material`s"
                )]
                unsafe {
                    api::Material::new_unchecked(id)
                }
            })
            .collect())
    }

    /// Current price of this `Part` itself.
    pub async fn price(
        &self,
        ctx: &Context,
    ) -> Result<api::PricedItem, Error> {
        ctx.price(domain::Item::Part(self.id.into()))
            .await?
            .ok_or_else(|| api::NotExistsError::PricedItem.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// `DateTime` when this `Part` was created.
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.part(ctx).await?.created_at.coerce())
    }
}

/// `Material` used in a `Part`, with its quantity.
#[derive(Clone, Copy, Debug)]
pub struct Component(domain::part::Component);

/// `Material` used in a `Part`, with its quantity.
#[graphql_object(name = "PartComponent", context = Context)]
impl Component {
    /// Used `Material`.
    #[must_use]
    pub fn material(&self) -> api::Material {
        #[expect(
            unsafe_code,
            reason = "components reference existing `Material`s"
        )]
        unsafe {
            api::Material::new_unchecked(self.0.material_id)
        }
    }

    /// Quantity of the `Material` in the `Part`.
    #[must_use]
    pub fn quantity(&self) -> Quantity {
        self.0.quantity
    }
}

/// `Material` to use in a new `Part`.
#[derive(Clone, Copy, Debug, GraphQLInputObject)]
#[graphql(name = "PartComponentInput")]
pub struct ComponentInput {
    /// ID of the `Material`.
    pub material_id: api::material::Id,

    /// Quantity of the `Material` in the `Part`.
    pub quantity: Quantity,
}

/// Converts the provided [`ComponentInput`]s into [`domain::part::Components`].
///
/// # Errors
///
/// With `NO_ITEMS` or `DUPLICATE_ITEM` code if the list is empty or lists a
/// `Material` twice.
pub(crate) fn components(
    inputs: Vec<ComponentInput>,
) -> Result<domain::part::Components, Error> {
    let mut seen = HashSet::with_capacity(inputs.len());
    if inputs.is_empty() {
        return Err(api::InputError::NoItems.into());
    }
    if !inputs.iter().all(|c| seen.insert(c.material_id)) {
        return Err(api::InputError::DuplicateItem.into());
    }
    domain::part::Components::new(
        inputs
            .into_iter()
            .map(|c| domain::part::Component {
                material_id: c.material_id.into(),
                quantity: c.quantity,
            })
            .collect(),
    )
    .ok_or_else(|| api::InputError::DuplicateItem.into())
}

/// Unique identifier of a `Part`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Hash, Into, PartialEq,
)]
#[from(domain::part::Id)]
#[into(domain::part::Id)]
#[graphql(name = "PartId", transparent)]
pub struct Id(Uuid);

/// Unique code of a `Part`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "PartCode", with = scalar::Via::<domain::part::Code>)]
pub struct Code(domain::part::Code);

/// Name of a `Part`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "PartName", with = scalar::Via::<domain::part::Name>)]
pub struct Name(domain::part::Name);

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::Quantity;
    use service::domain;

    use super::{components, ComponentInput};

    fn input(id: domain::material::Id, q: &str) -> ComponentInput {
        ComponentInput {
            material_id: id.into(),
            quantity: Quantity::from_str(q).unwrap(),
        }
    }

    #[test]
    fn rejects_empty_and_duplicate_components() {
        let a = domain::material::Id::new();
        let b = domain::material::Id::new();

        assert_eq!(components(vec![]).unwrap_err().code, "NO_ITEMS");
        assert_eq!(
            components(vec![input(a, "1"), input(a, "2")])
                .unwrap_err()
                .code,
            "DUPLICATE_ITEM",
        );
        assert_eq!(
            components(vec![input(a, "1"), input(b, "2")]).unwrap().len(),
            2,
        );
    }
}
