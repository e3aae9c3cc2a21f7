//! [`Machine`]-related definitions.

use std::collections::HashSet;

use common::{DateTime, Handler as _, Money, Quantity};
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLInputObject, GraphQLScalar};
use service::{domain, query};
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// A machine.
#[derive(Clone, Debug, From, Into)]
pub struct Machine(domain::Machine);

impl Machine {
    /// Rolls up the price of this [`Machine`].
    async fn pricing(
        &self,
        ctx: &Context,
    ) -> Result<domain::priced_item::Rollup<domain::Item>, Error> {
        ctx.service()
            .execute(query::machine::Pricing {
                machine_id: self.0.id,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::NotExistsError::Machine.into())
            .map_err(ctx.error())
    }
}

/// A machine assembled from `Material`s and `Part`s.
#[graphql_object(context = Context)]
impl Machine {
    /// Unique identifier of this `Machine`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Unique code of this `Machine`.
    #[must_use]
    pub fn code(&self) -> Code {
        self.0.code.clone().into()
    }

    /// Name of this `Machine`.
    #[must_use]
    pub fn name(&self) -> Name {
        self.0.name.clone().into()
    }

    /// `CatalogItem`s this `Machine` is assembled from.
    #[must_use]
    pub fn elements(&self) -> Vec<Element> {
        self.0.elements.iter().copied().map(Element).collect()
    }

    /// Total price of this `Machine`, rolled up from the current prices of
    /// its `Material`s and the rolled up prices of its `Part`s.
    ///
    /// `null` while any of the elements has no price.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMOUNT_TOO_LARGE` - the total price is too large to be computed.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Machine.totalPrice",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn total_price(
        &self,
        ctx: &Context,
    ) -> Result<Option<Money>, Error> {
        Ok(self.pricing(ctx).await?.total.and_then(Money::new))
    }

    /// Elements of this `Machine` having no price.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Machine.unpricedItems",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn unpriced_items(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::CatalogItem>, Error> {
        Ok(self
            .pricing(ctx)
            .await?
            .unpriced
            .into_iter()
            .map(Into::into)
            .collect())
    }

    /// `DateTime` when this `Machine` was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// `CatalogItem` used in a `Machine`, with its quantity.
#[derive(Clone, Copy, Debug)]
pub struct Element(domain::machine::Element);

/// `CatalogItem` used in a `Machine`, with its quantity.
#[graphql_object(name = "MachineElement", context = Context)]
impl Element {
    /// Used `CatalogItem`.
    #[must_use]
    pub fn item(&self) -> api::CatalogItem {
        self.0.item.into()
    }

    /// Quantity of the `CatalogItem` in the `Machine`.
    #[must_use]
    pub fn quantity(&self) -> Quantity {
        self.0.quantity
    }
}

/// `CatalogItem` to use in a new `Machine`.
#[derive(Clone, Copy, Debug, GraphQLInputObject)]
#[graphql(name = "MachineElementInput")]
pub struct ElementInput {
    /// Used `CatalogItem`.
    pub item: api::item::Input,

    /// Quantity of the `CatalogItem` in the `Machine`.
    pub quantity: Quantity,
}

/// Converts the provided [`ElementInput`]s into
/// [`domain::machine::Elements`].
///
/// # Errors
///
/// With `INVALID_ITEM`, `NO_ITEMS` or `DUPLICATE_ITEM` code if any item
/// reference is invalid, or the list is empty, or lists an item twice.
pub(crate) fn elements(
    inputs: Vec<ElementInput>,
) -> Result<domain::machine::Elements, Error> {
    if inputs.is_empty() {
        return Err(api::InputError::NoItems.into());
    }
    let elements = inputs
        .into_iter()
        .map(|e| {
            Ok(domain::machine::Element {
                item: e.item.try_into()?,
                quantity: e.quantity,
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;
    let mut seen = HashSet::with_capacity(elements.len());
    if !elements.iter().all(|e| seen.insert(e.item)) {
        return Err(api::InputError::DuplicateItem.into());
    }
    domain::machine::Elements::new(elements)
        .ok_or_else(|| api::InputError::DuplicateItem.into())
}

/// Unique identifier of a `Machine`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::machine::Id)]
#[into(domain::machine::Id)]
#[graphql(name = "MachineId", transparent)]
pub struct Id(Uuid);

/// Unique code of a `Machine`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "MachineCode",
    with = scalar::Via::<domain::machine::Code>,
)]
pub struct Code(domain::machine::Code);

/// Name of a `Machine`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "MachineName",
    with = scalar::Via::<domain::machine::Name>,
)]
pub struct Name(domain::machine::Name);
