//! [`CatalogItem`] and [`PricedItem`] definitions.

use common::{DateTime, Money};
use derive_more::{Display, From, Into};
use juniper::{graphql_object, GraphQLInputObject, GraphQLScalar, GraphQLUnion};
use service::domain;
use uuid::Uuid;

use crate::{api, Context, Error};

/// Item of the catalog: either a `Material` or a `Part`.
#[derive(Clone, Debug, GraphQLUnion)]
#[graphql(context = Context)]
pub enum CatalogItem {
    /// A `Material`.
    Material(api::Material),

    /// A `Part`.
    Part(api::Part),
}

impl From<domain::Item> for CatalogItem {
    fn from(item: domain::Item) -> Self {
        #[expect(
            unsafe_code,
            reason = "`Item`s are restored from the existing references"
        )]
        unsafe {
            match item {
                domain::Item::Material(id) => {
                    Self::Material(api::Material::new_unchecked(id))
                }
                domain::Item::Part(id) => {
                    Self::Part(api::Part::new_unchecked(id))
                }
            }
        }
    }
}

/// Reference to a `CatalogItem`.
///
/// Exactly one of the fields must be provided.
#[derive(Clone, Copy, Debug, GraphQLInputObject)]
#[graphql(name = "CatalogItemInput")]
pub struct Input {
    /// ID of the referenced `Material`.
    pub material_id: Option<api::material::Id>,

    /// ID of the referenced `Part`.
    pub part_id: Option<api::part::Id>,
}

impl TryFrom<Input> for domain::Item {
    type Error = Error;

    fn try_from(input: Input) -> Result<Self, Self::Error> {
        match (input.material_id, input.part_id) {
            (Some(id), None) => Ok(Self::Material(id.into())),
            (None, Some(id)) => Ok(Self::Part(id.into())),
            (Some(_), Some(_)) | (None, None) => {
                Err(api::InputError::InvalidItem.into())
            }
        }
    }
}

/// Current price of a catalog item.
#[derive(Clone, Copy, Debug, From, Into)]
pub struct PricedItem(domain::PricedItem);

/// Current unit price of a `CatalogItem`.
#[graphql_object(context = Context)]
impl PricedItem {
    /// Unique identifier of this `PricedItem`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Kind of the priced `CatalogItem`.
    #[must_use]
    pub fn kind(&self) -> api::ItemKind {
        self.0.item.kind().into()
    }

    /// Priced `CatalogItem`.
    #[must_use]
    pub fn item(&self) -> CatalogItem {
        self.0.item.into()
    }

    /// Price of a single unit of the `CatalogItem`, if it's known.
    #[must_use]
    pub fn unit_price(&self) -> Option<Money> {
        self.0.unit_price
    }

    /// `DateTime` when the price was last changed.
    #[must_use]
    pub fn updated_at(&self) -> DateTime {
        self.0.updated_at.coerce()
    }
}

/// Unique identifier of a `PricedItem`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::priced_item::Id)]
#[into(domain::priced_item::Id)]
#[graphql(name = "PricedItemId", transparent)]
pub struct Id(Uuid);

#[cfg(test)]
mod spec {
    use service::domain;

    use super::Input;
    use crate::api;

    #[test]
    fn requires_exactly_one_reference() {
        let material = domain::material::Id::new();
        let part = domain::part::Id::new();
        let input = |m: Option<domain::material::Id>,
                     p: Option<domain::part::Id>| Input {
            material_id: m.map(api::material::Id::from),
            part_id: p.map(api::part::Id::from),
        };

        assert_eq!(
            domain::Item::try_from(input(Some(material), None)).ok(),
            Some(domain::Item::Material(material)),
        );
        assert_eq!(
            domain::Item::try_from(input(None, Some(part))).ok(),
            Some(domain::Item::Part(part)),
        );
        for invalid in [input(None, None), input(Some(material), Some(part))] {
            let err = domain::Item::try_from(invalid).unwrap_err();
            assert_eq!(err.code, "INVALID_ITEM");
        }
    }
}
