//! [`RequestForQuotation`]-related definitions.

use std::collections::HashSet;

use common::{DateTime, Money, Quantity};
use derive_more::{AsRef, Display, From, Into};
use juniper::{
    graphql_object, GraphQLEnum, GraphQLInputObject, GraphQLScalar,
};
use service::{command, domain};
use uuid::Uuid;

use crate::{api, api::scalar, Context, Error};

/// A request for quotation.
#[derive(Clone, Debug, From, Into)]
pub struct RequestForQuotation(domain::RequestForQuotation);

/// List of `Material`s a `Supplier` is asked to quote prices for.
#[graphql_object(context = Context)]
impl RequestForQuotation {
    /// Unique identifier of this `RequestForQuotation`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// `Supplier` this `RequestForQuotation` is sent to.
    #[must_use]
    pub fn supplier(&self) -> api::Supplier {
        #[expect(
            unsafe_code,
            reason = "`Supplier`s are soft-deleted, so always exist"
        )]
        unsafe {
            api::Supplier::new_unchecked(self.0.supplier_id)
        }
    }

    /// `DateTime` when this `RequestForQuotation` was sent.
    #[must_use]
    pub fn requested_at(&self) -> DateTime {
        self.0.requested_at.coerce()
    }

    /// Status of this `RequestForQuotation`.
    #[must_use]
    pub fn status(&self) -> Status {
        self.0.status.into()
    }

    /// Free-form note about this `RequestForQuotation`.
    #[must_use]
    pub fn note(&self) -> Option<Note> {
        self.0.note.clone().map(Into::into)
    }

    /// Requested `Material`s.
    #[must_use]
    pub fn materials(&self) -> Vec<Item> {
        self.0.materials.iter().copied().map(Item).collect()
    }

    /// `DateTime` when this `RequestForQuotation` was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// `Material` requested in a `RequestForQuotation`.
#[derive(Clone, Copy, Debug)]
pub struct Item(domain::request_for_quotation::Item);

/// `Material` requested in a `RequestForQuotation`.
#[graphql_object(name = "RequestForQuotationItem", context = Context)]
impl Item {
    /// Requested `Material`.
    #[must_use]
    pub fn material(&self) -> api::Material {
        #[expect(
            unsafe_code,
            reason = "requested `Material`s can't be deleted"
        )]
        unsafe {
            api::Material::new_unchecked(self.0.material_id)
        }
    }

    /// Requested quantity.
    #[must_use]
    pub fn quantity(&self) -> Quantity {
        self.0.quantity
    }

    /// Quoted price of a single unit, once answered.
    #[must_use]
    pub fn unit_price(&self) -> Option<Money> {
        self.0.unit_price
    }
}

/// New `RequestForQuotation` to send.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "CreateRequestForQuotationInput")]
pub struct CreateInput {
    /// ID of the `Supplier` to send the `RequestForQuotation` to.
    pub supplier_id: api::supplier::Id,

    /// `DateTime` when the `RequestForQuotation` is sent.
    pub requested_at: DateTime,

    /// Free-form note about the `RequestForQuotation`.
    pub note: Option<Note>,

    /// `Material`s to quote.
    pub materials: Vec<ItemInput>,
}

impl TryFrom<CreateInput> for command::CreateRequestForQuotation {
    type Error = Error;

    fn try_from(input: CreateInput) -> Result<Self, Self::Error> {
        Ok(Self {
            supplier_id: input.supplier_id.into(),
            requested_at: input.requested_at.coerce(),
            note: input.note.map(Into::into),
            materials: items(input.materials)?,
        })
    }
}

/// `Material` to request in a new `RequestForQuotation`.
#[derive(Clone, Copy, Debug, GraphQLInputObject)]
#[graphql(name = "RequestForQuotationItemInput")]
pub struct ItemInput {
    /// ID of the requested `Material`.
    pub material_id: api::material::Id,

    /// Requested quantity.
    pub quantity: Quantity,
}

/// Price quoted by a `Supplier` for a requested `Material`.
#[derive(Clone, Copy, Debug, GraphQLInputObject)]
#[graphql(name = "QuotedPriceInput")]
pub struct QuotedPriceInput {
    /// ID of the quoted `Material`.
    pub material_id: api::material::Id,

    /// Quoted price of a single unit.
    pub unit_price: Money,
}

/// Converts the provided [`ItemInput`]s into the requested `Material`s.
///
/// # Errors
///
/// With `NO_ITEMS` or `DUPLICATE_ITEM` code if the list is empty or lists a
/// `Material` twice.
pub(crate) fn items(
    inputs: Vec<ItemInput>,
) -> Result<Vec<(domain::material::Id, Quantity)>, Error> {
    if inputs.is_empty() {
        return Err(api::InputError::NoItems.into());
    }
    let mut seen = HashSet::with_capacity(inputs.len());
    if !inputs.iter().all(|i| seen.insert(i.material_id)) {
        return Err(api::InputError::DuplicateItem.into());
    }
    Ok(inputs
        .into_iter()
        .map(|i| (i.material_id.into(), i.quantity))
        .collect())
}

/// Status of a `RequestForQuotation`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "RequestForQuotationStatus")]
pub enum Status {
    /// Sent to the `Supplier` and waiting for an answer.
    Submitted,

    /// Answered by the `Supplier` with quoted prices.
    Answered,

    /// Left unanswered by the `Supplier`.
    Unanswered,
}

impl From<domain::request_for_quotation::Status> for Status {
    fn from(status: domain::request_for_quotation::Status) -> Self {
        use domain::request_for_quotation::Status as S;
        match status {
            S::Submitted => Self::Submitted,
            S::Answered => Self::Answered,
            S::Unanswered => Self::Unanswered,
        }
    }
}

impl From<Status> for domain::request_for_quotation::Status {
    fn from(status: Status) -> Self {
        match status {
            Status::Submitted => Self::Submitted,
            Status::Answered => Self::Answered,
            Status::Unanswered => Self::Unanswered,
        }
    }
}

/// Unique identifier of a `RequestForQuotation`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::request_for_quotation::Id)]
#[into(domain::request_for_quotation::Id)]
#[graphql(name = "RequestForQuotationId", transparent)]
pub struct Id(Uuid);

/// Free-form note about a `RequestForQuotation`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "RequestForQuotationNote",
    with = scalar::Via::<domain::request_for_quotation::Note>,
)]
pub struct Note(domain::request_for_quotation::Note);
