//! [`PurchaseOrder`]-related definitions.

use std::collections::HashSet;

use common::{DateTime, Money, Quantity};
use derive_more::{AsRef, Display, From, Into};
use juniper::{
    graphql_object, GraphQLEnum, GraphQLInputObject, GraphQLScalar,
};
use service::{command, domain};
use uuid::Uuid;

use crate::{api, api::scalar, Context, Error};

/// A purchase order.
#[derive(Clone, Debug, From, Into)]
pub struct PurchaseOrder(domain::PurchaseOrder);

/// Order of `Material`s placed with a single `Supplier`.
#[graphql_object(context = Context)]
impl PurchaseOrder {
    /// Unique identifier of this `PurchaseOrder`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// `Supplier` this `PurchaseOrder` is placed with.
    ///
    /// May be a deleted one.
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

    /// `DateTime` when this `PurchaseOrder` was placed.
    #[must_use]
    pub fn ordered_at(&self) -> DateTime {
        self.0.ordered_at.coerce()
    }

    /// `DateTime` when this `PurchaseOrder` was delivered, if it was.
    #[must_use]
    pub fn delivered_at(&self) -> Option<DateTime> {
        self.0.delivery.as_ref().map(|d| d.delivered_at.coerce())
    }

    /// Note about the delivery of this `PurchaseOrder`.
    #[must_use]
    pub fn delivery_note(&self) -> Option<Note> {
        self.0
            .delivery
            .as_ref()
            .and_then(|d| d.note.clone())
            .map(Into::into)
    }

    /// Indicator whether this `PurchaseOrder` is delivered.
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        self.0.is_delivered()
    }

    /// Free-form note about this `PurchaseOrder`.
    #[must_use]
    pub fn note(&self) -> Option<Note> {
        self.0.note.clone().map(Into::into)
    }

    /// Status of this `PurchaseOrder`.
    #[must_use]
    pub fn status(&self) -> Status {
        self.0.status.into()
    }

    /// Ordered `Material`s.
    #[must_use]
    pub fn materials(&self) -> Vec<LineItem> {
        self.0.materials.iter().copied().map(LineItem).collect()
    }

    /// Total amount of this `PurchaseOrder`, fixed when it was placed.
    #[must_use]
    pub fn total_amount(&self) -> Money {
        self.0.total_amount
    }

    /// Sum of all the `Payment`s made for this `PurchaseOrder`.
    #[must_use]
    pub fn paid_amount(&self) -> Money {
        self.0.paid_amount
    }

    /// Paid amount minus the total amount of this `PurchaseOrder`.
    ///
    /// Negative while something is left to pay.
    #[must_use]
    pub fn balance(&self) -> scalar::Decimal {
        self.0.balance().amount().into()
    }

    /// Amount left to pay for this `PurchaseOrder`.
    #[must_use]
    pub fn remaining(&self) -> Money {
        self.0.balance().remaining()
    }

    /// Payment status of this `PurchaseOrder`.
    #[must_use]
    pub fn payment_status(&self) -> PaymentStatus {
        self.0.balance().status().into()
    }

    /// `Payment`s made for this `PurchaseOrder`, ordered by their payment
    /// dates.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "PurchaseOrder.payments",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn payments(&self, ctx: &Context) -> Result<Vec<Payment>, Error> {
        Ok(ctx
            .payments(self.0.id)
            .await?
            .into_iter()
            .map(Payment)
            .collect())
    }

    /// `DateTime` when this `PurchaseOrder` was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// `Material` ordered in a `PurchaseOrder`.
#[derive(Clone, Copy, Debug)]
pub struct LineItem(domain::purchase_order::LineItem);

/// `Material` ordered in a `PurchaseOrder`.
#[graphql_object(name = "PurchaseOrderLineItem", context = Context)]
impl LineItem {
    /// Ordered `Material`.
    #[must_use]
    pub fn material(&self) -> api::Material {
        #[expect(
            unsafe_code,
            reason = "ordered `Material`s can't be deleted"
        )]
        unsafe {
            api::Material::new_unchecked(self.0.material_id)
        }
    }

    /// Ordered quantity.
    #[must_use]
    pub fn quantity(&self) -> Quantity {
        self.0.quantity
    }

    /// Price of a single unit of the `Material`.
    #[must_use]
    pub fn unit_price(&self) -> Money {
        self.0.unit_price
    }

    /// Exact quantity times unit price, not rounded.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMOUNT_TOO_LARGE` - the subtotal is too large to be computed.
    pub fn subtotal(&self, ctx: &Context) -> Result<scalar::Decimal, Error> {
        self.0
            .subtotal()
            .map(Into::into)
            .ok_or_else(|| api::AmountError::TooLarge.into())
            .map_err(ctx.error())
    }
}

/// A payment.
#[derive(Clone, Debug, From, Into)]
pub struct Payment(domain::Payment);

/// Payment made for a `PurchaseOrder`.
#[graphql_object(context = Context)]
impl Payment {
    /// Unique identifier of this `Payment`.
    #[must_use]
    pub fn id(&self) -> PaymentId {
        self.0.id.into()
    }

    /// Method of this `Payment`.
    #[must_use]
    pub fn method(&self) -> PaymentMethod {
        self.0.method.into()
    }

    /// Paid amount.
    #[must_use]
    pub fn amount(&self) -> Money {
        self.0.amount
    }

    /// `DateTime` when this `Payment` was made.
    #[must_use]
    pub fn paid_at(&self) -> DateTime {
        self.0.paid_at.coerce()
    }

    /// Free-form notes about this `Payment`.
    #[must_use]
    pub fn notes(&self) -> Option<PaymentNotes> {
        self.0.notes.clone().map(Into::into)
    }

    /// `DateTime` when this `Payment` was registered.
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// New `PurchaseOrder` to place.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "CreatePurchaseOrderInput")]
pub struct CreateInput {
    /// ID of the `Supplier` to place the `PurchaseOrder` with.
    pub supplier_id: api::supplier::Id,

    /// `DateTime` when the `PurchaseOrder` is placed.
    pub ordered_at: DateTime,

    /// Free-form note about the `PurchaseOrder`.
    pub note: Option<Note>,

    /// `Material`s to order.
    pub materials: Vec<LineItemInput>,

    /// ID of the answered `RequestForQuotation` to take the omitted unit
    /// prices from.
    pub request_for_quotation_id: Option<api::request_for_quotation::Id>,

    /// Delivery details, if the `Material`s are delivered already.
    pub delivery: Option<DeliveryInput>,

    /// Whether the stock of the delivered `Material`s should be increased.
    ///
    /// `false` by default. Ignored without a `delivery`.
    pub update_stock: Option<bool>,

    /// `Payment`s made already.
    pub payments: Option<Vec<PaymentInput>>,
}

impl TryFrom<CreateInput> for command::CreatePurchaseOrder {
    type Error = Error;

    fn try_from(input: CreateInput) -> Result<Self, Self::Error> {
        Ok(Self {
            supplier_id: input.supplier_id.into(),
            ordered_at: input.ordered_at.coerce(),
            note: input.note.map(Into::into),
            materials: line_items(input.materials)?,
            request_for_quotation_id: input
                .request_for_quotation_id
                .map(Into::into),
            delivery: input.delivery.map(Into::into),
            update_stock: input.update_stock.unwrap_or_default(),
            payments: input
                .payments
                .unwrap_or_default()
                .into_iter()
                .map(Into::into)
                .collect(),
        })
    }
}

/// Delivery of an existing `PurchaseOrder`.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "PurchaseOrderDeliveredInput")]
pub struct DeliveredInput {
    /// ID of the delivered `PurchaseOrder`.
    pub purchase_order_id: Id,

    /// Delivery details.
    pub delivery: DeliveryInput,

    /// Whether the stock of the delivered `Material`s should be increased.
    ///
    /// `false` by default.
    pub update_stock: Option<bool>,
}

impl From<DeliveredInput> for command::MarkPurchaseOrderDelivered {
    fn from(input: DeliveredInput) -> Self {
        Self {
            purchase_order_id: input.purchase_order_id.into(),
            delivery: input.delivery.into(),
            update_stock: input.update_stock.unwrap_or_default(),
        }
    }
}

/// `Material` to order in a new `PurchaseOrder`.
#[derive(Clone, Copy, Debug, GraphQLInputObject)]
#[graphql(name = "PurchaseOrderLineItemInput")]
pub struct LineItemInput {
    /// ID of the `Material` to order.
    pub material_id: api::material::Id,

    /// Quantity to order.
    pub quantity: Quantity,

    /// Price of a single unit of the `Material`.
    ///
    /// Taken from the answered `RequestForQuotation`, if omitted.
    pub unit_price: Option<Money>,
}

/// `Payment` already made for a new `PurchaseOrder`.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "PaymentInput")]
pub struct PaymentInput {
    /// Method of the `Payment`.
    pub method: PaymentMethod,

    /// Paid amount.
    pub amount: Money,

    /// `DateTime` when the `Payment` was made.
    pub paid_at: DateTime,

    /// Free-form notes about the `Payment`.
    pub notes: Option<PaymentNotes>,
}

impl From<PaymentInput> for command::create_purchase_order::PaymentDraft {
    fn from(input: PaymentInput) -> Self {
        Self {
            method: input.method.into(),
            amount: input.amount,
            paid_at: input.paid_at.coerce(),
            notes: input.notes.map(Into::into),
        }
    }
}

/// Delivery details of a `PurchaseOrder`.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "PurchaseOrderDeliveryInput")]
pub struct DeliveryInput {
    /// `DateTime` when the `PurchaseOrder` was delivered.
    pub delivered_at: DateTime,

    /// Note about the delivery, like a delivery note number.
    pub note: Option<Note>,
}

impl From<DeliveryInput> for domain::purchase_order::Delivery {
    fn from(input: DeliveryInput) -> Self {
        Self {
            delivered_at: input.delivered_at.coerce(),
            note: input.note.map(Into::into),
        }
    }
}

/// Converts the provided [`LineItemInput`]s into
/// [`command::create_purchase_order::LineItemDraft`]s.
///
/// # Errors
///
/// With `NO_ITEMS` or `DUPLICATE_ITEM` code if the list is empty or lists a
/// `Material` twice.
pub(crate) fn line_items(
    inputs: Vec<LineItemInput>,
) -> Result<Vec<command::create_purchase_order::LineItemDraft>, Error> {
    if inputs.is_empty() {
        return Err(api::InputError::NoItems.into());
    }
    let mut seen = HashSet::with_capacity(inputs.len());
    if !inputs.iter().all(|i| seen.insert(i.material_id)) {
        return Err(api::InputError::DuplicateItem.into());
    }
    Ok(inputs
        .into_iter()
        .map(|i| command::create_purchase_order::LineItemDraft {
            material_id: i.material_id.into(),
            quantity: i.quantity,
            unit_price: i.unit_price,
        })
        .collect())
}

/// Status of a `PurchaseOrder`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "PurchaseOrderStatus")]
pub enum Status {
    /// Placed and not cancelled.
    Active,

    /// Cancelled before any payment.
    Cancelled,
}

impl From<domain::purchase_order::Status> for Status {
    fn from(status: domain::purchase_order::Status) -> Self {
        use domain::purchase_order::Status as S;
        match status {
            S::Active => Self::Active,
            S::Cancelled => Self::Cancelled,
        }
    }
}

impl From<Status> for domain::purchase_order::Status {
    fn from(status: Status) -> Self {
        match status {
            Status::Active => Self::Active,
            Status::Cancelled => Self::Cancelled,
        }
    }
}

/// Payment status of a `PurchaseOrder`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
pub enum PaymentStatus {
    /// Everything is paid.
    FullyPaid,

    /// Nothing is paid yet.
    Unpaid,

    /// Something is paid, but not everything.
    PartiallyPaid,
}

impl From<domain::purchase_order::PaymentStatus> for PaymentStatus {
    fn from(status: domain::purchase_order::PaymentStatus) -> Self {
        use domain::purchase_order::PaymentStatus as S;
        match status {
            S::FullyPaid => Self::FullyPaid,
            S::Unpaid => Self::Unpaid,
            S::PartiallyPaid => Self::PartiallyPaid,
        }
    }
}

/// Method a `Payment` is made with.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
pub enum PaymentMethod {
    /// Cash.
    Cash,

    /// Bank transfer.
    Transfer,

    /// Paper check.
    Check,

    /// Electronic check.
    #[graphql(name = "E_CHECK")]
    ECheck,

    /// Running account with the `Supplier`.
    RunningAccount,
}

impl From<domain::purchase_order::payment::Method> for PaymentMethod {
    fn from(method: domain::purchase_order::payment::Method) -> Self {
        use domain::purchase_order::payment::Method as M;
        match method {
            M::Cash => Self::Cash,
            M::Transfer => Self::Transfer,
            M::Check => Self::Check,
            M::ECheck => Self::ECheck,
            M::RunningAccount => Self::RunningAccount,
        }
    }
}

impl From<PaymentMethod> for domain::purchase_order::payment::Method {
    fn from(method: PaymentMethod) -> Self {
        match method {
            PaymentMethod::Cash => Self::Cash,
            PaymentMethod::Transfer => Self::Transfer,
            PaymentMethod::Check => Self::Check,
            PaymentMethod::ECheck => Self::ECheck,
            PaymentMethod::RunningAccount => Self::RunningAccount,
        }
    }
}

/// Unique identifier of a `PurchaseOrder`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::purchase_order::Id)]
#[into(domain::purchase_order::Id)]
#[graphql(name = "PurchaseOrderId", transparent)]
pub struct Id(Uuid);

/// Free-form note about a `PurchaseOrder` or its delivery.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "PurchaseOrderNote",
    with = scalar::Via::<domain::purchase_order::Note>,
)]
pub struct Note(domain::purchase_order::Note);

/// Unique identifier of a `Payment`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::purchase_order::payment::Id)]
#[into(domain::purchase_order::payment::Id)]
#[graphql(name = "PaymentId", transparent)]
pub struct PaymentId(Uuid);

/// Free-form notes about a `Payment`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "PaymentNotes",
    with = scalar::Via::<domain::purchase_order::payment::Notes>,
)]
pub struct PaymentNotes(domain::purchase_order::payment::Notes);

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::{Money, Quantity};
    use service::domain;

    use super::{line_items, LineItemInput};

    fn input(id: domain::material::Id, price: Option<&str>) -> LineItemInput {
        LineItemInput {
            material_id: id.into(),
            quantity: Quantity::from_str("2").unwrap(),
            unit_price: price.map(|p| Money::from_str(p).unwrap()),
        }
    }

    #[test]
    fn keeps_missing_prices_for_quotation() {
        let a = domain::material::Id::new();
        let b = domain::material::Id::new();

        let drafts =
            line_items(vec![input(a, Some("1.50")), input(b, None)]).unwrap();

        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].unit_price, Some(Money::from_str("1.5").unwrap()));
        assert_eq!(drafts[1].unit_price, None);
    }

    #[test]
    fn rejects_empty_and_duplicate_line_items() {
        let a = domain::material::Id::new();

        assert_eq!(line_items(vec![]).unwrap_err().code, "NO_ITEMS");
        assert_eq!(
            line_items(vec![input(a, None), input(a, Some("1"))])
                .unwrap_err()
                .code,
            "DUPLICATE_ITEM",
        );
    }
}
