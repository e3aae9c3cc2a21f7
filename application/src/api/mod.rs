//! GraphQL API definitions.

pub mod item;
pub mod machine;
pub mod material;
mod mutation;
pub mod part;
pub mod purchase_order;
mod query;
pub mod request_for_quotation;
pub mod scalar;
pub mod supplier;

use juniper::{EmptySubscription, GraphQLEnum};
use service::domain;

use crate::{define_error, AsError, Context, Error};

pub use self::{
    item::{CatalogItem, PricedItem},
    machine::Machine,
    material::Material,
    mutation::Mutation,
    part::Part,
    purchase_order::{Payment, PurchaseOrder},
    query::Query,
    request_for_quotation::RequestForQuotation,
    supplier::Supplier,
};

/// GraphQL schema.
pub type Schema =
    juniper::RootNode<'static, Query, Mutation, EmptySubscription<Context>>;

/// Creates a new [`Schema`].
#[must_use]
pub fn schema() -> Schema {
    Schema::new(Query, Mutation, EmptySubscription::new())
}

/// Kind of a `CatalogItem`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "CatalogItemKind")]
pub enum ItemKind {
    /// A `Material`.
    Material,

    /// A `Part`.
    Part,
}

impl From<domain::item::Kind> for ItemKind {
    fn from(kind: domain::item::Kind) -> Self {
        use domain::item::Kind as K;
        match kind {
            K::Material => Self::Material,
            K::Part => Self::Part,
        }
    }
}

impl From<ItemKind> for domain::item::Kind {
    fn from(kind: ItemKind) -> Self {
        match kind {
            ItemKind::Material => Self::Material,
            ItemKind::Part => Self::Part,
        }
    }
}

define_error! {
    enum NotExistsError {
        #[code = "MATERIAL_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Material` does not exist"]
        Material,

        #[code = "SUPPLIER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Supplier` does not exist"]
        Supplier,

        #[code = "PART_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Part` does not exist"]
        Part,

        #[code = "MACHINE_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Machine` does not exist"]
        Machine,

        #[code = "PURCHASE_ORDER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`PurchaseOrder` does not exist"]
        PurchaseOrder,

        #[code = "REQUEST_FOR_QUOTATION_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`RequestForQuotation` does not exist"]
        RequestForQuotation,

        #[code = "PRICED_ITEM_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`PricedItem` does not exist"]
        PricedItem,
    }
}

define_error! {
    enum InputError {
        #[code = "DUPLICATE_ITEM"]
        #[status = BAD_REQUEST]
        #[message = "The same item is listed more than once"]
        DuplicateItem,

        #[code = "NO_ITEMS"]
        #[status = BAD_REQUEST]
        #[message = "At least one item must be listed"]
        NoItems,

        #[code = "INVALID_ITEM"]
        #[status = BAD_REQUEST]
        #[message = "Exactly one of `materialId` and `partId` must be \
                     provided"]
        InvalidItem,
    }
}

define_error! {
    enum AmountError {
        #[code = "AMOUNT_TOO_LARGE"]
        #[status = UNPROCESSABLE_ENTITY]
        #[message = "Amount is too large to be computed"]
        TooLarge,
    }
}

impl AsError for service::query::priced_item::PricingError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::TooLarge(_) => Some(AmountError::TooLarge.into()),
        }
    }
}
