//! [`Payment`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Money};

use crate::domain::purchase_order;
#[cfg(doc)]
use crate::domain::PurchaseOrder;

/// Payment made for a [`PurchaseOrder`].
///
/// Append-only: never edited nor deleted once registered.
#[derive(Clone, Debug)]
pub struct Payment {
    /// ID of this [`Payment`].
    pub id: Id,

    /// ID of the [`PurchaseOrder`] this [`Payment`] is made for.
    pub purchase_order_id: purchase_order::Id,

    /// [`Method`] of this [`Payment`].
    pub method: Method,

    /// Paid amount, always positive.
    pub amount: Money,

    /// [`DateTime`] when this [`Payment`] was made.
    pub paid_at: PaymentDateTime,

    /// Free-form [`Notes`] about this [`Payment`].
    pub notes: Option<Notes>,

    /// [`DateTime`] when this [`Payment`] was registered.
    pub created_at: CreationDateTime,
}

define_id! {
    #[doc = "ID of a [`Payment`]."]
    pub struct Id;
}

define_text! {
    #[doc = "Free-form notes about a [`Payment`]."]
    pub struct Notes(max_len = 2048);
}

define_kind! {
    #[doc = "Method a [`Payment`] is made with."]
    enum Method {
        #[doc = "Cash."]
        Cash = 1,

        #[doc = "Bank transfer."]
        Transfer = 2,

        #[doc = "Paper check."]
        Check = 3,

        #[doc = "Electronic check."]
        ECheck = 4,

        #[doc = "Running account with the supplier."]
        RunningAccount = 5,
    }
}

/// [`DateTime`] when a [`Payment`] was made.
pub type PaymentDateTime = DateTimeOf<(Payment, unit::Payment)>;

/// [`DateTime`] when a [`Payment`] was registered.
pub type CreationDateTime = DateTimeOf<(Payment, unit::Creation)>;
