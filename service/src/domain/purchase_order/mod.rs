//! [`PurchaseOrder`] definitions.

pub mod payment;

use std::collections::HashSet;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Money, Quantity};
use derive_more::Deref;
use rust_decimal::Decimal;

use crate::domain::{material, supplier};
#[cfg(doc)]
use crate::domain::{Material, Supplier};

pub use self::payment::Payment;

/// Order of [`Material`]s placed with a single [`Supplier`].
#[derive(Clone, Debug)]
pub struct PurchaseOrder {
    /// ID of this [`PurchaseOrder`].
    pub id: Id,

    /// ID of the [`Supplier`] this [`PurchaseOrder`] is placed with.
    pub supplier_id: supplier::Id,

    /// [`DateTime`] when this [`PurchaseOrder`] was placed.
    pub ordered_at: OrderDateTime,

    /// [`Delivery`] of this [`PurchaseOrder`], if it was delivered.
    pub delivery: Option<Delivery>,

    /// Free-form [`Note`] about this [`PurchaseOrder`].
    pub note: Option<Note>,

    /// [`Status`] of this [`PurchaseOrder`].
    pub status: Status,

    /// [`LineItem`]s of this [`PurchaseOrder`].
    pub materials: LineItems,

    /// Total amount of this [`PurchaseOrder`].
    ///
    /// Computed once on creation by [`total_amount()`] and never recomputed,
    /// so later price changes don't affect placed orders.
    pub total_amount: Money,

    /// Sum of all the [`Payment`]s registered for this [`PurchaseOrder`].
    pub paid_amount: Money,

    /// [`DateTime`] when this [`PurchaseOrder`] was created.
    pub created_at: CreationDateTime,
}

impl PurchaseOrder {
    /// Returns the [`Balance`] of this [`PurchaseOrder`].
    #[must_use]
    pub fn balance(&self) -> Balance {
        Balance {
            total_amount: self.total_amount,
            total_paid: self.paid_amount,
        }
    }

    /// Indicates whether this [`PurchaseOrder`] is cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.status == Status::Cancelled
    }

    /// Indicates whether this [`PurchaseOrder`] is delivered.
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        self.delivery.is_some()
    }
}

/// Computes the total amount of the provided [`LineItem`]s.
///
/// The exact sum is rounded to cents once, not per [`LineItem`]. Returns
/// [`None`] if the sum doesn't fit into [`Money`].
#[must_use]
pub fn total_amount(items: &[LineItem]) -> Option<Money> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |sum, i| sum.checked_add(i.subtotal()?))
        .map(Money::round_to_cents)
}

/// Computes the total paid amount of the provided [`Payment`]s.
///
/// Returns [`None`] if the sum doesn't fit into [`Money`].
#[must_use]
pub fn total_paid(payments: &[Payment]) -> Option<Money> {
    Money::checked_sum(payments.iter().map(|p| p.amount)).map(Money::to_cents)
}

/// [`Material`] ordered in a [`PurchaseOrder`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LineItem {
    /// ID of the ordered [`Material`].
    pub material_id: material::Id,

    /// Ordered [`Quantity`].
    pub quantity: Quantity,

    /// Price of a single unit of the [`Material`].
    pub unit_price: Money,
}

impl LineItem {
    /// Returns the exact (unrounded) subtotal of this [`LineItem`], or
    /// [`None`] if it overflows.
    #[must_use]
    pub fn subtotal(&self) -> Option<Decimal> {
        self.quantity.value().checked_mul(self.unit_price.amount())
    }
}

/// Non-empty list of [`LineItem`]s with no [`Material`] repeated.
#[derive(Clone, Debug, Deref, Eq, PartialEq)]
#[deref(forward)]
pub struct LineItems(Vec<LineItem>);

impl LineItems {
    /// Creates new [`LineItems`], if the list is non-empty and mentions each
    /// [`Material`] at most once.
    #[must_use]
    pub fn new(items: Vec<LineItem>) -> Option<Self> {
        let mut seen = HashSet::with_capacity(items.len());
        (!items.is_empty() && items.iter().all(|i| seen.insert(i.material_id)))
            .then_some(Self(items))
    }
}

/// Paid-versus-owed state of a [`PurchaseOrder`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Balance {
    /// Total amount of the [`PurchaseOrder`].
    pub total_amount: Money,

    /// Amount paid so far.
    pub total_paid: Money,
}

impl Balance {
    /// Returns the signed balance: what's paid minus what's owed.
    ///
    /// Never positive for a consistent [`PurchaseOrder`].
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.total_paid.amount() - self.total_amount.amount()
    }

    /// Returns the amount left to pay.
    #[must_use]
    pub fn remaining(&self) -> Money {
        self.total_amount
            .checked_sub(self.total_paid)
            .unwrap_or(Money::ZERO)
    }

    /// Classifies this [`Balance`].
    #[must_use]
    pub fn status(&self) -> PaymentStatus {
        if self.total_paid == self.total_amount {
            PaymentStatus::FullyPaid
        } else if self.total_paid.is_zero() {
            PaymentStatus::Unpaid
        } else {
            PaymentStatus::PartiallyPaid
        }
    }

    /// Indicates whether a new [`Payment`] of the provided `amount` keeps the
    /// total paid within the total amount.
    #[must_use]
    pub fn accepts(&self, amount: Money) -> bool {
        self.with_payment(amount).is_some()
    }

    /// Returns this [`Balance`] after a [`Payment`] of the provided `amount`,
    /// or [`None`] if the total paid would exceed the total amount.
    ///
    /// The exact sum is compared, so the `amount` is expected to have no
    /// fractions of a cent (see [`Money::is_cents()`]).
    #[must_use]
    pub fn with_payment(self, amount: Money) -> Option<Self> {
        let total_paid = self
            .total_paid
            .checked_add(amount)
            .filter(|paid| *paid <= self.total_amount)?;
        Some(Self {
            total_amount: self.total_amount,
            total_paid: total_paid.to_cents(),
        })
    }
}

/// Payment status of a [`PurchaseOrder`], derived from its [`Balance`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PaymentStatus {
    /// Everything is paid.
    FullyPaid,

    /// Nothing is paid yet.
    Unpaid,

    /// Something is paid, but not everything.
    PartiallyPaid,
}

/// Delivery details of a [`PurchaseOrder`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Delivery {
    /// [`DateTime`] when the [`PurchaseOrder`] was delivered.
    pub delivered_at: DeliveryDateTime,

    /// Free-form [`Note`] about the delivery, like a delivery note number.
    pub note: Option<Note>,
}

define_id! {
    #[doc = "ID of a [`PurchaseOrder`]."]
    pub struct Id;
}

define_text! {
    #[doc = "Free-form note about a [`PurchaseOrder`] or its [`Delivery`]."]
    pub struct Note(max_len = 2048);
}

define_kind! {
    #[doc = "Status of a [`PurchaseOrder`]."]
    enum Status {
        #[doc = "Placed and not cancelled."]
        Active = 1,

        #[doc = "Cancelled before any payment."]
        Cancelled = 2,
    }
}

/// [`DateTime`] when a [`PurchaseOrder`] was placed.
pub type OrderDateTime = DateTimeOf<(PurchaseOrder, unit::Placement)>;

/// [`DateTime`] when a [`PurchaseOrder`] was delivered.
pub type DeliveryDateTime = DateTimeOf<(PurchaseOrder, unit::Delivery)>;

/// [`DateTime`] when a [`PurchaseOrder`] was created.
pub type CreationDateTime = DateTimeOf<(PurchaseOrder, unit::Creation)>;

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::{DateTime, Money, Quantity};
    use rust_decimal::Decimal;

    use super::{
        payment, total_amount, total_paid, Balance, LineItem, LineItems,
        Payment, PaymentStatus,
    };
    use crate::domain::{material, purchase_order};

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    fn item(quantity: &str, unit_price: &str) -> LineItem {
        LineItem {
            material_id: material::Id::new(),
            quantity: Quantity::from_str(quantity).unwrap(),
            unit_price: money(unit_price),
        }
    }

    fn payment(amount: &str) -> Payment {
        Payment {
            id: payment::Id::new(),
            purchase_order_id: purchase_order::Id::new(),
            method: payment::Method::Cash,
            amount: money(amount),
            paid_at: DateTime::now().coerce(),
            notes: None,
            created_at: DateTime::now().coerce(),
        }
    }

    fn balance(total_amount: &str, total_paid: &str) -> Balance {
        Balance {
            total_amount: money(total_amount),
            total_paid: money(total_paid),
        }
    }

    #[test]
    fn total_amount_sums_line_items() {
        let total = total_amount(&[item("3", "10"), item("2", "5")]).unwrap();

        assert_eq!(total, money("40"));
        assert_eq!(total.to_string(), "40.00");
    }

    #[test]
    fn total_amount_rounds_final_sum_only() {
        let items =
            [item("1", "0.333"), item("1", "0.333"), item("1", "0.334")];
        assert_eq!(total_amount(&items), Some(money("1.00")));

        let items = [item("1", "0.005"), item("1", "0.005")];
        assert_eq!(total_amount(&items), Some(money("0.01")));

        assert_eq!(total_amount(&[item("3", "0.125")]), Some(money("0.38")));
    }

    #[test]
    fn total_amount_ignores_order() {
        let mut items =
            vec![item("1.5", "3.33"), item("7", "0.015"), item("2", "9.99")];
        let expected = total_amount(&items);

        items.reverse();
        assert_eq!(total_amount(&items), expected);
        items.swap(0, 1);
        assert_eq!(total_amount(&items), expected);
    }

    #[test]
    fn total_paid_of_nothing_is_zero() {
        assert_eq!(total_paid(&[]), Some(Money::ZERO));
        assert_eq!(
            total_paid(&[payment("10.10"), payment("29.90")]),
            Some(money("40")),
        );
    }

    #[test]
    fn overflowing_totals_are_none() {
        let max = "79228162514264337593543950335";

        assert_eq!(item(max, "2").subtotal(), None);
        assert_eq!(total_amount(&[item(max, "2")]), None);
        assert_eq!(total_amount(&[item(max, "1"), item("1", "1")]), None);
        assert_eq!(total_paid(&[payment(max), payment("1")]), None);
    }

    #[test]
    fn line_items_are_non_empty_and_distinct() {
        assert!(LineItems::new(vec![]).is_none());

        let a = item("1", "1");
        assert!(LineItems::new(vec![a, a]).is_none());
        assert!(LineItems::new(vec![a, item("1", "1")]).is_some());
    }

    #[test]
    fn classifies_balance() {
        assert_eq!(balance("40", "40").status(), PaymentStatus::FullyPaid);
        assert_eq!(balance("40", "0").status(), PaymentStatus::Unpaid);
        assert_eq!(
            balance("40", "0.01").status(),
            PaymentStatus::PartiallyPaid,
        );
        assert_eq!(balance("0", "0").status(), PaymentStatus::FullyPaid);

        assert_eq!(balance("40", "15").amount(), Decimal::from(-25));
        assert_eq!(balance("40", "15").remaining(), money("25"));
    }

    #[test]
    fn rejects_overdraw() {
        let b = balance("40", "0");
        assert!(b.accepts(money("40")));
        assert!(!b.accepts(money("40.01")));

        let b = b.with_payment(money("40")).unwrap();
        assert_eq!(b.status(), PaymentStatus::FullyPaid);
        assert!(!b.accepts(money("0.01")));
        assert_eq!(b.with_payment(money("0.01")), None);
    }

    #[test]
    fn compares_exact_sums() {
        let b = balance("40", "39.99");
        assert!(!b.accepts(money("0.011")));
        assert!(b.accepts(money("0.01")));

        let max = money("79228162514264337593543950335");
        assert!(!balance("40", "1").accepts(max));
        assert!(!balance("79228162514264337593543950335", "1").accepts(max));
    }
}
