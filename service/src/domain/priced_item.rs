//! [`PricedItem`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf, Money, Quantity};
use derive_more::{Display, Error};
use rust_decimal::Decimal;

use crate::domain::Item;
#[cfg(doc)]
use crate::domain::{Material, Part};

/// Catalog price of an [`Item`].
///
/// Every [`Material`] and every [`Part`] has exactly one [`PricedItem`],
/// created along with it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PricedItem {
    /// ID of this [`PricedItem`].
    pub id: Id,

    /// [`Item`] being priced.
    pub item: Item,

    /// Price of a single unit of the [`Item`], if known.
    pub unit_price: Option<Money>,

    /// [`DateTime`] when the price was last changed.
    pub updated_at: ModificationDateTime,
}

impl PricedItem {
    /// Creates a new unpriced [`PricedItem`] for the provided [`Item`].
    #[must_use]
    pub fn unpriced(item: impl Into<Item>) -> Self {
        Self {
            id: Id::new(),
            item: item.into(),
            unit_price: None,
            updated_at: ModificationDateTime::now(),
        }
    }
}

define_id! {
    #[doc = "ID of a [`PricedItem`]."]
    pub struct Id;
}

/// [`DateTime`] when a [`PricedItem`] was modified.
pub type ModificationDateTime = DateTimeOf<(PricedItem, unit::Modification)>;

/// Price rolled up from the prices of constituents.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Rollup<Missing> {
    /// Exact weighted sum of the constituents' prices.
    ///
    /// [`None`] whenever any constituent has no price.
    pub total: Option<Decimal>,

    /// Constituents having no price.
    pub unpriced: Vec<Missing>,
}

impl<Missing> Rollup<Missing> {
    /// Rolls up the provided `(constituent, quantity, unit price)` triples.
    ///
    /// # Errors
    ///
    /// With [`TooLarge`] if the weighted sum overflows.
    pub fn compute<I>(constituents: I) -> Result<Self, TooLarge>
    where
        I: IntoIterator<Item = (Missing, Quantity, Option<Decimal>)>,
    {
        let mut sum = Decimal::ZERO;
        let mut unpriced = Vec::new();
        for (constituent, quantity, price) in constituents {
            match price {
                Some(price) => {
                    sum = quantity
                        .value()
                        .checked_mul(price)
                        .and_then(|p| sum.checked_add(p))
                        .ok_or(TooLarge)?;
                }
                None => unpriced.push(constituent),
            }
        }
        Ok(Self {
            total: unpriced.is_empty().then_some(sum),
            unpriced,
        })
    }
}

/// Error of a [`Rollup`] not fitting into a [`Decimal`].
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
#[display("Rolled up price is too large")]
pub struct TooLarge;
