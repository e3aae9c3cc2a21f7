//! [`Machine`] definitions.

use std::collections::HashSet;

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf, Money, Quantity};
use derive_more::Deref;
use rust_decimal::Decimal;

use crate::domain::{
    material, part,
    priced_item::{Rollup, TooLarge},
    Item,
};
#[cfg(doc)]
use crate::domain::{Material, Part};

/// Machine assembled from [`Material`]s and [`Part`]s.
#[derive(Clone, Debug)]
pub struct Machine {
    /// ID of this [`Machine`].
    pub id: Id,

    /// Unique [`Code`] of this [`Machine`].
    pub code: Code,

    /// [`Name`] of this [`Machine`].
    pub name: Name,

    /// [`Element`]s this [`Machine`] is assembled from.
    pub elements: Elements,

    /// [`DateTime`] when this [`Machine`] was created.
    pub created_at: CreationDateTime,
}

impl Machine {
    /// Rolls up the price of this [`Machine`].
    ///
    /// [`Material`] elements are priced by `material_price`, while [`Part`]
    /// elements are priced by `part_price` (usually a [`Part`]'s own
    /// rollup).
    ///
    /// # Errors
    ///
    /// With [`TooLarge`] if the total overflows.
    pub fn total_price(
        &self,
        material_price: impl Fn(material::Id) -> Option<Money>,
        part_price: impl Fn(part::Id) -> Option<Decimal>,
    ) -> Result<Rollup<Item>, TooLarge> {
        Rollup::compute(self.elements.iter().map(|e| {
            let price = match e.item {
                Item::Material(id) => material_price(id).map(Money::amount),
                Item::Part(id) => part_price(id),
            };
            (e.item, e.quantity, price)
        }))
    }
}

/// [`Item`] used in a [`Machine`], with its quantity.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Element {
    /// [`Item`] being used.
    pub item: Item,

    /// [`Quantity`] of the [`Item`] in the [`Machine`].
    pub quantity: Quantity,
}

/// Non-empty list of [`Element`]s with no [`Item`] repeated.
#[derive(Clone, Debug, Deref, Eq, PartialEq)]
#[deref(forward)]
pub struct Elements(Vec<Element>);

impl Elements {
    /// Creates new [`Elements`], if the list is non-empty and mentions each
    /// [`Item`] at most once.
    #[must_use]
    pub fn new(elements: Vec<Element>) -> Option<Self> {
        let mut seen = HashSet::with_capacity(elements.len());
        (!elements.is_empty() && elements.iter().all(|e| seen.insert(e.item)))
            .then_some(Self(elements))
    }
}

define_id! {
    #[doc = "ID of a [`Machine`]."]
    pub struct Id;
}

define_text! {
    #[doc = "Unique code of a [`Machine`]."]
    pub struct Code(
        max_len = 32,
        check = |s: &str| s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')),
    );
}

define_text! {
    #[doc = "Name of a [`Machine`]."]
    pub struct Name(max_len = 256);
}

/// [`DateTime`] when a [`Machine`] was created.
pub type CreationDateTime = DateTimeOf<(Machine, unit::Creation)>;

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::{DateTime, Money, Quantity};
    use rust_decimal::Decimal;

    use super::{Code, Element, Elements, Id, Machine, Name};
    use crate::domain::{material, part, priced_item::TooLarge, Item};

    fn element(item: impl Into<Item>, quantity: &str) -> Element {
        Element {
            item: item.into(),
            quantity: Quantity::from_str(quantity).unwrap(),
        }
    }

    fn machine(elements: Vec<Element>) -> Machine {
        Machine {
            id: Id::new(),
            code: Code::new("PRESS-1").unwrap(),
            name: Name::new("Press").unwrap(),
            elements: Elements::new(elements).unwrap(),
            created_at: DateTime::now().coerce(),
        }
    }

    #[test]
    fn same_id_as_material_and_part_are_distinct_items() {
        let m = material::Id::new();
        let p = part::Id::new();

        assert!(Elements::new(vec![]).is_none());
        assert!(Elements::new(vec![element(m, "1"), element(m, "2")])
            .is_none());
        assert!(Elements::new(vec![element(m, "1"), element(p, "2")])
            .is_some());
    }

    #[test]
    fn rolls_up_materials_and_parts() {
        let m = material::Id::new();
        let p = part::Id::new();
        let machine = machine(vec![element(m, "2"), element(p, "3")]);

        let rollup = machine
            .total_price(
                |_| Some(Money::from_str("1.25").unwrap()),
                |_| Some(Decimal::from(13)),
            )
            .unwrap();
        assert_eq!(rollup.total, Some(Decimal::from_str("41.5").unwrap()));

        let rollup = machine
            .total_price(|_| None, |_| Some(Decimal::ONE))
            .unwrap();
        assert_eq!(rollup.total, None);
        assert_eq!(rollup.unpriced, vec![Item::Material(m)]);
    }

    #[test]
    fn errors_on_overflowing_total() {
        let m = material::Id::new();
        let p = part::Id::new();
        let machine = machine(vec![element(m, "1"), element(p, "3")]);

        let rollup = machine.total_price(
            |_| Some(Money::from_str("1").unwrap()),
            |_| Some(Decimal::MAX),
        );

        assert_eq!(rollup, Err(TooLarge));
    }
}
