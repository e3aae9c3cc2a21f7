//! [`Part`] definitions.

use std::collections::HashSet;

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf, Money, Quantity};
use derive_more::Deref;

use crate::domain::{
    material,
    priced_item::{Rollup, TooLarge},
};
#[cfg(doc)]
use crate::domain::Material;

/// Assembly made of [`Material`]s (a bill of materials).
#[derive(Clone, Debug)]
pub struct Part {
    /// ID of this [`Part`].
    pub id: Id,

    /// Unique [`Code`] of this [`Part`].
    pub code: Code,

    /// [`Name`] of this [`Part`].
    pub name: Name,

    /// [`Component`]s this [`Part`] is made of.
    pub materials: Components,

    /// [`DateTime`] when this [`Part`] was created.
    pub created_at: CreationDateTime,
}

impl Part {
    /// Rolls up the price of this [`Part`] from the unit prices of its
    /// [`Material`]s.
    ///
    /// The total is known only when every [`Material`] has a price.
    ///
    /// # Errors
    ///
    /// With [`TooLarge`] if the total overflows.
    pub fn total_price(
        &self,
        price_of: impl Fn(material::Id) -> Option<Money>,
    ) -> Result<Rollup<material::Id>, TooLarge> {
        total_price(&self.materials, price_of)
    }
}

/// Rolls up the price of the provided [`Component`]s.
///
/// See [`Part::total_price()`] for details.
///
/// # Errors
///
/// With [`TooLarge`] if the total overflows.
pub fn total_price(
    components: &[Component],
    price_of: impl Fn(material::Id) -> Option<Money>,
) -> Result<Rollup<material::Id>, TooLarge> {
    Rollup::compute(components.iter().map(|c| {
        (
            c.material_id,
            c.quantity,
            price_of(c.material_id).map(Money::amount),
        )
    }))
}

/// [`Material`] used in a [`Part`], with its quantity.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Component {
    /// ID of the [`Material`].
    pub material_id: material::Id,

    /// [`Quantity`] of the [`Material`] in the [`Part`].
    pub quantity: Quantity,
}

/// Non-empty list of [`Component`]s with no [`Material`] repeated.
#[derive(Clone, Debug, Deref, Eq, PartialEq)]
#[deref(forward)]
pub struct Components(Vec<Component>);

impl Components {
    /// Creates new [`Components`], if the list is non-empty and mentions
    /// each [`Material`] at most once.
    #[must_use]
    pub fn new(components: Vec<Component>) -> Option<Self> {
        let mut seen = HashSet::with_capacity(components.len());
        (!components.is_empty()
            && components.iter().all(|c| seen.insert(c.material_id)))
        .then_some(Self(components))
    }
}

impl From<Components> for Vec<Component> {
    fn from(components: Components) -> Self {
        components.0
    }
}

define_id! {
    #[doc = "ID of a [`Part`]."]
    pub struct Id;
}

define_text! {
    #[doc = "Unique code of a [`Part`]."]
    pub struct Code(
        max_len = 32,
        check = |s: &str| s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')),
    );
}

define_text! {
    #[doc = "Name of a [`Part`]."]
    pub struct Name(max_len = 256);
}

/// [`DateTime`] when a [`Part`] was created.
pub type CreationDateTime = DateTimeOf<(Part, unit::Creation)>;

#[cfg(test)]
mod spec {
    use std::{collections::HashMap, str::FromStr as _};

    use common::{Money, Quantity};
    use rust_decimal::Decimal;

    use super::{total_price, Component, Components};
    use crate::domain::{material, priced_item::TooLarge};

    fn component(id: material::Id, quantity: &str) -> Component {
        Component {
            material_id: id,
            quantity: Quantity::from_str(quantity).unwrap(),
        }
    }

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    #[test]
    fn requires_distinct_materials() {
        let a = material::Id::new();
        let b = material::Id::new();

        assert!(Components::new(vec![]).is_none());
        assert!(Components::new(vec![
            component(a, "1"),
            component(a, "2"),
        ])
        .is_none());
        assert!(Components::new(vec![
            component(a, "1"),
            component(b, "2"),
        ])
        .is_some());
    }

    #[test]
    fn unknown_when_any_material_is_unpriced() {
        let a = material::Id::new();
        let b = material::Id::new();
        let components = [component(a, "1"), component(b, "2")];

        let mut prices = HashMap::from([(b, money("5"))]);
        let rollup =
            total_price(&components, |id| prices.get(&id).copied()).unwrap();
        assert_eq!(rollup.total, None);
        assert_eq!(rollup.unpriced, vec![a]);

        _ = prices.insert(a, money("3"));
        let rollup =
            total_price(&components, |id| prices.get(&id).copied()).unwrap();
        assert_eq!(rollup.total, Some(Decimal::from(13)));
        assert!(rollup.unpriced.is_empty());
    }

    #[test]
    fn weighted_sum_is_exact() {
        let a = material::Id::new();
        let b = material::Id::new();
        let components = [component(a, "0.333"), component(b, "1.5")];
        let prices = HashMap::from([(a, money("3")), (b, money("0.01"))]);

        let rollup =
            total_price(&components, |id| prices.get(&id).copied()).unwrap();

        assert_eq!(rollup.total, Some(Decimal::from_str("1.014").unwrap()));
    }

    #[test]
    fn errors_on_overflowing_total() {
        let a = material::Id::new();
        let b = material::Id::new();
        let huge = money("79228162514264337593543950335");

        let rollup = total_price(&[component(a, "2")], |_| Some(huge));
        assert_eq!(rollup, Err(TooLarge));

        let components = [component(a, "1"), component(b, "1")];
        let rollup = total_price(&components, |_| Some(huge));
        assert_eq!(rollup, Err(TooLarge));
    }
}
