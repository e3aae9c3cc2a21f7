//! [`RequestForQuotation`] definitions.

use std::collections::{HashMap, HashSet};

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Money, Quantity};
use derive_more::Deref;

use crate::domain::{material, supplier};
#[cfg(doc)]
use crate::domain::{Material, PurchaseOrder, Supplier};

/// List of [`Material`]s a [`Supplier`] is asked to quote prices for.
///
/// An answered [`RequestForQuotation`] seeds the unit prices of a
/// [`PurchaseOrder`] placed with the same [`Supplier`].
#[derive(Clone, Debug)]
pub struct RequestForQuotation {
    /// ID of this [`RequestForQuotation`].
    pub id: Id,

    /// ID of the [`Supplier`] this [`RequestForQuotation`] is sent to.
    pub supplier_id: supplier::Id,

    /// [`DateTime`] when this [`RequestForQuotation`] was sent.
    pub requested_at: RequestDateTime,

    /// [`Status`] of this [`RequestForQuotation`].
    pub status: Status,

    /// Free-form [`Note`] about this [`RequestForQuotation`].
    pub note: Option<Note>,

    /// Requested [`Item`]s.
    pub materials: Items,

    /// [`DateTime`] when this [`RequestForQuotation`] was created.
    pub created_at: CreationDateTime,
}

impl RequestForQuotation {
    /// Returns the quoted unit price of the provided [`Material`], if this
    /// [`RequestForQuotation`] is answered and mentions it.
    #[must_use]
    pub fn quoted_price(&self, material_id: material::Id) -> Option<Money> {
        if self.status != Status::Answered {
            return None;
        }
        self.materials
            .iter()
            .find(|i| i.material_id == material_id)
            .and_then(|i| i.unit_price)
    }

    /// Applies the quoted `prices` to this [`RequestForQuotation`], marking it
    /// as [`Status::Answered`].
    ///
    /// # Errors
    ///
    /// If the `prices` don't cover exactly the requested [`Material`]s.
    pub fn answer(
        &mut self,
        mut prices: HashMap<material::Id, Money>,
    ) -> Result<(), AnswerError> {
        let requested = self
            .materials
            .iter()
            .map(|i| i.material_id)
            .collect::<HashSet<_>>();
        if let Some(id) = prices.keys().find(|id| !requested.contains(id)) {
            return Err(AnswerError::UnknownMaterial(*id));
        }
        if let Some(id) = requested.iter().find(|id| !prices.contains_key(id))
        {
            return Err(AnswerError::MissingMaterial(*id));
        }

        for item in &mut self.materials.0 {
            item.unit_price = prices.remove(&item.material_id);
        }
        self.status = Status::Answered;
        Ok(())
    }
}

/// Error of answering a [`RequestForQuotation`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AnswerError {
    /// Price is quoted for a [`Material`] that wasn't requested.
    UnknownMaterial(material::Id),

    /// Requested [`Material`] has no quoted price.
    MissingMaterial(material::Id),
}

/// [`Material`] requested in a [`RequestForQuotation`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Item {
    /// ID of the requested [`Material`].
    pub material_id: material::Id,

    /// Requested [`Quantity`].
    pub quantity: Quantity,

    /// Quoted price of a single unit, once answered.
    pub unit_price: Option<Money>,
}

/// Non-empty list of requested [`Item`]s with no [`Material`] repeated.
#[derive(Clone, Debug, Deref, Eq, PartialEq)]
#[deref(forward)]
pub struct Items(Vec<Item>);

impl Items {
    /// Creates new [`Items`], if the list is non-empty and mentions each
    /// [`Material`] at most once.
    #[must_use]
    pub fn new(items: Vec<Item>) -> Option<Self> {
        let mut seen = HashSet::with_capacity(items.len());
        (!items.is_empty() && items.iter().all(|i| seen.insert(i.material_id)))
            .then_some(Self(items))
    }
}

define_id! {
    #[doc = "ID of a [`RequestForQuotation`]."]
    pub struct Id;
}

define_text! {
    #[doc = "Free-form note about a [`RequestForQuotation`]."]
    pub struct Note(max_len = 2048);
}

define_kind! {
    #[doc = "Status of a [`RequestForQuotation`]."]
    enum Status {
        #[doc = "Sent to the [`Supplier`] and waiting for an answer."]
        Submitted = 1,

        #[doc = "Answered by the [`Supplier`] with quoted prices."]
        Answered = 2,

        #[doc = "Left unanswered by the [`Supplier`]."]
        Unanswered = 3,
    }
}

/// [`DateTime`] when a [`RequestForQuotation`] was sent.
pub type RequestDateTime = DateTimeOf<(RequestForQuotation, unit::Placement)>;

/// [`DateTime`] when a [`RequestForQuotation`] was created.
pub type CreationDateTime = DateTimeOf<(RequestForQuotation, unit::Creation)>;

#[cfg(test)]
mod spec {
    use std::{collections::HashMap, str::FromStr as _};

    use common::{DateTime, Money, Quantity};

    use super::{AnswerError, Id, Item, Items, RequestForQuotation, Status};
    use crate::domain::{material, supplier};

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    fn request(materials: &[material::Id]) -> RequestForQuotation {
        RequestForQuotation {
            id: Id::new(),
            supplier_id: supplier::Id::new(),
            requested_at: DateTime::now().coerce(),
            status: Status::Submitted,
            note: None,
            materials: Items::new(
                materials
                    .iter()
                    .map(|&material_id| Item {
                        material_id,
                        quantity: Quantity::from_str("1").unwrap(),
                        unit_price: None,
                    })
                    .collect(),
            )
            .unwrap(),
            created_at: DateTime::now().coerce(),
        }
    }

    #[test]
    fn answer_must_cover_every_material() {
        let a = material::Id::new();
        let b = material::Id::new();
        let mut rfq = request(&[a, b]);

        assert_eq!(
            rfq.answer(HashMap::from([(a, money("1"))])),
            Err(AnswerError::MissingMaterial(b)),
        );
        assert_eq!(rfq.status, Status::Submitted);

        let c = material::Id::new();
        assert_eq!(
            rfq.answer(HashMap::from([
                (a, money("1")),
                (b, money("2")),
                (c, money("3")),
            ])),
            Err(AnswerError::UnknownMaterial(c)),
        );
        assert!(rfq.materials.iter().all(|i| i.unit_price.is_none()));
    }

    #[test]
    fn answered_prices_are_quoted() {
        let a = material::Id::new();
        let b = material::Id::new();
        let mut rfq = request(&[a, b]);
        assert_eq!(rfq.quoted_price(a), None);

        rfq.answer(HashMap::from([(a, money("10")), (b, money("5"))]))
            .unwrap();

        assert_eq!(rfq.status, Status::Answered);
        assert_eq!(rfq.quoted_price(a), Some(money("10")));
        assert_eq!(rfq.quoted_price(b), Some(money("5")));
        assert_eq!(rfq.quoted_price(material::Id::new()), None);
    }
}
