//! [`Query`] collection related to [`Part`]s.

use std::collections::HashMap;

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{material, part, priced_item::Rollup, Item, Part, PricedItem},
    infra::{database, Database},
    Query, Service,
};
#[cfg(doc)]
use crate::domain::Material;

use super::{priced_item::PricingError, DatabaseQuery};

/// Queries a [`Part`] by its [`part::Id`].
pub type ById = DatabaseQuery<By<Option<Part>, part::Id>>;

/// Queries multiple [`Part`]s by their [`part::Id`]s at once.
pub type ByIds = DatabaseQuery<By<HashMap<part::Id, Part>, Vec<part::Id>>>;

/// Queries a list of [`Part`]s ordered by their [`part::Code`]s.
pub type List = DatabaseQuery<By<Vec<Part>, ()>>;

/// [`Query`] rolling up the price of a [`Part`] from the current prices of
/// its [`Material`]s.
///
/// Returns [`None`] if the [`Part`] doesn't exist.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Pricing {
    /// ID of the [`Part`] to price.
    pub part_id: part::Id,
}

impl<Db> Query<Pricing> for Service<Db>
where
    Db: Database<
            Select<By<Option<Part>, part::Id>>,
            Ok = Option<Part>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<HashMap<Item, PricedItem>, Vec<Item>>>,
            Ok = HashMap<Item, PricedItem>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Option<Rollup<material::Id>>;
    type Err = Traced<PricingError>;

    async fn execute(
        &self,
        Pricing { part_id }: Pricing,
    ) -> Result<Self::Ok, Self::Err> {
        let Some(part) = self
            .database()
            .execute(Select(By::<Option<Part>, _>::new(part_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> PricingError))?
        else {
            return Ok(None);
        };

        let items = part
            .materials
            .iter()
            .map(|c| Item::Material(c.material_id))
            .collect::<Vec<_>>();
        let prices = self
            .database()
            .execute(Select(By::<HashMap<_, PricedItem>, _>::new(items)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> PricingError))?;

        part.total_price(|id| {
            prices.get(&Item::Material(id)).and_then(|p| p.unit_price)
        })
        .map(Some)
        .map_err(PricingError::TooLarge)
        .map_err(tracerr::wrap!())
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::{Money, Quantity};
    use rust_decimal::Decimal;

    use crate::{
        command::{CreatePart, UpdatePricedItem},
        domain::{part, Item},
        infra::database::memory::Memory,
        Command as _, Query as _, Service,
    };

    use super::{Pricing, PricingError};

    #[tokio::test]
    async fn prices_part_once_every_material_is_priced() {
        let db = Memory::default();
        let a = db.seed_material("A", None);
        let b = db.seed_material("B", None);
        let service = Service::new(db.clone());
        let components = [(a, "1"), (b, "2")]
            .into_iter()
            .map(|(material_id, q)| part::Component {
                material_id,
                quantity: Quantity::from_str(q).unwrap(),
            })
            .collect();
        let part = service
            .execute(CreatePart {
                code: part::Code::from_str("P-1").unwrap(),
                name: part::Name::from_str("Frame").unwrap(),
                materials: part::Components::new(components).unwrap(),
            })
            .await
            .unwrap();
        let pricing = Pricing { part_id: part.id };
        let set_price = |material_id, price: &str| UpdatePricedItem {
            priced_item_id: db.priced_item(Item::Material(material_id)).id,
            unit_price: Some(Money::from_str(price).unwrap()),
        };

        let rollup = service.execute(pricing).await.unwrap().unwrap();
        assert_eq!(rollup.total, None);
        assert_eq!(rollup.unpriced, [a, b]);

        _ = service.execute(set_price(b, "5")).await.unwrap();
        let rollup = service.execute(pricing).await.unwrap().unwrap();
        assert_eq!(rollup.total, None);
        assert_eq!(rollup.unpriced, [a]);

        _ = service.execute(set_price(a, "3")).await.unwrap();
        let rollup = service.execute(pricing).await.unwrap().unwrap();
        assert_eq!(rollup.total, Some(Decimal::from(13)));
        assert!(rollup.unpriced.is_empty());
    }

    #[tokio::test]
    async fn prices_nothing_for_unknown_part() {
        let service = Service::new(Memory::default());

        let rollup = service
            .execute(Pricing {
                part_id: part::Id::new(),
            })
            .await
            .unwrap();

        assert_eq!(rollup, None);
    }

    #[tokio::test]
    async fn errors_on_overflowing_price() {
        let db = Memory::default();
        let a = db.seed_material("A", None);
        let service = Service::new(db.clone());
        let part = service
            .execute(CreatePart {
                code: part::Code::from_str("P-1").unwrap(),
                name: part::Name::from_str("Frame").unwrap(),
                materials: part::Components::new(vec![part::Component {
                    material_id: a,
                    quantity: Quantity::from_str("2").unwrap(),
                }])
                .unwrap(),
            })
            .await
            .unwrap();
        _ = service
            .execute(UpdatePricedItem {
                priced_item_id: db.priced_item(Item::Material(a)).id,
                unit_price: Some(
                    Money::from_str("79228162514264337593543950335").unwrap(),
                ),
            })
            .await
            .unwrap();

        let err = service
            .execute(Pricing { part_id: part.id })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), PricingError::TooLarge(_)));
    }
}
