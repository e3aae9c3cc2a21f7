//! [`Query`] collection related to [`Machine`]s.

use std::collections::HashMap;

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{
        machine, part, priced_item::Rollup, Item, Machine, Part, PricedItem,
    },
    infra::{database, Database},
    Query, Service,
};
#[cfg(doc)]
use crate::domain::Material;

use super::{priced_item::PricingError, DatabaseQuery};

/// Queries a [`Machine`] by its [`machine::Id`].
pub type ById = DatabaseQuery<By<Option<Machine>, machine::Id>>;

/// Queries a list of [`Machine`]s ordered by their [`machine::Code`]s.
pub type List = DatabaseQuery<By<Vec<Machine>, ()>>;

/// [`Query`] rolling up the price of a [`Machine`].
///
/// [`Material`] elements are priced by their current prices, while [`Part`]
/// elements are priced by their own rollups. Returns [`None`] if the
/// [`Machine`] doesn't exist.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Pricing {
    /// ID of the [`Machine`] to price.
    pub machine_id: machine::Id,
}

impl<Db> Query<Pricing> for Service<Db>
where
    Db: Database<
            Select<By<Option<Machine>, machine::Id>>,
            Ok = Option<Machine>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<HashMap<part::Id, Part>, Vec<part::Id>>>,
            Ok = HashMap<part::Id, Part>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<HashMap<Item, PricedItem>, Vec<Item>>>,
            Ok = HashMap<Item, PricedItem>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Option<Rollup<Item>>;
    type Err = Traced<PricingError>;

    async fn execute(
        &self,
        Pricing { machine_id }: Pricing,
    ) -> Result<Self::Ok, Self::Err> {
        let Some(machine) = self
            .database()
            .execute(Select(By::<Option<Machine>, _>::new(machine_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> PricingError))?
        else {
            return Ok(None);
        };

        let part_ids = machine
            .elements
            .iter()
            .filter_map(|e| e.item.part_id())
            .collect::<Vec<_>>();
        let parts = self
            .database()
            .execute(Select(By::<HashMap<_, Part>, _>::new(part_ids)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> PricingError))?;

        // Prices of every `Material` used directly or through a `Part`.
        let mut items = machine
            .elements
            .iter()
            .filter_map(|e| e.item.material_id())
            .chain(
                parts
                    .values()
                    .flat_map(|p| p.materials.iter().map(|c| c.material_id)),
            )
            .map(Item::Material)
            .collect::<Vec<_>>();
        items.sort_unstable_by_key(|i| i.material_id());
        items.dedup();
        let prices = self
            .database()
            .execute(Select(By::<HashMap<_, PricedItem>, _>::new(items)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> PricingError))?;
        let material_price = |id| {
            prices.get(&Item::Material(id)).and_then(|p| p.unit_price)
        };

        let part_prices = parts
            .iter()
            .map(|(id, p)| {
                p.total_price(material_price).map(|r| (*id, r.total))
            })
            .collect::<Result<HashMap<_, _>, _>>()
            .map_err(PricingError::TooLarge)
            .map_err(tracerr::wrap!())?;

        machine
            .total_price(material_price, |id| {
                part_prices.get(&id).copied().flatten()
            })
            .map(Some)
            .map_err(PricingError::TooLarge)
            .map_err(tracerr::wrap!())
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::{DateTime, Money, Quantity};
    use rust_decimal::Decimal;

    use crate::{
        command::{CreatePart, UpdatePricedItem},
        domain::{machine, part, Item, Machine},
        infra::database::memory::Memory,
        Command as _, Query as _, Service,
    };

    use super::{Pricing, PricingError};

    fn quantity(q: &str) -> Quantity {
        Quantity::from_str(q).unwrap()
    }

    async fn machine_of_part(
        service: &Service<Memory>,
        db: &Memory,
        unit_price: &str,
    ) -> machine::Id {
        let a = db.seed_material("A", None);
        let part = service
            .execute(CreatePart {
                code: part::Code::from_str("P-1").unwrap(),
                name: part::Name::from_str("Frame").unwrap(),
                materials: part::Components::new(vec![part::Component {
                    material_id: a,
                    quantity: quantity("1"),
                }])
                .unwrap(),
            })
            .await
            .unwrap();
        _ = service
            .execute(UpdatePricedItem {
                priced_item_id: db.priced_item(Item::Material(a)).id,
                unit_price: Some(Money::from_str(unit_price).unwrap()),
            })
            .await
            .unwrap();

        let machine = Machine {
            id: machine::Id::new(),
            code: machine::Code::from_str("PRESS-1").unwrap(),
            name: machine::Name::from_str("Press").unwrap(),
            elements: machine::Elements::new(vec![machine::Element {
                item: Item::Part(part.id),
                quantity: quantity("2"),
            }])
            .unwrap(),
            created_at: DateTime::now().coerce(),
        };
        let id = machine.id;
        _ = db.state().machines.insert(id, machine);
        id
    }

    #[tokio::test]
    async fn prices_parts_by_their_rollups() {
        let db = Memory::default();
        let service = Service::new(db.clone());
        let machine_id = machine_of_part(&service, &db, "2.5").await;

        let rollup = service
            .execute(Pricing { machine_id })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(rollup.total, Some(Decimal::from(5)));
        assert!(rollup.unpriced.is_empty());
    }

    #[tokio::test]
    async fn errors_on_overflowing_price() {
        let db = Memory::default();
        let service = Service::new(db.clone());
        let machine_id =
            machine_of_part(&service, &db, "79228162514264337593543950335")
                .await;

        let err = service
            .execute(Pricing { machine_id })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), PricingError::TooLarge(_)));
    }
}
