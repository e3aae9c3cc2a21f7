//! [`Command`] for changing the price of a [`PricedItem`].

use common::{
    operations::{By, Commit, Select, Transact, Transacted, Update},
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{priced_item, PricedItem},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for setting (or clearing) the unit price of a [`PricedItem`].
#[derive(Clone, Copy, Debug)]
pub struct UpdatePricedItem {
    /// ID of the [`PricedItem`] to update.
    pub priced_item_id: priced_item::Id,

    /// New unit price, if known.
    pub unit_price: Option<Money>,
}

impl<Db> Command<UpdatePricedItem> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<PricedItem>, priced_item::Id>>,
            Ok = Option<PricedItem>,
            Err = Traced<database::Error>,
        > + Database<Update<PricedItem>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = PricedItem;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdatePricedItem,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdatePricedItem {
            priced_item_id,
            unit_price,
        } = cmd;

        if unit_price.is_some_and(|p| !p.is_positive()) {
            return Err(tracerr::new!(E::NonPositiveUnitPrice));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut item = tx
            .execute(Select(By::<Option<PricedItem>, _>::new(priced_item_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PricedItemNotExists(priced_item_id))
            .map_err(tracerr::wrap!())?;
        if item.unit_price == unit_price {
            return Ok(item);
        }

        item.unit_price = unit_price;
        item.updated_at = DateTime::now().coerce();
        tx.execute(Update(item))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(item)
    }
}

/// Error of [`UpdatePricedItem`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Unit price is not positive.
    #[display("Unit price must be positive")]
    NonPositiveUnitPrice,

    /// [`PricedItem`] with the provided ID does not exist.
    #[display("`PricedItem(id: {_0})` does not exist")]
    PricedItemNotExists(#[error(not(source))] priced_item::Id),
}
