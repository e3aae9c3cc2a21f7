//! [`Query`] collection related to [`PricedItem`]s.

use std::collections::HashMap;

use common::operations::By;
use derive_more::{Display, Error, From};

use crate::{
    domain::{priced_item, Item, PricedItem},
    infra::database,
    read,
};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`PricedItem`] by its [`priced_item::Id`].
pub type ById = DatabaseQuery<By<Option<PricedItem>, priced_item::Id>>;

/// Queries [`PricedItem`]s of multiple [`Item`]s at once.
pub type ByItems = DatabaseQuery<By<HashMap<Item, PricedItem>, Vec<Item>>>;

/// Queries a list of [`PricedItem`]s.
pub type List =
    DatabaseQuery<By<Vec<PricedItem>, read::priced_item::list::Filter>>;

/// Error of a [`Query`] rolling up a price from [`PricedItem`]s.
#[derive(Debug, Display, Error, From)]
pub enum PricingError {
    /// [`Database`] error.
    ///
    /// [`Database`]: crate::infra::Database
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Rolled up price doesn't fit into a decimal.
    #[display("{_0}")]
    TooLarge(priced_item::TooLarge),
}
