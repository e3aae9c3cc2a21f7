//! [`Query`] collection related to [`Supplier`]s.

use std::collections::HashMap;

use common::operations::By;

use crate::{
    domain::{supplier, Supplier},
    read,
};
#[cfg(doc)]
use crate::{domain::Material, Query};

use super::DatabaseQuery;

/// Queries a [`Supplier`] by its [`supplier::Id`], even a deleted one.
pub type ById = DatabaseQuery<By<Option<Supplier>, supplier::Id>>;

/// Queries multiple [`Supplier`]s by their [`supplier::Id`]s at once.
pub type ByIds =
    DatabaseQuery<By<HashMap<supplier::Id, Supplier>, Vec<supplier::Id>>>;

/// Queries a list of [`Supplier`]s ordered by their names.
pub type List = DatabaseQuery<By<Vec<Supplier>, read::supplier::list::Filter>>;

/// Queries the [`Material`]s a [`Supplier`] actively supplies.
pub type Catalog = DatabaseQuery<By<read::supplier::Catalog, supplier::Id>>;
