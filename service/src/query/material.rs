//! [`Query`] collection related to [`Material`]s.

use std::collections::HashMap;

use common::operations::By;

use crate::{
    domain::{material, Material},
    read,
};
#[cfg(doc)]
use crate::{domain::Supplier, Query};

use super::DatabaseQuery;

/// Queries a [`Material`] by its [`material::Id`].
pub type ById = DatabaseQuery<By<Option<Material>, material::Id>>;

/// Queries multiple [`Material`]s by their [`material::Id`]s at once.
pub type ByIds =
    DatabaseQuery<By<HashMap<material::Id, Material>, Vec<material::Id>>>;

/// Queries a list of [`Material`]s ordered by their [`material::Code`]s.
pub type List = DatabaseQuery<By<Vec<Material>, read::material::list::Filter>>;

/// Queries the [`Supplier`]s actively supplying a [`Material`].
pub type Suppliers =
    DatabaseQuery<By<read::material::Suppliers, material::Id>>;
