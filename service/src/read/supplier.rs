//! [`Supplier`] read model definition.

use std::collections::HashSet;

use derive_more::{Deref, From, Into};

use crate::domain::material;
#[cfg(doc)]
use crate::domain::{supplier::CatalogEntry, Material, Supplier};

/// IDs of the [`Material`]s a [`Supplier`] actively supplies.
///
/// Only active [`CatalogEntry`]s are considered.
#[derive(Clone, Debug, Default, Deref, Eq, From, Into, PartialEq)]
pub struct Catalog(HashSet<material::Id>);

pub mod list {
    //! [`Supplier`]s list definitions.

    #[cfg(doc)]
    use crate::domain::Supplier;

    /// Filter of a [`Supplier`]s list.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Filter {
        /// Whether the deleted [`Supplier`]s should be listed too.
        pub include_deleted: bool,
    }
}
