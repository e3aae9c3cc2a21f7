//! [`Material`] read model definition.

use derive_more::{Deref, From, Into};

use crate::domain::supplier;
#[cfg(doc)]
use crate::domain::{Material, Supplier};

/// IDs of the non-deleted [`Supplier`]s actively supplying a [`Material`].
#[derive(Clone, Debug, Default, Deref, Eq, From, Into, PartialEq)]
pub struct Suppliers(Vec<supplier::Id>);

pub mod list {
    //! [`Material`]s list definitions.

    use crate::domain::supplier;
    #[cfg(doc)]
    use crate::domain::{material::Stock, Material, Supplier};

    /// Filter of a [`Material`]s list.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Filter {
        /// ID of the [`Supplier`] whose catalog the [`Material`]s must be in.
        pub supplier_id: Option<supplier::Id>,

        /// Whether only the [`Material`]s with a [low `Stock`] should be
        /// listed.
        ///
        /// [low `Stock`]: Stock::is_low
        pub low_stock: bool,
    }
}
