//! [`PricedItem`] read model definition.

#[cfg(doc)]
use crate::domain::PricedItem;

pub mod list {
    //! [`PricedItem`]s list definitions.

    use crate::domain::item;
    #[cfg(doc)]
    use crate::domain::PricedItem;

    /// Filter of a [`PricedItem`]s list.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Filter {
        /// [`item::Kind`] of the priced items.
        pub kind: Option<item::Kind>,

        /// Whether only the [`PricedItem`]s without a price should be listed.
        pub unpriced: bool,
    }
}
