//! [`PurchaseOrder`] read model definition.

#[cfg(doc)]
use crate::domain::PurchaseOrder;

pub mod list {
    //! [`PurchaseOrder`]s list definitions.

    use crate::domain::{purchase_order, supplier};
    #[cfg(doc)]
    use crate::domain::{PurchaseOrder, Supplier};

    /// Filter of a [`PurchaseOrder`]s list.
    ///
    /// Listed [`PurchaseOrder`]s are ordered from the most recently placed.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Filter {
        /// ID of the [`Supplier`] the [`PurchaseOrder`]s are placed with.
        pub supplier_id: Option<supplier::Id>,

        /// [`purchase_order::Status`] of the [`PurchaseOrder`]s.
        pub status: Option<purchase_order::Status>,

        /// Whether the [`PurchaseOrder`]s must be delivered or not.
        pub delivered: Option<bool>,
    }
}
