//! [`RequestForQuotation`] read model definition.

#[cfg(doc)]
use crate::domain::RequestForQuotation;

pub mod list {
    //! [`RequestForQuotation`]s list definitions.

    use crate::domain::{request_for_quotation, supplier};
    #[cfg(doc)]
    use crate::domain::{RequestForQuotation, Supplier};

    /// Filter of a [`RequestForQuotation`]s list.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Filter {
        /// ID of the [`Supplier`] the [`RequestForQuotation`]s are sent to.
        pub supplier_id: Option<supplier::Id>,

        /// [`request_for_quotation::Status`] of the
        /// [`RequestForQuotation`]s.
        pub status: Option<request_for_quotation::Status>,
    }
}
