//! Read entities definitions.

pub mod material;
pub mod priced_item;
pub mod purchase_order;
pub mod request_for_quotation;
pub mod supplier;
