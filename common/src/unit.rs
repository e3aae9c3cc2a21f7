//! Marker types describing what a [`DateTimeOf`] stands for.
//!
//! [`DateTimeOf`]: crate::DateTimeOf

/// Marker type describing an entity creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Marker type describing an entity deletion.
#[derive(Clone, Copy, Debug)]
pub struct Deletion;

/// Marker type describing an entity update.
#[derive(Clone, Copy, Debug)]
pub struct Modification;

/// Marker type describing placing an order or a request.
#[derive(Clone, Copy, Debug)]
pub struct Placement;

/// Marker type describing a delivery of goods.
#[derive(Clone, Copy, Debug)]
pub struct Delivery;

/// Marker type describing a payment.
#[derive(Clone, Copy, Debug)]
pub struct Payment;
