//! [`Query`] collection related to [`PurchaseOrder`]s.

use std::collections::HashMap;

use common::operations::By;

use crate::{
    domain::{purchase_order, Payment, PurchaseOrder},
    read,
};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`PurchaseOrder`] by its [`purchase_order::Id`].
pub type ById = DatabaseQuery<By<Option<PurchaseOrder>, purchase_order::Id>>;

/// Queries multiple [`PurchaseOrder`]s by their [`purchase_order::Id`]s at
/// once.
pub type ByIds = DatabaseQuery<
    By<HashMap<purchase_order::Id, PurchaseOrder>, Vec<purchase_order::Id>>,
>;

/// Queries a list of [`PurchaseOrder`]s.
pub type List =
    DatabaseQuery<By<Vec<PurchaseOrder>, read::purchase_order::list::Filter>>;

/// Queries [`Payment`]s of a [`PurchaseOrder`] ordered by their payment
/// dates.
pub type Payments = DatabaseQuery<By<Vec<Payment>, purchase_order::Id>>;

/// Queries [`Payment`]s of multiple [`PurchaseOrder`]s at once.
///
/// [`PurchaseOrder`]s without [`Payment`]s are absent in the result.
pub type PaymentsByIds = DatabaseQuery<
    By<HashMap<purchase_order::Id, Vec<Payment>>, Vec<purchase_order::Id>>,
>;
