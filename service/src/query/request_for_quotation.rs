//! [`Query`] collection related to [`RequestForQuotation`]s.

use common::operations::By;

use crate::{
    domain::{request_for_quotation, RequestForQuotation},
    read,
};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`RequestForQuotation`] by its [`request_for_quotation::Id`].
pub type ById = DatabaseQuery<
    By<Option<RequestForQuotation>, request_for_quotation::Id>,
>;

/// Queries a list of [`RequestForQuotation`]s, the most recent first.
pub type List = DatabaseQuery<
    By<Vec<RequestForQuotation>, read::request_for_quotation::list::Filter>,
>;
