//! [`Context`]-related definitions.

use std::sync::atomic::{self, AtomicU16};

use axum::{async_trait, extract::FromRequestParts};
use juniper::{
    http::{GraphQLBatchResponse, GraphQLResponse},
    IntoFieldError as _,
};
use service::{
    domain::{
        material, part, purchase_order, supplier, Item, Material, Part,
        Payment, PricedItem, Supplier,
    },
    query, Query as _,
};

use crate::{AsError, Error, JuniperResponse, Loader, Service};

/// Context of a single GraphQL request.
#[derive(Debug)]
pub struct Context {
    /// [`Service`] serving the request.
    service: Service,

    /// HTTP status code of the response, if it has errors.
    error_status_code: AtomicU16,

    /// [`Loader`] of [`Material`]s.
    materials: Loader<material::Id, Material>,

    /// [`Loader`] of [`Part`]s.
    parts: Loader<part::Id, Part>,

    /// [`Loader`] of [`Supplier`]s.
    suppliers: Loader<supplier::Id, Supplier>,

    /// [`Loader`] of [`Payment`]s by their `PurchaseOrder`s.
    payments: Loader<purchase_order::Id, Vec<Payment>>,

    /// [`Loader`] of [`PricedItem`]s by their [`Item`]s.
    prices: Loader<Item, PricedItem>,
}

impl Context {
    /// Creates a new [`Context`] on top of the provided [`Service`].
    #[must_use]
    pub fn new(service: Service) -> Self {
        Self {
            service,
            error_status_code: AtomicU16::new(
                http::StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            ),
            materials: Loader::default(),
            parts: Loader::default(),
            suppliers: Loader::default(),
            payments: Loader::default(),
            prices: Loader::default(),
        }
    }

    /// Returns the [`Service`] of this [`Context`].
    #[must_use]
    pub fn service(&self) -> &Service {
        &self.service
    }

    /// Returns the HTTP status code of the response, if it has errors.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn error_status_code(&self) -> http::StatusCode {
        http::StatusCode::from_u16(
            self.error_status_code.load(atomic::Ordering::Relaxed),
        )
        .expect("invalid status code")
    }

    /// Sets the HTTP status code of the response, if it has errors.
    pub fn set_error_status_code(&self, status_code: http::StatusCode) {
        self.error_status_code
            .store(status_code.as_u16(), atomic::Ordering::Relaxed);
    }

    /// Returns a [`Result::map_err()`] closure applying the status code of
    /// the [`Error`] to the response.
    pub fn error(&self) -> impl FnOnce(Error) -> Error + '_ {
        move |err| {
            self.set_error_status_code(err.status_code);
            err
        }
    }

    /// Loads the [`Material`] with the provided ID, batched with the other
    /// ones requested concurrently.
    ///
    /// # Errors
    ///
    /// If the [`Service`] fails.
    pub async fn material(
        &self,
        id: material::Id,
    ) -> Result<Option<Material>, Error> {
        self.materials
            .load(id, |ids| {
                self.service.execute(query::material::ByIds::by(ids))
            })
            .await
            .map_err(AsError::into_error)
            .map_err(self.error())
    }

    /// Loads the [`Part`] with the provided ID, batched with the other ones
    /// requested concurrently.
    ///
    /// # Errors
    ///
    /// If the [`Service`] fails.
    pub async fn part(&self, id: part::Id) -> Result<Option<Part>, Error> {
        self.parts
            .load(id, |ids| self.service.execute(query::part::ByIds::by(ids)))
            .await
            .map_err(AsError::into_error)
            .map_err(self.error())
    }

    /// Loads the [`Supplier`] with the provided ID, batched with the other
    /// ones requested concurrently.
    ///
    /// # Errors
    ///
    /// If the [`Service`] fails.
    pub async fn supplier(
        &self,
        id: supplier::Id,
    ) -> Result<Option<Supplier>, Error> {
        self.suppliers
            .load(id, |ids| {
                self.service.execute(query::supplier::ByIds::by(ids))
            })
            .await
            .map_err(AsError::into_error)
            .map_err(self.error())
    }

    /// Loads the [`Payment`]s of the `PurchaseOrder` with the provided ID,
    /// batched with the ones of other `PurchaseOrder`s requested
    /// concurrently.
    ///
    /// # Errors
    ///
    /// If the [`Service`] fails.
    pub async fn payments(
        &self,
        id: purchase_order::Id,
    ) -> Result<Vec<Payment>, Error> {
        self.payments
            .load(id, |ids| {
                self.service
                    .execute(query::purchase_order::PaymentsByIds::by(ids))
            })
            .await
            .map(Option::unwrap_or_default)
            .map_err(AsError::into_error)
            .map_err(self.error())
    }

    /// Loads the [`PricedItem`] of the provided [`Item`], batched with the
    /// other ones requested concurrently.
    ///
    /// # Errors
    ///
    /// If the [`Service`] fails.
    pub async fn price(&self, item: Item) -> Result<Option<PricedItem>, Error> {
        self.prices
            .load(item, |items| {
                self.service.execute(query::priced_item::ByItems::by(items))
            })
            .await
            .map_err(AsError::into_error)
            .map_err(self.error())
    }
}

impl juniper::Context for Context {}

#[async_trait]
impl<S> FromRequestParts<S> for Context
where
    S: Send + Sync,
{
    type Rejection = JuniperResponse;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        _: &S,
    ) -> Result<Self, Self::Rejection> {
        let service =
            parts.extensions.get::<Service>().cloned().ok_or_else(|| {
                JuniperResponse {
                    status_code: http::StatusCode::INTERNAL_SERVER_ERROR,
                    response: GraphQLBatchResponse::Single(
                        GraphQLResponse::error(
                            Error::internal(&"missing `Service` extension")
                                .into_field_error(),
                        ),
                    ),
                }
            })?;
        // Each request checks out its own connection.
        Ok(Self::new(Service::new(service.database().fork())))
    }
}
