//! GraphQL [`Mutation`]s definitions.

use common::Money;
use juniper::graphql_object;
use service::{command, Command as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Creates a new `Material` along with its empty `PricedItem`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CODE_TAKEN` - provided `MaterialCode` is used by another
    ///                  `Material`.
    #[tracing::instrument(
        skip_all,
        fields(
            code = %code,
            gql.name = "createMaterial",
            name = %name,
            otel.name = Self::SPAN_NAME,
            unit = ?unit,
        ),
    )]
    pub async fn create_material(
        code: api::material::Code,
        name: api::material::Name,
        unit: api::material::Unit,
        stock: Option<api::material::StockInput>,
        ctx: &Context,
    ) -> Result<api::Material, Error> {
        ctx.service()
            .execute(command::CreateMaterial {
                code: code.into(),
                name: name.into(),
                unit: unit.into(),
                stock: stock.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the `Material` with the provided ID.
    ///
    /// `MaterialCode` cannot be changed. Omitted `stock` stops tracking the
    /// stock of the `Material`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `MATERIAL_NOT_EXISTS` - the `Material` with the provided ID does
    ///                           not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateMaterial",
            id = %id,
            name = %name,
            otel.name = Self::SPAN_NAME,
            unit = ?unit,
        ),
    )]
    pub async fn update_material(
        id: api::material::Id,
        name: api::material::Name,
        unit: api::material::Unit,
        stock: Option<api::material::StockInput>,
        ctx: &Context,
    ) -> Result<api::Material, Error> {
        ctx.service()
            .execute(command::UpdateMaterial {
                material_id: id.into(),
                name: name.into(),
                unit: unit.into(),
                stock: stock.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes the `Material` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `MATERIAL_NOT_EXISTS` - the `Material` with the provided ID does
    ///                           not exist;
    /// - `STILL_REFERENCED` - the `Material` is used by a `Part`, a
    ///                        `Machine` or an order.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteMaterial",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_material(
        id: api::material::Id,
        ctx: &Context,
    ) -> Result<api::Material, Error> {
        ctx.service()
            .execute(command::DeleteMaterial {
                material_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new `Supplier`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createSupplier",
            name = %name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_supplier(
        name: api::supplier::Name,
        email: Option<api::supplier::Email>,
        phone: Option<api::supplier::Phone>,
        address: Option<api::supplier::Address>,
        ctx: &Context,
    ) -> Result<api::Supplier, Error> {
        ctx.service()
            .execute(command::CreateSupplier {
                name: name.into(),
                contact: api::supplier::contact(email, phone, address),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the `Supplier` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `SUPPLIER_NOT_EXISTS` - the `Supplier` with the provided ID does
    ///                           not exist;
    /// - `SUPPLIER_DELETED` - the `Supplier` is deleted.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateSupplier",
            id = %id,
            name = %name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn update_supplier(
        id: api::supplier::Id,
        name: api::supplier::Name,
        email: Option<api::supplier::Email>,
        phone: Option<api::supplier::Phone>,
        address: Option<api::supplier::Address>,
        ctx: &Context,
    ) -> Result<api::Supplier, Error> {
        ctx.service()
            .execute(command::UpdateSupplier {
                supplier_id: id.into(),
                name: name.into(),
                contact: api::supplier::contact(email, phone, address),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes the `Supplier` with the provided ID.
    ///
    /// The `Supplier` remains visible through its `PurchaseOrder`s and
    /// `RequestForQuotation`s. Deleting a deleted `Supplier` is no-op.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `SUPPLIER_NOT_EXISTS` - the `Supplier` with the provided ID does
    ///                           not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteSupplier",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_supplier(
        id: api::supplier::Id,
        ctx: &Context,
    ) -> Result<api::Supplier, Error> {
        ctx.service()
            .execute(command::DeleteSupplier {
                supplier_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Adds the `Material` to the catalog of the `Supplier`.
    ///
    /// Adding an already sold `Material` is no-op.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `SUPPLIER_NOT_EXISTS` - the `Supplier` with the provided ID does
    ///                           not exist;
    /// - `SUPPLIER_DELETED` - the `Supplier` is deleted;
    /// - `MATERIAL_NOT_EXISTS` - the `Material` with the provided ID does
    ///                           not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "addSupplierMaterial",
            material_id = %material_id,
            otel.name = Self::SPAN_NAME,
            supplier_id = %supplier_id,
        ),
    )]
    pub async fn add_supplier_material(
        supplier_id: api::supplier::Id,
        material_id: api::material::Id,
        ctx: &Context,
    ) -> Result<api::Supplier, Error> {
        let entry = ctx
            .service()
            .execute(command::AddSupplierMaterial {
                supplier_id: supplier_id.into(),
                material_id: material_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        #[expect(unsafe_code, reason = "`Supplier` existence is checked")]
        Ok(unsafe { api::Supplier::new_unchecked(entry.supplier_id) })
    }

    /// Removes the `Material` from the catalog of the `Supplier`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_SUPPLIED` - the `Material` is not sold by the `Supplier`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "removeSupplierMaterial",
            material_id = %material_id,
            otel.name = Self::SPAN_NAME,
            supplier_id = %supplier_id,
        ),
    )]
    pub async fn remove_supplier_material(
        supplier_id: api::supplier::Id,
        material_id: api::material::Id,
        ctx: &Context,
    ) -> Result<api::Supplier, Error> {
        let entry = ctx
            .service()
            .execute(command::RemoveSupplierMaterial {
                supplier_id: supplier_id.into(),
                material_id: material_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        #[expect(unsafe_code, reason = "catalog entries have `Supplier`s")]
        Ok(unsafe { api::Supplier::new_unchecked(entry.supplier_id) })
    }

    /// Creates a new `Part` from the provided `Material`s, along with its
    /// empty `PricedItem`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CODE_TAKEN` - provided `PartCode` is used by another `Part`;
    /// - `NO_ITEMS` - no `Material`s are provided;
    /// - `DUPLICATE_ITEM` - the same `Material` is provided twice;
    /// - `MATERIAL_NOT_EXISTS` - some of the `Material`s do not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            code = %code,
            gql.name = "createPart",
            name = %name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_part(
        code: api::part::Code,
        name: api::part::Name,
        materials: Vec<api::part::ComponentInput>,
        ctx: &Context,
    ) -> Result<api::Part, Error> {
        let materials =
            api::part::components(materials).map_err(ctx.error())?;

        ctx.service()
            .execute(command::CreatePart {
                code: code.into(),
                name: name.into(),
                materials,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes the `Part` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PART_NOT_EXISTS` - the `Part` with the provided ID does not exist;
    /// - `STILL_REFERENCED` - the `Part` is used by a `Machine`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deletePart",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_part(
        id: api::part::Id,
        ctx: &Context,
    ) -> Result<api::Part, Error> {
        ctx.service()
            .execute(command::DeletePart { part_id: id.into() })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new `Machine` from the provided `CatalogItem`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CODE_TAKEN` - provided `MachineCode` is used by another `Machine`;
    /// - `NO_ITEMS` - no `CatalogItem`s are provided;
    /// - `DUPLICATE_ITEM` - the same `CatalogItem` is provided twice;
    /// - `INVALID_ITEM` - a `CatalogItemInput` doesn't reference exactly one
    ///                    `CatalogItem`;
    /// - `MATERIAL_NOT_EXISTS` - some of the `Material`s do not exist;
    /// - `PART_NOT_EXISTS` - some of the `Part`s do not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            code = %code,
            gql.name = "createMachine",
            name = %name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_machine(
        code: api::machine::Code,
        name: api::machine::Name,
        elements: Vec<api::machine::ElementInput>,
        ctx: &Context,
    ) -> Result<api::Machine, Error> {
        let elements = api::machine::elements(elements).map_err(ctx.error())?;

        ctx.service()
            .execute(command::CreateMachine {
                code: code.into(),
                name: name.into(),
                elements,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes the `Machine` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `MACHINE_NOT_EXISTS` - the `Machine` with the provided ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteMachine",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_machine(
        id: api::machine::Id,
        ctx: &Context,
    ) -> Result<api::Machine, Error> {
        ctx.service()
            .execute(command::DeleteMachine {
                machine_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Places a new `PurchaseOrder`.
    ///
    /// The total amount is computed once and never changes afterwards.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NO_ITEMS` - no `Material`s are ordered;
    /// - `DUPLICATE_ITEM` - the same `Material` is ordered twice;
    /// - `SUPPLIER_NOT_EXISTS` - the `Supplier` does not exist;
    /// - `SUPPLIER_DELETED` - the `Supplier` is deleted;
    /// - `BAD_REQUEST` - some `Material` is not sold by the `Supplier`, or
    ///                   the `RequestForQuotation` is sent to another
    ///                   `Supplier`;
    /// - `REQUEST_FOR_QUOTATION_NOT_EXISTS` - the `RequestForQuotation`
    ///                                        does not exist;
    /// - `REQUEST_FOR_QUOTATION_NOT_ANSWERED` - the `RequestForQuotation`
    ///                                          is not answered;
    /// - `UNIT_PRICE_MISSING` - unit price is neither provided nor quoted;
    /// - `NON_POSITIVE_UNIT_PRICE` - some unit price is not positive;
    /// - `NON_POSITIVE_AMOUNT` - some `Payment` amount is not positive;
    /// - `NON_CENT_AMOUNT` - some `Payment` amount has fractions of a cent;
    /// - `PAYMENT_EXCEEDS_TOTAL` - `Payment`s exceed the total amount;
    /// - `AMOUNT_TOO_LARGE` - the total amount or some updated stock is too
    ///                        large.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createPurchaseOrder",
            otel.name = Self::SPAN_NAME,
            supplier_id = %input.supplier_id,
        ),
    )]
    pub async fn create_purchase_order(
        input: api::purchase_order::CreateInput,
        ctx: &Context,
    ) -> Result<api::PurchaseOrder, Error> {
        let cmd = command::CreatePurchaseOrder::try_from(input)
            .map_err(ctx.error())?;

        ctx.service()
            .execute(cmd)
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Registers a new `Payment` for the `PurchaseOrder`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PURCHASE_ORDER_NOT_EXISTS` - the `PurchaseOrder` does not exist;
    /// - `PURCHASE_ORDER_CANCELLED` - the `PurchaseOrder` is cancelled;
    /// - `NON_POSITIVE_AMOUNT` - the `Payment` amount is not positive;
    /// - `NON_CENT_AMOUNT` - the `Payment` amount has fractions of a cent;
    /// - `PAYMENT_EXCEEDS_TOTAL` - the `Payment` exceeds the remaining
    ///                             amount.
    #[tracing::instrument(
        skip_all,
        fields(
            amount = %input.amount,
            gql.name = "registerPurchaseOrderPayment",
            otel.name = Self::SPAN_NAME,
            purchase_order_id = %purchase_order_id,
        ),
    )]
    pub async fn register_purchase_order_payment(
        purchase_order_id: api::purchase_order::Id,
        input: api::purchase_order::PaymentInput,
        ctx: &Context,
    ) -> Result<api::PurchaseOrder, Error> {
        ctx.service()
            .execute(command::RegisterPurchaseOrderPayment {
                purchase_order_id: purchase_order_id.into(),
                method: input.method.into(),
                amount: input.amount,
                paid_at: input.paid_at.coerce(),
                notes: input.notes.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Marks the `PurchaseOrder` as delivered.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PURCHASE_ORDER_NOT_EXISTS` - the `PurchaseOrder` does not exist;
    /// - `PURCHASE_ORDER_CANCELLED` - the `PurchaseOrder` is cancelled;
    /// - `ALREADY_DELIVERED` - the `PurchaseOrder` is delivered already;
    /// - `AMOUNT_TOO_LARGE` - some updated stock is too large.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "purchaseOrderDelivered",
            otel.name = Self::SPAN_NAME,
            purchase_order_id = %input.purchase_order_id,
            update_stock = ?input.update_stock,
        ),
    )]
    pub async fn purchase_order_delivered(
        input: api::purchase_order::DeliveredInput,
        ctx: &Context,
    ) -> Result<api::PurchaseOrder, Error> {
        ctx.service()
            .execute(command::MarkPurchaseOrderDelivered::from(input))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Cancels the `PurchaseOrder` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PURCHASE_ORDER_NOT_EXISTS` - the `PurchaseOrder` does not exist;
    /// - `ALREADY_CANCELLED` - the `PurchaseOrder` is cancelled already;
    /// - `ALREADY_PAID` - some `Payment` is registered for the
    ///                    `PurchaseOrder`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "cancelPurchaseOrder",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn cancel_purchase_order(
        id: api::purchase_order::Id,
        ctx: &Context,
    ) -> Result<api::PurchaseOrder, Error> {
        ctx.service()
            .execute(command::CancelPurchaseOrder {
                purchase_order_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Sends a new `RequestForQuotation` to the `Supplier`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NO_ITEMS` - no `Material`s are requested;
    /// - `DUPLICATE_ITEM` - the same `Material` is requested twice;
    /// - `SUPPLIER_NOT_EXISTS` - the `Supplier` does not exist;
    /// - `SUPPLIER_DELETED` - the `Supplier` is deleted;
    /// - `BAD_REQUEST` - some `Material` is not sold by the `Supplier`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createRequestForQuotation",
            otel.name = Self::SPAN_NAME,
            supplier_id = %input.supplier_id,
        ),
    )]
    pub async fn create_request_for_quotation(
        input: api::request_for_quotation::CreateInput,
        ctx: &Context,
    ) -> Result<api::RequestForQuotation, Error> {
        let cmd = command::CreateRequestForQuotation::try_from(input)
            .map_err(ctx.error())?;

        ctx.service()
            .execute(cmd)
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Saves the prices quoted by the `Supplier` in the answer to the
    /// `RequestForQuotation`.
    ///
    /// Every requested `Material` must be quoted.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `REQUEST_FOR_QUOTATION_NOT_EXISTS` - the `RequestForQuotation`
    ///                                        does not exist;
    /// - `ALREADY_ANSWERED` - the `RequestForQuotation` is answered already;
    /// - `DUPLICATE_ITEM` - the same `Material` is quoted twice;
    /// - `UNKNOWN_MATERIAL` - a quoted `Material` is not requested;
    /// - `INCOMPLETE_ANSWER` - a requested `Material` is not quoted;
    /// - `NON_POSITIVE_UNIT_PRICE` - some quoted price is not positive.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "saveRequestForQuotationAnswer",
            otel.name = Self::SPAN_NAME,
            request_for_quotation_id = %request_for_quotation_id,
        ),
    )]
    pub async fn save_request_for_quotation_answer(
        request_for_quotation_id: api::request_for_quotation::Id,
        input: Vec<api::request_for_quotation::QuotedPriceInput>,
        ctx: &Context,
    ) -> Result<api::RequestForQuotation, Error> {
        ctx.service()
            .execute(command::SaveRequestForQuotationAnswer {
                request_for_quotation_id: request_for_quotation_id.into(),
                prices: input
                    .into_iter()
                    .map(|p| (p.material_id.into(), p.unit_price))
                    .collect(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Marks the `RequestForQuotation` as left unanswered by the `Supplier`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `REQUEST_FOR_QUOTATION_NOT_EXISTS` - the `RequestForQuotation`
    ///                                        does not exist;
    /// - `NOT_SUBMITTED` - the `RequestForQuotation` is not waiting for an
    ///                     answer.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "markRequestForQuotationUnanswered",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn mark_request_for_quotation_unanswered(
        id: api::request_for_quotation::Id,
        ctx: &Context,
    ) -> Result<api::RequestForQuotation, Error> {
        ctx.service()
            .execute(command::MarkRequestForQuotationUnanswered {
                request_for_quotation_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Sets the unit price of the `PricedItem`, or clears it if `null`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PRICED_ITEM_NOT_EXISTS` - the `PricedItem` does not exist;
    /// - `NON_POSITIVE_UNIT_PRICE` - the unit price is not positive.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updatePricedItem",
            otel.name = Self::SPAN_NAME,
            priced_item_id = %priced_item_id,
            unit_price = ?unit_price,
        ),
    )]
    pub async fn update_priced_item(
        priced_item_id: api::item::Id,
        unit_price: Option<Money>,
        ctx: &Context,
    ) -> Result<api::PricedItem, Error> {
        ctx.service()
            .execute(command::UpdatePricedItem {
                priced_item_id: priced_item_id.into(),
                unit_price,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

define_error! {
    enum CommandError {
        #[code = "CODE_TAKEN"]
        #[status = CONFLICT]
        #[message = "Provided code is used already"]
        CodeTaken,

        #[code = "SUPPLIER_DELETED"]
        #[status = CONFLICT]
        #[message = "`Supplier` is deleted"]
        SupplierDeleted,

        #[code = "BAD_REQUEST"]
        #[status = BAD_REQUEST]
        #[message = "`Material` is not sold by the `Supplier`"]
        MaterialNotSupplied,

        #[code = "NON_POSITIVE_UNIT_PRICE"]
        #[status = BAD_REQUEST]
        #[message = "Unit price must be positive"]
        NonPositiveUnitPrice,

        #[code = "NON_POSITIVE_AMOUNT"]
        #[status = BAD_REQUEST]
        #[message = "`Payment` amount must be positive"]
        NonPositiveAmount,

        #[code = "NON_CENT_AMOUNT"]
        #[status = BAD_REQUEST]
        #[message = "`Payment` amount must be in whole cents"]
        NonCentAmount,

        #[code = "PAYMENT_EXCEEDS_TOTAL"]
        #[status = BAD_REQUEST]
        #[message = "`Payment`s exceed the total amount of the \
                     `PurchaseOrder`"]
        PaymentExceedsTotal,

        #[code = "PURCHASE_ORDER_CANCELLED"]
        #[status = CONFLICT]
        #[message = "`PurchaseOrder` is cancelled"]
        PurchaseOrderCancelled,
    }
}

impl AsError for command::create_material::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::CodeTaken(_) => Some(CommandError::CodeTaken.into()),
        }
    }
}

impl AsError for command::update_material::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::MaterialNotExists(_) => {
                Some(api::NotExistsError::Material.into())
            }
        }
    }
}

impl AsError for command::delete_material::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::MaterialNotExists(_) => {
                Some(api::NotExistsError::Material.into())
            }
        }
    }
}

impl AsError for command::update_supplier::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::SupplierDeleted(_) => CommandError::SupplierDeleted.into(),
            Self::SupplierNotExists(_) => api::NotExistsError::Supplier.into(),
        })
    }
}

impl AsError for command::delete_supplier::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::SupplierNotExists(_) => {
                Some(api::NotExistsError::Supplier.into())
            }
        }
    }
}

impl AsError for command::add_supplier_material::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::MaterialNotExists(_) => api::NotExistsError::Material.into(),
            Self::SupplierDeleted(_) => CommandError::SupplierDeleted.into(),
            Self::SupplierNotExists(_) => api::NotExistsError::Supplier.into(),
        })
    }
}

impl AsError for command::remove_supplier_material::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "NOT_SUPPLIED"]
                #[status = NOT_FOUND]
                #[message = "`Material` is not sold by the `Supplier`"]
                NotSupplied,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::MaterialNotSupplied(..) => Some(Error::NotSupplied.into()),
        }
    }
}

impl AsError for command::create_part::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::CodeTaken(_) => CommandError::CodeTaken.into(),
            Self::MaterialNotExists(_) => api::NotExistsError::Material.into(),
        })
    }
}

impl AsError for command::delete_part::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::PartNotExists(_) => Some(api::NotExistsError::Part.into()),
        }
    }
}

impl AsError for command::create_machine::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::CodeTaken(_) => CommandError::CodeTaken.into(),
            Self::MaterialNotExists(_) => api::NotExistsError::Material.into(),
            Self::PartNotExists(_) => api::NotExistsError::Part.into(),
        })
    }
}

impl AsError for command::delete_machine::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::MachineNotExists(_) => {
                Some(api::NotExistsError::Machine.into())
            }
        }
    }
}

impl AsError for command::create_purchase_order::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "UNIT_PRICE_MISSING"]
                #[status = BAD_REQUEST]
                #[message = "Unit price of a `Material` is neither provided \
                             nor quoted"]
                UnitPriceMissing,

                #[code = "REQUEST_FOR_QUOTATION_NOT_ANSWERED"]
                #[status = CONFLICT]
                #[message = "`RequestForQuotation` is not answered"]
                RequestForQuotationNotAnswered,

                #[code = "BAD_REQUEST"]
                #[status = BAD_REQUEST]
                #[message = "`RequestForQuotation` is sent to another \
                             `Supplier`"]
                RequestForQuotationOfOtherSupplier,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::AmountTooLarge | Self::StockTooLarge(_) => {
                api::AmountError::TooLarge.into()
            }
            Self::DuplicateMaterial(_) => api::InputError::DuplicateItem.into(),
            Self::MaterialNotSupplied(_) => {
                CommandError::MaterialNotSupplied.into()
            }
            Self::NoMaterials => api::InputError::NoItems.into(),
            Self::NonCentPaymentAmount => CommandError::NonCentAmount.into(),
            Self::NonPositivePaymentAmount => {
                CommandError::NonPositiveAmount.into()
            }
            Self::NonPositiveUnitPrice(_) => {
                CommandError::NonPositiveUnitPrice.into()
            }
            Self::PaymentExceedsTotal(_) => {
                CommandError::PaymentExceedsTotal.into()
            }
            Self::RequestForQuotationNotAnswered(_) => {
                Error::RequestForQuotationNotAnswered.into()
            }
            Self::RequestForQuotationNotExists(_) => {
                api::NotExistsError::RequestForQuotation.into()
            }
            Self::RequestForQuotationOfOtherSupplier(_) => {
                Error::RequestForQuotationOfOtherSupplier.into()
            }
            Self::SupplierDeleted(_) => CommandError::SupplierDeleted.into(),
            Self::SupplierNotExists(_) => api::NotExistsError::Supplier.into(),
            Self::UnitPriceMissing(_) => Error::UnitPriceMissing.into(),
        })
    }
}

impl AsError for command::register_purchase_order_payment::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::NonCentAmount => CommandError::NonCentAmount.into(),
            Self::NonPositiveAmount => CommandError::NonPositiveAmount.into(),
            Self::PaymentExceedsTotal(_) => {
                CommandError::PaymentExceedsTotal.into()
            }
            Self::PurchaseOrderCancelled(_) => {
                CommandError::PurchaseOrderCancelled.into()
            }
            Self::PurchaseOrderNotExists(_) => {
                api::NotExistsError::PurchaseOrder.into()
            }
        })
    }
}

impl AsError for command::mark_purchase_order_delivered::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "ALREADY_DELIVERED"]
                #[status = CONFLICT]
                #[message = "`PurchaseOrder` is delivered already"]
                AlreadyDelivered,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::AlreadyDelivered(_) => Error::AlreadyDelivered.into(),
            Self::PurchaseOrderCancelled(_) => {
                CommandError::PurchaseOrderCancelled.into()
            }
            Self::PurchaseOrderNotExists(_) => {
                api::NotExistsError::PurchaseOrder.into()
            }
            Self::StockTooLarge(_) => api::AmountError::TooLarge.into(),
        })
    }
}

impl AsError for command::cancel_purchase_order::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "ALREADY_CANCELLED"]
                #[status = CONFLICT]
                #[message = "`PurchaseOrder` is cancelled already"]
                AlreadyCancelled,

                #[code = "ALREADY_PAID"]
                #[status = CONFLICT]
                #[message = "`PurchaseOrder` has `Payment`s registered"]
                AlreadyPaid,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::AlreadyCancelled(_) => Error::AlreadyCancelled.into(),
            Self::AlreadyPaid(_) => Error::AlreadyPaid.into(),
            Self::PurchaseOrderNotExists(_) => {
                api::NotExistsError::PurchaseOrder.into()
            }
        })
    }
}

impl AsError for command::create_request_for_quotation::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::DuplicateMaterial(_) => api::InputError::DuplicateItem.into(),
            Self::MaterialNotSupplied(_) => {
                CommandError::MaterialNotSupplied.into()
            }
            Self::NoMaterials => api::InputError::NoItems.into(),
            Self::SupplierDeleted(_) => CommandError::SupplierDeleted.into(),
            Self::SupplierNotExists(_) => api::NotExistsError::Supplier.into(),
        })
    }
}

impl AsError for command::save_request_for_quotation_answer::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "ALREADY_ANSWERED"]
                #[status = CONFLICT]
                #[message = "`RequestForQuotation` is answered already"]
                AlreadyAnswered,

                #[code = "INCOMPLETE_ANSWER"]
                #[status = BAD_REQUEST]
                #[message = "Every requested `Material` must be quoted"]
                IncompleteAnswer,

                #[code = "UNKNOWN_MATERIAL"]
                #[status = BAD_REQUEST]
                #[message = "Quoted `Material` is not requested"]
                UnknownMaterial,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::AlreadyAnswered(_) => Error::AlreadyAnswered.into(),
            Self::DuplicateMaterial(_) => api::InputError::DuplicateItem.into(),
            Self::IncompleteAnswer(_) => Error::IncompleteAnswer.into(),
            Self::NonPositiveUnitPrice(_) => {
                CommandError::NonPositiveUnitPrice.into()
            }
            Self::RequestForQuotationNotExists(_) => {
                api::NotExistsError::RequestForQuotation.into()
            }
            Self::UnknownMaterial(_) => Error::UnknownMaterial.into(),
        })
    }
}

impl AsError
    for command::mark_request_for_quotation_unanswered::ExecutionError
{
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "NOT_SUBMITTED"]
                #[status = CONFLICT]
                #[message = "`RequestForQuotation` is not waiting for an \
                             answer"]
                NotSubmitted,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::NotSubmitted(_) => Error::NotSubmitted.into(),
            Self::RequestForQuotationNotExists(_) => {
                api::NotExistsError::RequestForQuotation.into()
            }
        })
    }
}

impl AsError for command::update_priced_item::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::NonPositiveUnitPrice => {
                CommandError::NonPositiveUnitPrice.into()
            }
            Self::PricedItemNotExists(_) => {
                api::NotExistsError::PricedItem.into()
            }
        })
    }
}

#[cfg(test)]
mod spec {
    use common::Money;
    use service::{command, domain};

    use crate::AsError as _;

    #[test]
    fn maps_command_errors_to_codes() {
        use command::create_purchase_order::ExecutionError as E;

        let material = domain::material::Id::new();
        let cases = [
            (E::MaterialNotSupplied(material), "BAD_REQUEST"),
            (E::PaymentExceedsTotal(Money::ZERO), "PAYMENT_EXCEEDS_TOTAL"),
            (E::UnitPriceMissing(material), "UNIT_PRICE_MISSING"),
            (E::NoMaterials, "NO_ITEMS"),
            (E::NonCentPaymentAmount, "NON_CENT_AMOUNT"),
            (E::AmountTooLarge, "AMOUNT_TOO_LARGE"),
            (E::StockTooLarge(material), "AMOUNT_TOO_LARGE"),
            (
                E::SupplierNotExists(domain::supplier::Id::new()),
                "SUPPLIER_NOT_EXISTS",
            ),
        ];
        for (err, code) in cases {
            assert_eq!(err.into_error().code, code);
        }
    }

    #[test]
    fn codes_catalog_conflicts() {
        let err = command::create_material::ExecutionError::CodeTaken(
            domain::material::Code::new("M-1").unwrap(),
        );
        let err = err.into_error();
        assert_eq!(err.code, "CODE_TAKEN");
        assert_eq!(err.status_code, http::StatusCode::CONFLICT);

        let err = command::cancel_purchase_order::ExecutionError::AlreadyPaid(
            domain::purchase_order::Id::new(),
        )
        .into_error();
        assert_eq!(err.code, "ALREADY_PAID");
    }

    #[test]
    fn rejects_unrepresentable_amounts() {
        use command::register_purchase_order_payment::ExecutionError as E;

        let err = E::NonCentAmount.into_error();
        assert_eq!(err.code, "NON_CENT_AMOUNT");
        assert_eq!(err.status_code, http::StatusCode::BAD_REQUEST);

        let err = command::mark_purchase_order_delivered::ExecutionError::
            StockTooLarge(domain::material::Id::new())
            .into_error();
        assert_eq!(err.code, "AMOUNT_TOO_LARGE");
        assert_eq!(err.status_code, http::StatusCode::UNPROCESSABLE_ENTITY);
    }
}
