//! [`Command`] definition.

pub mod add_supplier_material;
pub mod cancel_purchase_order;
pub mod create_machine;
pub mod create_material;
pub mod create_part;
pub mod create_purchase_order;
pub mod create_request_for_quotation;
pub mod create_supplier;
pub mod delete_machine;
pub mod delete_material;
pub mod delete_part;
pub mod delete_supplier;
pub mod mark_purchase_order_delivered;
pub mod mark_request_for_quotation_unanswered;
pub mod register_purchase_order_payment;
pub mod remove_supplier_material;
pub mod save_request_for_quotation_answer;
pub mod update_material;
pub mod update_priced_item;
pub mod update_supplier;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    add_supplier_material::AddSupplierMaterial,
    cancel_purchase_order::CancelPurchaseOrder,
    create_machine::CreateMachine, create_material::CreateMaterial,
    create_part::CreatePart, create_purchase_order::CreatePurchaseOrder,
    create_request_for_quotation::CreateRequestForQuotation,
    create_supplier::CreateSupplier, delete_machine::DeleteMachine,
    delete_material::DeleteMaterial, delete_part::DeletePart,
    delete_supplier::DeleteSupplier,
    mark_purchase_order_delivered::MarkPurchaseOrderDelivered,
    mark_request_for_quotation_unanswered::MarkRequestForQuotationUnanswered,
    register_purchase_order_payment::RegisterPurchaseOrderPayment,
    remove_supplier_material::RemoveSupplierMaterial,
    save_request_for_quotation_answer::SaveRequestForQuotationAnswer,
    update_material::UpdateMaterial, update_priced_item::UpdatePricedItem,
    update_supplier::UpdateSupplier,
};
