use gstdesk_core::InvoiceId;
use gstdesk_invoicing::InvoiceRecord;

use crate::error::ApiError;
use crate::filter::FilterCondition;

/// Persistence API for invoices.
///
/// Implementations own transport, status-code mapping and any retry policy.
/// Callers get back either the stored record (with its server-assigned id)
/// or an [`ApiError`] whose message is surfaced verbatim.
pub trait InvoiceGateway: Send + Sync {
    /// Store a new invoice. The returned record carries the assigned id.
    fn create(&self, record: &InvoiceRecord) -> Result<InvoiceRecord, ApiError>;

    /// Replace an existing invoice.
    fn update(&self, id: &InvoiceId, record: &InvoiceRecord) -> Result<InvoiceRecord, ApiError>;

    fn get(&self, id: &InvoiceId) -> Result<InvoiceRecord, ApiError>;

    /// Records matching every condition (see [`crate::filter::matches_all`]).
    fn list(&self, filters: &[FilterCondition]) -> Result<Vec<InvoiceRecord>, ApiError>;

    fn delete(&self, id: &InvoiceId) -> Result<(), ApiError>;

    /// Delete several invoices, returning how many existed.
    fn delete_many(&self, ids: &[InvoiceId]) -> Result<usize, ApiError>;
}
