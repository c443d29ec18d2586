use chrono::NaiveDateTime;

use gstdesk_core::{DomainError, DomainResult};

/// Characters of the buyer reference used as the number prefix.
const BUYER_PREFIX_LEN: usize = 5;

/// Generate an invoice number of the form `{buyer prefix}_{YYYYMMDD}_{HHMMSS}`.
///
/// The timestamp is supplied by the caller (local wall-clock time in the
/// dashboard) so generation stays deterministic.
pub fn generate_invoice_number(buyer_ref: &str, at: NaiveDateTime) -> DomainResult<String> {
    let buyer_ref = buyer_ref.trim();
    if buyer_ref.is_empty() {
        return Err(DomainError::validation(
            "a buyer must be selected before generating an invoice number",
        ));
    }

    let prefix: String = buyer_ref.chars().take(BUYER_PREFIX_LEN).collect();
    Ok(format!("{prefix}_{}", at.format("%Y%m%d_%H%M%S")))
}
