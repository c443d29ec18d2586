use serde::{Deserialize, Serialize};

use crate::currency::format_inr;
use crate::document::InvoiceDocument;
use crate::words::amount_in_words;

/// Display-ready totals handed to the print/PDF renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintSummary {
    pub sub_total: String,
    pub total_tax: String,
    pub total_discount: String,
    pub grand_total: String,
    pub amount_in_words: String,
    /// Set when the flat discount exceeds the line amounts; the renderer
    /// should flag the document rather than print it silently.
    pub over_discounted: bool,
}

impl PrintSummary {
    pub fn from_document(doc: &InvoiceDocument) -> Self {
        let totals = doc.totals();
        Self {
            sub_total: format_inr(totals.sub_total),
            total_tax: format_inr(totals.total_tax),
            total_discount: format_inr(totals.total_discount),
            grand_total: format_inr(totals.grand_total),
            amount_in_words: amount_in_words(totals.grand_total),
            over_discounted: totals.is_over_discounted(),
        }
    }
}
