//! GST invoice calculation engine.
//!
//! This crate turns invoice line items into taxable values, tax amounts and
//! document totals, renders amounts in words (Indian numbering), and models
//! the invoice document lifecycle. It is purely deterministic domain logic
//! (no IO, no HTTP, no storage).

pub mod currency;
pub mod document;
pub mod line;
pub mod numbering;
pub mod print;
pub mod record;
pub mod totals;
pub mod words;

pub use currency::format_inr;
pub use document::{
    DocumentState, HeaderEdit, InvoiceCommand, InvoiceDocument, InvoiceEvent, InvoiceHeader,
    LineEdit, NewLine,
};
pub use line::{LineAmounts, LineInput, LineItem, ProductRef, compute_line};
pub use numbering::generate_invoice_number;
pub use print::PrintSummary;
pub use record::{InvoiceItemRecord, InvoiceRecord, InvoiceStatus};
pub use totals::{Adjustments, Computation, InvoiceTotals, RoundingMode, aggregate, compute_totals};
pub use words::{TOO_LARGE, amount_in_words, to_words};
