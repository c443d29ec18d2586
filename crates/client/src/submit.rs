//! Submit flow: validate the document, hand it to the gateway, record the
//! outcome on the document.

use chrono::NaiveDateTime;
use thiserror::Error;

use gstdesk_core::{Aggregate, AggregateRoot, DomainError};
use gstdesk_invoicing::{HeaderEdit, InvoiceCommand, InvoiceDocument, InvoiceRecord, InvoiceStatus};

use crate::error::ApiError;
use crate::gateway::InvoiceGateway;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// Validation failed or the document is in the wrong state. Missing
    /// fields are listed in the inner error.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The gateway rejected the call; message passed through unchanged.
    #[error("{0}")]
    Persistence(ApiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitOptions {
    /// Assign `{buyer}_{date}_{time}` when the invoice number is blank.
    pub auto_number: bool,
    pub status: InvoiceStatus,
}

impl Default for SubmitOptions {
    fn default() -> Self {
        Self {
            auto_number: true,
            status: InvoiceStatus::Draft,
        }
    }
}

/// Validate and persist `doc`.
///
/// New documents are created, documents that already carry an id are
/// updated. On success the document moves to `Persisted` with the
/// server-assigned id; on a gateway failure it stays `Validated` and the
/// gateway message is returned as-is. No retries.
pub fn submit_invoice<G>(
    doc: &mut InvoiceDocument,
    gateway: &G,
    options: &SubmitOptions,
    now: NaiveDateTime,
) -> Result<InvoiceRecord, SubmitError>
where
    G: InvoiceGateway + ?Sized,
{
    if options.auto_number && doc.header().invoice_number.trim().is_empty() {
        // A blank buyer is left for validation to report.
        if let Ok(number) = doc.generate_number(now) {
            doc.execute(&InvoiceCommand::EditHeader(HeaderEdit::InvoiceNumber(number)))?;
        }
    }

    if let Err(err) = doc.execute(&InvoiceCommand::Submit) {
        tracing::info!(
            missing = err.violations().len(),
            error = %err,
            "invoice submission rejected"
        );
        return Err(err.into());
    }

    let record = InvoiceRecord::from_document(doc, options.status);
    let invoice_number = record.invoice_number.clone();
    let result = match doc.id() {
        Some(id) => gateway.update(id, &record),
        None => gateway.create(&record),
    };

    let outcome = result.and_then(|stored| match stored.id.clone() {
        Some(id) => Ok((id, stored)),
        None => Err(ApiError::transport("API response did not include an invoice id")),
    });

    match outcome {
        Ok((id, stored)) => {
            doc.execute(&InvoiceCommand::RecordPersisted { id: id.clone() })?;
            tracing::info!(%invoice_number, invoice_id = %id, "invoice saved");
            Ok(stored)
        }
        Err(err) => {
            doc.execute(&InvoiceCommand::RecordPersistFailed {
                reason: err.message.clone(),
            })?;
            tracing::warn!(
                %invoice_number,
                kind = ?err.kind,
                error = %err,
                "failed to save invoice"
            );
            Err(SubmitError::Persistence(err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::in_memory::InMemoryInvoiceGateway;
    use chrono::NaiveDate;
    use gstdesk_invoicing::{DocumentState, LineEdit};
    use rust_decimal_macros::dec;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 4, 1)
            .unwrap()
            .and_hms_opt(10, 15, 0)
            .unwrap()
    }

    fn ready_document() -> InvoiceDocument {
        let mut doc = InvoiceDocument::new();
        let commands = [
            InvoiceCommand::EditHeader(HeaderEdit::InvoiceDate(Some(now().date()))),
            InvoiceCommand::EditHeader(HeaderEdit::Seller("seller-1".into())),
            InvoiceCommand::EditHeader(HeaderEdit::Buyer("ACME1234".into())),
            InvoiceCommand::EditLine {
                index: 0,
                edit: LineEdit::Priced {
                    product_ref: "prod-1".into(),
                    rate: dec!(100),
                    tax_rate_percent: dec!(18),
                },
            },
        ];
        for command in &commands {
            doc.execute(command).unwrap();
        }
        doc
    }

    #[test]
    fn assigns_number_and_persists() {
        let gateway = InMemoryInvoiceGateway::new();
        let mut doc = ready_document();

        let stored = submit_invoice(&mut doc, &gateway, &SubmitOptions::default(), now()).unwrap();

        assert_eq!(stored.invoice_number, "ACME1_20240401_101500");
        assert_eq!(stored.total_amount, dec!(118));
        assert_eq!(doc.state(), DocumentState::Persisted);
        assert_eq!(doc.id().cloned(), stored.id);
    }

    #[test]
    fn without_auto_numbering_the_number_is_reported_missing() {
        let gateway = InMemoryInvoiceGateway::new();
        let mut doc = ready_document();
        let options = SubmitOptions {
            auto_number: false,
            ..SubmitOptions::default()
        };

        let err = submit_invoice(&mut doc, &gateway, &options, now()).unwrap_err();
        match err {
            SubmitError::Domain(DomainError::MissingFields(v)) => {
                assert_eq!(v.len(), 1);
                assert_eq!(v[0].field, "invoiceNumber");
            }
            other => panic!("expected missing fields, got {other:?}"),
        }
        assert!(gateway.is_empty());
    }

    #[test]
    fn gateway_failure_is_surfaced_verbatim() {
        let gateway = InMemoryInvoiceGateway::new();
        gateway.fail_next(ApiError::from_status(503, "Service Unavailable"));
        let mut doc = ready_document();

        let err = submit_invoice(&mut doc, &gateway, &SubmitOptions::default(), now()).unwrap_err();
        let expected = ApiError::from_status(503, "Service Unavailable").message;
        assert_eq!(err.to_string(), expected);
        assert_eq!(doc.state(), DocumentState::Validated);
        assert_eq!(doc.last_persist_error(), Some(expected.as_str()));

        // Retrying is the caller's decision.
        submit_invoice(&mut doc, &gateway, &SubmitOptions::default(), now()).unwrap();
        assert_eq!(doc.state(), DocumentState::Persisted);
    }
}
