use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use gstdesk_core::{Aggregate, AggregateRoot, DomainError, DomainResult, FieldViolation, InvoiceId};

use crate::line::{LineAmounts, LineInput, LineItem, ProductRef};
use crate::numbering::generate_invoice_number;
use crate::totals::{Adjustments, InvoiceTotals, RoundingMode, aggregate};

/// Document lifecycle. There is no terminal state: a persisted invoice can
/// always be reopened for editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentState {
    /// Freshly created, only the placeholder line.
    Empty,
    Editing,
    /// Passed submit-time validation; ready to hand to the gateway.
    Validated,
    /// Accepted by the gateway.
    Persisted,
}

/// Header metadata. Opaque to the engine apart from presence checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceHeader {
    pub invoice_number: String,
    pub invoice_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub seller_ref: String,
    pub buyer_ref: String,
    pub place_of_supply: String,
    pub payment_terms: Option<String>,
}

/// A single header field edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeaderEdit {
    InvoiceNumber(String),
    InvoiceDate(Option<NaiveDate>),
    DueDate(Option<NaiveDate>),
    Seller(String),
    Buyer(String),
    PlaceOfSupply(String),
    PaymentTerms(Option<String>),
}

/// A single line field edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineEdit {
    Product(ProductRef),
    /// Product picked from the master list, bringing its rate and GST rate.
    Priced {
        product_ref: ProductRef,
        rate: Decimal,
        tax_rate_percent: Decimal,
    },
    Quantity(Decimal),
    Rate(Decimal),
    DiscountPercent(Decimal),
    TaxRatePercent(Decimal),
}

/// Line as supplied by the caller when appending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLine {
    pub product_ref: ProductRef,
    pub input: LineInput,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceCommand {
    AddLine(NewLine),
    RemoveLine { index: usize },
    EditLine { index: usize, edit: LineEdit },
    EditHeader(HeaderEdit),
    SetTotalDiscount(Decimal),
    /// Round-up checkbox; checking it clears round-down.
    SetRoundUp(bool),
    /// Round-down checkbox; checking it clears round-up.
    SetRoundDown(bool),
    SetNotes(Option<String>),
    Submit,
    RecordPersisted { id: InvoiceId },
    RecordPersistFailed { reason: String },
    Reopen,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceEvent {
    LineAdded(NewLine),
    LineRemoved { index: usize },
    LineEdited { index: usize, edit: LineEdit },
    HeaderEdited(HeaderEdit),
    TotalDiscountSet { amount: Decimal },
    RoundingSet { mode: RoundingMode },
    NotesSet { notes: Option<String> },
    Validated,
    Persisted { id: InvoiceId },
    PersistFailed { reason: String },
    Reopened,
}

impl InvoiceEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            InvoiceEvent::LineAdded(_) => "invoicing.document.line_added",
            InvoiceEvent::LineRemoved { .. } => "invoicing.document.line_removed",
            InvoiceEvent::LineEdited { .. } => "invoicing.document.line_edited",
            InvoiceEvent::HeaderEdited(_) => "invoicing.document.header_edited",
            InvoiceEvent::TotalDiscountSet { .. } => "invoicing.document.total_discount_set",
            InvoiceEvent::RoundingSet { .. } => "invoicing.document.rounding_set",
            InvoiceEvent::NotesSet { .. } => "invoicing.document.notes_set",
            InvoiceEvent::Validated => "invoicing.document.validated",
            InvoiceEvent::Persisted { .. } => "invoicing.document.persisted",
            InvoiceEvent::PersistFailed { .. } => "invoicing.document.persist_failed",
            InvoiceEvent::Reopened => "invoicing.document.reopened",
        }
    }

    fn is_edit(&self) -> bool {
        matches!(
            self,
            InvoiceEvent::LineAdded(_)
                | InvoiceEvent::LineRemoved { .. }
                | InvoiceEvent::LineEdited { .. }
                | InvoiceEvent::HeaderEdited(_)
                | InvoiceEvent::TotalDiscountSet { .. }
                | InvoiceEvent::RoundingSet { .. }
                | InvoiceEvent::NotesSet { .. }
        )
    }
}

/// Aggregate root: an invoice being edited.
///
/// Totals are recomputed synchronously after every applied edit, so they are
/// never stale with respect to the lines and adjustments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDocument {
    id: Option<InvoiceId>,
    state: DocumentState,
    header: InvoiceHeader,
    lines: Vec<LineItem>,
    adjustments: Adjustments,
    notes: Option<String>,
    totals: InvoiceTotals,
    last_persist_error: Option<String>,
    version: u64,
}

impl Default for InvoiceDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceDocument {
    /// Create an empty document holding one placeholder line.
    pub fn new() -> Self {
        let mut doc = Self {
            id: None,
            state: DocumentState::Empty,
            header: InvoiceHeader::default(),
            lines: vec![LineItem::placeholder()],
            adjustments: Adjustments::default(),
            notes: None,
            totals: InvoiceTotals::default(),
            last_persist_error: None,
            version: 0,
        };
        doc.recompute();
        doc
    }

    /// Rebuild a document from stored parts. Derived amounts are recomputed
    /// from the inputs; nothing computed is trusted from storage.
    pub fn restore(
        id: Option<InvoiceId>,
        header: InvoiceHeader,
        lines: Vec<LineItem>,
        adjustments: Adjustments,
        notes: Option<String>,
    ) -> Self {
        let lines = if lines.is_empty() {
            vec![LineItem::placeholder()]
        } else {
            lines
        };
        let state = if id.is_some() {
            DocumentState::Persisted
        } else {
            DocumentState::Editing
        };

        let mut doc = Self {
            id,
            state,
            header,
            lines,
            adjustments,
            notes,
            totals: InvoiceTotals::default(),
            last_persist_error: None,
            version: 0,
        };
        doc.recompute();
        doc
    }

    pub fn state(&self) -> DocumentState {
        self.state
    }

    pub fn header(&self) -> &InvoiceHeader {
        &self.header
    }

    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    pub fn line_amounts(&self) -> Vec<LineAmounts> {
        self.lines.iter().map(|l| *l.amounts()).collect()
    }

    pub fn adjustments(&self) -> &Adjustments {
        &self.adjustments
    }

    pub fn rounding(&self) -> RoundingMode {
        self.adjustments.rounding
    }

    pub fn round_up(&self) -> bool {
        self.adjustments.rounding.round_up()
    }

    pub fn round_down(&self) -> bool {
        self.adjustments.rounding.round_down()
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn totals(&self) -> &InvoiceTotals {
        &self.totals
    }

    /// Message of the most recent rejected persistence attempt, verbatim.
    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }

    /// Invoice number derived from the buyer reference and `at`.
    pub fn generate_number(&self, at: NaiveDateTime) -> DomainResult<String> {
        generate_invoice_number(&self.header.buyer_ref, at)
    }

    /// Submit-time required-field check. Every missing field is reported.
    pub fn validate(&self) -> DomainResult<()> {
        let mut violations = Vec::new();

        if self.header.invoice_number.trim().is_empty() {
            violations.push(FieldViolation::new(
                "invoiceNumber",
                "Invoice number is required",
            ));
        }
        if self.header.invoice_date.is_none() {
            violations.push(FieldViolation::new("invoiceDate", "Invoice date is required"));
        }
        if self.header.seller_ref.trim().is_empty() {
            violations.push(FieldViolation::new("seller", "Seller is required"));
        }
        if self.header.buyer_ref.trim().is_empty() {
            violations.push(FieldViolation::new("buyer", "Buyer is required"));
        }
        if self.lines.is_empty() {
            violations.push(FieldViolation::new("items", "At least one item is required"));
        }
        for (index, line) in self.lines.iter().enumerate() {
            if line.product_ref().is_blank() {
                violations.push(FieldViolation::new(
                    format!("items.{index}.product"),
                    "Product is required",
                ));
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(DomainError::missing_fields(violations))
        }
    }

    fn recompute(&mut self) {
        let amounts = self.line_amounts();
        self.totals = aggregate(&amounts, &self.adjustments);
    }

    fn ensure_editable(&self) -> DomainResult<()> {
        if self.state == DocumentState::Persisted {
            return Err(DomainError::conflict(
                "invoice is persisted; reopen it before editing",
            ));
        }
        Ok(())
    }

    fn ensure_line(&self, index: usize) -> DomainResult<()> {
        if index >= self.lines.len() {
            return Err(DomainError::validation(format!(
                "line {index} does not exist (document has {} lines)",
                self.lines.len()
            )));
        }
        Ok(())
    }

    fn handle_edit(&self, command: &InvoiceCommand) -> DomainResult<Vec<InvoiceEvent>> {
        self.ensure_editable()?;

        let event = match command {
            InvoiceCommand::AddLine(line) => InvoiceEvent::LineAdded(line.clone()),
            InvoiceCommand::RemoveLine { index } => {
                self.ensure_line(*index)?;
                if self.lines.len() <= 1 {
                    return Err(DomainError::invariant("at least one item is required"));
                }
                InvoiceEvent::LineRemoved { index: *index }
            }
            InvoiceCommand::EditLine { index, edit } => {
                self.ensure_line(*index)?;
                InvoiceEvent::LineEdited {
                    index: *index,
                    edit: edit.clone(),
                }
            }
            InvoiceCommand::EditHeader(edit) => InvoiceEvent::HeaderEdited(edit.clone()),
            InvoiceCommand::SetTotalDiscount(amount) => {
                if amount.is_sign_negative() && !amount.is_zero() {
                    return Err(DomainError::validation(
                        "total discount must not be negative",
                    ));
                }
                InvoiceEvent::TotalDiscountSet { amount: *amount }
            }
            InvoiceCommand::SetRoundUp(checked) => InvoiceEvent::RoundingSet {
                mode: match (*checked, self.adjustments.rounding) {
                    (true, _) => RoundingMode::Up,
                    (false, RoundingMode::Up) => RoundingMode::None,
                    (false, current) => current,
                },
            },
            InvoiceCommand::SetRoundDown(checked) => InvoiceEvent::RoundingSet {
                mode: match (*checked, self.adjustments.rounding) {
                    (true, _) => RoundingMode::Down,
                    (false, RoundingMode::Down) => RoundingMode::None,
                    (false, current) => current,
                },
            },
            InvoiceCommand::SetNotes(notes) => InvoiceEvent::NotesSet {
                notes: notes.clone(),
            },
            other => {
                return Err(DomainError::invariant(format!(
                    "not an edit command: {other:?}"
                )));
            }
        };

        Ok(vec![event])
    }

    fn handle_submit(&self) -> DomainResult<Vec<InvoiceEvent>> {
        if self.state == DocumentState::Persisted {
            return Err(DomainError::conflict(
                "invoice is already persisted; reopen it to submit changes",
            ));
        }
        // A rejected submit emits nothing: an untouched document stays
        // `Empty` and an edited one stays `Editing`.
        self.validate()?;
        Ok(vec![InvoiceEvent::Validated])
    }

    fn ensure_validated(&self) -> DomainResult<()> {
        if self.state != DocumentState::Validated {
            return Err(DomainError::conflict(format!(
                "invoice must be validated before persisting (state: {:?})",
                self.state
            )));
        }
        Ok(())
    }

    fn handle_reopen(&self) -> DomainResult<Vec<InvoiceEvent>> {
        match self.state {
            DocumentState::Persisted | DocumentState::Validated => {
                Ok(vec![InvoiceEvent::Reopened])
            }
            DocumentState::Empty | DocumentState::Editing => Ok(vec![]),
        }
    }

    fn apply_line_edit(&mut self, index: usize, edit: &LineEdit) {
        let Some(line) = self.lines.get_mut(index) else {
            return;
        };

        let mut input = *line.input();
        match edit {
            LineEdit::Product(product_ref) => line.set_product_ref(product_ref.clone()),
            LineEdit::Priced {
                product_ref,
                rate,
                tax_rate_percent,
            } => {
                line.set_product_ref(product_ref.clone());
                input.rate = *rate;
                input.tax_rate_percent = *tax_rate_percent;
            }
            LineEdit::Quantity(v) => input.quantity = *v,
            LineEdit::Rate(v) => input.rate = *v,
            LineEdit::DiscountPercent(v) => input.discount_percent = *v,
            LineEdit::TaxRatePercent(v) => input.tax_rate_percent = *v,
        }
        line.set_input(input);
    }

    fn apply_header_edit(&mut self, edit: &HeaderEdit) {
        let header = &mut self.header;
        match edit {
            HeaderEdit::InvoiceNumber(v) => header.invoice_number = v.clone(),
            HeaderEdit::InvoiceDate(v) => header.invoice_date = *v,
            HeaderEdit::DueDate(v) => header.due_date = *v,
            HeaderEdit::Seller(v) => header.seller_ref = v.clone(),
            HeaderEdit::Buyer(v) => header.buyer_ref = v.clone(),
            HeaderEdit::PlaceOfSupply(v) => header.place_of_supply = v.clone(),
            HeaderEdit::PaymentTerms(v) => header.payment_terms = v.clone(),
        }
    }
}

impl AggregateRoot for InvoiceDocument {
    type Id = InvoiceId;

    fn id(&self) -> Option<&Self::Id> {
        self.id.as_ref()
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl Aggregate for InvoiceDocument {
    type Command = InvoiceCommand;
    type Event = InvoiceEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            InvoiceEvent::LineAdded(line) => {
                self.lines
                    .push(LineItem::new(line.product_ref.clone(), line.input));
            }
            InvoiceEvent::LineRemoved { index } => {
                if *index < self.lines.len() && self.lines.len() > 1 {
                    self.lines.remove(*index);
                }
            }
            InvoiceEvent::LineEdited { index, edit } => self.apply_line_edit(*index, edit),
            InvoiceEvent::HeaderEdited(edit) => self.apply_header_edit(edit),
            InvoiceEvent::TotalDiscountSet { amount } => {
                self.adjustments.total_discount = *amount;
            }
            InvoiceEvent::RoundingSet { mode } => self.adjustments.rounding = *mode,
            InvoiceEvent::NotesSet { notes } => self.notes = notes.clone(),
            InvoiceEvent::Validated => self.state = DocumentState::Validated,
            InvoiceEvent::Persisted { id } => {
                self.id = Some(id.clone());
                self.last_persist_error = None;
                self.state = DocumentState::Persisted;
            }
            InvoiceEvent::PersistFailed { reason } => {
                self.last_persist_error = Some(reason.clone());
                self.state = DocumentState::Validated;
            }
            InvoiceEvent::Reopened => self.state = DocumentState::Editing,
        }

        if event.is_edit() {
            self.state = DocumentState::Editing;
            self.recompute();
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            InvoiceCommand::Submit => self.handle_submit(),
            InvoiceCommand::RecordPersisted { id } => {
                self.ensure_validated()?;
                Ok(vec![InvoiceEvent::Persisted { id: id.clone() }])
            }
            InvoiceCommand::RecordPersistFailed { reason } => {
                self.ensure_validated()?;
                Ok(vec![InvoiceEvent::PersistFailed {
                    reason: reason.clone(),
                }])
            }
            InvoiceCommand::Reopen => self.handle_reopen(),
            edit => self.handle_edit(edit),
        }
    }
}
