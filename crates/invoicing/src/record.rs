//! Serialized invoice as exchanged with the persistence API.
//!
//! Field names follow the dashboard API (`camelCase`, `gst` for total tax,
//! `totalAmount` for the grand total). Computed fields are written from the
//! document on the way out and ignored on the way in: loading a record always
//! recomputes from the inputs.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use gstdesk_core::{AggregateRoot, InvoiceId};

use crate::document::{InvoiceDocument, InvoiceHeader};
use crate::line::{LineInput, LineItem, ProductRef};
use crate::totals::{Adjustments, RoundingMode};

/// Business status tracked by the API. Not interpreted by the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    #[default]
    Draft,
    Sent,
    Paid,
    Overdue,
    Cancelled,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InvoiceItemRecord {
    pub product: ProductRef,
    pub quantity: Decimal,
    /// Line discount, percent.
    pub discount: Decimal,
    pub rate: Decimal,
    pub taxable_value: Decimal,
    /// GST rate, percent.
    pub gst_rate: Decimal,
    pub gst_amount: Decimal,
    pub amount: Decimal,
}

impl InvoiceItemRecord {
    pub fn input(&self) -> LineInput {
        LineInput::new(self.quantity, self.rate, self.discount, self.gst_rate)
    }

    fn from_line(line: &LineItem) -> Self {
        Self {
            product: line.product_ref().clone(),
            quantity: line.quantity(),
            discount: line.discount_percent(),
            rate: line.rate(),
            taxable_value: line.taxable_value(),
            gst_rate: line.tax_rate_percent(),
            gst_amount: line.tax_amount(),
            amount: line.line_amount(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InvoiceRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<InvoiceId>,
    pub invoice_number: String,
    pub invoice_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub seller: String,
    pub buyer: String,
    pub items: Vec<InvoiceItemRecord>,
    pub sub_total: Decimal,
    pub total_discount: Decimal,
    /// Total tax.
    pub gst: Decimal,
    /// Not computed by the engine; always written as zero.
    pub cess: Decimal,
    /// Grand total after flat discount and rounding.
    pub total_amount: Decimal,
    pub taxable_value: Decimal,
    pub place_of_supply: String,
    pub round_up: bool,
    pub round_down: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_terms: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: InvoiceStatus,
}

impl InvoiceRecord {
    /// Serialize a document with its current computed values.
    pub fn from_document(doc: &InvoiceDocument, status: InvoiceStatus) -> Self {
        let header = doc.header();
        let totals = doc.totals();

        Self {
            id: doc.id().cloned(),
            invoice_number: header.invoice_number.clone(),
            invoice_date: header.invoice_date,
            due_date: header.due_date,
            seller: header.seller_ref.clone(),
            buyer: header.buyer_ref.clone(),
            items: doc.lines().iter().map(InvoiceItemRecord::from_line).collect(),
            sub_total: totals.sub_total,
            total_discount: totals.total_discount,
            gst: totals.total_tax,
            cess: Decimal::ZERO,
            total_amount: totals.grand_total,
            taxable_value: totals.sub_total,
            place_of_supply: header.place_of_supply.clone(),
            round_up: doc.round_up(),
            round_down: doc.round_down(),
            payment_terms: header.payment_terms.clone(),
            notes: doc.notes().map(str::to_owned),
            status,
        }
    }

    /// Rebuild a document from inputs only; stored computed values are ignored.
    pub fn to_document(&self) -> InvoiceDocument {
        let header = InvoiceHeader {
            invoice_number: self.invoice_number.clone(),
            invoice_date: self.invoice_date,
            due_date: self.due_date,
            seller_ref: self.seller.clone(),
            buyer_ref: self.buyer.clone(),
            place_of_supply: self.place_of_supply.clone(),
            payment_terms: self.payment_terms.clone(),
        };
        let lines = self
            .items
            .iter()
            .map(|item| LineItem::new(item.product.clone(), item.input()))
            .collect();
        let adjustments = Adjustments {
            total_discount: self.total_discount,
            rounding: RoundingMode::from_flags(self.round_up, self.round_down),
        };

        InvoiceDocument::restore(self.id.clone(), header, lines, adjustments, self.notes.clone())
    }
}
