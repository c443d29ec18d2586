use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

use gstdesk_client::{
    Autopopulate, AutopopulateData, DropdownOption, InMemoryInvoiceGateway, InMemoryMasterList,
    MasterList, SubmitOptions, SystemClock, submit_invoice,
};
use gstdesk_invoicing::{InvoiceRecord, PrintSummary, amount_in_words, format_inr};

use crate::config::CliConfig;

/// Recomputed invoice plus its display totals.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeOutput {
    pub invoice: InvoiceRecord,
    pub summary: PrintSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordsOutput {
    pub amount: String,
    pub words: String,
}

fn parse_invoice(json: &str) -> Result<InvoiceRecord> {
    serde_json::from_str(json).context("invoice JSON does not match the invoice record shape")
}

/// Recompute every derived value of a stored invoice from its inputs.
pub fn compute(json: &str) -> Result<ComputeOutput> {
    let stored = parse_invoice(json)?;
    let doc = stored.to_document();
    Ok(ComputeOutput {
        invoice: InvoiceRecord::from_document(&doc, stored.status),
        summary: PrintSummary::from_document(&doc),
    })
}

/// Validate and submit against an in-memory gateway (dry run).
pub fn submit(json: &str, config: &CliConfig, now: NaiveDateTime) -> Result<ComputeOutput> {
    let stored = parse_invoice(json)?;
    let mut doc = InvoiceRecord {
        id: None,
        ..stored.clone()
    }
    .to_document();

    let gateway = InMemoryInvoiceGateway::new();
    let options = SubmitOptions {
        auto_number: config.auto_number,
        status: stored.status,
    };
    let invoice = submit_invoice(&mut doc, &gateway, &options, now)?;
    Ok(ComputeOutput {
        invoice,
        summary: PrintSummary::from_document(&doc),
    })
}

/// Options from a master-list snapshot, optionally narrowed by a search.
pub fn lookup(
    json: &str,
    list: MasterList,
    query: Option<&str>,
    config: &CliConfig,
) -> Result<Vec<DropdownOption>> {
    let data: AutopopulateData =
        serde_json::from_str(json).context("master-list JSON must hold products, customers and sellers")?;

    let source = InMemoryMasterList::new();
    source.set(MasterList::Products, data.products);
    source.set(MasterList::Customers, data.customers);
    source.set(MasterList::Sellers, data.sellers);

    let mut lookup = Autopopulate::with_ttl(source, Arc::new(SystemClock), config.lookup_ttl);
    Ok(match query {
        Some(query) => lookup.search(list, query),
        None => lookup.options(list),
    })
}

pub fn words(amount: Decimal) -> WordsOutput {
    WordsOutput {
        amount: format_inr(amount),
        words: amount_in_words(amount),
    }
}
