use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use gstdesk_client::{
    ApiErrorKind, Autopopulate, DropdownOption, FilterCondition, InMemoryInvoiceGateway,
    InMemoryMasterList, InvoiceGateway, ManualClock, MasterList, Predicate, SubmitError,
    SubmitOptions, submit_invoice,
};
use gstdesk_core::{Aggregate, AggregateRoot};
use gstdesk_invoicing::{
    DocumentState, HeaderEdit, InvoiceCommand, InvoiceDocument, LineEdit, LineInput, NewLine,
    PrintSummary, ProductRef,
};
use rust_decimal_macros::dec;

fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 4, 1)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

fn lookup() -> Autopopulate<InMemoryMasterList> {
    let source = InMemoryMasterList::new();
    source.set(
        MasterList::Products,
        vec![DropdownOption {
            id: "prod-cable".into(),
            title: Some("Copper Cable".into()),
            rate: Some(dec!(250)),
            gst_rate: Some(dec!(12)),
            ..DropdownOption::default()
        }],
    );
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap(),
    ));
    Autopopulate::new(source, clock)
}

fn drafted_invoice(lookup: &mut Autopopulate<InMemoryMasterList>) -> InvoiceDocument {
    let mut doc = InvoiceDocument::new();
    let cable = lookup.options(MasterList::Products).remove(0);

    let commands = [
        InvoiceCommand::EditHeader(HeaderEdit::InvoiceDate(Some(at(9, 0).date()))),
        InvoiceCommand::EditHeader(HeaderEdit::Seller("seller-volt".into())),
        InvoiceCommand::EditHeader(HeaderEdit::Buyer("66a0ravi77".into())),
        InvoiceCommand::EditHeader(HeaderEdit::PlaceOfSupply("Karnataka".into())),
        InvoiceCommand::EditLine {
            index: 0,
            edit: cable.priced_line_edit(),
        },
        InvoiceCommand::EditLine {
            index: 0,
            edit: LineEdit::Quantity(dec!(2)),
        },
        InvoiceCommand::EditLine {
            index: 0,
            edit: LineEdit::DiscountPercent(dec!(10)),
        },
        InvoiceCommand::AddLine(NewLine {
            product_ref: ProductRef::new("prod-labour"),
            input: LineInput::new(dec!(1), dec!(100), dec!(0), dec!(18)),
        }),
        InvoiceCommand::SetTotalDiscount(dec!(22.5)),
        InvoiceCommand::SetRoundDown(true),
    ];
    for command in &commands {
        doc.execute(command).unwrap();
    }
    doc
}

#[test]
fn draft_submit_reopen_and_update() {
    let gateway = InMemoryInvoiceGateway::new();
    let mut lookup = lookup();
    let mut doc = drafted_invoice(&mut lookup);

    // 504 + 118 - 22.5 = 599.5, rounded down.
    assert_eq!(doc.totals().sub_total, dec!(550));
    assert_eq!(doc.totals().total_tax, dec!(72));
    assert_eq!(doc.totals().grand_total, dec!(599));

    let created = submit_invoice(&mut doc, &gateway, &SubmitOptions::default(), at(9, 30)).unwrap();
    let id = created.id.unwrap();
    assert_eq!(created.invoice_number, "66a0r_20240401_093000");
    assert_eq!(doc.state(), DocumentState::Persisted);
    assert_eq!(
        PrintSummary::from_document(&doc).amount_in_words,
        "Rupees Five Hundred and Ninety Nine Only"
    );

    let edit = InvoiceCommand::EditLine {
        index: 1,
        edit: LineEdit::Quantity(dec!(3)),
    };
    assert!(doc.execute(&edit).is_err());
    doc.execute(&InvoiceCommand::Reopen).unwrap();
    doc.execute(&edit).unwrap();
    assert_eq!(doc.totals().grand_total, dec!(835));

    let updated = submit_invoice(&mut doc, &gateway, &SubmitOptions::default(), at(10, 0)).unwrap();
    assert_eq!(updated.id.as_ref(), Some(&id));
    assert_eq!(updated.invoice_number, created.invoice_number);
    assert_eq!(gateway.len(), 1);

    let stored = gateway.get(&id).unwrap();
    let reloaded = stored.to_document();
    assert_eq!(reloaded.id(), Some(&id));
    assert_eq!(reloaded.totals(), doc.totals());

    let found = gateway
        .list(&[FilterCondition::new(
            "buyer",
            Predicate::Contains("ravi".into()),
        )])
        .unwrap();
    assert_eq!(found.len(), 1);
}

#[test]
fn duplicate_number_is_reported_and_document_can_retry() {
    let gateway = InMemoryInvoiceGateway::new();
    let mut lookup = lookup();

    let mut first = drafted_invoice(&mut lookup);
    submit_invoice(&mut first, &gateway, &SubmitOptions::default(), at(9, 30)).unwrap();

    // Same buyer and timestamp yields the same generated number.
    let mut second = drafted_invoice(&mut lookup);
    let err = submit_invoice(&mut second, &gateway, &SubmitOptions::default(), at(9, 30)).unwrap_err();
    match &err {
        SubmitError::Persistence(api) => assert_eq!(api.kind, ApiErrorKind::Conflict),
        other => panic!("expected persistence error, got {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        "Conflict: invoice number 66a0r_20240401_093000 already exists"
    );
    assert_eq!(second.state(), DocumentState::Validated);
    assert_eq!(second.last_persist_error(), Some(err.to_string().as_str()));

    second.execute(&InvoiceCommand::Reopen).unwrap();
    second
        .execute(&InvoiceCommand::EditHeader(HeaderEdit::InvoiceNumber(
            "RAVI-0002".into(),
        )))
        .unwrap();
    submit_invoice(&mut second, &gateway, &SubmitOptions::default(), at(9, 31)).unwrap();
    assert_eq!(gateway.len(), 2);
}

#[test]
fn incomplete_invoice_never_reaches_the_gateway() {
    let gateway = InMemoryInvoiceGateway::new();
    let mut doc = InvoiceDocument::new();

    let err = submit_invoice(&mut doc, &gateway, &SubmitOptions::default(), at(9, 0)).unwrap_err();
    let SubmitError::Domain(domain) = err else {
        panic!("expected a domain error");
    };
    let fields: Vec<_> = domain.violations().iter().map(|v| v.field.as_str()).collect();
    assert_eq!(
        fields,
        ["invoiceNumber", "invoiceDate", "seller", "buyer", "items.0.product"]
    );
    assert!(gateway.is_empty());
    assert_eq!(doc.state(), DocumentState::Empty);
}
