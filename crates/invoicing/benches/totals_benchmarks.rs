use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use gstdesk_core::Aggregate;
use gstdesk_invoicing::{
    Adjustments, InvoiceCommand, InvoiceDocument, LineEdit, LineInput, RoundingMode,
    compute_totals, to_words,
};

fn lines(count: usize) -> Vec<LineInput> {
    (0..count)
        .map(|i| {
            LineInput::new(
                Decimal::from(1 + i % 7),
                Decimal::new(12_345 + i as i64, 2),
                Decimal::from(i % 15),
                Decimal::from([0, 5, 12, 18, 28][i % 5]),
            )
        })
        .collect()
}

/// Full recomputation over documents of growing size.
fn bench_compute_totals(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_totals");
    let adjustments = Adjustments {
        total_discount: Decimal::new(4_990, 2),
        rounding: RoundingMode::Up,
    };

    for size in [1usize, 10, 100, 1_000] {
        let input = lines(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| compute_totals(black_box(input), black_box(&adjustments)))
        });
    }
    group.finish();
}

/// One keystroke on a 50-line document: edit + eager recompute.
fn bench_document_edit(c: &mut Criterion) {
    let mut doc = InvoiceDocument::new();
    for _ in 0..49 {
        let _ = doc.execute(&InvoiceCommand::AddLine(Default::default()));
    }

    c.bench_function("document_edit_quantity", |b| {
        let mut quantity = 0i64;
        b.iter(|| {
            quantity += 1;
            let command = InvoiceCommand::EditLine {
                index: 25,
                edit: LineEdit::Quantity(Decimal::from(quantity)),
            };
            black_box(doc.execute(&command))
        })
    });
}

fn bench_to_words(c: &mut Criterion) {
    c.bench_function("to_words_crore", |b| {
        b.iter(|| to_words(black_box(Decimal::from(987_654_321u64))))
    });
}

criterion_group!(benches, bench_compute_totals, bench_document_edit, bench_to_words);
criterion_main!(benches);
