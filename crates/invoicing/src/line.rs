use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use gstdesk_core::ValueObject;

/// Opaque reference to the priced item (product id from the master list).
///
/// Never interpreted by the engine; only checked for presence at submit time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductRef(String);

impl ProductRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl core::fmt::Display for ProductRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Caller-supplied numeric inputs of a line.
///
/// Absent fields deserialize as zero, so a half-filled row in a live-editing
/// form still computes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LineInput {
    pub quantity: Decimal,
    /// Unit price, pre-tax.
    pub rate: Decimal,
    /// Percentage discount on the pre-tax line value, 0..=100.
    pub discount_percent: Decimal,
    /// GST rate, 0..=100.
    pub tax_rate_percent: Decimal,
}

impl LineInput {
    pub fn new(
        quantity: Decimal,
        rate: Decimal,
        discount_percent: Decimal,
        tax_rate_percent: Decimal,
    ) -> Self {
        Self {
            quantity,
            rate,
            discount_percent,
            tax_rate_percent,
        }
    }
}

/// Derived amounts of a line. Never set directly; always produced by
/// [`compute_line`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineAmounts {
    pub taxable_value: Decimal,
    pub tax_amount: Decimal,
    pub line_amount: Decimal,
}

impl ValueObject for LineAmounts {}

/// Compute taxable value, tax and line amount for one line.
///
/// Total over its input domain: negative quantities or rates are not rejected
/// and simply propagate as a negative taxable value. Results beyond the
/// decimal range saturate at `Decimal::MAX` / `Decimal::MIN` instead of
/// panicking.
pub fn compute_line(input: &LineInput) -> LineAmounts {
    let mut taxable_value = input.quantity.saturating_mul(input.rate);
    if !input.discount_percent.is_zero() {
        taxable_value =
            taxable_value.saturating_sub(percent_of(taxable_value, input.discount_percent));
    }

    let tax_amount = percent_of(taxable_value, input.tax_rate_percent);

    LineAmounts {
        taxable_value,
        tax_amount,
        line_amount: taxable_value.saturating_add(tax_amount),
    }
}

fn percent_of(value: Decimal, percent: Decimal) -> Decimal {
    // Dividing by a constant 100 shrinks the magnitude and cannot overflow.
    value.saturating_mul(percent) / Decimal::ONE_HUNDRED
}

/// A line item: product reference, inputs and the amounts derived from them.
///
/// Inputs are only reachable through setters that recompute, so the derived
/// amounts can never go stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    product_ref: ProductRef,
    input: LineInput,
    amounts: LineAmounts,
}

impl LineItem {
    pub fn new(product_ref: ProductRef, input: LineInput) -> Self {
        Self {
            product_ref,
            amounts: compute_line(&input),
            input,
        }
    }

    /// Blank row a new document starts with: no product, quantity 1.
    pub fn placeholder() -> Self {
        Self::new(
            ProductRef::default(),
            LineInput {
                quantity: Decimal::ONE,
                ..LineInput::default()
            },
        )
    }

    pub fn product_ref(&self) -> &ProductRef {
        &self.product_ref
    }

    pub fn input(&self) -> &LineInput {
        &self.input
    }

    pub fn amounts(&self) -> &LineAmounts {
        &self.amounts
    }

    pub fn quantity(&self) -> Decimal {
        self.input.quantity
    }

    pub fn rate(&self) -> Decimal {
        self.input.rate
    }

    pub fn discount_percent(&self) -> Decimal {
        self.input.discount_percent
    }

    pub fn tax_rate_percent(&self) -> Decimal {
        self.input.tax_rate_percent
    }

    pub fn taxable_value(&self) -> Decimal {
        self.amounts.taxable_value
    }

    pub fn tax_amount(&self) -> Decimal {
        self.amounts.tax_amount
    }

    pub fn line_amount(&self) -> Decimal {
        self.amounts.line_amount
    }

    pub fn set_product_ref(&mut self, product_ref: ProductRef) {
        self.product_ref = product_ref;
    }

    pub fn set_input(&mut self, input: LineInput) {
        self.input = input;
        self.amounts = compute_line(&self.input);
    }
}
