use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use gstdesk_core::ValueObject;

use crate::line::{LineAmounts, LineInput, compute_line};

/// Document-level rounding of the grand total.
///
/// An enum rather than two flags, so "round up and round down" cannot be
/// represented. [`RoundingMode::round_up`] / [`RoundingMode::round_down`] give
/// the two-checkbox view the API expects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundingMode {
    /// Keep two decimal places (half away from zero).
    #[default]
    None,
    /// Ceiling to the next whole currency unit.
    Up,
    /// Floor to the previous whole currency unit.
    Down,
}

impl RoundingMode {
    /// Build from the API's flag pair. `roundUp` wins if both are set.
    pub fn from_flags(round_up: bool, round_down: bool) -> Self {
        match (round_up, round_down) {
            (true, _) => Self::Up,
            (false, true) => Self::Down,
            (false, false) => Self::None,
        }
    }

    pub fn round_up(self) -> bool {
        self == Self::Up
    }

    pub fn round_down(self) -> bool {
        self == Self::Down
    }

    pub fn apply(self, value: Decimal) -> Decimal {
        match self {
            Self::Up => value.ceil(),
            Self::Down => value.floor(),
            Self::None => value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        }
    }
}

/// Document-level adjustments applied after summing the lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Adjustments {
    /// Flat discount subtracted once from the summed line amounts.
    pub total_discount: Decimal,
    pub rounding: RoundingMode,
}

impl ValueObject for Adjustments {}

/// Document totals. Always derived from the current lines and adjustments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotals {
    /// Sum of taxable values.
    pub sub_total: Decimal,
    /// Sum of tax amounts.
    pub total_tax: Decimal,
    /// Sum of line amounts, before the flat discount and rounding.
    pub raw_total: Decimal,
    pub total_discount: Decimal,
    pub rounding: RoundingMode,
    pub grand_total: Decimal,
}

impl ValueObject for InvoiceTotals {}

impl InvoiceTotals {
    /// The flat discount exceeds the summed lines and drove the grand total
    /// below zero. Accepted as a value; callers should warn.
    pub fn is_over_discounted(&self) -> bool {
        self.grand_total.is_sign_negative() && !self.grand_total.is_zero()
    }
}

/// Result of a full recomputation: fresh per-line amounts (same order as the
/// inputs) and the document totals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Computation {
    pub lines: Vec<LineAmounts>,
    pub totals: InvoiceTotals,
}

/// Recompute every line and the document totals.
///
/// Pure: returns new line amounts instead of writing them back into the
/// inputs. Never fails; an empty slice yields zero sums, and the flat discount
/// may still push the grand total negative.
pub fn compute_totals(lines: &[LineInput], adjustments: &Adjustments) -> Computation {
    let amounts: Vec<LineAmounts> = lines.iter().map(compute_line).collect();
    let totals = aggregate(&amounts, adjustments);
    Computation {
        lines: amounts,
        totals,
    }
}

/// Fold already-computed line amounts into document totals.
///
/// Sums saturate at the decimal range limits rather than overflowing.
pub fn aggregate(lines: &[LineAmounts], adjustments: &Adjustments) -> InvoiceTotals {
    let mut sub_total = Decimal::ZERO;
    let mut total_tax = Decimal::ZERO;
    let mut raw_total = Decimal::ZERO;

    for line in lines {
        sub_total = sub_total.saturating_add(line.taxable_value);
        total_tax = total_tax.saturating_add(line.tax_amount);
        raw_total = raw_total.saturating_add(line.line_amount);
    }

    // Only a positive flat discount is subtracted.
    let total_discount = adjustments.total_discount.max(Decimal::ZERO);
    let grand_total = adjustments.rounding.apply(raw_total.saturating_sub(total_discount));

    InvoiceTotals {
        sub_total,
        total_tax,
        raw_total,
        total_discount,
        rounding: adjustments.rounding,
        grand_total,
    }
}
