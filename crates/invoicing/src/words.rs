//! Amount-in-words rendering using the Indian numbering system.
//!
//! Bands are Hundred, Thousand, Lakh (10^5) and Crore (10^7); there is no
//! million/billion grouping. Anything from one hundred crore (10^9) upwards
//! is rendered as [`TOO_LARGE`].

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Rendered for amounts at or above 10^9.
pub const TOO_LARGE: &str = "Number too large";

const CEILING: u64 = 1_000_000_000;

const ONES: [&str; 20] = [
    "Zero",
    "One",
    "Two",
    "Three",
    "Four",
    "Five",
    "Six",
    "Seven",
    "Eight",
    "Nine",
    "Ten",
    "Eleven",
    "Twelve",
    "Thirteen",
    "Fourteen",
    "Fifteen",
    "Sixteen",
    "Seventeen",
    "Eighteen",
    "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

/// (divisor, band name), largest first. Each band covers values below the
/// next larger divisor.
const BANDS: [(u64, &str); 3] = [(10_000_000, "Crore"), (100_000, "Lakh"), (1_000, "Thousand")];

/// Render `amount` in words.
///
/// The amount is first rounded to a whole currency unit (half away from
/// zero); paise are dropped. Negative amounts, which only arise from an
/// over-discounted invoice, are prefixed with "Minus".
pub fn to_words(amount: Decimal) -> String {
    let whole = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let magnitude = whole.abs();

    let words = match magnitude.to_u64() {
        Some(n) if n < CEILING => render(n),
        _ => return TOO_LARGE.to_string(),
    };

    if whole.is_sign_negative() && !whole.is_zero() {
        format!("Minus {words}")
    } else {
        words
    }
}

/// Printed form: "Rupees <words> Only".
pub fn amount_in_words(amount: Decimal) -> String {
    format!("Rupees {} Only", to_words(amount))
}

fn render(n: u64) -> String {
    if n < 20 {
        return ONES[n as usize].to_string();
    }
    if n < 100 {
        let tens = TENS[(n / 10) as usize];
        return match n % 10 {
            0 => tens.to_string(),
            unit => format!("{tens} {}", ONES[unit as usize]),
        };
    }
    if n < 1_000 {
        let head = format!("{} Hundred", ONES[(n / 100) as usize]);
        return match n % 100 {
            0 => head,
            rest => format!("{head} and {}", render(rest)),
        };
    }

    let (divisor, name) = BANDS
        .into_iter()
        .find(|(divisor, _)| n >= *divisor)
        .unwrap_or(BANDS[BANDS.len() - 1]);

    let head = format!("{} {name}", render(n / divisor));
    match n % divisor {
        0 => head,
        rest => format!("{head} {}", render(rest)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn zero() {
        assert_eq!(to_words(Decimal::ZERO), "Zero");
    }

    #[test]
    fn thousands_use_indian_banding() {
        assert_eq!(to_words(dec!(89090)), "Eighty Nine Thousand Ninety");
    }

    #[test]
    fn small_numbers() {
        assert_eq!(to_words(dec!(7)), "Seven");
        assert_eq!(to_words(dec!(13)), "Thirteen");
        assert_eq!(to_words(dec!(40)), "Forty");
        assert_eq!(to_words(dec!(99)), "Ninety Nine");
    }

    #[test]
    fn hundreds_join_the_remainder_with_and() {
        assert_eq!(to_words(dec!(100)), "One Hundred");
        assert_eq!(to_words(dec!(105)), "One Hundred and Five");
        assert_eq!(to_words(dec!(213)), "Two Hundred and Thirteen");
    }

    #[test]
    fn lakh_and_crore() {
        assert_eq!(to_words(dec!(100000)), "One Lakh");
        assert_eq!(
            to_words(dec!(1234567)),
            "Twelve Lakh Thirty Four Thousand Five Hundred and Sixty Seven"
        );
        assert_eq!(to_words(dec!(10000000)), "One Crore");
        assert_eq!(
            to_words(dec!(999999999)),
            "Ninety Nine Crore Ninety Nine Lakh Ninety Nine Thousand Nine Hundred and Ninety Nine"
        );
    }

    #[test]
    fn paise_are_rounded_away() {
        assert_eq!(to_words(dec!(212.4)), "Two Hundred and Twelve");
        assert_eq!(to_words(dec!(212.5)), "Two Hundred and Thirteen");
        assert_eq!(to_words(dec!(0.49)), "Zero");
    }

    #[test]
    fn ceiling_is_explicit() {
        assert_eq!(to_words(dec!(1000000000)), TOO_LARGE);
        assert_eq!(to_words(dec!(999999999.5)), TOO_LARGE);
        assert_eq!(to_words(dec!(123456789012)), TOO_LARGE);
    }

    #[test]
    fn negative_amounts_are_prefixed() {
        assert_eq!(to_words(dec!(-50)), "Minus Fifty");
        assert_eq!(to_words(dec!(-0.4)), "Zero");
    }

    #[test]
    fn printed_form() {
        assert_eq!(
            amount_in_words(dec!(213)),
            "Rupees Two Hundred and Thirteen Only"
        );
    }
}
