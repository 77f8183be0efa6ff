//! Free-form rupee amount parsing.
//!
//! Accepts what people type into a budget box: `₹50,000`, `1.5L`,
//! `2 crore`, `75k`. Arithmetic is done in [`Decimal`] and rounded half
//! away from zero, so `0.0005K` is `1` and `0.0004K` is `0`.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use zeno_shared::types::money::RUPEE_SYMBOL;

/// One thousand.
const THOUSAND: i64 = 1_000;
/// One lakh.
const LAKH: i64 = 100_000;
/// One crore.
const CRORE: i64 = 10_000_000;

/// Parses a free-form rupee amount into whole rupees.
///
/// Returns `None` when the input has no digits or the numeric part is not a
/// valid number (for example two decimal points). Never panics.
///
/// # Example
///
/// ```
/// use zeno_core::estimate::parse_currency;
///
/// assert_eq!(parse_currency("₹50,000"), Some(50_000));
/// assert_eq!(parse_currency("1.5L"), Some(150_000));
/// assert_eq!(parse_currency("2Cr"), Some(20_000_000));
/// assert_eq!(parse_currency("K"), None);
/// ```
#[must_use]
pub fn parse_currency(input: &str) -> Option<i64> {
    let mut number = String::new();
    let mut unit = String::new();

    for ch in input.chars() {
        if ch.is_whitespace() || ch == RUPEE_SYMBOL || ch == ',' {
            continue;
        }
        if ch.is_ascii_digit() || ch == '.' {
            number.push(ch);
        } else {
            unit.extend(ch.to_uppercase());
        }
    }

    if !number.chars().any(|ch| ch.is_ascii_digit()) {
        return None;
    }

    // Decimal::from_str wants a digit on both sides of the point.
    if number.starts_with('.') {
        number.insert(0, '0');
    }
    if number.ends_with('.') {
        number.push('0');
    }

    let value = Decimal::from_str(&number).ok()?;
    value
        .checked_mul(Decimal::from(unit_multiplier(&unit)))?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

/// Resolves a unit suffix. Unknown or empty units multiply by one.
fn unit_multiplier(unit: &str) -> i64 {
    match unit {
        "K" => THOUSAND,
        "L" | "LAKH" | "LAKHS" | "LAC" => LAKH,
        "CR" | "CRORE" => CRORE,
        _ => 1,
    }
}
