//! Whole-rupee money amounts.
//!
//! Estimates are quoted in whole rupees only, so the amount is an integer.
//! Fractional values are resolved (and rounded) before a `Money` exists.

use serde::{Deserialize, Serialize};

/// Currency glyph used when displaying amounts.
pub const RUPEE_SYMBOL: char = '₹';

/// A monetary amount in whole Indian rupees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates an amount from whole rupees.
    #[must_use]
    pub const fn new(rupees: i64) -> Self {
        Self(rupees)
    }

    /// Returns the amount in whole rupees.
    #[must_use]
    pub const fn rupees(self) -> i64 {
        self.0
    }
}

/// Renders `₹` followed by the amount with comma thousands separators,
/// e.g. `₹1,500,000`.
impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{sign}{RUPEE_SYMBOL}{grouped}")
    }
}
