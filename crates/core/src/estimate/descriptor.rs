//! Budget classification and materialization.

use serde::{Deserialize, Serialize};

use super::types::BudgetInput;

/// Normalized budget.
///
/// Amounts are whole rupees and never negative; for `Range`, `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BudgetDescriptor {
    /// An exact amount.
    Fixed {
        /// Amount in rupees.
        amount: i64,
    },
    /// An inclusive bracket.
    Range {
        /// Lower bound in rupees.
        min: i64,
        /// Upper bound in rupees.
        max: i64,
    },
    /// An open-ended "at least" bracket.
    MinimumBound {
        /// Lower bound in rupees.
        min: i64,
    },
}

impl BudgetDescriptor {
    /// Collapses the descriptor to the single amount used as allocation base.
    ///
    /// Ranges use their midpoint, rounded half away from zero.
    #[must_use]
    pub fn point_estimate(self) -> i64 {
        match self {
            Self::Fixed { amount } => amount,
            Self::Range { min, max } => {
                let sum = i128::from(min) + i128::from(max);
                // Both bounds are non-negative, so +1 before halving rounds .5 up.
                i64::try_from((sum + 1) / 2).unwrap_or(i64::MAX)
            }
            Self::MinimumBound { min } => min,
        }
    }
}

/// The four budget brackets offered by the chatbot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BudgetBracket {
    /// Below ₹50K.
    #[serde(rename = "under_50k")]
    Under50K,
    /// ₹50K to ₹1L.
    #[serde(rename = "50k_1l")]
    From50KTo1L,
    /// ₹1L to ₹5L.
    #[serde(rename = "1l_5l")]
    From1LTo5L,
    /// Above ₹5L.
    #[serde(rename = "above_5l")]
    Above5L,
}

impl BudgetBracket {
    /// All brackets, lowest first.
    pub const ALL: [Self; 4] = [
        Self::Under50K,
        Self::From50KTo1L,
        Self::From1LTo5L,
        Self::Above5L,
    ];

    /// Stable identifier.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Under50K => "under_50k",
            Self::From50KTo1L => "50k_1l",
            Self::From1LTo5L => "1l_5l",
            Self::Above5L => "above_5l",
        }
    }

    /// Label shown by the chatbot.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Under50K => "0 < ₹50K",
            Self::From50KTo1L => "₹50K - ₹1L",
            Self::From1LTo5L => "₹1L - ₹5L",
            Self::Above5L => "> ₹5L",
        }
    }

    /// Matches a label against the identifier or chatbot label of each
    /// bracket. Case, runs of whitespace and the dash glyph (`-`, `–`, `—`,
    /// `−`) are ignored; anything else must match exactly.
    #[must_use]
    pub fn from_label(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        let normalized = normalize_label(value);
        Self::ALL.into_iter().find(|bracket| {
            bracket.id().eq_ignore_ascii_case(value) || normalize_label(bracket.label()) == normalized
        })
    }

    /// The descriptor this bracket stands for.
    #[must_use]
    pub const fn descriptor(self) -> BudgetDescriptor {
        match self {
            Self::Under50K => BudgetDescriptor::Range { min: 0, max: 50_000 },
            Self::From50KTo1L => BudgetDescriptor::Range {
                min: 50_000,
                max: 100_000,
            },
            Self::From1LTo5L => BudgetDescriptor::Range {
                min: 100_000,
                max: 500_000,
            },
            Self::Above5L => BudgetDescriptor::MinimumBound { min: 500_000 },
        }
    }
}

fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .map(|c| match c {
            '\u{2013}' | '\u{2014}' | '\u{2212}' => '-',
            other => other,
        })
        .flat_map(char::to_lowercase)
        .collect()
}

/// Classifies the budget fields of a request.
///
/// A non-zero explicit amount always wins over the label. Negative amounts
/// are treated as absent.
#[must_use]
pub fn classify(input: &BudgetInput) -> Option<BudgetDescriptor> {
    if let Some(amount) = input.budget_amount.filter(|amount| *amount > 0) {
        return Some(BudgetDescriptor::Fixed { amount });
    }

    let label = input.budget_label.as_deref()?;
    BudgetBracket::from_label(label).map(BudgetBracket::descriptor)
}

/// Collapses an optional descriptor to the allocation base.
#[must_use]
pub fn materialize(descriptor: Option<&BudgetDescriptor>) -> Option<i64> {
    descriptor.map(|descriptor| descriptor.point_estimate())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimate::types::ServiceCategory;
    use rstest::rstest;

    fn input() -> BudgetInput {
        BudgetInput::new(ServiceCategory::WebDevelopment)
    }

    #[rstest]
    #[case("under_50k", BudgetBracket::Under50K)]
    #[case("0 < ₹50K", BudgetBracket::Under50K)]
    #[case("  0 < ₹50k ", BudgetBracket::Under50K)]
    #[case("50K_1L", BudgetBracket::From50KTo1L)]
    #[case("₹50K - ₹1L", BudgetBracket::From50KTo1L)]
    #[case("1l_5l", BudgetBracket::From1LTo5L)]
    #[case("₹1L - ₹5L", BudgetBracket::From1LTo5L)]
    #[case("above_5l", BudgetBracket::Above5L)]
    #[case("> ₹5L", BudgetBracket::Above5L)]
    #[case("₹50K – ₹1L", BudgetBracket::From50KTo1L)]
    #[case("₹1L — ₹5L", BudgetBracket::From1LTo5L)]
    #[case("₹50K − ₹1L", BudgetBracket::From50KTo1L)]
    #[case("₹50K  -  ₹1L", BudgetBracket::From50KTo1L)]
    fn test_bracket_from_label(#[case] label: &str, #[case] expected: BudgetBracket) {
        assert_eq!(BudgetBracket::from_label(label), Some(expected));
    }

    #[rstest]
    #[case("")]
    #[case("lots")]
    #[case("₹50K")]
    #[case("between ₹50K and ₹1L")]
    #[case("> ₹10L")]
    #[case("₹50K-₹1L")]
    fn test_unknown_labels_do_not_match(#[case] label: &str) {
        assert_eq!(BudgetBracket::from_label(label), None);
    }

    #[test]
    fn test_bracket_ids_round_trip() {
        for bracket in BudgetBracket::ALL {
            assert_eq!(BudgetBracket::from_label(bracket.id()), Some(bracket));
            assert_eq!(BudgetBracket::from_label(bracket.label()), Some(bracket));
        }
    }

    #[test]
    fn test_classify_amount_wins() {
        let input = input().with_label("> ₹5L").with_amount(12_345);
        assert_eq!(
            classify(&input),
            Some(BudgetDescriptor::Fixed { amount: 12_345 })
        );
    }

    #[test]
    fn test_classify_zero_or_negative_amount_falls_back_to_label() {
        let zero = input().with_label("₹50K - ₹1L").with_amount(0);
        assert_eq!(
            classify(&zero),
            Some(BudgetDescriptor::Range {
                min: 50_000,
                max: 100_000
            })
        );

        let negative = input().with_amount(-10);
        assert_eq!(classify(&negative), None);
    }

    #[test]
    fn test_classify_brackets() {
        assert_eq!(
            classify(&input().with_label("0 < ₹50K")),
            Some(BudgetDescriptor::Range { min: 0, max: 50_000 })
        );
        assert_eq!(
            classify(&input().with_label("> ₹5L")),
            Some(BudgetDescriptor::MinimumBound { min: 500_000 })
        );
    }

    #[test]
    fn test_classify_missing_or_unknown_label() {
        assert_eq!(classify(&input()), None);
        assert_eq!(classify(&input().with_label("")), None);
        assert_eq!(classify(&input().with_label("whatever works")), None);
    }

    #[rstest]
    #[case(BudgetDescriptor::Fixed { amount: 42 }, 42)]
    #[case(BudgetDescriptor::Range { min: 50_000, max: 100_000 }, 75_000)]
    #[case(BudgetDescriptor::Range { min: 0, max: 50_000 }, 25_000)]
    #[case(BudgetDescriptor::Range { min: 100_000, max: 500_000 }, 300_000)]
    #[case(BudgetDescriptor::Range { min: 0, max: 1 }, 1)]
    #[case(BudgetDescriptor::Range { min: i64::MAX, max: i64::MAX }, i64::MAX)]
    #[case(BudgetDescriptor::MinimumBound { min: 500_000 }, 500_000)]
    fn test_point_estimate(#[case] descriptor: BudgetDescriptor, #[case] expected: i64) {
        assert_eq!(descriptor.point_estimate(), expected);
        assert_eq!(materialize(Some(&descriptor)), Some(expected));
    }

    #[test]
    fn test_materialize_none() {
        assert_eq!(materialize(None), None);
    }

    #[test]
    fn test_descriptor_serialization() {
        let json = serde_json::to_value(BudgetDescriptor::Range {
            min: 1,
            max: 2,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"type": "range", "min": 1, "max": 2}));
    }
}
