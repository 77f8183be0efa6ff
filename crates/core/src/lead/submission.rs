//! Chatbot lead submissions.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::estimate::{BudgetInput, parse_currency};

/// Typed view of the fields the chatbot collects.
///
/// Deserialization is lenient: numbers and booleans are accepted where text
/// is expected, and `budget_amount` may be a number, a numeric string or a
/// currency string such as `"1.5L"`. Unknown keys are ignored here but kept
/// in the stored document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LeadSubmission {
    /// Contact name.
    #[serde(deserialize_with = "lenient_text")]
    pub name: Option<String>,
    /// Company name.
    #[serde(deserialize_with = "lenient_text")]
    pub company_name: Option<String>,
    /// Contact email.
    #[serde(deserialize_with = "lenient_text")]
    pub email: Option<String>,
    /// Contact phone.
    #[serde(deserialize_with = "lenient_text")]
    pub phone: Option<String>,
    /// Chatbot path taken, e.g. "service" or "job".
    #[serde(deserialize_with = "lenient_text")]
    pub path: Option<String>,
    /// Service category.
    #[serde(deserialize_with = "lenient_text")]
    pub category: Option<String>,
    /// Company size bucket.
    #[serde(deserialize_with = "lenient_text")]
    pub employee_size: Option<String>,
    /// Budget bracket label.
    #[serde(deserialize_with = "lenient_text")]
    pub budget: Option<String>,
    /// Explicit budget in rupees. Zero and negative values count as absent.
    #[serde(deserialize_with = "lenient_amount")]
    pub budget_amount: Option<i64>,
    /// Desired start time.
    #[serde(deserialize_with = "lenient_text")]
    pub start_time: Option<String>,
    /// Free-text requirements.
    #[serde(deserialize_with = "lenient_text")]
    pub requirement_text: Option<String>,
    /// Stored CV filename, for job applicants.
    #[serde(deserialize_with = "lenient_text")]
    pub cv_filename: Option<String>,
}

impl LeadSubmission {
    /// Reads the typed fields of a submitted JSON object.
    #[must_use]
    pub fn from_document(document: &Map<String, Value>) -> Self {
        // Every field is lenient, so an object always deserializes.
        Self::deserialize(&Value::Object(document.clone())).unwrap_or_default()
    }

    /// Pricing-relevant fields.
    #[must_use]
    pub fn budget_input(&self) -> BudgetInput {
        BudgetInput::from_fields(
            self.category.as_deref(),
            self.employee_size.as_deref(),
            self.budget.as_deref(),
            self.budget_amount,
        )
    }

    /// Non-blank contact email, used as reply-to address.
    #[must_use]
    pub fn reply_to(&self) -> Option<&str> {
        self.email.as_deref().map(str::trim).filter(|e| !e.is_empty())
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }))
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(amount_from_value).filter(|amount| *amount > 0))
}

fn amount_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_u64().and_then(|n| i64::try_from(n).ok()))
            .or_else(|| {
                number
                    .as_f64()
                    .and_then(Decimal::from_f64)
                    .map(|d| d.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
                    .and_then(|d| d.to_i64())
            }),
        Value::String(text) => parse_currency(text),
        _ => None,
    }
}
