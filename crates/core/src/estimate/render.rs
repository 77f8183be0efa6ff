//! Estimate presentation.
//!
//! Produces the structured rows returned to the chatbot and the HTML block
//! embedded in the chat bubble and the sales email.

use serde::Serialize;
use zeno_shared::{ContactConfig, Money};

use super::types::{BreakdownKind, CostBreakdown, ServiceCategory};

/// Display value for unknown amounts.
pub const PLACEHOLDER: &str = "-";

/// Disclaimer for retainer categories.
pub const MIN_ENGAGEMENT_NOTE: &str = "Minimum engagement for this service is 6 months.";

/// Disclaimer for everything else.
pub const INDICATIVE_PRICING_NOTE: &str = "Note: The above pricing is indicative and may vary after we start working and refine the scope in detail.";

/// Contact line shown under every estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactDetails {
    /// Sales email address.
    pub email: String,
    /// Sales phone number.
    pub phone: String,
}

impl ContactDetails {
    /// Creates contact details.
    #[must_use]
    pub fn new(email: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            phone: phone.into(),
        }
    }

    /// `Contact: <email> | <phone>`.
    #[must_use]
    pub fn line(&self) -> String {
        format!("Contact: {} | {}", self.email, self.phone)
    }
}

impl From<&ContactConfig> for ContactDetails {
    fn from(config: &ContactConfig) -> Self {
        Self::new(config.email.clone(), config.phone.clone())
    }
}

/// A display row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedRow {
    /// Component label.
    pub label: String,
    /// Formatted cost or [`PLACEHOLDER`].
    pub cost: String,
}

/// A formatted estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedEstimate {
    /// Table title.
    pub title: String,
    /// Column headers.
    pub headers: [&'static str; 2],
    /// Rows in display order.
    pub rows: Vec<RenderedRow>,
    /// Footer total. Only itemized tables have one.
    pub total: Option<String>,
    /// Disclaimers, in display order.
    pub notes: Vec<String>,
    /// Contact line.
    pub contact: String,
    /// The whole estimate as an HTML fragment.
    #[serde(skip)]
    pub html: String,
}

/// Formats a breakdown for display.
#[must_use]
pub fn render(breakdown: &CostBreakdown, contact: &ContactDetails) -> RenderedEstimate {
    let retainer = breakdown.kind == BreakdownKind::Retainer;
    let headers = match breakdown.kind {
        BreakdownKind::Itemized => ["Component", "Estimated Cost"],
        BreakdownKind::Retainer | BreakdownKind::Placeholder => ["Item", "Estimated Cost"],
    };

    let rows: Vec<RenderedRow> = breakdown
        .lines
        .iter()
        .map(|line| RenderedRow {
            label: line.label.clone(),
            cost: match line.amount {
                Some(amount) if retainer => format!("{amount}/ month"),
                amount => display(amount),
            },
        })
        .collect();

    let total = (breakdown.kind == BreakdownKind::Itemized).then(|| display(breakdown.total));

    let notes = if breakdown.category.is_retainer() {
        vec![MIN_ENGAGEMENT_NOTE.to_string()]
    } else {
        vec![INDICATIVE_PRICING_NOTE.to_string()]
    };

    let mut rendered = RenderedEstimate {
        title: title(breakdown.category).to_string(),
        headers,
        rows,
        total,
        notes,
        contact: contact.line(),
        html: String::new(),
    };
    rendered.html = to_html(&rendered, retainer);
    rendered
}

fn title(category: ServiceCategory) -> &'static str {
    match category {
        ServiceCategory::Other => "Estimate",
        other => other.core_component().unwrap_or(other.as_str()),
    }
}

fn display(amount: Option<Money>) -> String {
    amount.map_or_else(|| PLACEHOLDER.to_string(), |amount| amount.to_string())
}

fn to_html(estimate: &RenderedEstimate, retainer: bool) -> String {
    let rows: String = estimate
        .rows
        .iter()
        .map(|row| {
            format!(
                "<tr><td>{}</td><td>{}</td></tr>",
                escape_html(&row.label),
                escape_html(&row.cost)
            )
        })
        .collect();

    let footer = estimate
        .total
        .as_deref()
        .map(|total| {
            format!(
                "\n  <tfoot><tr><th>Total</th><th>{}</th></tr></tfoot>",
                escape_html(total)
            )
        })
        .unwrap_or_default();

    let notes: String = estimate
        .notes
        .iter()
        .map(|note| {
            if retainer {
                format!(
                    "<p style='margin:8px 0 0;font-style:italic;'>{}</p>",
                    escape_html(note)
                )
            } else {
                format!("<p style='margin:10px 0 6px;'>{}</p>", escape_html(note))
            }
        })
        .collect();

    format!(
        "\n<div class=\"estimate-title\">{title}</div>\n\
         <table class=\"estimate-table\">\n  \
         <thead><tr><th>{h0}</th><th>{h1}</th></tr></thead>\n  \
         <tbody>{rows}</tbody>{footer}\n\
         </table>\n\
         {notes}<p style='margin:6px 0 0;'>{contact}</p>",
        title = escape_html(&estimate.title),
        h0 = estimate.headers[0],
        h1 = estimate.headers[1],
        contact = escape_html(&estimate.contact),
    )
}

/// Escapes text for use inside HTML elements and attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
