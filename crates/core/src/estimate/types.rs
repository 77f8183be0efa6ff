//! Estimate data types.

use serde::{Deserialize, Serialize};
use zeno_shared::Money;

/// Service category selected in the chatbot.
///
/// Anything the chatbot sends that is not one of the known categories maps
/// to [`ServiceCategory::Other`] and gets a placeholder estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceCategory {
    /// AI solutions.
    #[serde(rename = "AI")]
    Ai,
    /// Custom software.
    #[serde(rename = "Software Development")]
    SoftwareDevelopment,
    /// Mobile apps.
    #[serde(rename = "App Development")]
    AppDevelopment,
    /// Websites.
    #[serde(rename = "Web Development")]
    WebDevelopment,
    /// Monthly digital marketing retainer.
    #[serde(rename = "Digital Marketing")]
    DigitalMarketing,
    /// Monthly SEO retainer.
    #[serde(rename = "SEO")]
    Seo,
    /// Unrecognized or missing category.
    #[serde(other, rename = "Other")]
    Other,
}

impl ServiceCategory {
    /// All recognized categories, in chatbot order.
    pub const KNOWN: [Self; 6] = [
        Self::Ai,
        Self::SoftwareDevelopment,
        Self::AppDevelopment,
        Self::WebDevelopment,
        Self::DigitalMarketing,
        Self::Seo,
    ];

    /// Maps the chatbot's category string. Unknown values become `Other`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        Self::KNOWN
            .into_iter()
            .find(|category| category.as_str() == value)
            .unwrap_or(Self::Other)
    }

    /// The chatbot's display string for this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ai => "AI",
            Self::SoftwareDevelopment => "Software Development",
            Self::AppDevelopment => "App Development",
            Self::WebDevelopment => "Web Development",
            Self::DigitalMarketing => "Digital Marketing",
            Self::Seo => "SEO",
            Self::Other => "Other",
        }
    }

    /// Whether this category is billed as a flat monthly retainer.
    #[must_use]
    pub const fn is_retainer(self) -> bool {
        matches!(self, Self::DigitalMarketing | Self::Seo)
    }

    /// Label of the category-specific line in the itemized app-like table.
    #[must_use]
    pub const fn core_component(self) -> Option<&'static str> {
        match self {
            Self::Ai => Some("AI Development"),
            Self::SoftwareDevelopment => Some("Software Development"),
            Self::AppDevelopment => Some("App Development"),
            _ => None,
        }
    }
}

impl std::fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Company size bucket, used to pick a retainer price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmployeeSize {
    /// 0-10 employees.
    #[serde(rename = "0-10")]
    Small,
    /// 10-100 employees.
    #[serde(rename = "10-100")]
    Medium,
    /// More than 100 employees.
    #[serde(rename = "100+")]
    Large,
}

impl EmployeeSize {
    /// Maps the chatbot's bucket string. Unknown values yield `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "0-10" => Some(Self::Small),
            "10-100" => Some(Self::Medium),
            "100+" => Some(Self::Large),
            _ => None,
        }
    }

    /// The bucket string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Small => "0-10",
            Self::Medium => "10-100",
            Self::Large => "100+",
        }
    }
}

/// Request fields relevant to pricing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetInput {
    /// Selected service category.
    pub category: ServiceCategory,
    /// Company size bucket, if known.
    pub employee_size: Option<EmployeeSize>,
    /// Free-form budget bracket label.
    pub budget_label: Option<String>,
    /// Explicit amount in rupees. Takes precedence over the label when non-zero.
    pub budget_amount: Option<i64>,
}

impl BudgetInput {
    /// Creates an input with no budget information.
    #[must_use]
    pub const fn new(category: ServiceCategory) -> Self {
        Self {
            category,
            employee_size: None,
            budget_label: None,
            budget_amount: None,
        }
    }

    /// Builds an input from the chatbot's raw strings.
    #[must_use]
    pub fn from_fields(
        category: Option<&str>,
        employee_size: Option<&str>,
        budget_label: Option<&str>,
        budget_amount: Option<i64>,
    ) -> Self {
        Self {
            category: category.map_or(ServiceCategory::Other, ServiceCategory::parse),
            employee_size: employee_size.and_then(EmployeeSize::parse),
            budget_label: budget_label
                .map(str::trim)
                .filter(|label| !label.is_empty())
                .map(ToString::to_string),
            budget_amount,
        }
    }

    /// Sets the employee size bucket.
    #[must_use]
    pub const fn with_employee_size(mut self, size: EmployeeSize) -> Self {
        self.employee_size = Some(size);
        self
    }

    /// Sets the budget label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.budget_label = Some(label.into());
        self
    }

    /// Sets the explicit budget amount.
    #[must_use]
    pub const fn with_amount(mut self, amount: i64) -> Self {
        self.budget_amount = Some(amount);
        self
    }
}

/// Shape of a cost breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakdownKind {
    /// Percentage split of a base amount.
    Itemized,
    /// Flat monthly retainer.
    Retainer,
    /// No pricing available for the category.
    Placeholder,
}

/// One row of a cost breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostLine {
    /// Component label.
    pub label: String,
    /// Share of the base amount, for itemized rows.
    pub percentage: Option<u8>,
    /// Computed amount. `None` means unknown.
    pub amount: Option<Money>,
}

/// Ordered cost breakdown for a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Category the breakdown was computed for.
    pub category: ServiceCategory,
    /// Shape of the breakdown.
    pub kind: BreakdownKind,
    /// Base amount the percentages were applied to.
    pub base: Option<Money>,
    /// Rows in display order.
    pub lines: Vec<CostLine>,
    /// Sum of the rounded lines, or the monthly retainer. `None` means unknown.
    pub total: Option<Money>,
}

impl CostBreakdown {
    /// Whether any amount in the breakdown is known.
    #[must_use]
    pub fn is_priced(&self) -> bool {
        self.total.is_some()
    }
}
