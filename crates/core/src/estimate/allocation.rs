//! Per-category cost allocation.
//!
//! Itemized categories split the base amount by fixed percentages. Each
//! line is rounded on its own (half away from zero) and the total is the
//! sum of the rounded lines, so the total can differ from the base by a
//! rupee or two. Callers rely on the total matching the visible rows.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use zeno_shared::Money;

use super::render::PLACEHOLDER;
use super::types::{
    BreakdownKind, BudgetInput, CostBreakdown, CostLine, EmployeeSize, ServiceCategory,
};

/// Row label used by retainer breakdowns.
pub const MONTHLY_RETAINER: &str = "Monthly Retainer";

/// Label of an itemized row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareLabel {
    /// Fixed text.
    Named(String),
    /// Replaced by the category's own component name, e.g. "AI Development".
    CoreService,
}

/// One row of an allocation table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationShare {
    /// Row label.
    pub label: ShareLabel,
    /// Percentage of the base amount.
    pub percentage: u8,
}

impl AllocationShare {
    fn named(label: &str, percentage: u8) -> Self {
        Self {
            label: ShareLabel::Named(label.to_string()),
            percentage,
        }
    }

    fn core(percentage: u8) -> Self {
        Self {
            label: ShareLabel::CoreService,
            percentage,
        }
    }
}

/// Monthly retainer price per company size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetainerPrices {
    /// 0-10 employees.
    pub small: i64,
    /// 10-100 employees.
    pub medium: i64,
    /// 100+ employees.
    pub large: i64,
}

impl RetainerPrices {
    /// Monthly price for a size bucket. Unknown size yields `None`.
    #[must_use]
    pub fn for_size(&self, size: Option<EmployeeSize>) -> Option<Money> {
        let rupees = match size? {
            EmployeeSize::Small => self.small,
            EmployeeSize::Medium => self.medium,
            EmployeeSize::Large => self.large,
        };
        Some(Money::new(rupees))
    }
}

/// Price tables used by the allocator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Split for AI, Software Development and App Development.
    pub app_like: Vec<AllocationShare>,
    /// Split for Web Development.
    pub web: Vec<AllocationShare>,
    /// Digital Marketing retainer.
    pub digital_marketing: RetainerPrices,
    /// SEO retainer.
    pub seo: RetainerPrices,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            app_like: vec![
                AllocationShare::named("UI/UX Design", 15),
                AllocationShare::core(30),
                AllocationShare::named("Dashboard Development", 30),
                AllocationShare::named("Testing", 10),
                AllocationShare::named("Deployment", 10),
                AllocationShare::named("API & hosting", 5),
            ],
            web: vec![
                AllocationShare::named("UI/UX Design", 20),
                AllocationShare::named("Web Development", 50),
                AllocationShare::named("Testing", 10),
                AllocationShare::named("Deployment", 10),
                AllocationShare::named("API & hosting", 10),
            ],
            digital_marketing: RetainerPrices {
                small: 25_000,
                medium: 40_000,
                large: 70_000,
            },
            seo: RetainerPrices {
                small: 10_000,
                medium: 15_000,
                large: 20_000,
            },
        }
    }
}

/// Builds the cost breakdown for a request.
///
/// `base` is the materialized budget. When it is `None` every itemized line
/// and the total are unknown rather than zero.
#[must_use]
pub fn allocate(pricing: &PricingConfig, input: &BudgetInput, base: Option<i64>) -> CostBreakdown {
    let category = input.category;
    match category {
        ServiceCategory::Ai | ServiceCategory::SoftwareDevelopment | ServiceCategory::AppDevelopment => {
            itemized(category, &pricing.app_like, base)
        }
        ServiceCategory::WebDevelopment => itemized(category, &pricing.web, base),
        ServiceCategory::DigitalMarketing => {
            retainer(category, &pricing.digital_marketing, input.employee_size)
        }
        ServiceCategory::Seo => retainer(category, &pricing.seo, input.employee_size),
        ServiceCategory::Other => CostBreakdown {
            category,
            kind: BreakdownKind::Placeholder,
            base: None,
            lines: vec![CostLine {
                label: PLACEHOLDER.to_string(),
                percentage: None,
                amount: None,
            }],
            total: None,
        },
    }
}

fn itemized(
    category: ServiceCategory,
    shares: &[AllocationShare],
    base: Option<i64>,
) -> CostBreakdown {
    let core_label = category.core_component().unwrap_or(category.as_str());

    let lines: Vec<CostLine> = shares
        .iter()
        .map(|share| CostLine {
            label: match &share.label {
                ShareLabel::Named(label) => label.clone(),
                ShareLabel::CoreService => core_label.to_string(),
            },
            percentage: Some(share.percentage),
            amount: base.and_then(|base| share_of(base, share.percentage)),
        })
        .collect();

    let total = if base.is_some() {
        lines
            .iter()
            .try_fold(0_i64, |acc, line| acc.checked_add(line.amount?.rupees()))
            .map(Money::new)
    } else {
        None
    };

    CostBreakdown {
        category,
        kind: BreakdownKind::Itemized,
        base: base.map(Money::new),
        lines,
        total,
    }
}

fn retainer(
    category: ServiceCategory,
    prices: &RetainerPrices,
    size: Option<EmployeeSize>,
) -> CostBreakdown {
    let monthly = prices.for_size(size);
    CostBreakdown {
        category,
        kind: BreakdownKind::Retainer,
        base: None,
        lines: vec![CostLine {
            label: MONTHLY_RETAINER.to_string(),
            percentage: None,
            amount: monthly,
        }],
        total: monthly,
    }
}

/// `round(base * percentage / 100)`, half away from zero.
fn share_of(base: i64, percentage: u8) -> Option<Money> {
    (Decimal::from(base) * Decimal::from(percentage) / Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .map(Money::new)
}
