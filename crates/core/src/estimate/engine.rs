//! The estimate pipeline.

use tracing::debug;

use super::allocation::{PricingConfig, allocate};
use super::descriptor::{classify, materialize};
use super::render::{ContactDetails, RenderedEstimate, render};
use super::types::{BudgetInput, CostBreakdown};

/// Estimate engine holding the immutable price tables and contact line.
#[derive(Debug, Clone)]
pub struct EstimateEngine {
    pricing: PricingConfig,
    contact: ContactDetails,
}

impl EstimateEngine {
    /// Creates an engine.
    #[must_use]
    pub const fn new(pricing: PricingConfig, contact: ContactDetails) -> Self {
        Self { pricing, contact }
    }

    /// Classifies, materializes and allocates a budget.
    #[must_use]
    pub fn breakdown(&self, input: &BudgetInput) -> CostBreakdown {
        let descriptor = classify(input);
        let base = materialize(descriptor.as_ref());
        let breakdown = allocate(&self.pricing, input, base);
        debug!(
            category = %input.category,
            descriptor = ?descriptor,
            base = ?base,
            priced = breakdown.is_priced(),
            "Computed cost breakdown"
        );
        breakdown
    }

    /// Runs the full pipeline and formats the result.
    #[must_use]
    pub fn estimate(&self, input: &BudgetInput) -> RenderedEstimate {
        render(&self.breakdown(input), &self.contact)
    }
}

impl Default for EstimateEngine {
    fn default() -> Self {
        Self::new(
            PricingConfig::default(),
            ContactDetails::from(&zeno_shared::ContactConfig::default()),
        )
    }
}
