//! Budget normalization and cost estimation.
//!
//! The engine is a straight pipeline of pure functions:
//!
//! ```text
//! BudgetInput ─► classify ─► materialize ─► allocate ─► render
//!                  │              │             │           │
//!          BudgetDescriptor   base amount  CostBreakdown  RenderedEstimate
//! ```
//!
//! Free-form amounts ("₹1.5L", "2 crore") go through [`parse_currency`].
//! Nothing in this module performs I/O or fails: missing or malformed input
//! collapses to "unknown" amounts, which render as a placeholder.

pub mod allocation;
pub mod currency;
pub mod descriptor;
pub mod engine;
pub mod render;
pub mod types;


pub use allocation::{
    AllocationShare, MONTHLY_RETAINER, PricingConfig, RetainerPrices, ShareLabel, allocate,
};
pub use currency::parse_currency;
pub use descriptor::{BudgetBracket, BudgetDescriptor, classify, materialize};
pub use engine::EstimateEngine;
pub use render::{
    ContactDetails, INDICATIVE_PRICING_NOTE, MIN_ENGAGEMENT_NOTE, PLACEHOLDER, RenderedEstimate,
    RenderedRow, escape_html, render,
};
pub use types::{BreakdownKind, BudgetInput, CostBreakdown, CostLine, EmployeeSize, ServiceCategory};
