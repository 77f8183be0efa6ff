//! Core business logic for Zeno.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, pricing rules, and rendering live here.
//!
//! # Modules
//!
//! - `estimate` - Budget normalization and cost estimation
//! - `lead` - Lead and CV application documents, sales email content, store trait
//! - `storage` - CV file storage

pub mod estimate;
pub mod lead;
pub mod storage;
