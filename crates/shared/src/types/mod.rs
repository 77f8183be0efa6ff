//! Common types used across the application.

pub mod id;
pub mod money;


pub use id::DocumentId;
pub use money::Money;
