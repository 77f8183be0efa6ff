//! Shared types, errors, and configuration for Zeno.
//!
//! This crate provides common types used across all other crates:
//! - Whole-rupee money formatting
//! - Typed IDs for stored documents
//! - Application-wide error types
//! - Configuration management
//! - Sales team mail delivery (SendGrid API with SMTP fallback)

pub mod config;
pub mod email;
pub mod error;
pub mod types;

#[cfg(test)]
mod error_tests;

pub use config::{
    AppConfig, CollectionsConfig, ContactConfig, DataApiConfig, DatabaseConfig, EmailConfig,
    EmailTransportMode, ServerConfig, UploadConfig,
};
pub use email::{
    DeliveryReport, EmailAttachment, EmailError, MailTransport, OutgoingEmail, SalesMailer,
    SendGridTransport, SmtpTransport,
};
pub use error::AppError;
pub use types::{DocumentId, Money};
