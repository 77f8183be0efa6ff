//! CV file storage using Apache OpenDAL.
//!
//! Uploaded CVs are validated (PDF only, size capped), renamed to a safe
//! timestamped name and written to either a local directory or an
//! S3-compatible bucket:
//!
//! ```text
//! "My CV (final).pdf" ─► validate ─► 20260108093000_My_CV_final.pdf ─► op.write
//! ```

mod config;
mod error;
mod service;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use service::{StorageService, StoredFile, secure_filename};
