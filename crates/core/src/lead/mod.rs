//! Lead capture: submissions, sales notifications and document persistence.
//!
//! Handlers hand the raw JSON object to [`LeadSubmission`] for the typed
//! fields, build the sales email with [`notification`] and persist the raw
//! object through a [`ResilientStore`]. Neither mail nor store failures fail
//! a submission; they are reported in [`StoreOutcome`] and the mail report.

pub mod application;
pub mod notification;
pub mod store;
pub mod submission;

pub use application::{CvApplication, stamp_created_at, timestamp};
pub use notification::{cv_upload_email, lead_email, lead_overview_html};
pub use store::{LeadStore, ResilientStore, StoreBackend, StoreError, StoreOutcome};
pub use submission::LeadSubmission;
