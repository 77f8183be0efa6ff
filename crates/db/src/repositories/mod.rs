//! Repository implementations for data access.

mod data_api;
mod lead_document;

pub use data_api::DataApiClient;
pub use lead_document::LeadDocumentRepository;
