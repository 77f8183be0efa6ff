//! `SeaORM` entity definitions.

pub mod lead_documents;
