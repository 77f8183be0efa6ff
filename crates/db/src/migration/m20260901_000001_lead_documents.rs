//! Lead documents migration.
//!
//! Creates the table holding chatbot leads and CV applications as JSON
//! documents, grouped by collection.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(LEAD_DOCUMENTS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP TABLE IF EXISTS lead_documents CASCADE;")
            .await?;
        Ok(())
    }
}

const LEAD_DOCUMENTS_SQL: &str = r"
-- Leads and CV applications, stored as submitted
CREATE TABLE lead_documents (
    id UUID PRIMARY KEY,
    collection VARCHAR(64) NOT NULL,
    email TEXT,
    document JSONB NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_document_object CHECK (jsonb_typeof(document) = 'object')
);

-- Recent documents per collection (sales review)
CREATE INDEX idx_lead_documents_collection_created ON lead_documents(collection, created_at DESC);

-- Lookup by contact email
CREATE INDEX idx_lead_documents_email ON lead_documents(email) WHERE email IS NOT NULL;
";
