//! Lead document repository for database operations.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde_json::Value;
use uuid::Uuid;
use zeno_core::lead::{LeadStore, StoreBackend, StoreError};
use zeno_shared::DocumentId;

use crate::entities::lead_documents;

/// Repository storing lead and application documents in Postgres.
#[derive(Debug, Clone)]
pub struct LeadDocumentRepository {
    db: DatabaseConnection,
}

impl LeadDocumentRepository {
    /// Creates a new lead document repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a document into a collection.
    ///
    /// The top-level `email` field, when it is a non-blank string, is copied
    /// into its own column for lookups.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        collection: &str,
        document: &Value,
    ) -> Result<lead_documents::Model, DbErr> {
        let email = document
            .get("email")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(String::from);

        let model = lead_documents::ActiveModel {
            id: Set(DocumentId::new().into_inner()),
            collection: Set(collection.to_string()),
            email: Set(email),
            document: Set(document.clone()),
            created_at: Set(chrono::Utc::now().into()),
        };

        model.insert(&self.db).await
    }

    /// Finds a document by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<lead_documents::Model>, DbErr> {
        lead_documents::Entity::find_by_id(id).one(&self.db).await
    }

    /// Most recent documents of a collection, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn recent(
        &self,
        collection: &str,
        limit: u64,
    ) -> Result<Vec<lead_documents::Model>, DbErr> {
        lead_documents::Entity::find()
            .filter(lead_documents::Column::Collection.eq(collection))
            .order_by_desc(lead_documents::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
    }

    /// Documents submitted with the given email, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Vec<lead_documents::Model>, DbErr> {
        lead_documents::Entity::find()
            .filter(lead_documents::Column::Email.eq(email.trim()))
            .order_by_desc(lead_documents::Column::CreatedAt)
            .all(&self.db)
            .await
    }
}

#[async_trait]
impl LeadStore for LeadDocumentRepository {
    fn backend(&self) -> StoreBackend {
        StoreBackend::Postgres
    }

    async fn insert(&self, collection: &str, document: &Value) -> Result<String, StoreError> {
        if !document.is_object() {
            return Err(StoreError::InvalidDocument("expected a JSON object".to_string()));
        }
        let model = self
            .create(collection, document)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(model.id.to_string())
    }
}
