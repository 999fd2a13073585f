use async_trait::async_trait;
use diesel::prelude::*;

use crate::domain::entities::{Document, NewDocument};
use crate::domain::repositories::{DocumentRepository, StorageError};
use crate::domain::value_objects::DocumentStatus;
use crate::infrastructure::database::connection::{DbPool, query_error, run_blocking};
use crate::infrastructure::database::models::{DocumentModel, NewDocumentModel};
use crate::infrastructure::database::schema::documents::dsl::*;

pub struct PostgresDocumentRepository {
    pool: DbPool,
}

impl PostgresDocumentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentRepository for PostgresDocumentRepository {
    async fn list(&self) -> Result<Vec<Document>, StorageError> {
        let models = run_blocking(&self.pool, |conn| {
            documents
                .order((upload_timestamp.desc(), id.desc()))
                .select(DocumentModel::as_select())
                .load::<DocumentModel>(conn)
                .map_err(query_error)
        })
        .await?;

        models
            .into_iter()
            .map(|model| Document::try_from(model).map_err(StorageError::Corrupt))
            .collect()
    }

    async fn find(&self, document_id: i32) -> Result<Option<Document>, StorageError> {
        let model = run_blocking(&self.pool, move |conn| {
            documents
                .find(document_id)
                .select(DocumentModel::as_select())
                .first::<DocumentModel>(conn)
                .optional()
                .map_err(query_error)
        })
        .await?;

        model
            .map(|model| Document::try_from(model).map_err(StorageError::Corrupt))
            .transpose()
    }

    async fn create(&self, document: NewDocument) -> Result<Document, StorageError> {
        let new_document = NewDocumentModel::from(document);

        let inserted = run_blocking(&self.pool, move |conn| {
            diesel::insert_into(documents)
                .values(&new_document)
                .returning(DocumentModel::as_returning())
                .get_result::<DocumentModel>(conn)
                .map_err(query_error)
        })
        .await?;

        Document::try_from(inserted).map_err(StorageError::Corrupt)
    }

    async fn update_status(
        &self,
        document_id: i32,
        new_status: DocumentStatus,
    ) -> Result<bool, StorageError> {
        if !DocumentStatus::Processing.can_transition_to(new_status) {
            return Ok(false);
        }

        // Guarded on the current value so a terminal row is never rewritten.
        let updated = run_blocking(&self.pool, move |conn| {
            diesel::update(
                documents
                    .filter(id.eq(document_id))
                    .filter(status.eq(DocumentStatus::Processing.as_str())),
            )
            .set(status.eq(new_status.as_str()))
            .execute(conn)
            .map_err(query_error)
        })
        .await?;

        Ok(updated == 1)
    }
}
