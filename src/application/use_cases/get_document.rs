use std::sync::Arc;

use crate::domain::entities::Document;
use crate::domain::repositories::{DocumentRepository, StorageError};

#[derive(Debug, thiserror::Error)]
pub enum GetDocumentError {
    #[error("Document not found: {0}")]
    NotFound(i32),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub struct GetDocumentUseCase {
    document_repository: Arc<dyn DocumentRepository>,
}

impl GetDocumentUseCase {
    pub fn new(document_repository: Arc<dyn DocumentRepository>) -> Self {
        Self {
            document_repository,
        }
    }

    pub async fn execute(&self, document_id: i32) -> Result<Document, GetDocumentError> {
        self.document_repository
            .find(document_id)
            .await?
            .ok_or(GetDocumentError::NotFound(document_id))
    }
}
