use std::sync::Arc;

use crate::domain::entities::Document;
use crate::domain::repositories::{DocumentRepository, StorageError};

pub struct ListDocumentsUseCase {
    document_repository: Arc<dyn DocumentRepository>,
}

impl ListDocumentsUseCase {
    pub fn new(document_repository: Arc<dyn DocumentRepository>) -> Self {
        Self {
            document_repository,
        }
    }

    pub async fn execute(&self) -> Result<Vec<Document>, StorageError> {
        self.document_repository.list().await
    }
}
