use async_trait::async_trait;

use crate::domain::entities::{Document, NewDocument};
use crate::domain::repositories::StorageError;
use crate::domain::value_objects::DocumentStatus;

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// All documents, most recent upload first.
    async fn list(&self) -> Result<Vec<Document>, StorageError>;

    async fn find(&self, id: i32) -> Result<Option<Document>, StorageError>;

    async fn create(&self, document: NewDocument) -> Result<Document, StorageError>;

    /// Moves a `processing` row to `status`. Returns `false` when the id is
    /// unknown or the row already holds a terminal status.
    async fn update_status(&self, id: i32, status: DocumentStatus) -> Result<bool, StorageError>;
}
