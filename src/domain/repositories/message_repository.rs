use async_trait::async_trait;

use crate::domain::entities::{Message, NewMessage};
use crate::domain::repositories::StorageError;

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// All messages in transcript order: oldest first, ties broken by id.
    async fn list(&self) -> Result<Vec<Message>, StorageError>;

    async fn create(&self, message: NewMessage) -> Result<Message, StorageError>;
}
