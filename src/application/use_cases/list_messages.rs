use std::sync::Arc;

use crate::domain::entities::Message;
use crate::domain::repositories::{MessageRepository, StorageError};

pub struct ListMessagesUseCase {
    message_repository: Arc<dyn MessageRepository>,
}

impl ListMessagesUseCase {
    pub fn new(message_repository: Arc<dyn MessageRepository>) -> Self {
        Self { message_repository }
    }

    pub async fn execute(&self) -> Result<Vec<Message>, StorageError> {
        self.message_repository.list().await
    }
}
