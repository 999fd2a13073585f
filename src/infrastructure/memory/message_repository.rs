use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::domain::entities::{Message, NewMessage};
use crate::domain::repositories::{MessageRepository, StorageError};

struct MessageTable {
    next_id: i32,
    rows: Vec<Message>,
}

pub struct InMemoryMessageRepository {
    table: Mutex<MessageTable>,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self {
            table: Mutex::new(MessageTable {
                next_id: 1,
                rows: Vec::new(),
            }),
        }
    }
}

impl Default for InMemoryMessageRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn list(&self) -> Result<Vec<Message>, StorageError> {
        let table = self.table.lock().await;
        let mut messages = table.rows.clone();
        messages.sort_by(|a, b| {
            a.timestamp()
                .cmp(&b.timestamp())
                .then_with(|| a.id().cmp(&b.id()))
        });
        Ok(messages)
    }

    async fn create(&self, message: NewMessage) -> Result<Message, StorageError> {
        let mut table = self.table.lock().await;
        let id = table.next_id;
        table.next_id += 1;

        let stored = Message::from_parts(
            id,
            message.content().to_string(),
            message.sender(),
            Utc::now(),
        );
        table.rows.push(stored.clone());
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Sender;

    #[tokio::test]
    async fn test_ids_increase_and_order_is_preserved() {
        let repository = InMemoryMessageRepository::default();

        let first = repository
            .create(NewMessage::new("question", Sender::User).unwrap())
            .await
            .unwrap();
        let second = repository
            .create(NewMessage::new("answer", Sender::Ai).unwrap())
            .await
            .unwrap();

        assert_eq!(first.id(), 1);
        assert!(second.id() > first.id());
        let listed = repository.list().await.unwrap();
        assert_eq!(listed, vec![first, second]);
    }
}
