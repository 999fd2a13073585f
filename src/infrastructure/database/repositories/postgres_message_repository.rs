use async_trait::async_trait;
use diesel::prelude::*;

use crate::domain::entities::{Message, NewMessage};
use crate::domain::repositories::{MessageRepository, StorageError};
use crate::infrastructure::database::connection::{DbPool, query_error, run_blocking};
use crate::infrastructure::database::models::{MessageModel, NewMessageModel};
use crate::infrastructure::database::schema::messages::dsl::*;

pub struct PostgresMessageRepository {
    pool: DbPool,
}

impl PostgresMessageRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PostgresMessageRepository {
    async fn list(&self) -> Result<Vec<Message>, StorageError> {
        let models = run_blocking(&self.pool, |conn| {
            messages
                .order((timestamp.asc(), id.asc()))
                .select(MessageModel::as_select())
                .load::<MessageModel>(conn)
                .map_err(query_error)
        })
        .await?;

        models
            .into_iter()
            .map(|model| Message::try_from(model).map_err(StorageError::Corrupt))
            .collect()
    }

    async fn create(&self, message: NewMessage) -> Result<Message, StorageError> {
        let new_message = NewMessageModel::from(&message);

        let inserted = run_blocking(&self.pool, move |conn| {
            diesel::insert_into(messages)
                .values(&new_message)
                .returning(MessageModel::as_returning())
                .get_result::<MessageModel>(conn)
                .map_err(query_error)
        })
        .await?;

        Message::try_from(inserted).map_err(StorageError::Corrupt)
    }
}
