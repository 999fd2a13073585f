use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::entities::{Message, NewMessage};
use crate::domain::value_objects::Sender;
use crate::infrastructure::database::schema::messages;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MessageModel {
    pub id: i32,
    pub content: String,
    pub sender: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewMessageModel {
    pub content: String,
    pub sender: String,
}

impl From<&NewMessage> for NewMessageModel {
    fn from(message: &NewMessage) -> Self {
        Self {
            content: message.content().to_string(),
            sender: message.sender().as_str().to_string(),
        }
    }
}

impl TryFrom<MessageModel> for Message {
    type Error = String;

    fn try_from(model: MessageModel) -> Result<Self, Self::Error> {
        let sender = model
            .sender
            .parse::<Sender>()
            .map_err(|e| format!("message {}: {}", model.id, e))?;

        Ok(Message::from_parts(
            model.id,
            model.content,
            sender,
            model.timestamp,
        ))
    }
}
