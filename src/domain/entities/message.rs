use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Sender;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    id: i32,
    content: String,
    sender: Sender,
    timestamp: DateTime<Utc>,
}

impl Message {
    /// Rebuilds a message that was already assigned an id and timestamp by the store.
    pub fn from_parts(id: i32, content: String, sender: Sender, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            content,
            sender,
            timestamp,
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Insert payload for a message; id and timestamp are assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    content: String,
    sender: Sender,
}

impl NewMessage {
    pub fn new(content: impl Into<String>, sender: Sender) -> Result<Self, String> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err("Message content cannot be empty".to_string());
        }

        Ok(Self { content, sender })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }
}
