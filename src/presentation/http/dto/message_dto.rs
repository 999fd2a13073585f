use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::use_cases::send_message::{SendMessageRequest, SendMessageResponse};
use crate::domain::entities::Message;
use crate::domain::value_objects::Sender;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub id: i32,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl From<Message> for MessageDto {
    fn from(message: Message) -> Self {
        Self {
            id: message.id(),
            content: message.content().to_string(),
            sender: message.sender(),
            timestamp: message.timestamp(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequestDto {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub chat_id: Option<String>,
}

impl From<SendMessageRequestDto> for SendMessageRequest {
    fn from(dto: SendMessageRequestDto) -> Self {
        Self {
            content: dto.content,
            chat_id: dto.chat_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponseDto {
    pub user_message: MessageDto,
    pub ai_message: MessageDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
}

impl From<SendMessageResponse> for SendMessageResponseDto {
    fn from(response: SendMessageResponse) -> Self {
        Self {
            user_message: response.user_message.into(),
            ai_message: response.ai_message.into(),
            chat_id: response.chat_id,
        }
    }
}
