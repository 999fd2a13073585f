use axum::{Json, extract::State, extract::rejection::JsonRejection, response::IntoResponse};
use std::sync::Arc;

use crate::application::use_cases::{ListMessagesUseCase, SendMessageUseCase};
use crate::presentation::http::AppError;
use crate::presentation::http::dto::{MessageDto, SendMessageRequestDto, SendMessageResponseDto};

pub struct MessageHandler {
    list_messages_use_case: Arc<ListMessagesUseCase>,
    send_message_use_case: Arc<SendMessageUseCase>,
}

impl MessageHandler {
    pub fn new(
        list_messages_use_case: Arc<ListMessagesUseCase>,
        send_message_use_case: Arc<SendMessageUseCase>,
    ) -> Self {
        Self {
            list_messages_use_case,
            send_message_use_case,
        }
    }

    pub async fn list_messages(
        State(handler): State<Arc<MessageHandler>>,
    ) -> Result<impl IntoResponse, AppError> {
        let messages = handler
            .list_messages_use_case
            .execute()
            .await
            .map_err(|e| AppError::internal("Failed to fetch messages", e))?;

        let dtos: Vec<MessageDto> = messages.into_iter().map(MessageDto::from).collect();
        Ok(Json(dtos))
    }

    pub async fn send_message(
        State(handler): State<Arc<MessageHandler>>,
        payload: Result<Json<SendMessageRequestDto>, JsonRejection>,
    ) -> Result<impl IntoResponse, AppError> {
        let Json(request) = payload?;

        let response = handler
            .send_message_use_case
            .execute(request.into())
            .await?;

        Ok(Json(SendMessageResponseDto::from(response)))
    }
}
