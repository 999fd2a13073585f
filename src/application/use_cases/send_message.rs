use std::sync::Arc;

use crate::application::ports::{PredictionService, prediction_service::IntegrationError};
use crate::domain::entities::{Message, NewMessage};
use crate::domain::repositories::{MessageRepository, StorageError};
use crate::domain::value_objects::Sender;

const FAILURE_REPLY_PREFIX: &str = "Sorry, the assistant is unavailable right now";

#[derive(Debug, thiserror::Error)]
pub enum SendMessageError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// The remote call failed after the user's message and a failure reply
    /// were both recorded.
    #[error("Prediction failed: {source}")]
    Integration {
        source: IntegrationError,
        user_message: Message,
        ai_message: Message,
    },
}

#[derive(Debug, Clone)]
pub struct SendMessageRequest {
    pub content: String,
    pub chat_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SendMessageResponse {
    pub user_message: Message,
    pub ai_message: Message,
    pub chat_id: Option<String>,
}

pub struct SendMessageUseCase {
    message_repository: Arc<dyn MessageRepository>,
    prediction_service: Arc<dyn PredictionService>,
}

impl SendMessageUseCase {
    pub fn new(
        message_repository: Arc<dyn MessageRepository>,
        prediction_service: Arc<dyn PredictionService>,
    ) -> Self {
        Self {
            message_repository,
            prediction_service,
        }
    }

    pub async fn execute(
        &self,
        request: SendMessageRequest,
    ) -> Result<SendMessageResponse, SendMessageError> {
        let question =
            NewMessage::new(request.content, Sender::User).map_err(SendMessageError::Validation)?;

        let user_message = self.message_repository.create(question).await?;

        let chat_id = request
            .chat_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty());

        let outcome = self
            .prediction_service
            .ask(user_message.content(), chat_id)
            .await
            .and_then(|prediction| {
                if prediction.text.trim().is_empty() {
                    Err(IntegrationError::EmptyResponse)
                } else {
                    Ok(prediction)
                }
            });

        match outcome {
            Ok(prediction) => {
                let reply = NewMessage::new(prediction.text, Sender::Ai)
                    .map_err(SendMessageError::Validation)?;
                let ai_message = self.message_repository.create(reply).await?;

                Ok(SendMessageResponse {
                    user_message,
                    ai_message,
                    chat_id: prediction.chat_id.or_else(|| chat_id.map(str::to_string)),
                })
            }
            Err(source) => {
                tracing::error!(
                    message_id = user_message.id(),
                    error = %source,
                    "Prediction request failed"
                );

                let reply = NewMessage::new(
                    format!("{}: {}", FAILURE_REPLY_PREFIX, source),
                    Sender::Ai,
                )
                .map_err(SendMessageError::Validation)?;
                let ai_message = self.message_repository.create(reply).await?;

                Err(SendMessageError::Integration {
                    source,
                    user_message,
                    ai_message,
                })
            }
        }
    }
}
