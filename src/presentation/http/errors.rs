use axum::{
    Json,
    extract::multipart::{MultipartError, MultipartRejection},
    extract::rejection::{JsonRejection, PathRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::application::use_cases::get_document::GetDocumentError;
use crate::application::use_cases::send_message::SendMessageError;
use crate::application::use_cases::upload_document::UploadDocumentError;
use crate::presentation::http::dto::MessageDto;

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    PayloadTooLarge(String),
    /// Details are logged where the error is created; only the message is sent.
    Internal(String),
    /// A chat turn whose remote call failed. Both recorded messages are returned.
    ChatFailure {
        message: String,
        user_message: MessageDto,
        ai_message: MessageDto,
    },
}

impl AppError {
    pub fn internal(message: &str, error: impl std::fmt::Display) -> Self {
        tracing::error!(error = %error, "{}", message);
        AppError::Internal(message.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, json!({ "error": msg }))
            }
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": msg })),
            AppError::ChatFailure {
                message,
                user_message,
                ai_message,
            } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": message,
                    "userMessage": user_message,
                    "aiMessage": ai_message,
                }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Rewrites plain-text 413s from the body limit layer into the JSON error shape.
pub async fn json_payload_too_large(response: Response) -> Response {
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));

    if response.status() == StatusCode::PAYLOAD_TOO_LARGE && !is_json {
        return AppError::PayloadTooLarge("Request body too large".to_string()).into_response();
    }
    response
}

impl From<SendMessageError> for AppError {
    fn from(error: SendMessageError) -> Self {
        match error {
            SendMessageError::Validation(msg) => AppError::BadRequest(msg),
            SendMessageError::Storage(e) => AppError::internal("Failed to process message", e),
            SendMessageError::Integration {
                source,
                user_message,
                ai_message,
            } => AppError::ChatFailure {
                message: source.to_string(),
                user_message: MessageDto::from(user_message),
                ai_message: MessageDto::from(ai_message),
            },
        }
    }
}

impl From<UploadDocumentError> for AppError {
    fn from(error: UploadDocumentError) -> Self {
        match error {
            UploadDocumentError::Validation(msg) => AppError::BadRequest(msg),
            e @ UploadDocumentError::FileTooLarge { .. } => AppError::BadRequest(e.to_string()),
            e => AppError::internal("Failed to upload PDF", e),
        }
    }
}

impl From<GetDocumentError> for AppError {
    fn from(error: GetDocumentError) -> Self {
        match error {
            GetDocumentError::NotFound(_) => AppError::NotFound("Document not found".to_string()),
            GetDocumentError::Storage(e) => AppError::internal("Failed to fetch document", e),
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(error: MultipartError) -> Self {
        AppError::BadRequest(format!("Invalid multipart body: {}", error.body_text()))
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::prediction_service::IntegrationError;
    use crate::domain::entities::Message;
    use crate::domain::value_objects::Sender;
    use chrono::Utc;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::BadRequest("x".to_string()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("x".to_string()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(UploadDocumentError::FileTooLarge { size: 2, limit: 1 })
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_integration_failure_becomes_chat_failure() {
        let user = Message::from_parts(1, "hi".to_string(), Sender::User, Utc::now());
        let ai = Message::from_parts(2, "sorry".to_string(), Sender::Ai, Utc::now());

        let error = AppError::from(SendMessageError::Integration {
            source: IntegrationError::Timeout,
            user_message: user,
            ai_message: ai,
        });

        assert!(matches!(error, AppError::ChatFailure { ref user_message, .. } if user_message.id == 1));
        assert_eq!(error.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_plain_payload_too_large_becomes_json() {
        let plain = (StatusCode::PAYLOAD_TOO_LARGE, "length limit exceeded").into_response();

        let response = json_payload_too_large(plain).await;

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Request body too large");
    }

    #[tokio::test]
    async fn test_other_responses_pass_through() {
        let ok = (StatusCode::OK, "fine").into_response();

        let response = json_payload_too_large(ok).await;

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"fine");
    }
}
