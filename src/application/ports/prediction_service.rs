use async_trait::async_trait;

#[derive(Debug, Clone, thiserror::Error)]
pub enum IntegrationError {
    #[error("Prediction service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Prediction service timed out")]
    Timeout,
    #[error("Could not decode prediction response: {0}")]
    Decode(String),
    #[error("Prediction response contained no text")]
    EmptyResponse,
}

impl IntegrationError {
    /// Network failures, timeouts, 429 and 5xx are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            IntegrationError::Network(_) | IntegrationError::Timeout => true,
            IntegrationError::Status { status, .. } => *status == 429 || *status >= 500,
            IntegrationError::Decode(_) | IntegrationError::EmptyResponse => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub text: String,
    pub chat_id: Option<String>,
    pub source_documents: Option<Vec<serde_json::Value>>,
}

#[async_trait]
pub trait PredictionService: Send + Sync {
    async fn ask(&self, question: &str, chat_id: Option<&str>)
    -> Result<Prediction, IntegrationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(IntegrationError::Timeout.is_retryable());
        assert!(IntegrationError::Network("reset".to_string()).is_retryable());
        assert!(
            IntegrationError::Status {
                status: 503,
                body: String::new()
            }
            .is_retryable()
        );
        assert!(
            IntegrationError::Status {
                status: 429,
                body: String::new()
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_client_errors_are_not_retried() {
        assert!(
            !IntegrationError::Status {
                status: 401,
                body: "unauthorized".to_string()
            }
            .is_retryable()
        );
        assert!(!IntegrationError::EmptyResponse.is_retryable());
    }
}
