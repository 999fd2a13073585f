use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::ports::embedding_provider::{
    BatchEmbeddingRequest, BatchEmbeddingResponse, EmbeddingError, EmbeddingProvider,
};
use crate::application::ports::prediction_service::IntegrationError;
use crate::config::EmbeddingsConfig;
use crate::infrastructure::external_services::http_client::RetryingHttpClient;

const DEFAULT_MODEL_NAME: &str = "default";

#[derive(Serialize)]
pub struct EmbeddingsRequest<'a> {
    pub text: &'a [String],
}

#[derive(Deserialize)]
pub struct EmbeddingsResponse {
    pub embeddings: Vec<Vec<f32>>,
    #[serde(default)]
    pub model: Option<String>,
}

impl From<IntegrationError> for EmbeddingError {
    fn from(error: IntegrationError) -> Self {
        match error {
            IntegrationError::Status { status, body } => EmbeddingError::Api { status, body },
            IntegrationError::Network(msg) => EmbeddingError::Network(msg),
            IntegrationError::Timeout => EmbeddingError::Timeout,
            IntegrationError::Decode(msg) => EmbeddingError::InvalidResponse(msg),
            IntegrationError::EmptyResponse => {
                EmbeddingError::InvalidResponse("empty response".to_string())
            }
        }
    }
}

/// Remote embedding service speaking `{"text": [...]}` → `{"embeddings": [[...]]}`.
pub struct InferenceEmbeddingProvider {
    http: RetryingHttpClient,
    service_url: String,
    api_key: Option<String>,
}

impl InferenceEmbeddingProvider {
    pub fn new(config: &EmbeddingsConfig) -> Result<Self, EmbeddingError> {
        Ok(Self {
            http: RetryingHttpClient::new(&config.http)?,
            service_url: config.service_url.to_string(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl EmbeddingProvider for InferenceEmbeddingProvider {
    async fn generate_embeddings(
        &self,
        request: BatchEmbeddingRequest,
    ) -> Result<BatchEmbeddingResponse, EmbeddingError> {
        if request.texts.is_empty() {
            return Ok(BatchEmbeddingResponse {
                embeddings: Vec::new(),
                model_name: self.model_name(),
            });
        }

        let payload = EmbeddingsRequest {
            text: &request.texts,
        };

        let body = self
            .http
            .send("Embeddings", |client| {
                let builder = client.post(&self.service_url).json(&payload);
                match &self.api_key {
                    Some(key) => builder.bearer_auth(key),
                    None => builder,
                }
            })
            .await?;

        let response: EmbeddingsResponse = serde_json::from_str(&body)
            .map_err(|e| EmbeddingError::InvalidResponse(e.to_string()))?;

        Ok(BatchEmbeddingResponse {
            embeddings: response.embeddings,
            model_name: response.model.unwrap_or_else(|| self.model_name()),
        })
    }

    fn model_name(&self) -> String {
        DEFAULT_MODEL_NAME.to_string()
    }
}
