use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::RequestBuilder;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde_json::Value;

use crate::application::ports::knowledge_base::{
    KnowledgeBase, KnowledgeBaseDocument, KnowledgeBaseOutcome,
};
use crate::application::ports::prediction_service::{
    IntegrationError, Prediction, PredictionService,
};
use crate::config::{FlowiseConfig, KnowledgeBaseUploadMode};
use crate::infrastructure::external_services::http_client::RetryingHttpClient;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictionRequest<'a> {
    question: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    chat_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    override_config: Option<OverrideConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OverrideConfig {
    file_upload: String,
}

/// Client for a Flowise chatflow: answers chat questions and feeds uploaded
/// documents into the flow's knowledge base.
pub struct FlowiseClient {
    http: RetryingHttpClient,
    prediction_url: String,
    vector_upsert_url: String,
    api_key: Option<String>,
    upload_mode: KnowledgeBaseUploadMode,
}

impl FlowiseClient {
    pub fn new(config: &FlowiseConfig) -> Result<Self, IntegrationError> {
        Ok(Self {
            http: RetryingHttpClient::new(&config.http)?,
            prediction_url: config.prediction_url(),
            vector_upsert_url: config.vector_upsert_url(),
            api_key: config.api_key.clone(),
            upload_mode: config.upload_mode,
        })
    }

    pub fn upload_mode(&self) -> KnowledgeBaseUploadMode {
        self.upload_mode
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    async fn upsert_multipart(&self, document: &KnowledgeBaseDocument) -> Result<(), IntegrationError> {
        self.http
            .send("Flowise vector upsert", |client| {
                let part = Part::bytes(document.data.clone()).file_name(document.file_name.clone());
                let part = match part.mime_str(&document.content_type) {
                    Ok(part) => part,
                    Err(_) => Part::bytes(document.data.clone()).file_name(document.file_name.clone()),
                };
                self.authorize(client.post(&self.vector_upsert_url))
                    .multipart(Form::new().part("files", part))
            })
            .await
            .map(|_| ())
    }

    async fn upload_base64(&self, document: &KnowledgeBaseDocument) -> Result<(), IntegrationError> {
        let question = format!("Add {} to the knowledge base.", document.file_name);
        let request = PredictionRequest {
            question: &question,
            chat_id: None,
            override_config: Some(OverrideConfig {
                file_upload: data_uri(document),
            }),
        };

        self.http
            .send("Flowise file upload", |client| {
                self.authorize(client.post(&self.prediction_url)).json(&request)
            })
            .await
            .map(|_| ())
    }
}

fn data_uri(document: &KnowledgeBaseDocument) -> String {
    format!(
        "data:{};base64,{},filename:{}",
        document.content_type,
        STANDARD.encode(&document.data),
        document.file_name
    )
}

/// Reads a prediction body, accepting either an object with `text` or a bare
/// JSON string. Unknown fields are ignored.
fn parse_prediction(body: &str) -> Result<Prediction, IntegrationError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| IntegrationError::Decode(e.to_string()))?;

    let text = match &value {
        Value::String(text) => Some(text.clone()),
        Value::Object(map) => map.get("text").and_then(Value::as_str).map(str::to_string),
        _ => None,
    };

    let text = match text {
        Some(text) if !text.trim().is_empty() => text,
        _ => return Err(IntegrationError::EmptyResponse),
    };

    let chat_id = value
        .get("chatId")
        .and_then(Value::as_str)
        .map(str::to_string);
    let source_documents = value
        .get("sourceDocuments")
        .and_then(Value::as_array)
        .cloned();

    Ok(Prediction {
        text,
        chat_id,
        source_documents,
    })
}

#[async_trait]
impl PredictionService for FlowiseClient {
    async fn ask(
        &self,
        question: &str,
        chat_id: Option<&str>,
    ) -> Result<Prediction, IntegrationError> {
        let request = PredictionRequest {
            question,
            chat_id,
            override_config: None,
        };

        let body = self
            .http
            .send("Flowise prediction", |client| {
                self.authorize(client.post(&self.prediction_url)).json(&request)
            })
            .await?;

        parse_prediction(&body)
    }
}

#[async_trait]
impl KnowledgeBase for FlowiseClient {
    async fn upload_document(&self, document: KnowledgeBaseDocument) -> KnowledgeBaseOutcome {
        let result = match self.upload_mode {
            KnowledgeBaseUploadMode::Disabled => {
                tracing::info!(
                    file = %document.file_name,
                    size = document.data.len(),
                    "Knowledge base upload disabled, skipping"
                );
                return KnowledgeBaseOutcome::Skipped;
            }
            KnowledgeBaseUploadMode::Multipart => self.upsert_multipart(&document).await,
            KnowledgeBaseUploadMode::Base64 => self.upload_base64(&document).await,
        };

        match result {
            Ok(()) => KnowledgeBaseOutcome::Indexed,
            Err(e) => KnowledgeBaseOutcome::Failed(e.to_string()),
        }
    }
}
