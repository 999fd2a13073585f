#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use tokio::sync::broadcast;
use tower::ServiceExt;

use kbchat::application::ports::job_queue::JobEvent;
use kbchat::application::ports::knowledge_base::{
    KnowledgeBase, KnowledgeBaseDocument, KnowledgeBaseOutcome,
};
use kbchat::application::ports::prediction_service::{
    IntegrationError, Prediction, PredictionService,
};
use kbchat::domain::value_objects::DocumentStatus;
use kbchat::infrastructure::memory::{InMemoryDocumentRepository, InMemoryMessageRepository};
use kbchat::infrastructure::{AppContainer, Components, LocalFileStorage, PdfExtractor};
use kbchat::{AppConfig, HttpServer};

pub const BOUNDARY: &str = "kbchat-test-boundary";

pub struct FakePrediction {
    reply: Mutex<Result<Prediction, IntegrationError>>,
    pub questions: Mutex<Vec<String>>,
}

impl FakePrediction {
    pub fn answering(text: &str) -> Self {
        Self {
            reply: Mutex::new(Ok(Prediction {
                text: text.to_string(),
                chat_id: Some("chat-1".to_string()),
                source_documents: None,
            })),
            questions: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: IntegrationError) -> Self {
        Self {
            reply: Mutex::new(Err(error)),
            questions: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PredictionService for FakePrediction {
    async fn ask(
        &self,
        question: &str,
        _chat_id: Option<&str>,
    ) -> Result<Prediction, IntegrationError> {
        self.questions.lock().unwrap().push(question.to_string());
        self.reply.lock().unwrap().clone()
    }
}

pub struct RecordingKnowledgeBase {
    outcome: KnowledgeBaseOutcome,
    pub uploads: Mutex<Vec<String>>,
}

impl RecordingKnowledgeBase {
    pub fn new(outcome: KnowledgeBaseOutcome) -> Self {
        Self {
            outcome,
            uploads: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl KnowledgeBase for RecordingKnowledgeBase {
    async fn upload_document(&self, document: KnowledgeBaseDocument) -> KnowledgeBaseOutcome {
        self.uploads.lock().unwrap().push(document.file_name);
        self.outcome.clone()
    }
}

pub struct TestApp {
    pub router: Router,
    pub container: AppContainer,
    pub upload_dir: PathBuf,
    pub prediction: Arc<FakePrediction>,
    pub knowledge_base: Arc<RecordingKnowledgeBase>,
    _dir: tempfile::TempDir,
}

impl TestApp {
    pub async fn start(prediction: FakePrediction, outcome: KnowledgeBaseOutcome) -> Self {
        Self::start_with(prediction, outcome, &[]).await
    }

    /// `overrides` are extra environment variables for the config.
    pub async fn start_with(
        prediction: FakePrediction,
        outcome: KnowledgeBaseOutcome,
        overrides: &[(&str, &str)],
    ) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let upload_dir = dir.path().join("uploads");

        let mut vars: HashMap<String, String> = [
            ("UPLOAD_DIR", upload_dir.to_string_lossy().to_string()),
            ("WORKER_COUNT", "2".to_string()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        vars.extend(overrides.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        let config = AppConfig::from_lookup(|key| vars.get(key).cloned()).unwrap();

        let prediction = Arc::new(prediction);
        let knowledge_base = Arc::new(RecordingKnowledgeBase::new(outcome));
        let container = AppContainer::assemble(
            config,
            Components {
                message_repository: Arc::new(InMemoryMessageRepository::new()),
                document_repository: Arc::new(InMemoryDocumentRepository::new()),
                file_storage: Arc::new(LocalFileStorage::new(upload_dir.clone())),
                document_extractor: Arc::new(PdfExtractor::new()),
                embedding_provider: None,
                prediction_service: prediction.clone(),
                knowledge_base: knowledge_base.clone(),
            },
        );
        let _workers = container.spawn_workers();
        let router = HttpServer::from_container(&container).router();

        Self {
            router,
            container,
            upload_dir,
            prediction,
            knowledge_base,
            _dir: dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(&bytes).into()))
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        self.send(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn upload(
        &self,
        field: &str,
        file_name: &str,
        content_type: &str,
        data: &[u8],
    ) -> (StatusCode, serde_json::Value) {
        self.send(upload_request(field, file_name, content_type, data))
            .await
    }

    pub fn events(&self) -> broadcast::Receiver<JobEvent> {
        self.container.job_queue.subscribe()
    }

    pub fn stored_file_count(&self) -> usize {
        std::fs::read_dir(&self.upload_dir)
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

pub fn upload_request(field: &str, file_name: &str, content_type: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::with_capacity(data.len() + 256);
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::post("/api/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Waits until `count` jobs have reported a terminal status and returns them.
pub async fn wait_for_finished(
    events: &mut broadcast::Receiver<JobEvent>,
    count: usize,
) -> Vec<(i32, DocumentStatus)> {
    let mut finished = Vec::new();
    while finished.len() < count {
        let event = tokio::time::timeout(Duration::from_secs(10), events.recv())
            .await
            .expect("timed out waiting for processing")
            .unwrap();
        if let JobEvent::Finished {
            document_id,
            status,
        } = event
        {
            finished.push((document_id, status));
        }
    }
    finished
}

pub fn build_pdf(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}
