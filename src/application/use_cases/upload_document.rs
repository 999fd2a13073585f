use std::sync::Arc;

use crate::application::ports::{FileStorage, JobQueue};
use crate::domain::entities::{Document, NewDocument, ProcessDocumentJob};
use crate::domain::repositories::{DocumentRepository, StorageError};
use crate::domain::value_objects::DocumentStatus;

pub const PDF_MEDIA_TYPE: &str = "application/pdf";

const ACCEPTED_MESSAGE: &str = "PDF uploaded successfully. Processing started in background.";
const NOT_SCHEDULED_MESSAGE: &str = "PDF uploaded but processing could not be scheduled.";

#[derive(Debug, thiserror::Error)]
pub enum UploadDocumentError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("File too large: {size} bytes exceeds the {limit} byte limit")]
    FileTooLarge { size: usize, limit: usize },
    #[error("Storage error: {0}")]
    FileStorage(String),
    #[error(transparent)]
    Repository(#[from] StorageError),
    #[error("Upload task failed: {0}")]
    Scheduling(String),
}

impl UploadDocumentError {
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            UploadDocumentError::Validation(_) | UploadDocumentError::FileTooLarge { .. }
        )
    }
}

#[derive(Debug, Clone)]
pub struct UploadDocumentRequest {
    pub original_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct UploadDocumentResponse {
    pub document: Document,
    pub message: String,
}

/// True when `content_type` names a PDF, ignoring case and parameters.
pub fn is_pdf_media_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(|essence| essence.trim().eq_ignore_ascii_case(PDF_MEDIA_TYPE))
        .unwrap_or(false)
}

pub struct UploadDocumentUseCase {
    document_repository: Arc<dyn DocumentRepository>,
    file_storage: Arc<dyn FileStorage>,
    job_queue: Arc<dyn JobQueue>,
    max_upload_bytes: usize,
}

impl UploadDocumentUseCase {
    pub fn new(
        document_repository: Arc<dyn DocumentRepository>,
        file_storage: Arc<dyn FileStorage>,
        job_queue: Arc<dyn JobQueue>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            document_repository,
            file_storage,
            job_queue,
            max_upload_bytes,
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    pub async fn execute(
        &self,
        request: UploadDocumentRequest,
    ) -> Result<UploadDocumentResponse, UploadDocumentError> {
        self.validate(&request)?;

        let intake = UploadIntake {
            document_repository: self.document_repository.clone(),
            file_storage: self.file_storage.clone(),
            job_queue: self.job_queue.clone(),
        };

        // Detached: once bytes hit the disk the row must reach a terminal
        // status even if the caller stops waiting.
        tokio::spawn(async move { intake.accept(request).await })
            .await
            .map_err(|e| UploadDocumentError::Scheduling(e.to_string()))?
    }

    fn validate(&self, request: &UploadDocumentRequest) -> Result<(), UploadDocumentError> {
        match request.content_type.as_deref() {
            Some(content_type) if is_pdf_media_type(content_type) => {}
            _ => {
                return Err(UploadDocumentError::Validation(
                    "Only PDF files are allowed".to_string(),
                ));
            }
        }

        if request.data.is_empty() {
            return Err(UploadDocumentError::Validation(
                "Uploaded file is empty".to_string(),
            ));
        }

        if request.data.len() > self.max_upload_bytes {
            return Err(UploadDocumentError::FileTooLarge {
                size: request.data.len(),
                limit: self.max_upload_bytes,
            });
        }

        Ok(())
    }
}

struct UploadIntake {
    document_repository: Arc<dyn DocumentRepository>,
    file_storage: Arc<dyn FileStorage>,
    job_queue: Arc<dyn JobQueue>,
}

impl UploadIntake {
    async fn accept(
        self,
        request: UploadDocumentRequest,
    ) -> Result<UploadDocumentResponse, UploadDocumentError> {
        let stored_file = self
            .file_storage
            .store_file(&request.data)
            .await
            .map_err(|e| UploadDocumentError::FileStorage(e.to_string()))?;

        let original_name = match request.original_name.trim() {
            "" => "document.pdf".to_string(),
            name => name.to_string(),
        };

        let new_document =
            NewDocument::processing(stored_file.filename.clone(), original_name, stored_file.size);

        let mut document = match self.document_repository.create(new_document).await {
            Ok(document) => document,
            Err(e) => {
                if let Err(cleanup) = self.file_storage.delete_file(&stored_file.filename).await {
                    tracing::error!(
                        "Failed to remove {} after insert error: {}",
                        stored_file.filename,
                        cleanup
                    );
                }
                return Err(e.into());
            }
        };

        let job = ProcessDocumentJob::for_document(&document);
        if let Err(e) = self.job_queue.enqueue(job).await {
            tracing::error!(document_id = document.id(), error = %e, "Failed to queue document");

            if let Err(cleanup) = self.file_storage.delete_file(document.filename()).await {
                tracing::error!("Failed to remove {}: {}", document.filename(), cleanup);
            }
            if self
                .document_repository
                .update_status(document.id(), DocumentStatus::Failed)
                .await?
            {
                if let Err(reason) = document.transition_to(DocumentStatus::Failed) {
                    tracing::warn!(document_id = document.id(), %reason, "Stored status diverged");
                }
            } else {
                tracing::warn!(document_id = document.id(), "Document was no longer processing");
            }

            return Ok(UploadDocumentResponse {
                document,
                message: NOT_SCHEDULED_MESSAGE.to_string(),
            });
        }

        tracing::info!(
            document_id = document.id(),
            size = stored_file.size,
            "Accepted upload {}",
            document.original_name()
        );

        Ok(UploadDocumentResponse {
            document,
            message: ACCEPTED_MESSAGE.to_string(),
        })
    }
}
