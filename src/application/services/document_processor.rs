use std::sync::Arc;

use crate::application::ports::{
    DocumentExtractor, EmbeddingProvider, FileStorage, KnowledgeBase,
    document_extractor::ExtractionError,
    embedding_provider::{BatchEmbeddingRequest, EmbeddingError},
    knowledge_base::{KnowledgeBaseDocument, KnowledgeBaseOutcome},
};
use crate::application::services::text_chunker::{TextChunk, TextChunker};
use crate::domain::entities::ProcessDocumentJob;
use crate::domain::repositories::DocumentRepository;
use crate::domain::value_objects::DocumentStatus;

const EMBEDDING_BATCH_SIZE: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum DocumentProcessingError {
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingReport {
    pub document_id: i32,
    pub status: DocumentStatus,
    pub page_count: usize,
    pub chunk_count: usize,
    pub embedding_count: usize,
    /// `None` when local processing failed and nothing was sent.
    pub remote: Option<KnowledgeBaseOutcome>,
    pub error: Option<String>,
}

struct PipelineOutput {
    page_count: usize,
    chunk_count: usize,
    embedding_count: usize,
    remote: KnowledgeBaseOutcome,
}

/// Runs one uploaded PDF through extraction, chunking, optional embedding and
/// knowledge-base forwarding.
///
/// The document's status reflects the local steps only. The knowledge-base
/// outcome is logged and reported, never written to the row. The temp file is
/// deleted before the status is recorded, whatever the outcome.
pub struct DocumentProcessorService {
    document_repository: Arc<dyn DocumentRepository>,
    file_storage: Arc<dyn FileStorage>,
    document_extractor: Arc<dyn DocumentExtractor>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    knowledge_base: Arc<dyn KnowledgeBase>,
    chunker: TextChunker,
}

impl DocumentProcessorService {
    pub fn new(
        document_repository: Arc<dyn DocumentRepository>,
        file_storage: Arc<dyn FileStorage>,
        document_extractor: Arc<dyn DocumentExtractor>,
        embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
        knowledge_base: Arc<dyn KnowledgeBase>,
        chunker: TextChunker,
    ) -> Self {
        Self {
            document_repository,
            file_storage,
            document_extractor,
            embedding_provider,
            knowledge_base,
            chunker,
        }
    }

    pub async fn process(&self, job: &ProcessDocumentJob) -> ProcessingReport {
        let document_id = job.document_id();
        let result = self.run_pipeline(job).await;

        self.release_file(job.filename()).await;

        let report = match result {
            Ok(output) => ProcessingReport {
                document_id,
                status: DocumentStatus::Completed,
                page_count: output.page_count,
                chunk_count: output.chunk_count,
                embedding_count: output.embedding_count,
                remote: Some(output.remote),
                error: None,
            },
            Err(e) => {
                tracing::warn!(document_id, error = %e, "Document processing failed");
                ProcessingReport {
                    document_id,
                    status: DocumentStatus::Failed,
                    page_count: 0,
                    chunk_count: 0,
                    embedding_count: 0,
                    remote: None,
                    error: Some(e.to_string()),
                }
            }
        };

        self.record_status(document_id, report.status).await;
        report
    }

    async fn run_pipeline(
        &self,
        job: &ProcessDocumentJob,
    ) -> Result<PipelineOutput, DocumentProcessingError> {
        let data = self
            .file_storage
            .read_file(job.filename())
            .await
            .map_err(|e| ExtractionError::Unreadable(e.to_string()))?;

        tracing::info!(
            document_id = job.document_id(),
            size = data.len(),
            "Processing PDF {}",
            job.original_name()
        );

        let content = self.document_extractor.extract_text(&data).await?;
        if !content.page_errors.is_empty() {
            tracing::warn!(
                document_id = job.document_id(),
                pages = content.page_errors.len(),
                "Some pages could not be decoded"
            );
        }

        let chunks = self.chunker.split(&content.text);

        let embedding_count = match &self.embedding_provider {
            Some(provider) => self.embed_chunks(provider.as_ref(), &chunks).await?,
            None => 0,
        };

        let remote = self
            .knowledge_base
            .upload_document(KnowledgeBaseDocument {
                file_name: job.original_name().to_string(),
                content_type: self.document_extractor.supported_media_type().to_string(),
                data,
            })
            .await;

        match &remote {
            KnowledgeBaseOutcome::Failed(reason) => tracing::warn!(
                document_id = job.document_id(),
                reason = %reason,
                "Knowledge base upload failed"
            ),
            outcome => tracing::info!(
                document_id = job.document_id(),
                outcome = outcome.as_str(),
                "Knowledge base upload finished"
            ),
        }

        Ok(PipelineOutput {
            page_count: content.page_count,
            chunk_count: chunks.len(),
            embedding_count,
            remote,
        })
    }

    async fn embed_chunks(
        &self,
        provider: &dyn EmbeddingProvider,
        chunks: &[TextChunk],
    ) -> Result<usize, EmbeddingError> {
        let mut embedded = 0;

        for batch in chunks.chunks(EMBEDDING_BATCH_SIZE) {
            let request = BatchEmbeddingRequest {
                texts: batch.iter().map(|chunk| chunk.text.clone()).collect(),
            };

            let response = provider.generate_embeddings(request).await?;

            if response.embeddings.len() != batch.len() {
                return Err(EmbeddingError::InvalidResponse(format!(
                    "expected {} vectors, got {}",
                    batch.len(),
                    response.embeddings.len()
                )));
            }
            if response.embeddings.iter().any(|vector| vector.is_empty()) {
                return Err(EmbeddingError::InvalidResponse(
                    "empty embedding vector".to_string(),
                ));
            }

            embedded += response.embeddings.len();
        }

        Ok(embedded)
    }

    /// Deletes the transient upload. Errors are logged, never propagated.
    pub async fn release_file(&self, filename: &str) {
        match self.file_storage.delete_file(filename).await {
            Ok(true) => tracing::debug!("Cleaned up file {}", filename),
            Ok(false) => tracing::debug!("File {} was already gone", filename),
            Err(e) => tracing::error!("Failed to clean up file {}: {}", filename, e),
        }
    }

    pub async fn record_status(&self, document_id: i32, status: DocumentStatus) {
        match self
            .document_repository
            .update_status(document_id, status)
            .await
        {
            Ok(true) => tracing::info!(document_id, status = %status, "Document status updated"),
            Ok(false) => tracing::warn!(
                document_id,
                status = %status,
                "Status update ignored: document missing or already terminal"
            ),
            Err(e) => tracing::error!(document_id, error = %e, "Failed to update document status"),
        }
    }
}
