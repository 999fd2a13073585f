use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::{
    application::{
        ports::{
            DocumentExtractor, EmbeddingProvider, FileStorage, JobQueue, KnowledgeBase,
            PredictionService, embedding_provider::EmbeddingError,
            file_storage::FileStorageError, prediction_service::IntegrationError,
        },
        services::{DocumentProcessorService, TextChunker},
        use_cases::{
            GetDocumentUseCase, ListDocumentsUseCase, ListMessagesUseCase, SendMessageUseCase,
            UploadDocumentUseCase,
        },
    },
    config::AppConfig,
    domain::repositories::{DocumentRepository, MessageRepository, StorageError},
    infrastructure::{
        database::{
            DbPool, create_connection_pool,
            repositories::{PostgresDocumentRepository, PostgresMessageRepository},
            run_migrations,
        },
        external_services::{FlowiseClient, InferenceEmbeddingProvider, PdfExtractor},
        file_system::LocalFileStorage,
        memory::{InMemoryDocumentRepository, InMemoryMessageRepository},
        messaging::{BackgroundProcessor, MpscJobQueue},
    },
    presentation::http::handlers::{DocumentHandler, MessageHandler, QueueHandler},
};

#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("Database setup failed: {0}")]
    Storage(#[from] StorageError),
    #[error("Upload directory unavailable: {0}")]
    FileStorage(#[from] FileStorageError),
    #[error("Prediction client setup failed: {0}")]
    Integration(#[from] IntegrationError),
    #[error("Embedding client setup failed: {0}")]
    Embedding(#[from] EmbeddingError),
}

/// Adapters the application is wired from. Production builds them from
/// config; tests pass fakes.
pub struct Components {
    pub message_repository: Arc<dyn MessageRepository>,
    pub document_repository: Arc<dyn DocumentRepository>,
    pub file_storage: Arc<dyn FileStorage>,
    pub document_extractor: Arc<dyn DocumentExtractor>,
    pub embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    pub prediction_service: Arc<dyn PredictionService>,
    pub knowledge_base: Arc<dyn KnowledgeBase>,
}

pub struct AppContainer {
    pub config: AppConfig,

    // Repositories
    pub message_repository: Arc<dyn MessageRepository>,
    pub document_repository: Arc<dyn DocumentRepository>,

    // Job Queue and Background Processing
    pub job_queue: Arc<dyn JobQueue>,
    pub background_processor: BackgroundProcessor,

    // HTTP Handlers
    pub message_handler: Arc<MessageHandler>,
    pub document_handler: Arc<DocumentHandler>,
    pub queue_handler: Arc<QueueHandler>,
}

impl AppContainer {
    pub async fn new(config: AppConfig) -> Result<Self, ContainerError> {
        let (message_repository, document_repository) = match &config.database_url {
            Some(url) => {
                let pool = connect(url.clone(), config.database_pool_size).await?;
                tracing::info!("Using PostgreSQL store");
                (
                    Arc::new(PostgresMessageRepository::new(pool.clone()))
                        as Arc<dyn MessageRepository>,
                    Arc::new(PostgresDocumentRepository::new(pool)) as Arc<dyn DocumentRepository>,
                )
            }
            None => {
                tracing::warn!("DATABASE_URL not set, using in-memory store");
                (
                    Arc::new(InMemoryMessageRepository::new()) as Arc<dyn MessageRepository>,
                    Arc::new(InMemoryDocumentRepository::new()) as Arc<dyn DocumentRepository>,
                )
            }
        };

        let file_storage = LocalFileStorage::new(config.upload_dir.clone());
        file_storage.ensure_directory_exists().await?;

        let flowise = Arc::new(FlowiseClient::new(&config.flowise)?);
        tracing::info!(
            upload_mode = ?flowise.upload_mode(),
            "Prediction endpoint {}",
            config.flowise.prediction_url()
        );

        let embedding_provider = match &config.embeddings {
            Some(embeddings) => {
                tracing::info!("Embedding chunks via {}", embeddings.service_url);
                Some(Arc::new(InferenceEmbeddingProvider::new(embeddings)?)
                    as Arc<dyn EmbeddingProvider>)
            }
            None => None,
        };

        let components = Components {
            message_repository,
            document_repository,
            file_storage: Arc::new(file_storage),
            document_extractor: Arc::new(PdfExtractor::new()),
            embedding_provider,
            prediction_service: flowise.clone(),
            knowledge_base: flowise,
        };

        Ok(Self::assemble(config, components))
    }

    pub fn assemble(config: AppConfig, components: Components) -> Self {
        let Components {
            message_repository,
            document_repository,
            file_storage,
            document_extractor,
            embedding_provider,
            prediction_service,
            knowledge_base,
        } = components;

        let chunker = TextChunker::new(
            config.processing.chunk_size,
            config.processing.chunk_overlap,
        );
        let document_processor = Arc::new(DocumentProcessorService::new(
            document_repository.clone(),
            file_storage.clone(),
            document_extractor,
            embedding_provider,
            knowledge_base,
            chunker,
        ));

        let (job_queue, job_receiver) = MpscJobQueue::create_pair(config.processing.queue_capacity);
        let job_queue: Arc<dyn JobQueue> = Arc::new(job_queue);
        let background_processor =
            BackgroundProcessor::new(Arc::new(job_receiver), document_processor)
                .with_worker_count(config.processing.worker_count);

        // Create use cases
        let list_messages_use_case = Arc::new(ListMessagesUseCase::new(message_repository.clone()));
        let send_message_use_case = Arc::new(SendMessageUseCase::new(
            message_repository.clone(),
            prediction_service,
        ));
        let list_documents_use_case =
            Arc::new(ListDocumentsUseCase::new(document_repository.clone()));
        let get_document_use_case = Arc::new(GetDocumentUseCase::new(document_repository.clone()));
        let upload_document_use_case = Arc::new(UploadDocumentUseCase::new(
            document_repository.clone(),
            file_storage,
            job_queue.clone(),
            config.max_upload_bytes,
        ));

        // Create HTTP handlers
        let message_handler = Arc::new(MessageHandler::new(
            list_messages_use_case,
            send_message_use_case,
        ));
        let document_handler = Arc::new(DocumentHandler::new(
            list_documents_use_case,
            get_document_use_case,
            upload_document_use_case,
        ));
        let queue_handler = Arc::new(QueueHandler::new(job_queue.clone()));

        Self {
            config,
            message_repository,
            document_repository,
            job_queue,
            background_processor,
            message_handler,
            document_handler,
            queue_handler,
        }
    }

    pub fn spawn_workers(&self) -> JoinHandle<()> {
        let background_processor = self.background_processor.clone();
        tokio::spawn(async move {
            background_processor.start().await;
        })
    }
}

async fn connect(database_url: String, pool_size: u32) -> Result<DbPool, StorageError> {
    tokio::task::spawn_blocking(move || {
        let pool = create_connection_pool(&database_url, pool_size)?;
        run_migrations(&pool)?;
        Ok(pool)
    })
    .await
    .map_err(|e| StorageError::Connection(e.to_string()))?
}
