pub mod document_extractor;
pub mod embedding_provider;
pub mod file_storage;
pub mod job_queue;
pub mod knowledge_base;
pub mod prediction_service;

pub use document_extractor::DocumentExtractor;
pub use embedding_provider::EmbeddingProvider;
pub use file_storage::FileStorage;
pub use job_queue::JobQueue;
pub use knowledge_base::KnowledgeBase;
pub use prediction_service::PredictionService;
