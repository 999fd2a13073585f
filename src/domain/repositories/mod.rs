pub mod document_repository;
pub mod message_repository;

pub use document_repository::DocumentRepository;
pub use message_repository::MessageRepository;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),
    #[error("Database error: {0}")]
    Query(String),
    #[error("Corrupt row: {0}")]
    Corrupt(String),
}
