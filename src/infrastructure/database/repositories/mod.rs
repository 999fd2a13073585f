pub mod postgres_document_repository;
pub mod postgres_message_repository;

pub use postgres_document_repository::PostgresDocumentRepository;
pub use postgres_message_repository::PostgresMessageRepository;
