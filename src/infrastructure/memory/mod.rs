//! Process-local stores used when no database is configured.

pub mod document_repository;
pub mod message_repository;

pub use document_repository::InMemoryDocumentRepository;
pub use message_repository::InMemoryMessageRepository;
