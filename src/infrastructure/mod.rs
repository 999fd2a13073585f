pub mod container;
pub mod database;
pub mod external_services;
pub mod file_system;
pub mod memory;
pub mod messaging;

pub use container::{AppContainer, Components, ContainerError};
pub use database::{DbPool, create_connection_pool};
pub use external_services::{FlowiseClient, InferenceEmbeddingProvider, PdfExtractor};
pub use file_system::LocalFileStorage;
