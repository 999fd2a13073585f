pub mod document;
pub mod message;
pub mod processing_job;

pub use document::{Document, NewDocument};
pub use message::{Message, NewMessage};
pub use processing_job::ProcessDocumentJob;
