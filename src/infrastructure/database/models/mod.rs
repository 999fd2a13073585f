pub mod document_model;
pub mod message_model;

pub use document_model::{DocumentModel, NewDocumentModel};
pub use message_model::{MessageModel, NewMessageModel};
