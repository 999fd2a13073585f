pub mod get_document;
pub mod list_documents;
pub mod list_messages;
pub mod send_message;
pub mod upload_document;

pub use get_document::GetDocumentUseCase;
pub use list_documents::ListDocumentsUseCase;
pub use list_messages::ListMessagesUseCase;
pub use send_message::SendMessageUseCase;
pub use upload_document::UploadDocumentUseCase;
