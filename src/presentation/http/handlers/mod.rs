pub mod document_handler;
pub mod message_handler;
pub mod queue_handler;

pub use document_handler::DocumentHandler;
pub use message_handler::MessageHandler;
pub use queue_handler::QueueHandler;
