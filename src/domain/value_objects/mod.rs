pub mod document_status;
pub mod sender;

pub use document_status::DocumentStatus;
pub use sender::Sender;
