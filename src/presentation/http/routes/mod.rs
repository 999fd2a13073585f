pub mod document_routes;
pub mod health_routes;
pub mod message_routes;
pub mod queue_routes;

pub use document_routes::*;
pub use health_routes::*;
pub use message_routes::*;
pub use queue_routes::*;
