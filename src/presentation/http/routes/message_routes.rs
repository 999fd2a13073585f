use axum::{Router, routing::get};
use std::sync::Arc;

use crate::presentation::http::handlers::MessageHandler;

pub fn message_routes(message_handler: Arc<MessageHandler>) -> Router {
    Router::new()
        .route(
            "/api/messages",
            get(MessageHandler::list_messages).post(MessageHandler::send_message),
        )
        .with_state(message_handler)
}
