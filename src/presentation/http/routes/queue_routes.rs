use axum::{Router, routing::get};
use std::sync::Arc;

use crate::presentation::http::handlers::QueueHandler;

pub fn queue_routes(queue_handler: Arc<QueueHandler>) -> Router {
    Router::new()
        .route("/api/queue", get(QueueHandler::queue_status))
        .with_state(queue_handler)
}
