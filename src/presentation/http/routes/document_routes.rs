use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;

use crate::presentation::http::handlers::DocumentHandler;

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn document_routes(document_handler: Arc<DocumentHandler>) -> Router {
    let upload_limit = document_handler.max_upload_bytes() + MULTIPART_OVERHEAD;

    Router::new()
        .route("/api/documents", get(DocumentHandler::list_documents))
        .route("/api/documents/{id}", get(DocumentHandler::get_document))
        .route(
            "/api/upload",
            post(DocumentHandler::upload_document).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .with_state(document_handler)
}
