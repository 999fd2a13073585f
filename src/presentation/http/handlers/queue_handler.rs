use axum::{Json, extract::State, response::IntoResponse};
use std::sync::Arc;

use crate::application::ports::JobQueue;

pub struct QueueHandler {
    job_queue: Arc<dyn JobQueue>,
}

impl QueueHandler {
    pub fn new(job_queue: Arc<dyn JobQueue>) -> Self {
        Self { job_queue }
    }

    pub async fn queue_status(State(handler): State<Arc<QueueHandler>>) -> impl IntoResponse {
        Json(handler.job_queue.health_check().await)
    }
}
