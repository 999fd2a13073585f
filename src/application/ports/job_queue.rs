use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

use crate::domain::entities::ProcessDocumentJob;
use crate::domain::value_objects::DocumentStatus;

#[derive(Debug, thiserror::Error)]
pub enum JobQueueError {
    #[error("Job queue is closed")]
    Closed,
    #[error("Job queue is full")]
    Full,
}

/// Lifecycle notifications for queued documents.
#[derive(Debug, Clone, PartialEq)]
pub enum JobEvent {
    Queued { document_id: i32 },
    Started { document_id: i32, worker_id: usize },
    Finished { document_id: i32, status: DocumentStatus },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueHealth {
    pub capacity: usize,
    pub total_enqueued: u64,
    pub total_started: u64,
    pub total_completed: u64,
    pub total_failed: u64,
    pub in_flight: u64,
    pub last_activity: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Never waits: a full queue is reported as `JobQueueError::Full`.
    async fn enqueue(&self, job: ProcessDocumentJob) -> Result<(), JobQueueError>;

    async fn health_check(&self) -> QueueHealth;

    fn subscribe(&self) -> broadcast::Receiver<JobEvent>;
}
