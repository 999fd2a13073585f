use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::{Mutex, broadcast, mpsc};

use crate::application::ports::job_queue::{JobEvent, JobQueue, JobQueueError, QueueHealth};
use crate::domain::entities::ProcessDocumentJob;
use crate::domain::value_objects::DocumentStatus;

const EVENT_BUFFER: usize = 256;

#[derive(Debug, Clone, Default)]
struct QueueStats {
    total_enqueued: u64,
    total_started: u64,
    total_completed: u64,
    total_failed: u64,
    last_activity: Option<DateTime<Utc>>,
}

/// Counters and lifecycle events shared by the producer and consumer halves.
#[derive(Clone)]
pub struct JobTracker {
    stats: Arc<Mutex<QueueStats>>,
    events: broadcast::Sender<JobEvent>,
}

impl JobTracker {
    fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            stats: Arc::new(Mutex::new(QueueStats::default())),
            events,
        }
    }

    async fn job_queued(&self, document_id: i32) {
        {
            let mut stats = self.stats.lock().await;
            stats.total_enqueued += 1;
            stats.last_activity = Some(Utc::now());
        }
        self.publish(JobEvent::Queued { document_id });
    }

    pub async fn job_started(&self, document_id: i32, worker_id: usize) {
        {
            let mut stats = self.stats.lock().await;
            stats.total_started += 1;
            stats.last_activity = Some(Utc::now());
        }
        self.publish(JobEvent::Started {
            document_id,
            worker_id,
        });
    }

    pub async fn job_finished(&self, document_id: i32, status: DocumentStatus) {
        {
            let mut stats = self.stats.lock().await;
            match status {
                DocumentStatus::Completed => stats.total_completed += 1,
                _ => stats.total_failed += 1,
            }
            stats.last_activity = Some(Utc::now());
        }
        self.publish(JobEvent::Finished {
            document_id,
            status,
        });
    }

    fn publish(&self, event: JobEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

pub struct MpscJobQueue {
    sender: mpsc::Sender<ProcessDocumentJob>,
    tracker: JobTracker,
    capacity: usize,
}

impl MpscJobQueue {
    /// Bounded queue; `enqueue` is refused while `capacity` jobs are pending.
    pub fn create_pair(capacity: usize) -> (Self, MpscJobQueueReceiver) {
        let capacity = capacity.max(1);
        let (sender, receiver) = mpsc::channel(capacity);
        let tracker = JobTracker::new();

        let queue = Self {
            sender,
            tracker: tracker.clone(),
            capacity,
        };
        let receiver = MpscJobQueueReceiver {
            receiver: Mutex::new(receiver),
            tracker,
        };

        (queue, receiver)
    }
}

#[async_trait]
impl JobQueue for MpscJobQueue {
    async fn enqueue(&self, job: ProcessDocumentJob) -> Result<(), JobQueueError> {
        let document_id = job.document_id();

        let permit = self.sender.try_reserve().map_err(|e| match e {
            mpsc::error::TrySendError::Full(()) => JobQueueError::Full,
            mpsc::error::TrySendError::Closed(()) => JobQueueError::Closed,
        })?;

        // Counted before a worker can see the job.
        self.tracker.job_queued(document_id).await;
        permit.send(job);

        tracing::debug!(document_id, "Job queued");
        Ok(())
    }

    async fn health_check(&self) -> QueueHealth {
        let stats = self.tracker.stats.lock().await.clone();
        let finished = stats.total_completed + stats.total_failed;

        QueueHealth {
            capacity: self.capacity,
            total_enqueued: stats.total_enqueued,
            total_started: stats.total_started,
            total_completed: stats.total_completed,
            total_failed: stats.total_failed,
            in_flight: stats.total_started.saturating_sub(finished),
            last_activity: stats.last_activity,
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<JobEvent> {
        self.tracker.events.subscribe()
    }
}

/// Consumer half, shared by all workers.
pub struct MpscJobQueueReceiver {
    receiver: Mutex<mpsc::Receiver<ProcessDocumentJob>>,
    tracker: JobTracker,
}

impl MpscJobQueueReceiver {
    /// `None` once every sender is gone and the queue is drained.
    pub async fn recv(&self) -> Option<ProcessDocumentJob> {
        let mut receiver = self.receiver.lock().await;
        receiver.recv().await
    }

    pub fn tracker(&self) -> &JobTracker {
        &self.tracker
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Document;
    use std::time::Duration;

    fn job(document_id: i32) -> ProcessDocumentJob {
        ProcessDocumentJob::for_document(&Document::from_parts(
            document_id,
            format!("file-{}", document_id),
            "a.pdf".to_string(),
            "1".to_string(),
            Utc::now(),
            DocumentStatus::Processing,
        ))
    }

    #[tokio::test]
    async fn test_jobs_are_delivered_in_order() {
        let (queue, receiver) = MpscJobQueue::create_pair(4);

        queue.enqueue(job(1)).await.unwrap();
        queue.enqueue(job(2)).await.unwrap();

        assert_eq!(receiver.recv().await.unwrap().document_id(), 1);
        assert_eq!(receiver.recv().await.unwrap().document_id(), 2);
        assert_eq!(queue.health_check().await.total_enqueued, 2);
    }

    #[tokio::test]
    async fn test_enqueue_fails_once_consumer_is_gone() {
        let (queue, receiver) = MpscJobQueue::create_pair(4);
        drop(receiver);

        assert!(matches!(
            queue.enqueue(job(1)).await,
            Err(JobQueueError::Closed)
        ));
        assert_eq!(queue.health_check().await.total_enqueued, 0);
    }

    #[tokio::test]
    async fn test_full_queue_refuses_without_waiting() {
        let (queue, receiver) = MpscJobQueue::create_pair(1);
        queue.enqueue(job(1)).await.unwrap();

        let refused = tokio::time::timeout(Duration::from_millis(50), queue.enqueue(job(2)))
            .await
            .expect("enqueue must not wait for a slot");
        assert!(matches!(refused, Err(JobQueueError::Full)));
        assert_eq!(queue.health_check().await.total_enqueued, 1);

        receiver.recv().await.unwrap();
        queue.enqueue(job(3)).await.unwrap();
        assert_eq!(receiver.recv().await.unwrap().document_id(), 3);
    }

    #[tokio::test]
    async fn test_job_is_counted_before_a_worker_can_take_it() {
        let (queue, receiver) = MpscJobQueue::create_pair(4);
        let queue = Arc::new(queue);
        let receiver = Arc::new(receiver);
        let mut events = queue.subscribe();

        let worker = {
            let receiver = receiver.clone();
            let queue = queue.clone();
            tokio::spawn(async move {
                let job = receiver.recv().await.unwrap();
                let enqueued_when_taken = queue.health_check().await.total_enqueued;
                receiver.tracker().job_started(job.document_id(), 0).await;
                enqueued_when_taken
            })
        };

        queue.enqueue(job(9)).await.unwrap();

        assert_eq!(worker.await.unwrap(), 1);
        assert_eq!(events.recv().await.unwrap(), JobEvent::Queued { document_id: 9 });
        assert!(matches!(
            events.recv().await.unwrap(),
            JobEvent::Started { document_id: 9, .. }
        ));
    }

    #[tokio::test]
    async fn test_lifecycle_counters_and_events() {
        let (queue, receiver) = MpscJobQueue::create_pair(4);
        let mut events = queue.subscribe();

        queue.enqueue(job(7)).await.unwrap();
        receiver.tracker().job_started(7, 0).await;

        let health = queue.health_check().await;
        assert_eq!(health.in_flight, 1);

        receiver.tracker().job_finished(7, DocumentStatus::Failed).await;
        let health = queue.health_check().await;
        assert_eq!(health.in_flight, 0);
        assert_eq!(health.total_failed, 1);
        assert!(health.last_activity.is_some());

        assert_eq!(events.recv().await.unwrap(), JobEvent::Queued { document_id: 7 });
        assert_eq!(
            events.recv().await.unwrap(),
            JobEvent::Started {
                document_id: 7,
                worker_id: 0
            }
        );
        assert_eq!(
            events.recv().await.unwrap(),
            JobEvent::Finished {
                document_id: 7,
                status: DocumentStatus::Failed
            }
        );
    }
}
