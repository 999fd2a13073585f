use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;

use crate::application::services::DocumentProcessorService;
use crate::domain::entities::ProcessDocumentJob;
use crate::domain::value_objects::DocumentStatus;
use crate::infrastructure::messaging::MpscJobQueueReceiver;

/// Fixed pool of workers draining the job queue.
#[derive(Clone)]
pub struct BackgroundProcessor {
    job_receiver: Arc<MpscJobQueueReceiver>,
    document_processor: Arc<DocumentProcessorService>,
    worker_count: usize,
}

impl BackgroundProcessor {
    pub fn new(
        job_receiver: Arc<MpscJobQueueReceiver>,
        document_processor: Arc<DocumentProcessorService>,
    ) -> Self {
        Self {
            job_receiver,
            document_processor,
            worker_count: 3,
        }
    }

    pub fn with_worker_count(mut self, count: usize) -> Self {
        self.worker_count = count.max(1);
        self
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Runs the workers until the queue is closed and drained.
    pub async fn start(&self) {
        tracing::info!(
            "Starting background processor with {} workers",
            self.worker_count
        );

        let workers = (0..self.worker_count).map(|worker_id| {
            let processor = self.clone();
            tokio::spawn(async move {
                processor.worker_loop(worker_id).await;
            })
        });

        for (worker_id, result) in join_all(workers).await.into_iter().enumerate() {
            if let Err(e) = result {
                tracing::error!("Worker {} panicked: {}", worker_id, e);
            }
        }

        tracing::info!("Background processor stopped");
    }

    async fn worker_loop(&self, worker_id: usize) {
        tracing::debug!("Worker {} started", worker_id);

        while let Some(job) = self.job_receiver.recv().await {
            self.process_job(worker_id, job).await;
        }

        tracing::debug!("Worker {} stopped", worker_id);
    }

    async fn process_job(&self, worker_id: usize, job: ProcessDocumentJob) {
        let document_id = job.document_id();
        let tracker = self.job_receiver.tracker();
        let started = Instant::now();

        tracker.job_started(document_id, worker_id).await;
        tracing::info!(document_id, worker_id, job_id = %job.id(), "Processing job");

        let processor = self.document_processor.clone();
        let task_job = job.clone();
        let status = match tokio::spawn(async move { processor.process(&task_job).await }).await {
            Ok(report) => report.status,
            Err(e) => {
                // The processor task died before it could clean up after itself.
                tracing::error!(document_id, error = %e, "Processing task aborted");
                self.document_processor.release_file(job.filename()).await;
                self.document_processor
                    .record_status(document_id, DocumentStatus::Failed)
                    .await;
                DocumentStatus::Failed
            }
        };

        tracker.job_finished(document_id, status).await;
        tracing::info!(
            document_id,
            worker_id,
            status = %status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Job finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;

    use crate::application::ports::document_extractor::{ExtractedContent, ExtractionError};
    use crate::application::ports::job_queue::JobEvent;
    use crate::application::ports::knowledge_base::{KnowledgeBaseDocument, KnowledgeBaseOutcome};
    use crate::application::ports::{DocumentExtractor, FileStorage, JobQueue, KnowledgeBase};
    use crate::application::services::TextChunker;
    use crate::domain::entities::NewDocument;
    use crate::domain::repositories::DocumentRepository;
    use crate::infrastructure::file_system::LocalFileStorage;
    use crate::infrastructure::memory::InMemoryDocumentRepository;
    use crate::infrastructure::messaging::MpscJobQueue;

    /// Reads the marker from the file body: `panic` panics, anything else is text.
    struct MarkerExtractor;

    #[async_trait]
    impl DocumentExtractor for MarkerExtractor {
        async fn extract_text(&self, data: &[u8]) -> Result<ExtractedContent, ExtractionError> {
            if data == b"panic" {
                panic!("extractor blew up");
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(ExtractedContent {
                text: String::from_utf8_lossy(data).into_owned(),
                page_count: 1,
                page_errors: Vec::new(),
            })
        }

        fn supported_media_type(&self) -> &'static str {
            "application/pdf"
        }
    }

    struct NoopKnowledgeBase;

    #[async_trait]
    impl KnowledgeBase for NoopKnowledgeBase {
        async fn upload_document(&self, _document: KnowledgeBaseDocument) -> KnowledgeBaseOutcome {
            KnowledgeBaseOutcome::Skipped
        }
    }

    struct Harness {
        _dir: tempfile::TempDir,
        repository: Arc<InMemoryDocumentRepository>,
        storage: Arc<LocalFileStorage>,
        queue: MpscJobQueue,
    }

    fn start_workers(workers: usize) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let repository = Arc::new(InMemoryDocumentRepository::new());
        let storage = Arc::new(LocalFileStorage::new(dir.path().to_path_buf()));
        let (queue, receiver) = MpscJobQueue::create_pair(8);

        let processor = Arc::new(DocumentProcessorService::new(
            repository.clone(),
            storage.clone(),
            Arc::new(MarkerExtractor),
            None,
            Arc::new(NoopKnowledgeBase),
            TextChunker::new(10, 2),
        ));
        let background = BackgroundProcessor::new(Arc::new(receiver), processor)
            .with_worker_count(workers);
        tokio::spawn(async move { background.start().await });

        Harness {
            _dir: dir,
            repository,
            storage,
            queue,
        }
    }

    async fn submit(harness: &Harness, body: &[u8]) -> ProcessDocumentJob {
        let stored = harness.storage.store_file(body).await.unwrap();
        let document = harness
            .repository
            .create(NewDocument::processing(
                stored.filename,
                "doc.pdf".to_string(),
                stored.size,
            ))
            .await
            .unwrap();
        let job = ProcessDocumentJob::for_document(&document);
        harness.queue.enqueue(job.clone()).await.unwrap();
        job
    }

    async fn wait_finished(events: &mut tokio::sync::broadcast::Receiver<JobEvent>, count: usize) {
        let mut finished = 0;
        while finished < count {
            let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
                .await
                .expect("timed out waiting for job events")
                .unwrap();
            if matches!(event, JobEvent::Finished { .. }) {
                finished += 1;
            }
        }
    }

    #[tokio::test]
    async fn test_concurrent_jobs_finish_independently() {
        let harness = start_workers(2);
        let mut events = harness.queue.subscribe();

        let first = submit(&harness, b"alpha beta gamma").await;
        let second = submit(&harness, b"delta epsilon").await;
        wait_finished(&mut events, 2).await;

        for job in [&first, &second] {
            let document = harness
                .repository
                .find(job.document_id())
                .await
                .unwrap()
                .unwrap();
            assert_eq!(document.status(), DocumentStatus::Completed);
            assert!(!harness.storage.file_exists(job.filename()).await.unwrap());
        }

        let health = harness.queue.health_check().await;
        assert_eq!(health.total_started, 2);
        assert_eq!(health.total_completed, 2);
        assert_eq!(health.in_flight, 0);
    }

    #[tokio::test]
    async fn test_panicking_job_is_failed_and_cleaned_up() {
        let harness = start_workers(1);
        let mut events = harness.queue.subscribe();

        let doomed = submit(&harness, b"panic").await;
        let healthy = submit(&harness, b"still works").await;
        wait_finished(&mut events, 2).await;

        let failed = harness
            .repository
            .find(doomed.document_id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(failed.status(), DocumentStatus::Failed);
        assert!(!harness.storage.file_exists(doomed.filename()).await.unwrap());

        let completed = harness
            .repository
            .find(healthy.document_id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(completed.status(), DocumentStatus::Completed);

        let health = harness.queue.health_check().await;
        assert_eq!(health.total_failed, 1);
        assert_eq!(health.total_completed, 1);
    }
}
