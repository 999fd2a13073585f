use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::domain::entities::{Document, NewDocument};
use crate::domain::repositories::{DocumentRepository, StorageError};
use crate::domain::value_objects::DocumentStatus;

struct DocumentTable {
    next_id: i32,
    rows: Vec<Document>,
}

pub struct InMemoryDocumentRepository {
    table: Mutex<DocumentTable>,
}

impl InMemoryDocumentRepository {
    pub fn new() -> Self {
        Self {
            table: Mutex::new(DocumentTable {
                next_id: 1,
                rows: Vec::new(),
            }),
        }
    }
}

impl Default for InMemoryDocumentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    async fn list(&self) -> Result<Vec<Document>, StorageError> {
        let table = self.table.lock().await;
        let mut documents = table.rows.clone();
        documents.sort_by(|a, b| {
            b.upload_timestamp()
                .cmp(&a.upload_timestamp())
                .then_with(|| b.id().cmp(&a.id()))
        });
        Ok(documents)
    }

    async fn find(&self, id: i32) -> Result<Option<Document>, StorageError> {
        let table = self.table.lock().await;
        Ok(table.rows.iter().find(|doc| doc.id() == id).cloned())
    }

    async fn create(&self, document: NewDocument) -> Result<Document, StorageError> {
        let mut table = self.table.lock().await;
        let id = table.next_id;
        table.next_id += 1;

        let stored = Document::from_parts(
            id,
            document.filename,
            document.original_name,
            document.file_size,
            Utc::now(),
            document.status,
        );
        table.rows.push(stored.clone());
        Ok(stored)
    }

    async fn update_status(&self, id: i32, status: DocumentStatus) -> Result<bool, StorageError> {
        let mut table = self.table.lock().await;
        match table.rows.iter_mut().find(|doc| doc.id() == id) {
            Some(document) => Ok(document.transition_to(status).is_ok()),
            None => Ok(false),
        }
    }
}
