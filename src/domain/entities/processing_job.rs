use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::Document;

/// Background work item for one uploaded document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessDocumentJob {
    id: Uuid,
    document_id: i32,
    filename: String,
    original_name: String,
    created_at: DateTime<Utc>,
}

impl ProcessDocumentJob {
    pub fn for_document(document: &Document) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id: document.id(),
            filename: document.filename().to_string(),
            original_name: document.original_name().to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn document_id(&self) -> i32 {
        self.document_id
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
