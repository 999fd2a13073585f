use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::DocumentStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    id: i32,
    filename: String,
    original_name: String,
    file_size: String,
    upload_timestamp: DateTime<Utc>,
    status: DocumentStatus,
}

impl Document {
    pub fn from_parts(
        id: i32,
        filename: String,
        original_name: String,
        file_size: String,
        upload_timestamp: DateTime<Utc>,
        status: DocumentStatus,
    ) -> Self {
        Self {
            id,
            filename,
            original_name,
            file_size,
            upload_timestamp,
            status,
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    /// Server-generated storage name of the transient upload.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    pub fn file_size(&self) -> &str {
        &self.file_size
    }

    pub fn upload_timestamp(&self) -> DateTime<Utc> {
        self.upload_timestamp
    }

    pub fn status(&self) -> DocumentStatus {
        self.status
    }

    pub fn transition_to(&mut self, status: DocumentStatus) -> Result<(), String> {
        if !self.status.can_transition_to(status) {
            return Err(format!(
                "Document {} cannot move from {} to {}",
                self.id, self.status, status
            ));
        }

        self.status = status;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewDocument {
    pub filename: String,
    pub original_name: String,
    pub file_size: String,
    pub status: DocumentStatus,
}

impl NewDocument {
    pub fn processing(filename: String, original_name: String, file_size: u64) -> Self {
        Self {
            filename,
            original_name,
            file_size: file_size.to_string(),
            status: DocumentStatus::Processing,
        }
    }
}
