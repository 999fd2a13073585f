use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::use_cases::upload_document::UploadDocumentResponse;
use crate::domain::entities::Document;
use crate::domain::value_objects::DocumentStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDto {
    pub id: i32,
    pub filename: String,
    pub original_name: String,
    pub file_size: String,
    pub upload_timestamp: DateTime<Utc>,
    pub status: DocumentStatus,
}

impl From<Document> for DocumentDto {
    fn from(document: Document) -> Self {
        Self {
            id: document.id(),
            filename: document.filename().to_string(),
            original_name: document.original_name().to_string(),
            file_size: document.file_size().to_string(),
            upload_timestamp: document.upload_timestamp(),
            status: document.status(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponseDto {
    pub success: bool,
    pub document: DocumentDto,
    pub message: String,
}

impl From<UploadDocumentResponse> for UploadResponseDto {
    fn from(response: UploadDocumentResponse) -> Self {
        Self {
            success: true,
            document: response.document.into(),
            message: response.message,
        }
    }
}
