use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::entities::{Document, NewDocument};
use crate::domain::value_objects::DocumentStatus;
use crate::infrastructure::database::schema::documents;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DocumentModel {
    pub id: i32,
    pub filename: String,
    pub original_name: String,
    pub file_size: String,
    pub upload_timestamp: DateTime<Utc>,
    pub status: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewDocumentModel {
    pub filename: String,
    pub original_name: String,
    pub file_size: String,
    pub status: String,
}

impl From<NewDocument> for NewDocumentModel {
    fn from(document: NewDocument) -> Self {
        Self {
            filename: document.filename,
            original_name: document.original_name,
            file_size: document.file_size,
            status: document.status.as_str().to_string(),
        }
    }
}

impl TryFrom<DocumentModel> for Document {
    type Error = String;

    fn try_from(model: DocumentModel) -> Result<Self, Self::Error> {
        let status = model
            .status
            .parse::<DocumentStatus>()
            .map_err(|e| format!("document {}: {}", model.id, e))?;

        Ok(Document::from_parts(
            model.id,
            model.filename,
            model.original_name,
            model.file_size,
            model.upload_timestamp,
            status,
        ))
    }
}
