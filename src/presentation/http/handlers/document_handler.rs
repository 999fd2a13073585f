use axum::{
    Json,
    extract::multipart::MultipartRejection,
    extract::rejection::PathRejection,
    extract::{Multipart, Path, State},
    response::IntoResponse,
};
use std::sync::Arc;

use crate::application::use_cases::upload_document::UploadDocumentRequest;
use crate::application::use_cases::{
    GetDocumentUseCase, ListDocumentsUseCase, UploadDocumentUseCase,
};
use crate::presentation::http::AppError;
use crate::presentation::http::dto::{DocumentDto, UploadResponseDto};

/// Multipart field carrying the uploaded PDF.
pub const UPLOAD_FIELD: &str = "pdf";

pub struct DocumentHandler {
    list_documents_use_case: Arc<ListDocumentsUseCase>,
    get_document_use_case: Arc<GetDocumentUseCase>,
    upload_document_use_case: Arc<UploadDocumentUseCase>,
}

impl DocumentHandler {
    pub fn new(
        list_documents_use_case: Arc<ListDocumentsUseCase>,
        get_document_use_case: Arc<GetDocumentUseCase>,
        upload_document_use_case: Arc<UploadDocumentUseCase>,
    ) -> Self {
        Self {
            list_documents_use_case,
            get_document_use_case,
            upload_document_use_case,
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.upload_document_use_case.max_upload_bytes()
    }

    pub async fn list_documents(
        State(handler): State<Arc<DocumentHandler>>,
    ) -> Result<impl IntoResponse, AppError> {
        let documents = handler
            .list_documents_use_case
            .execute()
            .await
            .map_err(|e| AppError::internal("Failed to fetch documents", e))?;

        let dtos: Vec<DocumentDto> = documents.into_iter().map(DocumentDto::from).collect();
        Ok(Json(dtos))
    }

    pub async fn get_document(
        State(handler): State<Arc<DocumentHandler>>,
        document_id: Result<Path<i32>, PathRejection>,
    ) -> Result<impl IntoResponse, AppError> {
        let Path(document_id) = document_id?;
        let document = handler.get_document_use_case.execute(document_id).await?;
        Ok(Json(DocumentDto::from(document)))
    }

    pub async fn upload_document(
        State(handler): State<Arc<DocumentHandler>>,
        multipart: Result<Multipart, MultipartRejection>,
    ) -> Result<impl IntoResponse, AppError> {
        let mut multipart = multipart?;

        while let Some(field) = multipart.next_field().await? {
            if field.name() != Some(UPLOAD_FIELD) {
                continue;
            }

            let original_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().map(str::to_string);
            let data = field.bytes().await?.to_vec();

            let response = handler
                .upload_document_use_case
                .execute(UploadDocumentRequest {
                    original_name,
                    content_type,
                    data,
                })
                .await?;

            return Ok(Json(UploadResponseDto::from(response)));
        }

        Err(AppError::BadRequest("No PDF file uploaded".to_string()))
    }
}
