use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("File unreadable: {0}")]
    Unreadable(String),
    #[error("Not a parseable PDF: {0}")]
    InvalidPdf(String),
    #[error("Encrypted PDF could not be opened: {0}")]
    Encrypted(String),
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),
}

#[derive(Debug, Clone, Default)]
pub struct ExtractedContent {
    pub text: String,
    pub page_count: usize,
    /// Pages that could not be decoded; the rest of the document is still used.
    pub page_errors: Vec<String>,
}

#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract_text(&self, data: &[u8]) -> Result<ExtractedContent, ExtractionError>;

    fn supported_media_type(&self) -> &'static str;
}
