use async_trait::async_trait;
use lopdf::Document;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::application::ports::document_extractor::{
    DocumentExtractor, ExtractedContent, ExtractionError,
};

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Encrypted PDFs are only readable when protected by the empty user password.
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_blocking(data: &[u8]) -> Result<ExtractedContent, ExtractionError> {
        if !data.starts_with(PDF_MAGIC) {
            return Err(ExtractionError::InvalidPdf(
                "missing %PDF- header".to_string(),
            ));
        }

        let mut doc =
            Document::load_mem(data).map_err(|e| ExtractionError::InvalidPdf(e.to_string()))?;

        if doc.is_encrypted() {
            doc.decrypt("")
                .map_err(|e| ExtractionError::Encrypted(e.to_string()))?;
        }

        let pages = doc.get_pages();
        let page_count = pages.len();

        let extracted: Vec<Result<(u32, String), String>> = pages
            .into_par_iter()
            .map(|(page_num, _)| {
                doc.extract_text(&[page_num])
                    .map(|text| (page_num, text))
                    .map_err(|e| format!("page {}: {}", page_num, e))
            })
            .collect();

        let mut page_texts = Vec::with_capacity(page_count);
        let mut page_errors = Vec::new();
        for result in extracted {
            match result {
                Ok(page) => page_texts.push(page),
                Err(e) => page_errors.push(e),
            }
        }
        page_texts.sort_by_key(|(page_num, _)| *page_num);

        let text = page_texts
            .into_iter()
            .flat_map(|(_, text)| {
                text.lines()
                    .map(str::trim_end)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>()
            .join("\n");

        Ok(ExtractedContent {
            text,
            page_count,
            page_errors,
        })
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentExtractor for PdfExtractor {
    async fn extract_text(&self, data: &[u8]) -> Result<ExtractedContent, ExtractionError> {
        let data = data.to_vec();

        tokio::task::spawn_blocking(move || Self::extract_blocking(&data))
            .await
            .map_err(|e| ExtractionError::ExtractionFailed(e.to_string()))?
    }

    fn supported_media_type(&self) -> &'static str {
        "application/pdf"
    }
}
