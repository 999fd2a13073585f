use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct KnowledgeBaseDocument {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum KnowledgeBaseOutcome {
    Indexed,
    /// Remote indexing is turned off.
    Skipped,
    Failed(String),
}

impl KnowledgeBaseOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            KnowledgeBaseOutcome::Indexed => "indexed",
            KnowledgeBaseOutcome::Skipped => "skipped",
            KnowledgeBaseOutcome::Failed(_) => "failed",
        }
    }
}

/// Remote knowledge base. Implementations never return an error: transport
/// failures are reported as `KnowledgeBaseOutcome::Failed`.
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    async fn upload_document(&self, document: KnowledgeBaseDocument) -> KnowledgeBaseOutcome;
}
