use async_trait::async_trait;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FileStorageError {
    #[error("File not found: {0}")]
    FileNotFound(String),
    #[error("Invalid file name: {0}")]
    InvalidName(String),
    #[error("IO error: {0}")]
    Io(String),
}

#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Server-generated name, unique per upload.
    pub filename: String,
    pub path: PathBuf,
    pub size: u64,
}

/// Transient storage for uploads awaiting processing.
#[async_trait]
pub trait FileStorage: Send + Sync {
    async fn store_file(&self, data: &[u8]) -> Result<StoredFile, FileStorageError>;

    async fn read_file(&self, filename: &str) -> Result<Vec<u8>, FileStorageError>;

    /// Returns `false` when there was nothing to delete.
    async fn delete_file(&self, filename: &str) -> Result<bool, FileStorageError>;

    async fn file_exists(&self, filename: &str) -> Result<bool, FileStorageError>;
}
