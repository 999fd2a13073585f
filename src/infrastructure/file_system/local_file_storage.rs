use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use crate::application::ports::file_storage::{FileStorage, FileStorageError, StoredFile};

/// Keeps uploads in a flat directory under server-generated names.
pub struct LocalFileStorage {
    base_path: PathBuf,
}

impl LocalFileStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub async fn ensure_directory_exists(&self) -> Result<(), FileStorageError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| FileStorageError::Io(e.to_string()))
    }

    fn resolve(&self, filename: &str) -> Result<PathBuf, FileStorageError> {
        let is_plain = !filename.is_empty()
            && filename != "."
            && filename != ".."
            && !filename.contains(['/', '\\']);

        if !is_plain {
            return Err(FileStorageError::InvalidName(filename.to_string()));
        }

        Ok(self.base_path.join(filename))
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn store_file(&self, data: &[u8]) -> Result<StoredFile, FileStorageError> {
        self.ensure_directory_exists().await?;

        let filename = Uuid::new_v4().to_string();
        let path = self.base_path.join(&filename);

        fs::write(&path, data)
            .await
            .map_err(|e| FileStorageError::Io(e.to_string()))?;

        Ok(StoredFile {
            filename,
            path,
            size: data.len() as u64,
        })
    }

    async fn read_file(&self, filename: &str) -> Result<Vec<u8>, FileStorageError> {
        let path = self.resolve(filename)?;

        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(FileStorageError::FileNotFound(filename.to_string()))
            }
            Err(e) => Err(FileStorageError::Io(e.to_string())),
        }
    }

    async fn delete_file(&self, filename: &str) -> Result<bool, FileStorageError> {
        let path = self.resolve(filename)?;

        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(FileStorageError::Io(e.to_string())),
        }
    }

    async fn file_exists(&self, filename: &str) -> Result<bool, FileStorageError> {
        let path = self.resolve(filename)?;
        fs::try_exists(&path)
            .await
            .map_err(|e| FileStorageError::Io(e.to_string()))
    }
}
