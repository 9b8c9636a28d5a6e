//! On-disk storage for uploaded client document files.
//!
//! Files live under `{root}/client_{client_id}/{stored_name}`, where the
//! stored name is a generated `{uuid}.{ext}`. The original file name is only
//! kept in the database.

use std::io;
use std::path::PathBuf;

use careoffice_core::error::CoreError;
use careoffice_core::files::{is_allowed_extension, sanitize_file_name, ALLOWED_EXTENSIONS};
use careoffice_core::types::DbId;
use tokio::io::AsyncWriteExt;

/// Local file-system store rooted at the configured upload directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    max_bytes: usize,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            root: root.into(),
            max_bytes,
        }
    }

    /// Check an incoming upload and return its sanitized original name.
    ///
    /// Rejects empty files, files over the size limit, unusable names and
    /// extensions outside the allow-list.
    pub fn validate_upload(&self, raw_name: &str, len: usize) -> Result<String, CoreError> {
        if len == 0 {
            return Err(CoreError::Validation("Uploaded file is empty".into()));
        }
        if len > self.max_bytes {
            return Err(CoreError::Validation(format!(
                "File exceeds the maximum upload size of {} bytes",
                self.max_bytes
            )));
        }

        let name = sanitize_file_name(raw_name)
            .ok_or_else(|| CoreError::Validation("File name is missing or invalid".into()))?;

        if !is_allowed_extension(&name) {
            return Err(CoreError::Validation(format!(
                "File type not allowed. Allowed extensions: {}",
                ALLOWED_EXTENSIONS.join(", ")
            )));
        }
        Ok(name)
    }

    /// Create the upload root if it is missing.
    pub async fn prepare(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    /// Whether the upload root exists and is a directory.
    pub async fn is_ready(&self) -> bool {
        tokio::fs::metadata(&self.root)
            .await
            .is_ok_and(|meta| meta.is_dir())
    }

    fn client_dir(&self, client_id: DbId) -> PathBuf {
        self.root.join(format!("client_{client_id}"))
    }

    /// Absolute-or-relative path of a stored file (it may not exist).
    pub fn path_for(&self, client_id: DbId, stored_name: &str) -> PathBuf {
        self.client_dir(client_id).join(stored_name)
    }

    /// Write `bytes` to the client's directory, creating it if needed.
    pub async fn save(&self, client_id: DbId, stored_name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let dir = self.client_dir(client_id);
        tokio::fs::create_dir_all(&dir).await?;

        let path = dir.join(stored_name);
        let mut file = tokio::fs::File::create(&path).await?;
        file.write_all(bytes).await?;
        file.flush().await?;

        tracing::debug!(path = %path.display(), size = bytes.len(), "Stored uploaded file");
        Ok(path)
    }

    /// Open a stored file for streaming.
    pub async fn open(&self, client_id: DbId, stored_name: &str) -> io::Result<tokio::fs::File> {
        tokio::fs::File::open(self.path_for(client_id, stored_name)).await
    }

    /// Delete a stored file. Returns `false` if it was already gone.
    pub async fn remove(&self, client_id: DbId, stored_name: &str) -> io::Result<bool> {
        match tokio::fs::remove_file(self.path_for(client_id, stored_name)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}
