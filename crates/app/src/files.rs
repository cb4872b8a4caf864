//! Filesystem store for uploaded template documents.

use std::io;
use std::path::PathBuf;

use uuid::Uuid;

/// Where a stored document ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Path of the document, relative to the process working directory.
    pub path: String,
    pub size_bytes: i64,
}

/// Persists uploaded documents under a configured root directory.
///
/// Each payload is written under a fresh v7 key so concurrent uploads
/// of identically named files never collide.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Write a document to `<root>/<template_type>/<key>_<file_name>`.
    pub async fn store(
        &self,
        template_type: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> io::Result<StoredFile> {
        let dir = self.root.join(sanitize(template_type));
        tokio::fs::create_dir_all(&dir).await?;

        let path = dir.join(format!("{}_{}", Uuid::now_v7(), sanitize(file_name)));
        tokio::fs::write(&path, bytes).await?;

        Ok(StoredFile {
            path: path.to_string_lossy().into_owned(),
            size_bytes: bytes.len() as i64,
        })
    }

    /// Remove a previously stored document. Used to clean up after a
    /// failed row insert; callers treat failures as non-fatal.
    pub async fn remove(&self, path: &str) -> io::Result<()> {
        tokio::fs::remove_file(path).await
    }
}

/// Strip path separators and control characters from client-supplied
/// names before they touch the filesystem.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
