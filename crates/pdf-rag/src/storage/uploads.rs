//! Local filesystem store for uploaded documents

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Writes uploads to `{upload_dir}/{filename}`
#[derive(Debug, Clone)]
pub struct UploadStore {
    /// Directory to store uploads
    upload_dir: PathBuf,
}

impl UploadStore {
    /// Create a new upload store; the directory is created on first save
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
        }
    }

    /// Upload directory
    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Persist an upload and return the path it was written to.
    ///
    /// Only the final component of `filename` is used, so client-supplied
    /// names cannot escape the upload directory.
    pub async fn save(&self, filename: &str, data: &[u8]) -> Result<PathBuf> {
        let name = sanitize_filename(filename)?;
        tokio::fs::create_dir_all(&self.upload_dir).await?;

        let path = self.upload_dir.join(name);
        tokio::fs::write(&path, data).await?;

        tracing::info!("Saved upload to {} ({} bytes)", path.display(), data.len());
        Ok(path)
    }
}

/// Reduce a client-supplied filename to a safe final path component
fn sanitize_filename(filename: &str) -> Result<&str> {
    let name = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
        .trim();

    if name.is_empty() || name == "." || name == ".." {
        return Err(Error::invalid_input(format!(
            "invalid upload filename: {:?}",
            filename
        )));
    }

    Ok(name)
}
