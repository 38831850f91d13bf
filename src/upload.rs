//! Upload validation and size-capped chunked writing.
//!
//! The declared filename is only trusted for its extension; the stored name is
//! generated from a timestamp and a random suffix. Writes are streamed in
//! whatever chunk sizes the multipart decoder yields, so memory per upload is
//! bounded by the chunk size, not the file size. If the byte ceiling is
//! exceeded mid-write the partial file is removed before the error surfaces.

use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::AppError;

pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// Strips directory components from the declared filename and returns the
/// lowercased extension if it is on the allow-list.
pub fn validate_extension(declared_filename: &str) -> Result<String, AppError> {
    // Path::file_name drops any directory prefix the client sent along.
    let name = Path::new(declared_filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    let ext = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => ext.to_ascii_lowercase(),
        _ => {
            return Err(AppError::InvalidFileType(
                "Uploaded file has no extension".to_string(),
            ))
        }
    };

    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(AppError::InvalidFileType("Invalid file type".to_string()));
    }
    Ok(ext)
}

fn generate_name(ext: &str) -> String {
    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    format!("{}_{}.{}", timestamp, Uuid::new_v4().simple(), ext)
}

/// Streams one upload to disk under a generated name, enforcing the byte
/// ceiling. Extension validation happens in `create`, before the destination
/// file exists.
pub struct UploadWriter {
    path: PathBuf,
    file: File,
    written: u64,
    limit: u64,
}

impl UploadWriter {
    pub async fn create(
        folder: &Path,
        declared_filename: &str,
        max_bytes: u64,
    ) -> Result<Self, AppError> {
        let ext = validate_extension(declared_filename)?;
        tokio::fs::create_dir_all(folder).await?;
        let path = folder.join(generate_name(&ext));
        let file = File::create(&path).await?;
        Ok(Self {
            path,
            file,
            written: 0,
            limit: max_bytes,
        })
    }

    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), AppError> {
        self.written += chunk.len() as u64;
        if self.written > self.limit {
            let _ = tokio::fs::remove_file(&self.path).await;
            return Err(AppError::PayloadTooLarge);
        }
        self.file.write_all(chunk).await?;
        Ok(())
    }

    /// Flushes and returns the stored path with forward slashes.
    pub async fn finish(mut self) -> Result<String, AppError> {
        self.file.flush().await?;
        Ok(self.path.to_string_lossy().replace('\\', "/"))
    }

    /// Removes the file; for callers whose later steps fail after a
    /// successful write.
    pub async fn discard(self) {
        let _ = tokio::fs::remove_file(&self.path).await;
    }
}

/// Best-effort cleanup for an already-finished upload (e.g. the record insert
/// that should reference it failed).
pub async fn remove_stored(path: &str) {
    if let Err(err) = tokio::fs::remove_file(path).await {
        tracing::warn!(path, error = %err, "failed to remove stored upload");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_allow_list_is_case_insensitive() {
        assert_eq!(validate_extension("cow.PNG").unwrap(), "png");
        assert_eq!(validate_extension("cow.JpEg").unwrap(), "jpeg");
        assert_eq!(validate_extension("cow.gif").unwrap(), "gif");
    }

    #[test]
    fn executables_and_extensionless_names_are_rejected() {
        assert!(matches!(
            validate_extension("payload.exe"),
            Err(AppError::InvalidFileType(_))
        ));
        assert!(matches!(
            validate_extension("noextension"),
            Err(AppError::InvalidFileType(_))
        ));
        assert!(matches!(
            validate_extension(""),
            Err(AppError::InvalidFileType(_))
        ));
        assert!(matches!(
            validate_extension(".gitignore"),
            Err(AppError::InvalidFileType(_))
        ));
    }

    #[test]
    fn directory_components_are_stripped_before_validation() {
        assert_eq!(validate_extension("../../etc/passwd.png").unwrap(), "png");
        assert!(validate_extension("../../etc/passwd").is_err());
    }

    #[tokio::test]
    async fn bad_extension_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let result = UploadWriter::create(dir.path(), "payload.exe", 1024).await;
        assert!(matches!(result, Err(AppError::InvalidFileType(_))));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn oversize_upload_leaves_no_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = UploadWriter::create(dir.path(), "cow.jpg", 10).await.unwrap();
        writer.write_chunk(&[0u8; 8]).await.unwrap();
        let err = writer.write_chunk(&[0u8; 8]).await.unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn successful_upload_keeps_the_extension_and_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = UploadWriter::create(dir.path(), "cow.jpeg", 1024).await.unwrap();
        writer.write_chunk(b"hello ").await.unwrap();
        writer.write_chunk(b"world").await.unwrap();
        let stored = writer.finish().await.unwrap();
        assert!(stored.ends_with(".jpeg"));
        assert_eq!(std::fs::read(&stored).unwrap(), b"hello world");
    }

    #[tokio::test]
    async fn discard_removes_the_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = UploadWriter::create(dir.path(), "cow.png", 1024).await.unwrap();
        writer.write_chunk(b"partial").await.unwrap();
        writer.discard().await;
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
