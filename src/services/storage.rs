//! File storage service implementation
//!
//! Persists uploaded files (profile images, school logos, restore dumps)
//! under the configured upload directory. Stored names are prefixed with a
//! UUID so uploads never collide or overwrite each other.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::settings::Settings;
use crate::utils::errors::{OpenAttendanceError, Result};
use crate::utils::helpers;

/// Upload categories map to subdirectories of the upload root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    StudentImage,
    StaffImage,
    SchoolLogo,
    RestoreDump,
}

impl UploadKind {
    fn subdir(&self) -> &'static str {
        match self {
            UploadKind::StudentImage => "students",
            UploadKind::StaffImage => "staff",
            UploadKind::SchoolLogo => "school",
            UploadKind::RestoreDump => "restore",
        }
    }
}

/// Upload persistence service
#[derive(Debug, Clone)]
pub struct StorageService {
    settings: Settings,
}

impl StorageService {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    fn upload_root(&self) -> &Path {
        Path::new(&self.settings.server.upload_dir)
    }

    /// Write uploaded bytes to disk, returning the stored relative path
    pub async fn store(&self, kind: UploadKind, file_name: &str, bytes: &[u8]) -> Result<String> {
        if bytes.is_empty() {
            return Err(OpenAttendanceError::InvalidInput(
                "uploaded file is empty".to_string(),
            ));
        }
        if bytes.len() > self.settings.server.max_upload_bytes {
            return Err(OpenAttendanceError::InvalidInput(format!(
                "uploaded file exceeds {} bytes",
                self.settings.server.max_upload_bytes
            )));
        }

        let safe_name = helpers::sanitize_filename(file_name);
        let stored_name = format!("{}_{}", helpers::generate_uuid(), safe_name);
        let dir = self.upload_root().join(kind.subdir());
        tokio::fs::create_dir_all(&dir).await?;

        let target = dir.join(&stored_name);
        tokio::fs::write(&target, bytes).await?;

        let relative = format!("{}/{}", kind.subdir(), stored_name);
        info!(path = %relative, size = bytes.len(), "Upload stored");
        Ok(relative)
    }

    /// Resolve a stored relative path back to an absolute path.
    ///
    /// Rejects traversal outside the upload root.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf> {
        if relative.starts_with('/') || relative.split('/').any(|part| part == "..") {
            return Err(OpenAttendanceError::InvalidInput(
                "invalid stored file path".to_string(),
            ));
        }
        Ok(self.upload_root().join(relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_with_root(root: &Path) -> StorageService {
        let mut settings = Settings::default();
        settings.server.upload_dir = root.to_string_lossy().to_string();
        StorageService::new(settings)
    }

    #[tokio::test]
    async fn test_store_and_resolve() {
        let tmp = tempfile::tempdir().unwrap();
        let service = service_with_root(tmp.path());

        let relative = service
            .store(UploadKind::StudentImage, "photo.png", b"fake-bytes")
            .await
            .unwrap();
        assert!(relative.starts_with("students/"));
        assert!(relative.ends_with("photo.png"));

        let absolute = service.resolve(&relative).unwrap();
        assert_eq!(tokio::fs::read(absolute).await.unwrap(), b"fake-bytes");
    }

    #[tokio::test]
    async fn test_store_rejects_empty_and_oversized() {
        let tmp = tempfile::tempdir().unwrap();
        let mut service = service_with_root(tmp.path());
        service.settings.server.max_upload_bytes = 4;

        assert!(service
            .store(UploadKind::SchoolLogo, "logo.png", b"")
            .await
            .is_err());
        assert!(service
            .store(UploadKind::SchoolLogo, "logo.png", b"too big")
            .await
            .is_err());
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let service = service_with_root(Path::new("/tmp/uploads"));
        assert!(service.resolve("../secret").is_err());
        assert!(service.resolve("/etc/passwd").is_err());
        assert!(service.resolve("students/ok.png").is_ok());
    }
}
