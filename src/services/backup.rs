//! Backup service implementation
//!
//! Creates and restores PostgreSQL dumps by shelling out to `pg_dump` and
//! `pg_restore`. Dumps use the custom format (`-Fc`) and land in the
//! configured backup directory; restores run with `--clean` so the target
//! schema is dropped and recreated from the archive.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::process::Command;
use tracing::{info, warn};

use crate::config::settings::Settings;
use crate::utils::errors::{OpenAttendanceError, Result};

/// Metadata about a dump file in the backup directory
#[derive(Debug, Clone, serde::Serialize)]
pub struct BackupEntry {
    pub file_name: String,
    pub size_bytes: u64,
    pub created_at: chrono::DateTime<Utc>,
}

/// Database backup and restore service
#[derive(Debug, Clone)]
pub struct BackupService {
    settings: Settings,
}

impl BackupService {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    fn backup_dir(&self) -> &Path {
        Path::new(&self.settings.server.backup_dir)
    }

    /// Create a new custom-format dump, returning its path
    pub async fn create_backup(&self) -> Result<PathBuf> {
        tokio::fs::create_dir_all(self.backup_dir()).await?;

        let file_name = format!("openattendance_{}.dump", Utc::now().format("%Y%m%d_%H%M%S"));
        let target = self.backup_dir().join(&file_name);

        let output = Command::new("pg_dump")
            .arg("-Fc")
            .arg("--no-owner")
            .arg("-f")
            .arg(&target)
            .arg("-d")
            .arg(&self.settings.database.url)
            .output()
            .await
            .map_err(|e| OpenAttendanceError::Backup(format!("failed to run pg_dump: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            // don't leave a truncated dump behind
            let _ = tokio::fs::remove_file(&target).await;
            return Err(OpenAttendanceError::Backup(format!(
                "pg_dump exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        info!(file = %target.display(), "Database backup created");
        Ok(target)
    }

    /// Restore the database from an uploaded custom-format dump
    pub async fn restore_backup(&self, dump_path: &Path) -> Result<()> {
        if !dump_path.exists() {
            return Err(OpenAttendanceError::Backup(format!(
                "dump file not found: {}",
                dump_path.display()
            )));
        }

        let output = Command::new("pg_restore")
            .arg("--clean")
            .arg("--if-exists")
            .arg("--no-owner")
            .arg("-d")
            .arg(&self.settings.database.url)
            .arg(dump_path)
            .output()
            .await
            .map_err(|e| OpenAttendanceError::Backup(format!("failed to run pg_restore: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OpenAttendanceError::Backup(format!(
                "pg_restore exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        warn!(file = %dump_path.display(), "Database restored from backup");
        Ok(())
    }

    /// Restore from a staged upload, removing the staged file afterwards
    /// whether or not the restore succeeded
    pub async fn restore_staged(&self, dump_path: &Path) -> Result<()> {
        let outcome = self.restore_backup(dump_path).await;
        if let Err(e) = tokio::fs::remove_file(dump_path).await {
            warn!(file = %dump_path.display(), error = %e, "Staged dump not removed");
        }
        outcome
    }

    /// List dump files currently in the backup directory, newest first
    pub async fn list_backups(&self) -> Result<Vec<BackupEntry>> {
        let mut entries = Vec::new();
        let dir = self.backup_dir();
        if !dir.exists() {
            return Ok(entries);
        }

        let mut reader = tokio::fs::read_dir(dir).await?;
        while let Some(entry) = reader.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            if !name.ends_with(".dump") {
                continue;
            }
            let metadata = entry.metadata().await?;
            let created_at = metadata
                .modified()
                .map(chrono::DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now());
            entries.push(BackupEntry {
                file_name: name,
                size_bytes: metadata.len(),
                created_at,
            });
        }

        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }

    /// Resolve a backup file name to a path inside the backup directory.
    ///
    /// Rejects names with path separators so callers cannot escape the
    /// backup directory.
    pub fn resolve_backup(&self, file_name: &str) -> Result<PathBuf> {
        if file_name.contains('/') || file_name.contains('\\') || file_name.contains("..") {
            return Err(OpenAttendanceError::InvalidInput(
                "invalid backup file name".to_string(),
            ));
        }
        Ok(self.backup_dir().join(file_name))
    }

    /// Delete a dump file from the backup directory
    pub async fn delete_backup(&self, file_name: &str) -> Result<()> {
        let path = self.resolve_backup(file_name)?;
        if !path.exists() {
            return Err(OpenAttendanceError::NotFound(format!(
                "backup {file_name} not found"
            )));
        }
        tokio::fs::remove_file(&path).await?;
        info!(file = file_name, "Backup deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_with_backup_dir(dir: &Path) -> BackupService {
        let mut settings = Settings::default();
        settings.server.backup_dir = dir.to_string_lossy().to_string();
        BackupService::new(settings)
    }

    #[test]
    fn test_resolve_backup_rejects_traversal() {
        let service = service_with_backup_dir(Path::new("/tmp/backups"));
        assert!(service.resolve_backup("../etc/passwd").is_err());
        assert!(service.resolve_backup("a/b.dump").is_err());
        assert!(service.resolve_backup("ok.dump").is_ok());
    }

    #[tokio::test]
    async fn test_list_backups_empty_when_dir_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let service = service_with_backup_dir(&tmp.path().join("nope"));
        assert!(service.list_backups().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_backups_filters_non_dumps() {
        let tmp = tempfile::tempdir().unwrap();
        tokio::fs::write(tmp.path().join("a.dump"), b"x").await.unwrap();
        tokio::fs::write(tmp.path().join("notes.txt"), b"x").await.unwrap();

        let service = service_with_backup_dir(tmp.path());
        let backups = service.list_backups().await.unwrap();
        assert_eq!(backups.len(), 1);
        assert_eq!(backups[0].file_name, "a.dump");
    }

    #[tokio::test]
    async fn test_restore_staged_removes_dump_even_on_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let dump = tmp.path().join("staged.dump");
        tokio::fs::write(&dump, b"not a real archive").await.unwrap();

        let service = service_with_backup_dir(tmp.path());
        assert!(service.restore_staged(&dump).await.is_err());
        assert!(!dump.exists());
    }

    #[tokio::test]
    async fn test_restore_missing_file_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let service = service_with_backup_dir(tmp.path());
        let err = service
            .restore_backup(&tmp.path().join("missing.dump"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
