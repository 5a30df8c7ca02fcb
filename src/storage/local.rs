//! Local filesystem seen-set store.
//!
//! The set is kept as one pretty-printed JSON object. Writes go to a
//! sibling `.tmp` file which is then renamed over the target, so a crash
//! mid-write leaves the previous set intact. There is no locking; runs
//! must not overlap.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::storage::{SeenSet, SeenStore};

/// Seen-set stored in a single JSON file.
#[derive(Debug, Clone)]
pub struct LocalSeenStore {
    path: PathBuf,
}

impl LocalSeenStore {
    /// Create a store backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.ensure_dir().await?;

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[async_trait]
impl SeenStore for LocalSeenStore {
    async fn load(&self) -> Result<SeenSet> {
        match self.read_bytes().await? {
            Some(bytes) => {
                let seen: SeenSet = serde_json::from_slice(&bytes)?;
                log::debug!("Loaded {} seen keys from {}", seen.len(), self.path.display());
                Ok(seen)
            }
            None => {
                log::info!(
                    "No seen-set at {}; starting empty",
                    self.path.display()
                );
                Ok(SeenSet::new())
            }
        }
    }

    async fn save(&self, seen: &SeenSet) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(seen)?;
        self.write_bytes(&bytes).await?;
        log::debug!("Saved {} seen keys to {}", seen.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_set() -> SeenSet {
        let mut seen = SeenSet::new();
        seen.insert(
            "3f9a1c0b7d2e".to_string(),
            "2026-10-01T08:00:00.000000+00:00".to_string(),
        );
        seen.insert(
            "a0b1c2d3e4f5".to_string(),
            "2026-10-12T17:30:12.345678+00:00".to_string(),
        );
        seen
    }

    #[tokio::test]
    async fn test_load_missing_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = LocalSeenStore::new(tmp.path().join("data/seen_jobs.json"));

        let seen = store.load().await.unwrap();
        assert!(seen.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = LocalSeenStore::new(tmp.path().join("data/seen_jobs.json"));

        let seen = sample_set();
        store.save(&seen).await.unwrap();
        assert_eq!(store.load().await.unwrap(), seen);
    }

    #[tokio::test]
    async fn test_save_creates_parent_and_leaves_no_tmp() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/dir/seen_jobs.json");
        let store = LocalSeenStore::new(&path);

        store.save(&SeenSet::new()).await.unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let tmp = TempDir::new().unwrap();
        let store = LocalSeenStore::new(tmp.path().join("seen_jobs.json"));

        store.save(&sample_set()).await.unwrap();
        let mut smaller = SeenSet::new();
        smaller.insert("ffffffffffff".into(), "2026-10-19T00:00:00+00:00".into());
        store.save(&smaller).await.unwrap();

        assert_eq!(store.load().await.unwrap(), smaller);
    }

    #[tokio::test]
    async fn test_malformed_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("seen_jobs.json");
        std::fs::write(&path, b"{ not json").unwrap();

        let store = LocalSeenStore::new(&path);
        let err = store.load().await.unwrap_err();
        assert!(matches!(err, AppError::Json(_)));
    }

    #[tokio::test]
    async fn test_wrong_shape_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("seen_jobs.json");
        std::fs::write(&path, br#"["3f9a1c0b7d2e"]"#).unwrap();

        let store = LocalSeenStore::new(&path);
        assert!(store.load().await.is_err());
    }
}
