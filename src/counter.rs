//! Persistent run counter backing unique output filenames

use std::path::{Path, PathBuf};

use crate::error::Result;

/// On-disk counter store. The backing file holds nothing but the decimal
/// digits of the current value.
#[derive(Debug, Clone)]
pub struct CounterStore {
    path: PathBuf,
}

impl CounterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted value. A missing, empty, or unparseable backing
    /// file yields 1; this never fails.
    pub async fn load(&self) -> u64 {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents.trim().parse().unwrap_or(1),
            Err(_) => 1,
        }
    }

    /// Overwrite the backing file with the decimal form of `value`.
    /// Write failures propagate to the caller.
    pub async fn save(&self, value: u64) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&self.path, value.to_string()).await?;
        tracing::debug!("Saved counter value {} to {:?}", value, self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_load_missing_file_returns_one() {
        let dir = tempdir().unwrap();
        let store = CounterStore::new(dir.path().join("counter.txt"));
        assert_eq!(store.load().await, 1);
    }

    #[tokio::test]
    async fn test_load_empty_file_returns_one() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("counter.txt");
        tokio::fs::write(&path, "").await.unwrap();
        let store = CounterStore::new(path);
        assert_eq!(store.load().await, 1);
    }

    #[tokio::test]
    async fn test_load_corrupt_file_returns_one() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("counter.txt");
        tokio::fs::write(&path, "not a number").await.unwrap();
        let store = CounterStore::new(path);
        assert_eq!(store.load().await, 1);
    }

    #[tokio::test]
    async fn test_save_load_roundtrip() {
        let dir = tempdir().unwrap();
        let store = CounterStore::new(dir.path().join("counter.txt"));

        for value in [1u64, 42, 9999, u64::MAX] {
            store.save(value).await.unwrap();
            assert_eq!(store.load().await, value);
        }
    }

    #[tokio::test]
    async fn test_save_tolerates_surrounding_whitespace_on_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("counter.txt");
        tokio::fs::write(&path, "  17\n").await.unwrap();
        let store = CounterStore::new(path);
        assert_eq!(store.load().await, 17);
    }

    #[tokio::test]
    async fn test_save_creates_parent_directory() {
        let dir = tempdir().unwrap();
        let store = CounterStore::new(dir.path().join("nested").join("counter.txt"));
        store.save(7).await.unwrap();
        assert_eq!(store.load().await, 7);
    }
}
