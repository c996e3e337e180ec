// SPDX-License-Identifier: GPL-3.0-only
use std::path::PathBuf;
use tracing::{info, warn};
use uuid::Uuid;

use crate::library::models::GameRecord;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid library document: {0}")]
    Json(#[from] serde_json::Error),
}

/// The persisted library document read by the front-end
#[derive(Debug, Clone)]
pub struct LibraryStore {
    path: PathBuf,
}

impl LibraryStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Replace the current snapshot with `records`.
    ///
    /// The document is written to a temporary sibling and renamed into place;
    /// readers see either the old snapshot or the new one, never a mix.
    pub async fn write(&self, records: &[GameRecord]) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(records)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StoreError::Io { path: parent.to_path_buf(), source })?;
        }

        let temp_path = self.temp_path();
        let result = match tokio::fs::write(&temp_path, &json).await {
            Ok(()) => tokio::fs::rename(&temp_path, &self.path)
                .await
                .map_err(|source| StoreError::Io { path: self.path.clone(), source }),
            Err(source) => Err(StoreError::Io { path: temp_path.clone(), source }),
        };

        if result.is_err() {
            if let Err(e) = tokio::fs::remove_file(&temp_path).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %temp_path.display(), error = %e, "Failed to remove temporary library file");
                }
            }
            return result;
        }

        info!(path = %self.path.display(), count = records.len(), "User library saved");
        Ok(())
    }

    /// Current snapshot, or `None` before the first sync
    pub async fn load(&self) -> Result<Option<Vec<GameRecord>>, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path: self.path.clone(), source }),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "library.json".to_string());
        self.path.with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(appid: u64, name: &str, image_url: &str) -> GameRecord {
        let mut extra = serde_json::Map::new();
        extra.insert("name".to_string(), name.into());
        GameRecord {
            appid,
            image_url: Some(image_url.to_string()),
            extra,
        }
    }

    #[tokio::test]
    async fn test_write_creates_parent_and_pretty_prints() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("api").join("userLibrary.json");
        let store = LibraryStore::new(path.clone());

        store.write(&[record(620, "Portal 2", "/api/assets/620.jpg")]).await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("[\n  {"));
        assert!(contents.contains("\"imageUrl\": \"/api/assets/620.jpg\""));
    }

    #[tokio::test]
    async fn test_write_replaces_previous_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let store = LibraryStore::new(temp_dir.path().join("userLibrary.json"));

        store
            .write(&[record(620, "Portal 2", "a"), record(400, "Portal", "b"), record(70, "Half-Life", "c")])
            .await
            .unwrap();
        store.write(&[record(220, "Half-Life 2", "d")]).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].appid, 220);

        // No temporary files are left next to the document
        let leftovers: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .flatten()
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn test_load_missing_document() {
        let temp_dir = TempDir::new().unwrap();
        let store = LibraryStore::new(temp_dir.path().join("userLibrary.json"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_preserves_order() {
        let temp_dir = TempDir::new().unwrap();
        let store = LibraryStore::new(temp_dir.path().join("userLibrary.json"));

        store
            .write(&[record(70, "Half-Life", "x"), record(620, "Portal 2", "y"), record(10, "Counter-Strike", "z")])
            .await
            .unwrap();

        let ids: Vec<u64> = store.load().await.unwrap().unwrap().iter().map(|r| r.appid).collect();
        assert_eq!(ids, vec![70, 620, 10]);
    }

    #[tokio::test]
    async fn test_load_corrupt_document() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("userLibrary.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = LibraryStore::new(path);
        assert!(matches!(store.load().await, Err(StoreError::Json(_))));
    }
}
