use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sesswap_core::entities::Account;
use sesswap_core::ports::AccountStore;
use sesswap_core::Error;
use tokio::fs;
use tracing::{debug, instrument};

/// File-based account store
///
/// The whole ordered sequence lives in a single JSON document, persisted as
/// a bare array. Load and save move it wholesale, matching the store port.
pub struct FileAccountStore {
    store_path: PathBuf,
}

impl FileAccountStore {
    pub fn new(config_dir: PathBuf) -> Self {
        Self {
            store_path: config_dir.join("accounts.json"),
        }
    }

    /// Where the sequence is persisted, for operator-facing output.
    pub fn path(&self) -> &Path {
        &self.store_path
    }
}

#[async_trait]
impl AccountStore for FileAccountStore {
    #[instrument(skip(self))]
    async fn load(&self) -> Result<Vec<Account>, Error> {
        if !fs::try_exists(&self.store_path).await.unwrap_or(false) {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.store_path).await?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Storage(format!("failed to parse accounts file: {}", e)))
    }

    #[instrument(skip(self, accounts))]
    async fn save(&self, accounts: &[Account]) -> Result<(), Error> {
        // Ensure parent directory exists
        if let Some(parent) = self.store_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(accounts)
            .map_err(|e| Error::Storage(format!("failed to serialize accounts: {}", e)))?;

        debug!(count = accounts.len(), "writing account store");

        // Write to a sibling file and rename it into place, so a concurrent
        // reader sees either the old sequence or the new one, never a torn
        // file.
        let tmp_path = self.store_path.with_extension("json.tmp");
        fs::write(&tmp_path, content).await?;
        fs::rename(&tmp_path, &self.store_path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn account(name: &str, token: &str) -> Account {
        Account::new(name.to_string(), token.to_string())
    }

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = FileAccountStore::new(dir.path().to_path_buf());

        let accounts = store.load().await.unwrap();
        assert!(accounts.is_empty());
    }

    #[tokio::test]
    async fn test_read_after_write() {
        let dir = tempdir().unwrap();
        let store = FileAccountStore::new(dir.path().to_path_buf());

        let saved = vec![
            account("Work", "tok-1"),
            account("Personal", "tok-2"),
            account("Staging", "tok-3"),
        ];
        store.save(&saved).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, saved);
    }

    #[tokio::test]
    async fn test_save_overwrites_wholesale() {
        let dir = tempdir().unwrap();
        let store = FileAccountStore::new(dir.path().to_path_buf());

        store
            .save(&[account("A", "t-a"), account("B", "t-b")])
            .await
            .unwrap();
        store.save(&[account("C", "t-c")]).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "C");
    }

    #[tokio::test]
    async fn test_save_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("deeply").join("nested");
        let store = FileAccountStore::new(nested);

        store.save(&[account("Work", "tok-1")]).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_storage_error() {
        let dir = tempdir().unwrap();
        let store = FileAccountStore::new(dir.path().to_path_buf());

        tokio::fs::write(store.path(), "not json at all").await.unwrap();

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
    }

    #[tokio::test]
    async fn test_persisted_layout_is_bare_array() {
        let dir = tempdir().unwrap();
        let store = FileAccountStore::new(dir.path().to_path_buf());

        store.save(&[account("Work", "tok-1")]).await.unwrap();

        let raw = tokio::fs::read_to_string(store.path()).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

        // The sequence itself is the store entry, records are not
        // individually keyed.
        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0]["id"].is_string());
        assert_eq!(entries[0]["name"], "Work");
        assert_eq!(entries[0]["token"], "tok-1");
    }

    #[tokio::test]
    async fn test_no_temp_file_left_behind() {
        let dir = tempdir().unwrap();
        let store = FileAccountStore::new(dir.path().to_path_buf());

        store.save(&[account("Work", "tok-1")]).await.unwrap();

        let mut names = Vec::new();
        let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        assert_eq!(names, vec!["accounts.json".to_string()]);
    }
}
