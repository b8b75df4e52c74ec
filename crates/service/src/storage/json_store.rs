use std::{marker::PhantomData, path::{Path, PathBuf}};

use tokio::fs;

use crate::errors::ServiceError;

/// Generic JSON file-backed list store.
///
/// Persists a `Vec<T>` as a single JSON array at a fixed path. Every call is
/// a full-document read or write; nothing is cached between calls and no
/// locking is performed, so the file on disk is the only source of truth.
pub struct JsonListStore<T> {
    path: PathBuf,
    _records: PhantomData<fn() -> T>,
}

impl<T> Clone for JsonListStore<T> {
    fn clone(&self) -> Self {
        Self { path: self.path.clone(), _records: PhantomData }
    }
}

impl<T> JsonListStore<T>
where
    T: serde::Serialize + serde::de::DeserializeOwned,
{
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into(), _records: PhantomData }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Seed the document with an empty list if the file is missing.
    /// `load` itself never creates files.
    pub async fn ensure_exists(&self) -> Result<(), ServiceError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.ok();
        }
        if fs::metadata(&self.path).await.is_err() {
            fs::write(&self.path, b"[]")
                .await
                .map_err(|e| ServiceError::Io(format!("{}: {}", self.path.display(), e)))?;
        }
        Ok(())
    }

    /// Read and parse the entire document.
    pub async fn load(&self) -> Result<Vec<T>, ServiceError> {
        let bytes = fs::read(&self.path)
            .await
            .map_err(|e| ServiceError::Io(format!("{}: {}", self.path.display(), e)))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ServiceError::Parse(format!("{}: {}", self.path.display(), e)))
    }

    /// Serialize the full record list and replace the document.
    ///
    /// Writes to a sibling temp file and renames it over the target, so a
    /// concurrent reader never observes a partially-written document.
    pub async fn save(&self, records: &[T]) -> Result<(), ServiceError> {
        let data = serde_json::to_vec_pretty(records)
            .map_err(|e| ServiceError::Parse(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, data)
            .await
            .map_err(|e| ServiceError::Io(format!("{}: {}", tmp.display(), e)))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| ServiceError::Io(format!("{}: {}", self.path.display(), e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Rec {
        id: u64,
        name: String,
    }

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("json_list_store_{}.json", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn save_then_load_round_trips() -> Result<(), anyhow::Error> {
        let tmp = temp_path();
        let store = JsonListStore::<Rec>::new(&tmp);

        let records = vec![
            Rec { id: 1, name: "a".into() },
            Rec { id: 2, name: "b".into() },
        ];
        store.save(&records).await?;
        let loaded = store.load().await?;
        assert_eq!(loaded, records);

        // overwrite keeps only the latest document
        store.save(&records[..1]).await?;
        assert_eq!(store.load().await?.len(), 1);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn load_missing_file_is_io_error() {
        let store = JsonListStore::<Rec>::new(temp_path());
        assert!(matches!(store.load().await, Err(ServiceError::Io(_))));
    }

    #[tokio::test]
    async fn load_corrupt_document_is_parse_error() -> Result<(), anyhow::Error> {
        let tmp = temp_path();
        tokio::fs::write(&tmp, b"{\"not\": \"a list\"}").await?;
        let store = JsonListStore::<Rec>::new(&tmp);
        assert!(matches!(store.load().await, Err(ServiceError::Parse(_))));
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn ensure_exists_seeds_empty_list_once() -> Result<(), anyhow::Error> {
        let tmp = temp_path();
        let store = JsonListStore::<Rec>::new(&tmp);
        store.ensure_exists().await?;
        assert!(store.load().await?.is_empty());

        // a second call must not clobber existing data
        store.save(&[Rec { id: 7, name: "keep".into() }]).await?;
        store.ensure_exists().await?;
        assert_eq!(store.load().await?.len(), 1);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
