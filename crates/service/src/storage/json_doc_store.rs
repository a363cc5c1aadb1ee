use std::{path::PathBuf, sync::Arc};
use tokio::{fs, sync::RwLock};

use crate::errors::ServiceError;

/// Generic JSON file-backed document collection.
///
/// Persists a `Vec<T>` to a single JSON file and provides filter-based CRUD
/// in the manner of a document database: callers pass predicates over the
/// document, not keys. Intended for one small collection per file.
#[derive(Clone)]
pub struct JsonDocStore<T> {
    inner: Arc<RwLock<Vec<T>>>,
    file_path: PathBuf,
}

impl<T> JsonDocStore<T>
where
    T: serde::Serialize + serde::de::DeserializeOwned + Clone,
{
    /// Open the collection at a path. Creates the file with an empty
    /// collection if missing; otherwise loads the existing documents.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }

        let docs: Vec<T> = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
            Err(_) => {
                let empty: Vec<T> = Vec::new();
                fs::write(
                    &file_path,
                    serde_json::to_vec(&empty).map_err(|e| ServiceError::Storage(e.to_string()))?,
                )
                .await
                .map_err(|e| ServiceError::Storage(e.to_string()))?;
                empty
            }
        };

        Ok(Arc::new(Self { inner: Arc::new(RwLock::new(docs)), file_path }))
    }

    /// Write the given snapshot to disk. Called while the write lock is still
    /// held so a slow save cannot clobber a newer mutation.
    async fn persist(&self, docs: &[T]) -> Result<(), ServiceError> {
        let data = serde_json::to_vec(docs).map_err(|e| ServiceError::Storage(e.to_string()))?;
        fs::write(&self.file_path, data)
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(())
    }

    /// Up to `limit` documents matching the filter, in store order.
    pub async fn find_many<F>(&self, limit: usize, filter: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        let docs = self.inner.read().await;
        docs.iter().filter(|d| filter(d)).take(limit).cloned().collect()
    }

    /// First document matching the filter, if any.
    pub async fn find_one<F>(&self, filter: F) -> Option<T>
    where
        F: Fn(&T) -> bool,
    {
        let docs = self.inner.read().await;
        docs.iter().find(|d| filter(d)).cloned()
    }

    /// Insert `doc` unless some document already matches the filter.
    ///
    /// Check and append happen under one write lock, so two concurrent
    /// inserts for the same key cannot both pass the check. Returns whether
    /// the document was inserted.
    pub async fn insert_if_absent<F>(&self, filter: F, doc: T) -> Result<bool, ServiceError>
    where
        F: Fn(&T) -> bool,
    {
        let mut docs = self.inner.write().await;
        if docs.iter().any(|d| filter(d)) {
            return Ok(false);
        }
        docs.push(doc);
        self.persist(&docs).await?;
        Ok(true)
    }

    /// Mutate the first matching document in place and persist. Returns
    /// whether a document matched.
    pub async fn update_one<F, M>(&self, filter: F, mutate: M) -> Result<bool, ServiceError>
    where
        F: Fn(&T) -> bool,
        M: FnOnce(&mut T),
    {
        let mut docs = self.inner.write().await;
        match docs.iter().position(|d| filter(d)) {
            Some(idx) => {
                mutate(&mut docs[idx]);
                self.persist(&docs).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove the first matching document and persist. Returns whether a
    /// document matched.
    pub async fn delete_one<F>(&self, filter: F) -> Result<bool, ServiceError>
    where
        F: Fn(&T) -> bool,
    {
        let mut docs = self.inner.write().await;
        match docs.iter().position(|d| filter(d)) {
            Some(idx) => {
                docs.remove(idx);
                self.persist(&docs).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
