use std::sync::Arc;

use async_trait::async_trait;
use models::{Contact, ContactUpdate, NewContact};
use serde_json::{Map, Value};
use tracing::debug;

use crate::contacts::store::ContactStore;
use crate::errors::ServiceError;
use crate::storage::json_doc_store::JsonDocStore;

/// File-backed contact collection: one JSON file holds every document.
///
/// Uniqueness of `contact_name` is enforced by the store's atomic
/// insert-if-absent, not by a separate existence read before insert.
#[derive(Clone)]
pub struct FileContactStore {
    docs: Arc<JsonDocStore<Contact>>,
}

impl FileContactStore {
    /// Open the collection file, creating it empty if missing.
    pub async fn open<P: Into<std::path::PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let docs = JsonDocStore::<Contact>::open(path).await?;
        Ok(Arc::new(Self { docs }))
    }
}

#[async_trait]
impl ContactStore for FileContactStore {
    async fn list(&self, limit: usize) -> Result<Vec<Contact>, ServiceError> {
        Ok(self.docs.find_many(limit, |_| true).await)
    }

    async fn find(&self, name: &str) -> Result<Option<Contact>, ServiceError> {
        Ok(self.docs.find_one(|c| c.contact_name == name).await)
    }

    async fn create(&self, input: NewContact) -> Result<(), ServiceError> {
        input.validate()?;
        let name = input.contact_name.clone();
        let inserted = self
            .docs
            .insert_if_absent(|c| c.contact_name == name, input.into())
            .await?;
        if !inserted {
            return Err(ServiceError::conflict(&name));
        }
        debug!(contact = %name, "contact inserted");
        Ok(())
    }

    async fn update(&self, update: ContactUpdate) -> Result<Map<String, Value>, ServiceError> {
        let changes = update.changes();
        let matched = self
            .docs
            .update_one(|c| c.contact_name == update.old_name, |c| update.apply_to(c))
            .await?;
        if !matched {
            return Err(ServiceError::not_found(&update.old_name));
        }
        debug!(contact = %update.old_name, fields = changes.len(), "contact updated");
        Ok(changes)
    }

    async fn delete(&self, name: &str) -> Result<(), ServiceError> {
        let deleted = self.docs.delete_one(|c| c.contact_name == name).await?;
        if !deleted {
            return Err(ServiceError::not_found(name));
        }
        debug!(contact = %name, "contact deleted");
        Ok(())
    }
}
