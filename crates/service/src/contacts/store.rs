use async_trait::async_trait;
use models::{Contact, ContactUpdate, NewContact};
use serde_json::{Map, Value};

use crate::errors::ServiceError;

/// Trait abstraction over contact persistence (filter-based CRUD keyed by
/// `contact_name`). Handlers only ever see this trait; the backing store is
/// injected at startup.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Up to `limit` contacts in store order.
    async fn list(&self, limit: usize) -> Result<Vec<Contact>, ServiceError>;

    /// Single contact by name, `None` when absent.
    async fn find(&self, name: &str) -> Result<Option<Contact>, ServiceError>;

    /// Persist a new contact. `Conflict` when the name is already taken.
    async fn create(&self, input: NewContact) -> Result<(), ServiceError>;

    /// Partial overwrite of the contact matching `old_name`. Returns the
    /// fields that were applied; `NotFound` when no contact matches.
    async fn update(&self, update: ContactUpdate) -> Result<Map<String, Value>, ServiceError>;

    /// Remove one contact by name. `NotFound` when absent.
    async fn delete(&self, name: &str) -> Result<(), ServiceError>;
}
