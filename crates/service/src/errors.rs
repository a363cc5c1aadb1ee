use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn conflict(name: &str) -> Self {
        Self::Conflict(format!("Contact with name '{}' already exists.", name))
    }

    pub fn not_found(name: &str) -> Self {
        Self::NotFound(format!("Contact '{}' does NOT exist.", name))
    }
}
