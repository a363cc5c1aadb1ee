use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use models::{Contact, ContactUpdate, NewContact};
use service::contacts::ContactStore;

use crate::errors::ApiError;

/// List responses are capped regardless of how many contacts exist.
pub const LIST_LIMIT: usize = 100;

#[derive(Clone)]
pub struct ServerState {
    pub contacts: Arc<dyn ContactStore>,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn name() -> &'static str {
    "My name is rebecca"
}

async fn list_contacts(State(state): State<ServerState>) -> Result<Json<Vec<Contact>>, ApiError> {
    let contacts = state.contacts.list(LIST_LIMIT).await?;
    Ok(Json(contacts))
}

async fn get_contact(
    State(state): State<ServerState>,
    Path(name): Path<String>,
) -> Result<Json<Contact>, ApiError> {
    match state.contacts.find(&name).await? {
        Some(contact) => Ok(Json(contact)),
        None => Err(ApiError::NotFound(format!("Contact '{}' does NOT exist.", name))),
    }
}

async fn create_contact(
    State(state): State<ServerState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    // Reject an empty body object before trying typed deserialization.
    match body.as_object() {
        None => return Err(ApiError::BadRequest("Bad request: No data provided.".into())),
        Some(obj) if obj.is_empty() => {
            return Err(ApiError::BadRequest("Bad request: No data provided.".into()))
        }
        Some(_) => {}
    }
    let input: NewContact = serde_json::from_value(body)
        .map_err(|e| ApiError::BadRequest(format!("invalid contact payload: {}", e)))?;

    state.contacts.create(input).await?;
    Ok((StatusCode::CREATED, Json(json!({"message": "New contact added successfully"}))))
}

async fn delete_contact(
    State(state): State<ServerState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.contacts.delete(&name).await?;
    Ok(Json(json!({
        "message": format!("Contact '{}' was deleted successfully.", name)
    })))
}

async fn update_contact(
    State(state): State<ServerState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let has_old_name = body
        .get("old_name")
        .and_then(Value::as_str)
        .map(|s| !s.is_empty())
        .unwrap_or(false);
    if !has_old_name {
        return Err(ApiError::BadRequest("old_name is required.".into()));
    }
    let update: ContactUpdate = serde_json::from_value(body)
        .map_err(|e| ApiError::BadRequest(format!("invalid update payload: {}", e)))?;

    let old_name = update.old_name.clone();
    let updated = state.contacts.update(update).await?;
    Ok(Json(json!({
        "message": format!("Contact '{}' updated successfully.", old_name),
        "updated": updated,
    })))
}

/// Build the full application router over a shared contact store.
pub fn build_router(cors: CorsLayer, state: ServerState) -> Router {
    let api = Router::new()
        .route("/contacts", get(list_contacts).post(create_contact))
        // Static segment wins over the :name capture below.
        .route("/contacts/update", post(update_contact))
        .route("/contacts/:name", get(get_contact).delete(delete_contact))
        .route("/name", get(name))
        .route("/health", get(health));

    api.with_state(state).layer(cors).layer(
        TraceLayer::new_for_http()
            // One span per request with method and path, logged at INFO.
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            // Response events carry status code and latency.
            .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
            .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
    )
}
