use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::json;
use service::contacts::{ContactStore, FileContactStore};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::routes::{self, ServerState};

fn cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

struct TestApp {
    base_url: String,
}

/// Bind the app on an ephemeral port with an isolated temp collection file.
async fn start_server() -> anyhow::Result<TestApp> {
    let collection_path = format!("target/test-data/{}/contacts.json", Uuid::new_v4());
    let contacts: Arc<dyn ContactStore> = FileContactStore::open(collection_path).await?;
    let state = ServerState { contacts };

    let app: Router = routes::build_router(cors(), state);
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url })
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

#[tokio::test]
async fn e2e_health_and_identity() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let res = c.get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");

    let res = c.get(format!("{}/name", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.text().await?, "My name is rebecca");
    Ok(())
}

#[tokio::test]
async fn e2e_contact_lifecycle() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    // Create Alice
    let res = c
        .post(format!("{}/contacts", app.base_url))
        .json(&json!({"contact_name": "Alice", "phone_number": "555-1"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);

    // Fetch her back with the same fields
    let res = c.get(format!("{}/contacts/Alice", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["contact_name"], "Alice");
    assert_eq!(body["phone_number"], "555-1");

    // Partial update: only the phone number changes
    let res = c
        .post(format!("{}/contacts/update", app.base_url))
        .json(&json!({"old_name": "Alice", "phone_number": "555-2"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["updated"], json!({"phone_number": "555-2"}));

    let res = c.get(format!("{}/contacts/Alice", app.base_url)).send().await?;
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["phone_number"], "555-2");

    // Delete, then a fetch is a 404
    let res = c.delete(format!("{}/contacts/Alice", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert!(body["message"].as_str().unwrap().contains("Alice"));

    let res = c.get(format!("{}/contacts/Alice", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_duplicate_create_conflicts() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let res = c
        .post(format!("{}/contacts", app.base_url))
        .json(&json!({"contact_name": "Bob", "message": "first"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);

    let res = c
        .post(format!("{}/contacts", app.base_url))
        .json(&json!({"contact_name": "Bob", "message": "second"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CONFLICT);

    // The original record is untouched
    let res = c.get(format!("{}/contacts/Bob", app.base_url)).send().await?;
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "first");
    Ok(())
}

#[tokio::test]
async fn e2e_bad_requests() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    // Empty body object on create
    let res = c
        .post(format!("{}/contacts", app.base_url))
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    // Update without old_name
    let res = c
        .post(format!("{}/contacts/update", app.base_url))
        .json(&json!({"phone_number": "555-3"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn e2e_unknown_contact_is_not_found() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let res = c.get(format!("{}/contacts/Nobody", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let res = c.delete(format!("{}/contacts/Nobody", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let res = c
        .post(format!("{}/contacts/update", app.base_url))
        .json(&json!({"old_name": "Nobody", "message": "hi"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_list_returns_created_contacts() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let res = c.get(format!("{}/contacts", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body, json!([]));

    for name in ["Ana", "Ben"] {
        let res = c
            .post(format!("{}/contacts", app.base_url))
            .json(&json!({"contact_name": name}))
            .send()
            .await?;
        assert_eq!(res.status(), HttpStatusCode::CREATED);
    }

    let res = c.get(format!("{}/contacts", app.base_url)).send().await?;
    let body = res.json::<serde_json::Value>().await?;
    let list = body.as_array().expect("array body");
    assert_eq!(list.len(), 2);
    assert!(list.iter().any(|c| c["contact_name"] == "Ana"));
    Ok(())
}
