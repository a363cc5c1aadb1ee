use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, ServerState};
use service::{
    contacts::{ContactStore, FileContactStore},
    runtime,
};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Resolve the bind address from the validated configuration.
fn load_bind_addr(cfg: &configs::AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    // config.toml is optional; env vars fill in the rest.
    let cfg = configs::AppConfig::load_and_validate()?;

    runtime::ensure_env(&cfg.store.database_dir().display().to_string()).await?;

    // One store handle for the whole process, opened once at startup and
    // shared through axum state.
    let contacts: Arc<dyn ContactStore> =
        FileContactStore::open(cfg.store.collection_path()).await?;
    let state = ServerState { contacts };

    let app: Router = routes::build_router(build_cors(), state);

    let addr = load_bind_addr(&cfg)?;
    info!(%addr, collection = %cfg.store.collection_path().display(), "starting contact directory server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
