use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8081, worker_threads: Some(4) }
    }
}

/// Document store addressing: a data root directory (`uri`), a database name
/// (subdirectory) and a collection name (one JSON file per collection).
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub database: String,
    #[serde(default)]
    pub collection: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { uri: "data".into(), database: "contactsdb".into(), collection: "contacts".into() }
    }
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default().unwrap_or_default();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize_from_env()?;
        self.store.normalize_from_env();
        self.store.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize_from_env(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.host = host;
        }
        if let Ok(port) = std::env::var("SERVER_PORT") {
            self.port = port
                .parse::<u16>()
                .map_err(|_| anyhow!("SERVER_PORT must be a valid port number"))?;
        }
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl StoreConfig {
    /// Environment variables win over config.toml values.
    pub fn normalize_from_env(&mut self) {
        if let Ok(uri) = std::env::var("STORE_URI") {
            self.uri = uri;
        }
        if let Ok(db) = std::env::var("STORE_DATABASE") {
            self.database = db;
        }
        if let Ok(coll) = std::env::var("STORE_COLLECTION") {
            self.collection = coll;
        }
        let defaults = StoreConfig::default();
        if self.uri.trim().is_empty() { self.uri = defaults.uri; }
        if self.database.trim().is_empty() { self.database = defaults.database; }
        if self.collection.trim().is_empty() { self.collection = defaults.collection; }
    }

    pub fn validate(&self) -> Result<()> {
        if self.database.contains('/') || self.collection.contains('/') {
            return Err(anyhow!("store.database and store.collection must be plain names, not paths"));
        }
        Ok(())
    }

    /// Directory that holds the database's collections.
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.uri).join(&self.database)
    }

    /// Full path of the collection file backing the contact documents.
    pub fn collection_path(&self) -> PathBuf {
        self.database_dir().join(format!("{}.json", self.collection))
    }
}
