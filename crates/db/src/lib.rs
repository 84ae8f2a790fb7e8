//! Database layer for Cinegraph
//!
//! Provides SurrealDB integration with schema management and queries.
//! The store can run embedded (in-memory or RocksDB) or against a remote
//! server when `SURREAL_URL` is configured.

pub mod error;
pub mod repository;
pub mod schema;

pub use error::{DbError, Result};
pub use repository::Repository;

use std::path::Path;
use surrealdb::engine::any::Any;
use surrealdb::opt::auth::Root;
use surrealdb::Surreal;

/// Database connection type
pub type DbConnection = Surreal<Any>;

/// Connection settings for the graph store, read from the environment.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Remote endpoint (`ws://host:port`); `None` selects an embedded store
    pub url: Option<String>,
    pub username: String,
    pub password: String,
    pub namespace: String,
    pub database: String,
}

impl StoreConfig {
    /// Read the store configuration from the environment.
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("SURREAL_URL").ok().filter(|u| !u.is_empty()),
            username: env_or_default("SURREAL_USERNAME", "root"),
            password: env_or_default("SURREAL_PASSWORD", "root"),
            namespace: env_or_default("SURREAL_NAMESPACE", "cinegraph"),
            database: env_or_default("SURREAL_DATABASE", "movies"),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            username: "root".into(),
            password: "root".into(),
            namespace: "cinegraph".into(),
            database: "movies".into(),
        }
    }
}

fn env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Initialize database in-memory (for testing)
pub async fn init_memory() -> Result<DbConnection> {
    let db = surrealdb::engine::any::connect("mem://").await?;
    setup_database(&db, &StoreConfig::default()).await?;
    Ok(db)
}

/// Initialize database with RocksDB (persistent)
pub async fn init_persistent(path: impl AsRef<Path>) -> Result<DbConnection> {
    let endpoint = format!("rocksdb://{}", path.as_ref().display());
    let db = surrealdb::engine::any::connect(endpoint).await?;
    setup_database(&db, &StoreConfig::default()).await?;
    Ok(db)
}

/// Connect to a remote server with root credentials
pub async fn connect_remote(config: &StoreConfig) -> Result<DbConnection> {
    let url = config
        .url
        .as_deref()
        .ok_or_else(|| DbError::Connection("SURREAL_URL is not set".into()))?;

    let db = surrealdb::engine::any::connect(url).await?;
    db.signin(Root {
        username: &config.username,
        password: &config.password,
    })
    .await?;
    setup_database(&db, config).await?;
    Ok(db)
}

/// Setup database namespace, database, and schema
async fn setup_database(db: &DbConnection, config: &StoreConfig) -> Result<()> {
    db.use_ns(config.namespace.as_str())
        .use_db(config.database.as_str())
        .await?;
    schema::initialize_schema(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_memory() {
        let db = init_memory().await.expect("Failed to init memory db");
        // Just verify it connects
        let _: Vec<serde_json::Value> = db.select("movie").await.unwrap();
    }

    #[test]
    fn test_store_config_defaults() {
        let config = StoreConfig::default();
        assert!(config.url.is_none());
        assert_eq!(config.namespace, "cinegraph");
        assert_eq!(config.database, "movies");
    }
}
