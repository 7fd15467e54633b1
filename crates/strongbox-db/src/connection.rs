//! Connecting to the secret store.

use std::env;

use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tracing::info;

use crate::error::DbError;
use crate::schema::run_migrations;

/// Where the store lives and how to sign in to it. `url` is a
/// `host:port` WebSocket address.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub username: String,
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "127.0.0.1:8000".into(),
            namespace: "strongbox".into(),
            database: "secrets".into(),
            username: "root".into(),
            password: "root".into(),
        }
    }
}

impl DbConfig {
    /// Read `STRONGBOX_DB_URL`, `STRONGBOX_DB_NAMESPACE`,
    /// `STRONGBOX_DB_DATABASE`, `STRONGBOX_DB_USERNAME` and
    /// `STRONGBOX_DB_PASSWORD`, falling back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let var = |key: &str, fallback: String| lookup(key).unwrap_or(fallback);
        Self {
            url: var("STRONGBOX_DB_URL", defaults.url),
            namespace: var("STRONGBOX_DB_NAMESPACE", defaults.namespace),
            database: var("STRONGBOX_DB_DATABASE", defaults.database),
            username: var("STRONGBOX_DB_USERNAME", defaults.username),
            password: var("STRONGBOX_DB_PASSWORD", defaults.password),
        }
    }
}

#[derive(Clone)]
pub struct DbManager {
    db: Surreal<Client>,
}

impl DbManager {
    /// Connect, sign in as root, select the namespace and database, and
    /// bring the schema up to date.
    pub async fn connect(config: &DbConfig) -> Result<Self, DbError> {
        let db = Surreal::new::<Ws>(config.url.as_str()).await?;
        db.signin(Root {
            username: config.username.clone(),
            password: config.password.clone(),
        })
        .await?;
        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await?;
        run_migrations(&db).await?;

        info!(
            url = %config.url,
            namespace = %config.namespace,
            database = %config.database,
            "Secret store connected"
        );
        Ok(Self { db })
    }

    pub fn client(&self) -> Surreal<Client> {
        self.db.clone()
    }
}
