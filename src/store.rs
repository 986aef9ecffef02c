//! Backing store liveness probe.
//!
//! The picker only needs to know that the database answers. `BackingStore` is
//! the seam; `LibsqlStore` is the production implementation against a local
//! file-backed libsql database.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use libsql::{Builder, Database};
use tokio::sync::OnceCell;
use tracing::instrument;

use crate::config::{DatabaseConfig, LIVENESS_QUERY};

/// Errors from the liveness probe. Every variant means the store is unavailable.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Invalid database url '{0}'")]
    InvalidUrl(String),

    #[error("Failed to open database at {path}: {source}")]
    Open {
        path: PathBuf,
        source: libsql::Error,
    },

    #[error("Failed to connect to database: {0}")]
    Connect(libsql::Error),

    #[error("Liveness query failed: {0}")]
    Query(libsql::Error),

    #[error("Liveness probe timed out after {0:?}")]
    Timeout(Duration),
}

/// Something the picker can probe for connectivity before answering.
#[async_trait]
pub trait BackingStore: Send + Sync {
    /// Issue a no-op round trip. The result of the query is discarded.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Resolve a connection string to a local database path.
///
/// Accepts `file:<path>`, `file://<path>`, `:memory:` or a bare path. Remote
/// schemes and URI parameters such as `?mode=ro` are rejected.
pub fn parse_database_url(url: &str) -> Result<PathBuf, StoreError> {
    let trimmed = url.trim();
    if trimmed.is_empty() || trimmed.contains('?') {
        return Err(StoreError::InvalidUrl(url.to_string()));
    }

    if trimmed == ":memory:" {
        return Ok(PathBuf::from(trimmed));
    }

    if let Some(rest) = trimmed.strip_prefix("file:") {
        let rest = rest.strip_prefix("//").unwrap_or(rest);
        if rest.is_empty() {
            return Err(StoreError::InvalidUrl(url.to_string()));
        }
        return Ok(PathBuf::from(rest));
    }

    if trimmed.contains("://") {
        return Err(StoreError::InvalidUrl(url.to_string()));
    }

    Ok(PathBuf::from(trimmed))
}

/// Await a liveness check, reporting `StoreError::Timeout` once `timeout` elapses.
pub async fn bounded<F>(timeout: Duration, check: F) -> Result<(), StoreError>
where
    F: Future<Output = Result<(), StoreError>>,
{
    match tokio::time::timeout(timeout, check).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout(timeout)),
    }
}

/// libsql-backed store. The database is opened on first probe and reused.
#[derive(Clone)]
pub struct LibsqlStore {
    url: String,
    probe_timeout: Duration,
    db: Arc<OnceCell<Database>>,
}

impl LibsqlStore {
    pub fn new(config: &DatabaseConfig) -> Self {
        Self {
            url: config.url.clone(),
            probe_timeout: config.probe_timeout(),
            db: Arc::new(OnceCell::new()),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn database(&self) -> Result<&Database, StoreError> {
        self.db
            .get_or_try_init(|| async {
                let path = parse_database_url(&self.url)?;
                tracing::debug!(path = %path.display(), "Opening database");
                let db = Builder::new_local(&path)
                    .build()
                    .await
                    .map_err(|source| StoreError::Open { path, source })?;
                Ok::<_, StoreError>(db)
            })
            .await
    }

    async fn probe(&self) -> Result<(), StoreError> {
        let db = self.database().await?;
        let conn = db.connect().map_err(StoreError::Connect)?;

        let mut rows = conn
            .query(LIVENESS_QUERY, ())
            .await
            .map_err(StoreError::Query)?;
        while rows.next().await.map_err(StoreError::Query)?.is_some() {}

        Ok(())
    }
}

#[async_trait]
impl BackingStore for LibsqlStore {
    #[instrument(name = "store::ping", skip(self), fields(url = %self.url))]
    async fn ping(&self) -> Result<(), StoreError> {
        let result = bounded(self.probe_timeout, self.probe()).await;

        match &result {
            Ok(()) => tracing::debug!("Liveness probe succeeded"),
            Err(e) => tracing::warn!(error = %e, "Liveness probe failed"),
        }

        result
    }
}
