//! Session cache for the curated icon index.
//!
//! The index is fetched at most once per [`IconIndexCache`]. Every marquee
//! shares the same `Arc<IconIndexCache>`; callers that arrive while the fetch
//! is in flight await the same future instead of issuing their own request.
//! A failed fetch is remembered as [`IndexSnapshot::Failed`] and never retried.
//!
//! # Example
//!
//! ```ignore
//! let cache = Arc::new(IconIndexCache::new(HttpIndexSource::new(&config)?));
//!
//! // Kick off the fetch without blocking the UI thread
//! runtime.spawn({
//!     let cache = cache.clone();
//!     async move { cache.load().await }
//! });
//!
//! // Later, from the render loop
//! let snapshot = cache.snapshot(); // Loading until the fetch settles
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;

use super::index::{IconIndex, parse_index};
use crate::config::ResolverConfig;
use crate::error::{Error, Result};

// =============================================================================
// SOURCE
// =============================================================================

/// Where the index comes from.
#[async_trait]
pub trait IndexSource: Send + Sync {
    async fn fetch(&self) -> Result<IconIndex>;
}

/// Fetches the index over HTTP.
#[derive(Debug, Clone)]
pub struct HttpIndexSource {
    client: reqwest::Client,
    url: String,
}

impl HttpIndexSource {
    pub fn new(config: &ResolverConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("skill-marquee/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, &config.index_url))
    }

    pub fn with_client(client: reqwest::Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl IndexSource for HttpIndexSource {
    async fn fetch(&self) -> Result<IconIndex> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }
        let body = response.bytes().await?;
        Ok(parse_index(&body)?)
    }
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Non-blocking view of the cache.
#[derive(Debug, Clone, Default)]
pub enum IndexSnapshot {
    /// Not fetched yet, or fetch in flight.
    #[default]
    Loading,
    /// Fetched and decoded.
    Ready(Arc<IconIndex>),
    /// Fetch failed; stays this way for the session.
    Failed,
}

impl IndexSnapshot {
    pub fn index(&self) -> Option<&IconIndex> {
        match self {
            IndexSnapshot::Ready(index) => Some(index),
            _ => None,
        }
    }

    /// Whether the cache has reached its final state.
    pub fn is_settled(&self) -> bool {
        !matches!(self, IndexSnapshot::Loading)
    }
}

impl PartialEq for IndexSnapshot {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (IndexSnapshot::Loading, IndexSnapshot::Loading) => true,
            (IndexSnapshot::Failed, IndexSnapshot::Failed) => true,
            (IndexSnapshot::Ready(a), IndexSnapshot::Ready(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

// =============================================================================
// CACHE
// =============================================================================

/// Write-once holder of the icon index.
pub struct IconIndexCache {
    source: Box<dyn IndexSource>,
    cell: OnceCell<IndexSnapshot>,
}

impl IconIndexCache {
    pub fn new(source: impl IndexSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            cell: OnceCell::new(),
        }
    }

    /// Cache backed by the HTTP index endpoint from `config`.
    pub fn http(config: &ResolverConfig) -> Result<Self> {
        Ok(Self::new(HttpIndexSource::new(config)?))
    }

    /// Fetch the index if nobody has yet, and return the settled snapshot.
    ///
    /// Never fails: fetch errors are logged and cached as `Failed`.
    pub async fn load(&self) -> IndexSnapshot {
        self.cell
            .get_or_init(|| async {
                match self.source.fetch().await {
                    Ok(index) => {
                        tracing::info!(entries = index.len(), "icon index loaded");
                        IndexSnapshot::Ready(Arc::new(index))
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "icon index unavailable, curated icons disabled");
                        IndexSnapshot::Failed
                    }
                }
            })
            .await
            .clone()
    }

    /// Current state without waiting.
    pub fn snapshot(&self) -> IndexSnapshot {
        self.cell.get().cloned().unwrap_or_default()
    }
}

impl std::fmt::Debug for IconIndexCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IconIndexCache")
            .field("snapshot", &self.snapshot())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// TESTS
// =============================================================================
