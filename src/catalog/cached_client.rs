//! Cached catalog client that wraps CatalogClient with transparent caching.

use chrono::Duration;
use color_eyre::Result;
use tracing::debug;

use crate::cache::{CacheLayer, SqliteStorage};
use crate::config::{Config, MAX_STALE_SECS};

use super::cache::CatalogQueryKey;
use super::client::CatalogClient;
use super::types::Bean;

/// Catalog client with transparent caching support.
///
/// This wraps the underlying CatalogClient and provides the same API, but
/// serves the catalog from the cache database while it is younger than the
/// configured stale time.
#[derive(Clone)]
pub struct CachedCatalogClient {
  inner: CatalogClient,
  cache: Option<CacheLayer<SqliteStorage>>,
}

impl CachedCatalogClient {
  /// Create a new cached catalog client.
  pub fn new(config: &Config) -> Result<Self> {
    let inner = CatalogClient::new(&config.api)?;

    let cache = if config.cache.enabled {
      let lifetime = stale_time(config.cache.stale_secs);
      Some(CacheLayer::new(SqliteStorage::open()?).with_stale_time(lifetime))
    } else {
      debug!("response cache disabled");
      None
    };

    Ok(Self { inner, cache })
  }

  /// Wrap an existing client and cache layer.
  #[cfg(test)]
  pub fn with_cache(inner: CatalogClient, cache: Option<CacheLayer<SqliteStorage>>) -> Self {
    Self { inner, cache }
  }

  pub fn base_url(&self) -> &str {
    self.inner.base_url()
  }

  /// Fetch the whole catalog, from cache when fresh.
  pub async fn fetch_all(&self) -> Result<Vec<Bean>> {
    let Some(cache) = &self.cache else {
      return Ok(self.inner.fetch_all().await?);
    };

    let query_key = CatalogQueryKey::AllBeans {
      base_url: self.inner.base_url().to_string(),
      page_size: self.inner.fetch_page_size(),
    };

    let result = cache
      .fetch_list(&query_key, || {
        let inner = self.inner.clone();
        async move { Ok(inner.fetch_all().await?) }
      })
      .await?;

    debug!(source = ?result.source, count = result.data.len(), "catalog loaded");
    Ok(result.data)
  }
}

/// Configured lifetime as a chrono duration, clamped to `MAX_STALE_SECS`
fn stale_time(secs: u64) -> Duration {
  Duration::seconds(secs.min(MAX_STALE_SECS) as i64)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::client::test_server::{bean_json, catalog, failing, start};
  use crate::catalog::FetchError;
  use crate::config::ApiConfig;
  use axum::http::StatusCode;
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::sync::Arc;

  fn client_for(url: &str, cache: Option<CacheLayer<SqliteStorage>>) -> CachedCatalogClient {
    let inner = CatalogClient::new(&ApiConfig {
      url: url.to_string(),
      fetch_page_size: 200,
      timeout_secs: 5,
    })
    .unwrap();
    CachedCatalogClient::with_cache(inner, cache)
  }

  fn memory_cache() -> CacheLayer<SqliteStorage> {
    CacheLayer::new(SqliteStorage::in_memory().unwrap())
  }

  #[tokio::test]
  async fn test_second_fetch_within_stale_time_hits_cache() {
    let hits = Arc::new(AtomicUsize::new(0));
    let items = vec![bean_json(1, "Apple", &["Fruit"]), bean_json(2, "Lime", &["Fruit"])];
    let base = start(catalog(items, hits.clone())).await;
    let client = client_for(&base, Some(memory_cache()));

    let first = client.fetch_all().await.unwrap();
    let second = client.fetch_all().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(second[1].flavor_name, "Lime");
    assert_eq!(hits.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_expired_cache_refetches() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = start(catalog(vec![bean_json(1, "Apple", &[])], hits.clone())).await;
    let cache = memory_cache().with_stale_time(Duration::seconds(-1));
    let client = client_for(&base, Some(cache));

    client.fetch_all().await.unwrap();
    client.fetch_all().await.unwrap();

    assert_eq!(hits.load(Ordering::SeqCst), 2);
  }

  #[tokio::test]
  async fn test_disabled_cache_always_fetches() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = start(catalog(vec![bean_json(1, "Apple", &[])], hits.clone())).await;
    let client = client_for(&base, None);

    client.fetch_all().await.unwrap();
    client.fetch_all().await.unwrap();

    assert_eq!(hits.load(Ordering::SeqCst), 2);
  }

  #[test]
  fn test_stale_time_is_clamped() {
    assert_eq!(stale_time(3600), Duration::seconds(3600));
    assert_eq!(stale_time(u64::MAX), Duration::seconds(MAX_STALE_SECS as i64));
    assert!(stale_time(u64::MAX) > Duration::zero());
  }

  #[tokio::test]
  async fn test_fetch_error_keeps_its_kind() {
    let base = start(failing(StatusCode::INTERNAL_SERVER_ERROR)).await;
    let client = client_for(&base, Some(memory_cache()));

    let err = client.fetch_all().await.unwrap_err();

    let fetch_err = err.downcast_ref::<FetchError>().unwrap();
    assert_eq!(fetch_err.status(), Some(500));
  }
}
