use crate::catalog::api_types::ApiBeansResponse;
use crate::catalog::error::FetchError;
use crate::catalog::types::{Bean, BeanPage};
use crate::config::ApiConfig;
use color_eyre::{eyre::eyre, Result};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Catalog service HTTP client
#[derive(Clone)]
pub struct CatalogClient {
  http: reqwest::Client,
  base_url: String,
  fetch_page_size: u32,
}

impl CatalogClient {
  pub fn new(config: &ApiConfig) -> Result<Self> {
    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .user_agent(concat!("jbs/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    let client = Self {
      http,
      base_url: config.url.trim_end_matches('/').to_string(),
      fetch_page_size: config.fetch_page_size,
    };

    // Surface a malformed URL at startup rather than on first fetch
    client
      .beans_url(1, client.fetch_page_size)
      .map_err(|e| eyre!("Invalid catalog url {}: {}", config.url, e))?;

    Ok(client)
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  pub fn fetch_page_size(&self) -> u32 {
    self.fetch_page_size
  }

  fn beans_url(&self, page_index: u32, page_size: u32) -> Result<Url, FetchError> {
    let mut url = Url::parse(&format!("{}/Beans", self.base_url))?;
    url
      .query_pairs_mut()
      .append_pair("pageIndex", &page_index.to_string())
      .append_pair("pageSize", &page_size.to_string());
    Ok(url)
  }

  /// Fetch one page of the remote listing
  pub async fn fetch_page(&self, page_index: u32, page_size: u32) -> Result<BeanPage, FetchError> {
    let url = self.beans_url(page_index, page_size)?;
    debug!(%url, "fetching beans");

    let response = self
      .http
      .get(url)
      .send()
      .await
      .map_err(FetchError::Network)?;

    let status = response.status();
    if !status.is_success() {
      warn!(status = status.as_u16(), "catalog service returned an error");
      return Err(FetchError::Status {
        status: status.as_u16(),
      });
    }

    let body: ApiBeansResponse = response.json().await.map_err(FetchError::Decode)?;
    Ok(body.into())
  }

  /// Fetch the whole catalog in a single request
  pub async fn fetch_all(&self) -> Result<Vec<Bean>, FetchError> {
    let page = self.fetch_page(1, self.fetch_page_size).await?;

    if (page.items.len() as u64) < page.total_count {
      warn!(
        fetched = page.items.len(),
        total = page.total_count,
        "catalog is larger than fetch_page_size; only the first page is shown"
      );
    }
    info!(
      count = page.items.len(),
      page = page.current_page,
      page_size = page.page_size,
      total_pages = page.total_pages,
      "fetched catalog"
    );

    Ok(page.items)
  }
}

#[cfg(test)]
pub(crate) mod test_server {
  use axum::extract::Query;
  use axum::http::StatusCode;
  use axum::routing::get;
  use axum::{Json, Router};
  use serde_json::{json, Value};
  use std::collections::HashMap;
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::sync::Arc;

  /// Bind to port 0 and return the base URL of the fake catalog API.
  pub async fn start(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
      axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api")
  }

  pub fn bean_json(id: u64, name: &str, groups: &[&str]) -> Value {
    json!({
      "beanId": id,
      "flavorName": name,
      "description": format!("{} bean", name),
      "ingredients": ["Sugar"],
      "imageUrl": format!("https://cdn.example.com/{}.png", id),
      "sugarFree": false,
      "groupName": groups,
      "colorGroup": "red",
      "backgroundColor": "#FF0000",
      "glutenFree": true,
      "seasonal": false,
      "kosher": false
    })
  }

  /// A catalog service that echoes the requested page and counts hits
  pub fn catalog(items: Vec<Value>, hits: Arc<AtomicUsize>) -> Router {
    Router::new().route(
      "/api/Beans",
      get(move |Query(params): Query<HashMap<String, String>>| {
        let items = items.clone();
        let hits = hits.clone();
        async move {
          hits.fetch_add(1, Ordering::SeqCst);
          let page_size: u32 = params
            .get("pageSize")
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);
          let page_index: u32 = params
            .get("pageIndex")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1);
          let total = items.len();
          Json(json!({
            "items": items,
            "currentPage": page_index,
            "pageSize": page_size,
            "totalCount": total,
            "totalPages": 1
          }))
        }
      }),
    )
  }

  pub fn failing(status: StatusCode) -> Router {
    Router::new().route("/api/Beans", get(move || async move { status }))
  }
}

#[cfg(test)]
mod tests {
  use super::test_server::{bean_json, catalog, failing, start};
  use super::*;
  use axum::http::StatusCode;
  use axum::routing::get;
  use axum::Router;
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::sync::Arc;

  fn client_for(url: &str) -> CatalogClient {
    CatalogClient::new(&ApiConfig {
      url: url.to_string(),
      fetch_page_size: 200,
      timeout_secs: 5,
    })
    .unwrap()
  }

  #[tokio::test]
  async fn test_fetch_all_decodes_items() {
    let hits = Arc::new(AtomicUsize::new(0));
    let items = vec![
      bean_json(1, "Apple", &["Fruit"]),
      bean_json(2, "Chocolate", &["Dessert"]),
    ];
    let base = start(catalog(items, hits.clone())).await;

    let beans = client_for(&base).fetch_all().await.unwrap();

    assert_eq!(beans.len(), 2);
    assert_eq!(beans[0].flavor_name, "Apple");
    assert_eq!(beans[1].group_name, vec!["Dessert"]);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_fetch_page_sends_paging_params() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = start(catalog(vec![bean_json(1, "Apple", &[])], hits)).await;

    let page = client_for(&base).fetch_page(3, 50).await.unwrap();

    assert_eq!(page.current_page, 3);
    assert_eq!(page.page_size, 50);
    assert_eq!(page.total_count, 1);
  }

  #[tokio::test]
  async fn test_trailing_slash_in_base_url() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = start(catalog(vec![bean_json(1, "Apple", &[])], hits)).await;

    let beans = client_for(&format!("{}/", base)).fetch_all().await.unwrap();
    assert_eq!(beans.len(), 1);
  }

  #[tokio::test]
  async fn test_non_success_status_is_fetch_error() {
    let base = start(failing(StatusCode::SERVICE_UNAVAILABLE)).await;

    let err = client_for(&base).fetch_all().await.unwrap_err();

    assert!(matches!(err, FetchError::Status { status: 503 }));
    assert_eq!(err.status(), Some(503));
  }

  #[tokio::test]
  async fn test_malformed_body_is_decode_error() {
    let app = Router::new().route("/api/Beans", get(|| async { "not json" }));
    let base = start(app).await;

    let err = client_for(&base).fetch_all().await.unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
  }

  #[tokio::test]
  async fn test_unreachable_service_is_network_error() {
    // Grab a free port, then close it so nothing is listening
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client_for(&format!("http://{addr}/api"))
      .fetch_all()
      .await
      .unwrap_err();
    assert!(matches!(err, FetchError::Network(_)));
  }

  #[test]
  fn test_invalid_url_rejected_at_construction() {
    let result = CatalogClient::new(&ApiConfig {
      url: "not a url".to_string(),
      fetch_page_size: 200,
      timeout_secs: 5,
    });
    assert!(result.is_err());
  }
}
