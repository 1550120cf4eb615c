//! Caching implementations for catalog types.

use sha2::{Digest, Sha256};

use crate::cache::{Cacheable, QueryKey};

use super::types::Bean;

impl Cacheable for Bean {
  fn cache_key(&self) -> String {
    self.bean_id.to_string()
  }

  fn entity_type() -> &'static str {
    "bean"
  }
}

/// Query key types for catalog API calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogQueryKey {
  /// The whole catalog, fetched as a single page of `page_size`
  AllBeans { base_url: String, page_size: u32 },
}

impl QueryKey for CatalogQueryKey {
  fn cache_hash(&self) -> String {
    let input = match self {
      Self::AllBeans {
        base_url,
        page_size,
      } => format!(
        "all_beans:{}:{}",
        base_url.trim_end_matches('/'),
        page_size
      ),
    };

    // SHA256 hash for stable, fixed-length keys
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
  }

  fn description(&self) -> String {
    match self {
      Self::AllBeans {
        base_url,
        page_size,
      } => format!("all beans from {} (page size {})", base_url, page_size),
    }
  }
}
