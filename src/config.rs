use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::catalog::SortKey;

pub const DEFAULT_API_URL: &str = "https://jellybellywikiapi.onrender.com/api";

/// Longest accepted cache lifetime: one year
pub const MAX_STALE_SECS: u64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Title shown in the header
  pub title: String,
  pub api: ApiConfig,
  pub cache: CacheConfig,
  pub browse: BrowseConfig,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      title: "Jelly Belly Collection".to_string(),
      api: ApiConfig::default(),
      cache: CacheConfig::default(),
      browse: BrowseConfig::default(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
  /// Base URL of the catalog service; `/Beans` is appended
  pub url: String,
  /// Page size requested from the service. Must cover the whole catalog,
  /// since only the first page is fetched.
  pub fetch_page_size: u32,
  pub timeout_secs: u64,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      url: DEFAULT_API_URL.to_string(),
      fetch_page_size: 200,
      timeout_secs: 30,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
  pub enabled: bool,
  /// Seconds before a cached catalog is fetched again
  pub stale_secs: u64,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      enabled: true,
      stale_secs: 3600,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowseConfig {
  /// Beans appended per scroll step
  pub page_size: usize,
  /// Initial sort key. Unknown keys leave the catalog in service order.
  pub default_sort: String,
}

impl Default for BrowseConfig {
  fn default() -> Self {
    Self {
      page_size: 12,
      default_sort: SortKey::Name.as_str().to_string(),
    }
  }
}

impl BrowseConfig {
  pub fn sort_key(&self) -> Option<SortKey> {
    SortKey::parse(&self.default_sort)
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./jbs.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/jbs/config.yaml
  ///
  /// Without any file the built-in defaults are used.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    let config = match path {
      Some(p) => Self::load_from_path(&p)?,
      None => Self::default(),
    };

    config.validate()?;
    Ok(config)
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("jbs.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("jbs").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::from_yaml(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn from_yaml(contents: &str) -> Result<Self> {
    // An empty file deserializes to null, which should mean "all defaults"
    if contents.trim().is_empty() {
      return Ok(Self::default());
    }
    Ok(serde_yaml::from_str(contents)?)
  }

  /// Reject values the pager and client cannot work with.
  pub fn validate(&self) -> Result<()> {
    if self.browse.page_size == 0 {
      return Err(eyre!("browse.page_size must be greater than 0"));
    }
    if self.api.fetch_page_size == 0 {
      return Err(eyre!("api.fetch_page_size must be greater than 0"));
    }
    if self.cache.stale_secs > MAX_STALE_SECS {
      return Err(eyre!(
        "cache.stale_secs must be at most {} (one year)",
        MAX_STALE_SECS
      ));
    }
    if self.api.url.trim().is_empty() {
      return Err(eyre!("api.url must not be empty"));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.api.url, DEFAULT_API_URL);
    assert_eq!(config.api.fetch_page_size, 200);
    assert_eq!(config.cache.stale_secs, 3600);
    assert!(config.cache.enabled);
    assert_eq!(config.browse.page_size, 12);
    assert_eq!(config.browse.sort_key(), Some(SortKey::Name));
    assert!(config.validate().is_ok());
  }

  #[test]
  fn test_partial_yaml_keeps_other_defaults() {
    let config = Config::from_yaml(
      r#"
browse:
  page_size: 24
  default_sort: sugarFree-desc
cache:
  enabled: false
"#,
    )
    .unwrap();

    assert_eq!(config.browse.page_size, 24);
    assert_eq!(config.browse.sort_key(), Some(SortKey::SugarFreeDesc));
    assert!(!config.cache.enabled);
    assert_eq!(config.cache.stale_secs, 3600);
    assert_eq!(config.api.url, DEFAULT_API_URL);
    assert_eq!(config.title, "Jelly Belly Collection");
  }

  #[test]
  fn test_empty_yaml_is_default() {
    let config = Config::from_yaml("  \n").unwrap();
    assert_eq!(config.browse.page_size, 12);
  }

  #[test]
  fn test_unknown_sort_means_unsorted() {
    let config = Config::from_yaml("browse:\n  default_sort: price\n").unwrap();
    assert_eq!(config.browse.sort_key(), None);
  }

  #[test]
  fn test_zero_page_size_is_rejected() {
    let config = Config::from_yaml("browse:\n  page_size: 0\n").unwrap();
    assert!(config.validate().is_err());

    let config = Config::from_yaml("api:\n  fetch_page_size: 0\n").unwrap();
    assert!(config.validate().is_err());
  }

  #[test]
  fn test_huge_stale_secs_is_rejected() {
    let config = Config::from_yaml("cache:\n  stale_secs: 18446744073709551615\n").unwrap();
    assert!(config.validate().is_err());

    let config = Config::from_yaml("cache:\n  stale_secs: 31536000\n").unwrap();
    assert!(config.validate().is_ok());
  }

  #[test]
  fn test_missing_explicit_path_is_an_error() {
    let result = Config::load(Some(Path::new("/definitely/not/here/jbs.yaml")));
    assert!(result.is_err());
  }

  #[test]
  fn test_load_from_explicit_path() {
    let path = std::env::temp_dir().join(format!("jbs-config-test-{}.yaml", std::process::id()));
    std::fs::write(&path, "title: Test Shelf\napi:\n  url: http://localhost:9999/api\n").unwrap();

    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(config.title, "Test Shelf");
    assert_eq!(config.api.url, "http://localhost:9999/api");

    let _ = std::fs::remove_file(&path);
  }
}
