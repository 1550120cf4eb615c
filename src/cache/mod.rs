//! Generic caching layer for network query results.
//!
//! This module provides a catalog-agnostic caching mechanism that:
//! - Caches entities as JSON keyed by entity type + key
//! - Remembers the ordered result of each query under a hashed query key
//! - Serves results younger than a stale time without touching the network

mod layer;
mod storage;
mod traits;

pub use layer::CacheLayer;
pub use storage::{CacheStorage, SqliteStorage};
pub use traits::{CacheResult, CacheSource, Cacheable, QueryKey};
