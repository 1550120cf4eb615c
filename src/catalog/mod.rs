//! Catalog service access and the client-side paging engine.

pub mod api_types;
pub mod cache;
pub mod cached_client;
pub mod client;
pub mod error;
pub mod paginate;
pub mod types;

pub use cached_client::CachedCatalogClient;
pub use error::FetchError;
pub use paginate::{flavor_groups, paginate, PageParams, PageResult, SortKey};
pub use types::Bean;
