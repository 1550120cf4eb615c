pub mod bean_detail;
pub mod catalog;

pub use bean_detail::BeanDetailView;
pub use catalog::CatalogView;
