//! Infinite-scroll state over the fetched catalog.
//!
//! A `BrowseSession` remembers the current sort, filter and page and keeps
//! the beans shown so far. Scrolling appends the next page; changing the sort
//! or filter starts again from page 1.

use crate::catalog::{paginate, Bean, PageParams, SortKey};

#[derive(Debug, Clone)]
pub struct BrowseSession {
  sort_by: Option<SortKey>,
  filter_by: String,
  page_size: usize,
  page: usize,
  displayed: Vec<Bean>,
  has_more: bool,
  total: usize,
}

impl BrowseSession {
  /// `page_size` must be greater than zero; config validation guarantees it.
  pub fn new(page_size: usize, sort_by: Option<SortKey>) -> Self {
    Self {
      sort_by,
      filter_by: String::new(),
      page_size,
      page: 1,
      displayed: Vec::new(),
      has_more: false,
      total: 0,
    }
  }

  pub fn with_filter(mut self, filter_by: impl Into<String>) -> Self {
    self.filter_by = filter_by.into();
    self
  }

  pub fn sort_by(&self) -> Option<SortKey> {
    self.sort_by
  }

  pub fn filter_by(&self) -> &str {
    &self.filter_by
  }

  pub fn page(&self) -> usize {
    self.page
  }

  pub fn displayed(&self) -> &[Bean] {
    &self.displayed
  }

  pub fn has_more(&self) -> bool {
    self.has_more
  }

  /// Beans matching the current filter
  pub fn total(&self) -> usize {
    self.total
  }

  /// Every matching bean is on screen.
  ///
  /// False when nothing matches: the empty-result message stands alone
  /// instead of being followed by "You've seen all 0 flavors!".
  pub fn is_exhausted(&self) -> bool {
    !self.has_more && !self.displayed.is_empty()
  }

  fn params(&self, page: usize) -> PageParams {
    PageParams::new(page, self.page_size)
      .with_sort(self.sort_by)
      .with_filter(self.filter_by.clone())
  }

  /// Start over at page 1 against `records`.
  pub fn reset(&mut self, records: &[Bean]) {
    let result = paginate(records, &self.params(1));
    self.page = 1;
    self.displayed = result.items;
    self.has_more = result.has_more;
    self.total = result.total;
  }

  /// Append the next page. Returns false when there was nothing left to load.
  pub fn load_more(&mut self, records: &[Bean]) -> bool {
    if !self.has_more {
      return false;
    }

    let next = self.page + 1;
    let result = paginate(records, &self.params(next));
    self.page = next;
    self.displayed.extend(result.items);
    self.has_more = result.has_more;
    self.total = result.total;
    true
  }

  pub fn set_sort(&mut self, records: &[Bean], sort_by: Option<SortKey>) {
    self.sort_by = sort_by;
    self.reset(records);
  }

  /// An empty filter shows every bean.
  pub fn set_filter(&mut self, records: &[Bean], filter_by: impl Into<String>) {
    self.filter_by = filter_by.into();
    self.reset(records);
  }

  /// Status line text, e.g. "Showing 12 of 40 beans (filtered from 120 total)"
  pub fn summary(&self, catalog_len: usize) -> String {
    let mut text = format!("Showing {} of {} beans", self.displayed.len(), self.total);
    if self.total != catalog_len {
      text.push_str(&format!(" (filtered from {} total)", catalog_len));
    }
    text
  }
}
