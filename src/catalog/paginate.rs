//! Client-side filtering, sorting and paging over the fetched catalog.
//!
//! The catalog is fetched once; every page the user scrolls to, and every
//! sort or filter change, is answered by [`paginate`] against that same
//! in-memory slice. Nothing here mutates the slice or keeps state between
//! calls.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::types::Bean;

/// Orderings offered by the sort picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
  Name,
  NameDesc,
  FlavorGroup,
  FlavorGroupDesc,
  /// Sugar-free beans first
  SugarFree,
  /// Regular beans first
  SugarFreeDesc,
}

impl SortKey {
  pub const ALL: [SortKey; 6] = [
    SortKey::Name,
    SortKey::NameDesc,
    SortKey::FlavorGroup,
    SortKey::FlavorGroupDesc,
    SortKey::SugarFree,
    SortKey::SugarFreeDesc,
  ];

  /// Parse a sort key string. Unknown keys mean "keep filtered order".
  pub fn parse(s: &str) -> Option<SortKey> {
    SortKey::ALL.into_iter().find(|k| k.as_str() == s)
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      SortKey::Name => "name",
      SortKey::NameDesc => "name-desc",
      SortKey::FlavorGroup => "flavorGroup",
      SortKey::FlavorGroupDesc => "flavorGroup-desc",
      SortKey::SugarFree => "sugarFree",
      SortKey::SugarFreeDesc => "sugarFree-desc",
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      SortKey::Name => "Name (A-Z)",
      SortKey::NameDesc => "Name (Z-A)",
      SortKey::FlavorGroup => "Flavor Group (A-Z)",
      SortKey::FlavorGroupDesc => "Flavor Group (Z-A)",
      SortKey::SugarFree => "Sugar-Free First",
      SortKey::SugarFreeDesc => "Regular First",
    }
  }

  fn compare(&self, a: &Bean, b: &Bean) -> Ordering {
    match self {
      SortKey::Name => locale_cmp(&a.flavor_name, &b.flavor_name),
      SortKey::NameDesc => locale_cmp(&b.flavor_name, &a.flavor_name),
      SortKey::FlavorGroup => locale_cmp(a.primary_group(), b.primary_group()),
      SortKey::FlavorGroupDesc => locale_cmp(b.primary_group(), a.primary_group()),
      SortKey::SugarFree => b.sugar_free.cmp(&a.sugar_free),
      SortKey::SugarFreeDesc => a.sugar_free.cmp(&b.sugar_free),
    }
  }
}

impl fmt::Display for SortKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Which page to produce and how to shape the view before slicing.
///
/// `page` is 1-based. Callers keep `page >= 1` and `page_size > 0`; other
/// values yield an empty page rather than a panic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageParams {
  pub page: usize,
  pub page_size: usize,
  pub sort_by: Option<SortKey>,
  pub filter_by: Option<String>,
}

impl PageParams {
  pub fn new(page: usize, page_size: usize) -> Self {
    Self {
      page,
      page_size,
      sort_by: None,
      filter_by: None,
    }
  }

  pub fn with_sort(mut self, sort_by: Option<SortKey>) -> Self {
    self.sort_by = sort_by;
    self
  }

  pub fn with_filter(mut self, filter_by: impl Into<String>) -> Self {
    self.filter_by = Some(filter_by.into());
    self
  }

  fn active_filter(&self) -> Option<&str> {
    self.filter_by.as_deref().filter(|f| !f.is_empty())
  }
}

/// One page of the filtered, sorted view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
  pub items: Vec<Bean>,
  /// Beans matching the filter, across all pages
  pub total: usize,
  pub has_more: bool,
}

/// Filter, sort, then slice out the requested page.
pub fn paginate(records: &[Bean], params: &PageParams) -> PageResult {
  let mut view: Vec<&Bean> = match params.active_filter() {
    Some(filter) => records
      .iter()
      .filter(|bean| bean.group_name.iter().any(|group| group.contains(filter)))
      .collect(),
    None => records.iter().collect(),
  };

  // sort_by is stable, so equal keys keep their filtered order
  if let Some(key) = params.sort_by {
    view.sort_by(|a, b| key.compare(a, b));
  }

  let total = view.len();
  let (start, end) = match params.page {
    // Pages are 1-based; page 0 is past every edge
    0 => (total, total),
    page => {
      let start = (page - 1).saturating_mul(params.page_size);
      (start, start.saturating_add(params.page_size))
    }
  };

  let items = view
    .get(start.min(total)..end.min(total))
    .unwrap_or_default()
    .iter()
    .map(|bean| (*bean).clone())
    .collect();

  PageResult {
    items,
    total,
    has_more: end < total,
  }
}

/// Distinct flavor groups across the catalog, sorted, for the filter picker
pub fn flavor_groups(records: &[Bean]) -> Vec<String> {
  records
    .iter()
    .flat_map(|bean| bean.group_name.iter().cloned())
    .collect::<BTreeSet<_>>()
    .into_iter()
    .collect()
}

/// Base letters of `s`, lowercased with accents stripped
fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
  s.nfd()
    .filter(|c| !is_combining_mark(*c))
    .flat_map(char::to_lowercase)
}

/// Human-oriented string ordering.
///
/// Base letters decide first, so "Crème" sorts with "Creme" rather than after
/// every unaccented name. Ties fall back to accents (unaccented first), then
/// case (lowercase first).
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
  base_letters(a)
    .cmp(base_letters(b))
    .then_with(|| {
      a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
    })
    .then_with(|| b.cmp(a))
}
