//! Serde-deserializable types matching the catalog service responses.
//!
//! These types are separate from domain types so that missing or null fields
//! in the service payload degrade to defaults instead of failing the fetch.

use serde::Deserialize;

use super::types::{Bean, BeanPage};

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ApiBean {
  pub bean_id: u64,
  #[serde(default)]
  pub flavor_name: String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub ingredients: Option<Vec<String>>,
  #[serde(default)]
  pub image_url: Option<String>,
  #[serde(default)]
  pub sugar_free: bool,
  #[serde(default)]
  pub group_name: Option<Vec<String>>,
  #[serde(default)]
  pub color_group: Option<String>,
  #[serde(default)]
  pub background_color: Option<String>,
  #[serde(default)]
  pub gluten_free: bool,
  #[serde(default)]
  pub seasonal: bool,
  #[serde(default)]
  pub kosher: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiBeansResponse {
  #[serde(default)]
  pub items: Vec<ApiBean>,
  #[serde(default)]
  pub current_page: u32,
  #[serde(default)]
  pub page_size: u32,
  #[serde(default)]
  pub total_count: u64,
  #[serde(default)]
  pub total_pages: u32,
}

// ============================================================================
// Conversions to domain types
// ============================================================================

impl From<ApiBean> for Bean {
  fn from(b: ApiBean) -> Self {
    Bean {
      bean_id: b.bean_id,
      flavor_name: b.flavor_name,
      description: b.description.unwrap_or_default(),
      ingredients: b.ingredients.unwrap_or_default(),
      image_url: b.image_url.unwrap_or_default(),
      sugar_free: b.sugar_free,
      group_name: b.group_name.unwrap_or_default(),
      color_group: b.color_group.unwrap_or_default(),
      background_color: b.background_color.unwrap_or_default(),
      gluten_free: b.gluten_free,
      seasonal: b.seasonal,
      kosher: b.kosher,
    }
  }
}

impl From<ApiBeansResponse> for BeanPage {
  fn from(resp: ApiBeansResponse) -> Self {
    BeanPage {
      items: resp.items.into_iter().map(Bean::from).collect(),
      current_page: resp.current_page,
      page_size: resp.page_size,
      total_count: resp.total_count,
      total_pages: resp.total_pages,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_decode_full_item() {
    let body = r##"{
      "items": [{
        "beanId": 1,
        "groupName": ["Fruit", "Sour"],
        "ingredients": ["Sugar", "Corn Syrup"],
        "flavorName": "Sour Apple",
        "description": "Tart apple",
        "colorGroup": "green",
        "backgroundColor": "#7BB31A",
        "imageUrl": "https://cdn-tp1.mozu.com/9046-m1/cms/files/apple.jpg",
        "glutenFree": true,
        "sugarFree": false,
        "seasonal": false,
        "kosher": true
      }],
      "totalCount": 1,
      "pageSize": 200,
      "currentPage": 1,
      "totalPages": 1
    }"##;

    let resp: ApiBeansResponse = serde_json::from_str(body).unwrap();
    let page = BeanPage::from(resp);

    assert_eq!(page.total_count, 1);
    assert_eq!(page.page_size, 200);
    let bean = &page.items[0];
    assert_eq!(bean.bean_id, 1);
    assert_eq!(bean.flavor_name, "Sour Apple");
    assert_eq!(bean.group_name, vec!["Fruit", "Sour"]);
    assert_eq!(bean.background_color, "#7BB31A");
    assert!(bean.kosher);
    assert!(!bean.sugar_free);
  }

  #[test]
  fn test_decode_sparse_item_uses_defaults() {
    let body = r#"{"items": [{"beanId": 7, "flavorName": "Mystery", "groupName": null}]}"#;

    let resp: ApiBeansResponse = serde_json::from_str(body).unwrap();
    let page = BeanPage::from(resp);
    let bean = &page.items[0];

    assert_eq!(bean.flavor_name, "Mystery");
    assert!(bean.group_name.is_empty());
    assert!(bean.ingredients.is_empty());
    assert_eq!(bean.description, "");
  }
}
