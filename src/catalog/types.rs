use serde::{Deserialize, Serialize};

/// One flavor in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bean {
  pub bean_id: u64,
  pub flavor_name: String,
  pub description: String,
  pub ingredients: Vec<String>,
  pub image_url: String,
  pub sugar_free: bool,
  /// Flavor groups, in the order the service lists them
  pub group_name: Vec<String>,
  pub color_group: String,
  pub background_color: String,
  pub gluten_free: bool,
  pub seasonal: bool,
  pub kosher: bool,
}

impl Bean {
  /// First flavor group, or "" when the bean has none
  pub fn primary_group(&self) -> &str {
    self.group_name.first().map(String::as_str).unwrap_or("")
  }

  /// Dietary flags that are set, for card badges
  pub fn dietary_flags(&self) -> Vec<&'static str> {
    let mut flags = Vec::new();
    if self.sugar_free {
      flags.push("Sugar-Free");
    }
    if self.gluten_free {
      flags.push("Gluten-Free");
    }
    if self.kosher {
      flags.push("Kosher");
    }
    if self.seasonal {
      flags.push("Seasonal");
    }
    flags
  }
}

/// One page of the remote listing, as returned by the service
#[derive(Debug, Clone)]
pub struct BeanPage {
  pub items: Vec<Bean>,
  pub current_page: u32,
  pub page_size: u32,
  pub total_count: u64,
  pub total_pages: u32,
}

#[cfg(test)]
pub(crate) mod fixtures {
  use super::Bean;

  /// Build a bean with only the fields the engine looks at
  pub fn bean(id: u64, name: &str, groups: &[&str], sugar_free: bool) -> Bean {
    Bean {
      bean_id: id,
      flavor_name: name.to_string(),
      description: format!("{} flavored bean", name),
      ingredients: vec!["Sugar".to_string(), "Corn Syrup".to_string()],
      image_url: format!("https://cdn.example.com/{}.png", id),
      sugar_free,
      group_name: groups.iter().map(|g| g.to_string()).collect(),
      color_group: String::new(),
      background_color: String::new(),
      gluten_free: true,
      seasonal: false,
      kosher: false,
    }
  }

  /// Apple, Banana, Chocolate, Vanilla
  pub fn four_beans() -> Vec<Bean> {
    vec![
      bean(1, "Apple", &["Fruit"], false),
      bean(2, "Banana", &["Fruit", "Dessert"], true),
      bean(3, "Chocolate", &["Dessert"], false),
      bean(4, "Vanilla", &["Dessert"], true),
    ]
  }
}
