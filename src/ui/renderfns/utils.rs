use ratatui::prelude::Color;

/// Truncate a string to at most `max_len` characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Parse a `#RRGGBB` swatch color from the catalog
pub fn parse_hex_color(hex: &str) -> Option<Color> {
  let digits = hex.trim().strip_prefix('#')?;
  if digits.len() != 6 || !digits.is_ascii() {
    return None;
  }
  let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
  Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

/// Color for the sugar-free badge
pub fn sugar_free_color(sugar_free: bool) -> Color {
  if sugar_free {
    Color::Green
  } else {
    Color::DarkGray
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_truncate_short_string() {
    assert_eq!(truncate("Lime", 10), "Lime");
  }

  #[test]
  fn test_truncate_exact_length() {
    assert_eq!(truncate("Lemon", 5), "Lemon");
  }

  #[test]
  fn test_truncate_long_string() {
    assert_eq!(truncate("Buttered Popcorn", 8), "Butte...");
  }

  #[test]
  fn test_truncate_multibyte() {
    assert_eq!(truncate("Crème Brûlée", 8), "Crème...");
  }

  #[test]
  fn test_parse_hex_color() {
    assert_eq!(parse_hex_color("#FF8000"), Some(Color::Rgb(255, 128, 0)));
    assert_eq!(parse_hex_color(" #00ff7f "), Some(Color::Rgb(0, 255, 127)));
  }

  #[test]
  fn test_parse_hex_color_rejects_garbage() {
    assert_eq!(parse_hex_color(""), None);
    assert_eq!(parse_hex_color("FF8000"), None);
    assert_eq!(parse_hex_color("#FF80"), None);
    assert_eq!(parse_hex_color("#GG0000"), None);
    assert_eq!(parse_hex_color("#éé00"), None);
  }

  #[test]
  fn test_sugar_free_color() {
    assert_eq!(sugar_free_color(true), Color::Green);
    assert_eq!(sugar_free_color(false), Color::DarkGray);
  }
}
