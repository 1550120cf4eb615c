use super::KeyResult;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState};

/// One choice in an `OptionPicker`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerOption {
  /// Returned to the parent on selection
  pub value: String,
  /// Shown to the user
  pub label: String,
}

impl PickerOption {
  pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
    Self {
      value: value.into(),
      label: label.into(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerEvent {
  /// Value of the chosen option
  Selected(String),
  Cancelled,
}

/// Centered single-choice overlay, used for sort order and flavor group
#[derive(Debug, Clone, Default)]
pub struct OptionPicker {
  active: bool,
  options: Vec<PickerOption>,
  selected: usize,
  title: String,
}

impl OptionPicker {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  /// Open the picker with the cursor on `current` when it is one of the options
  pub fn show(&mut self, title: impl Into<String>, options: Vec<PickerOption>, current: &str) {
    self.selected = options
      .iter()
      .position(|o| o.value == current)
      .unwrap_or(0);
    self.active = true;
    self.options = options;
    self.title = title.into();
  }

  pub fn hide(&mut self) {
    self.active = false;
    self.options.clear();
    self.selected = 0;
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<PickerEvent> {
    if !self.active {
      return KeyResult::NotHandled;
    }

    match key.code {
      KeyCode::Esc | KeyCode::Char('q') => {
        self.hide();
        KeyResult::Event(PickerEvent::Cancelled)
      }
      KeyCode::Enter => {
        let event = match self.options.get(self.selected) {
          Some(option) => PickerEvent::Selected(option.value.clone()),
          None => PickerEvent::Cancelled,
        };
        self.hide();
        KeyResult::Event(event)
      }
      KeyCode::Char('j') | KeyCode::Down => {
        if !self.options.is_empty() {
          self.selected = (self.selected + 1) % self.options.len();
        }
        KeyResult::Handled
      }
      KeyCode::Char('k') | KeyCode::Up => {
        let count = self.options.len();
        if count > 0 {
          self.selected = (self.selected + count - 1) % count;
        }
        KeyResult::Handled
      }
      // Modal: nothing leaks to the view underneath
      _ => KeyResult::Handled,
    }
  }

  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    if !self.active || self.options.is_empty() {
      return;
    }

    let longest = self
      .options
      .iter()
      .map(|o| o.label.chars().count())
      .chain(std::iter::once(self.title.chars().count()))
      .max()
      .unwrap_or(10) as u16;
    let width = (longest + 6).max(20).min(area.width.saturating_sub(4));
    let height = (self.options.len() as u16 + 2)
      .min(area.height.saturating_sub(4))
      .max(3)
      .min(area.height);

    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    let overlay_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(format!(" {} ", self.title));

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    if inner.height == 0 {
      return;
    }

    let items: Vec<ListItem> = self
      .options
      .iter()
      .map(|o| ListItem::new(Span::styled(o.label.as_str(), Style::default().fg(Color::Cyan))))
      .collect();

    let list =
      List::new(items).highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));

    let mut state = ListState::default();
    state.select(Some(self.selected));

    frame.render_stateful_widget(list, inner, &mut state);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn options() -> Vec<PickerOption> {
    vec![
      PickerOption::new("", "All flavors"),
      PickerOption::new("Fruit", "Fruit"),
      PickerOption::new("Spice", "Spice"),
    ]
  }

  #[test]
  fn test_inactive_passes_keys_through() {
    let mut picker = OptionPicker::new();
    assert_eq!(picker.handle_key(key(KeyCode::Enter)), KeyResult::NotHandled);
  }

  #[test]
  fn test_show_starts_on_current_value() {
    let mut picker = OptionPicker::new();
    picker.show("Flavor group", options(), "Spice");
    assert_eq!(
      picker.handle_key(key(KeyCode::Enter)),
      KeyResult::Event(PickerEvent::Selected("Spice".to_string()))
    );
    assert!(!picker.is_active());
  }

  #[test]
  fn test_unknown_current_starts_at_top() {
    let mut picker = OptionPicker::new();
    picker.show("Flavor group", options(), "Licorice");
    assert_eq!(
      picker.handle_key(key(KeyCode::Enter)),
      KeyResult::Event(PickerEvent::Selected(String::new()))
    );
  }

  #[test]
  fn test_navigation_wraps() {
    let mut picker = OptionPicker::new();
    picker.show("Flavor group", options(), "");

    picker.handle_key(key(KeyCode::Char('k')));
    assert_eq!(
      picker.handle_key(key(KeyCode::Enter)),
      KeyResult::Event(PickerEvent::Selected("Spice".to_string()))
    );

    picker.show("Flavor group", options(), "Spice");
    picker.handle_key(key(KeyCode::Down));
    assert_eq!(
      picker.handle_key(key(KeyCode::Enter)),
      KeyResult::Event(PickerEvent::Selected(String::new()))
    );
  }

  #[test]
  fn test_escape_cancels() {
    let mut picker = OptionPicker::new();
    picker.show("Sort by", options(), "");
    assert_eq!(
      picker.handle_key(key(KeyCode::Esc)),
      KeyResult::Event(PickerEvent::Cancelled)
    );
    assert!(!picker.is_active());
  }

  #[test]
  fn test_other_keys_are_swallowed() {
    let mut picker = OptionPicker::new();
    picker.show("Sort by", options(), "");
    assert_eq!(picker.handle_key(key(KeyCode::Char('r'))), KeyResult::Handled);
    assert!(picker.is_active());
  }
}
