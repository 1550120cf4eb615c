use crate::browse::BrowseSession;
use crate::catalog::{flavor_groups, Bean, CachedCatalogClient, FetchError, SortKey};
use crate::query::{Query, QueryState};
use crate::ui::components::{
  KeyResult, OptionPicker, PickerEvent, PickerOption, SearchEvent, SearchInput,
};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::{parse_hex_color, sugar_free_color, truncate};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crate::ui::views::BeanDetailView;
use color_eyre::Report;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use tracing::debug;

const EMPTY_MESSAGE: &str = "No jelly beans found matching your criteria.";

/// Scrollable list of bean cards with sort, flavor group and text filters
pub struct CatalogView {
  title: String,
  query: Query<Vec<Bean>>,
  session: BrowseSession,
  list_state: ListState,
  search: SearchInput,
  sort_picker: OptionPicker,
  group_picker: OptionPicker,
}

impl CatalogView {
  pub fn new(title: String, client: CachedCatalogClient, session: BrowseSession) -> Self {
    let query = Query::new(move || {
      let client = client.clone();
      async move { client.fetch_all().await.map_err(|e| describe_error(&e)) }
    });
    Self::with_query(title, query, session)
  }

  fn with_query(title: String, mut query: Query<Vec<Bean>>, session: BrowseSession) -> Self {
    query.fetch();

    Self {
      title,
      query,
      session,
      list_state: ListState::default(),
      search: SearchInput::new(),
      sort_picker: OptionPicker::new(),
      group_picker: OptionPicker::new(),
    }
  }

  fn records(&self) -> &[Bean] {
    self.query.data().map(|v| v.as_slice()).unwrap_or(&[])
  }

  /// Run a session update against the loaded catalog
  fn update_session(&mut self, update: impl FnOnce(&mut BrowseSession, &[Bean])) {
    let records = self.query.data().map(|v| v.as_slice()).unwrap_or(&[]);
    update(&mut self.session, records);
  }

  /// Session starts over at page 1; put the cursor back on top
  fn restart(&mut self, update: impl FnOnce(&mut BrowseSession, &[Bean])) {
    self.update_session(update);
    let first = (!self.session.displayed().is_empty()).then_some(0);
    self.list_state.select(first);
  }

  /// Infinite scroll: landing on the last card pulls in the next page
  fn load_more_if_at_end(&mut self) {
    let len = self.session.displayed().len();
    if len == 0 || self.list_state.selected() != Some(len - 1) || !self.session.has_more() {
      return;
    }
    self.update_session(|session, records| {
      session.load_more(records);
    });
    debug!(
      page = self.session.page(),
      shown = self.session.displayed().len(),
      "loaded next page"
    );
  }

  fn move_down(&mut self) {
    let len = self.session.displayed().len();
    if len == 0 {
      return;
    }
    let next = self.list_state.selected().map_or(0, |i| (i + 1).min(len - 1));
    self.list_state.select(Some(next));
    self.load_more_if_at_end();
  }

  fn move_up(&mut self) {
    if self.session.displayed().is_empty() {
      return;
    }
    let prev = self.list_state.selected().map_or(0, |i| i.saturating_sub(1));
    self.list_state.select(Some(prev));
  }

  fn open_sort_picker(&mut self) {
    let options = SortKey::ALL
      .iter()
      .map(|key| PickerOption::new(key.as_str(), key.label()))
      .collect();
    let current = self.session.sort_by().map(|k| k.as_str()).unwrap_or_default();
    self.sort_picker.show("Sort by", options, current);
  }

  fn open_group_picker(&mut self) {
    let mut options = vec![PickerOption::new("", "All Flavor Groups")];
    options.extend(
      flavor_groups(self.records())
        .into_iter()
        .map(|group| PickerOption::new(group.clone(), group)),
    );
    let current = self.session.filter_by().to_string();
    self.group_picker.show("Flavor group", options, &current);
  }

  /// Offer the key to the open overlay (or the `/` opener). True if consumed.
  fn handle_overlays(&mut self, key: KeyEvent) -> bool {
    let result = self.sort_picker.handle_key(key);
    if let KeyResult::Event(PickerEvent::Selected(value)) = &result {
      let sort_by = SortKey::parse(value);
      self.restart(|session, records| session.set_sort(records, sort_by));
    }
    if result.is_consumed() {
      return true;
    }

    let result = self.group_picker.handle_key(key);
    if let KeyResult::Event(PickerEvent::Selected(group)) = result {
      self.restart(|session, records| session.set_filter(records, group));
      return true;
    }
    if result.is_consumed() {
      return true;
    }

    let result = self.search.handle_key(key, self.session.filter_by());
    if let KeyResult::Event(SearchEvent::Changed(text)) = result {
      self.restart(|session, records| session.set_filter(records, text));
      return true;
    }
    result.is_consumed()
  }

  fn render_controls(&self, frame: &mut Frame, area: Rect) {
    let sort_label = self.session.sort_by().map_or("Unsorted", |k| k.label());
    let filter = self.session.filter_by();
    let filter_label = if filter.is_empty() {
      "All Flavor Groups"
    } else {
      filter
    };

    let line = Line::from(vec![
      Span::styled(" Sort: ", Style::default().fg(Color::DarkGray)),
      Span::styled(sort_label, Style::default().fg(Color::Yellow)),
      Span::styled("   Filter: ", Style::default().fg(Color::DarkGray)),
      Span::styled(filter_label, Style::default().fg(Color::Yellow)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
  }

  fn render_list(&mut self, frame: &mut Frame, area: Rect) {
    let title = match self.query.state() {
      QueryState::Loading => format!(" {} (loading...) ", self.title),
      QueryState::Error(_) => format!(" {} (error) ", self.title),
      _ => format!(" {} ({}) ", self.title, self.session.total()),
    };

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let message = match self.query.state() {
      QueryState::Idle | QueryState::Loading => Some((
        "Loading jelly beans...".to_string(),
        Style::default().fg(Color::DarkGray),
      )),
      QueryState::Error(e) => Some((
        format!("Failed to load jelly beans: {}\n\nPress 'r' to retry.", e),
        Style::default().fg(Color::Red),
      )),
      QueryState::Success(_) if self.session.displayed().is_empty() => {
        Some((EMPTY_MESSAGE.to_string(), Style::default().fg(Color::DarkGray)))
      }
      QueryState::Success(_) => None,
    };

    if let Some((text, style)) = message {
      let paragraph = Paragraph::new(text)
        .block(block)
        .style(style)
        .wrap(Wrap { trim: true });
      frame.render_widget(paragraph, area);
      return;
    }

    ensure_valid_selection(&mut self.list_state, self.session.displayed().len());

    let desc_width = area.width.saturating_sub(8) as usize;
    let items: Vec<ListItem> = self
      .session
      .displayed()
      .iter()
      .map(|bean| bean_card(bean, desc_width))
      .collect();

    let list = List::new(items)
      .block(block)
      .highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut self.list_state);
  }

  fn render_status(&self, frame: &mut Frame, area: Rect) {
    let Some(records) = self.query.data() else {
      return;
    };
    if self.session.displayed().is_empty() {
      return;
    }

    let summary = self.session.summary(records.len());
    let line = if self.session.is_exhausted() {
      Line::from(vec![
        Span::styled(format!(" {}  ", summary), Style::default().fg(Color::DarkGray)),
        Span::styled(
          format!("You've seen all {} flavors!", self.session.total()),
          Style::default().fg(Color::Green),
        ),
      ])
    } else {
      Line::from(vec![
        Span::styled(format!(" {}  ", summary), Style::default().fg(Color::DarkGray)),
        Span::styled("scroll for more", Style::default().fg(Color::Cyan)),
      ])
    };
    frame.render_widget(Paragraph::new(line), area);
  }
}

/// Message for a failed catalog load
fn describe_error(err: &Report) -> String {
  match err.downcast_ref::<FetchError>().and_then(FetchError::status) {
    // Free-tier hosting answers 5xx while the service spins up
    Some(status) if status >= 500 => format!("{} (the service may still be waking up)", err),
    _ => format!("{:#}", err),
  }
}

/// Two-line card: swatch, name and badge, then groups and description
fn bean_card(bean: &Bean, desc_width: usize) -> ListItem<'static> {
  let swatch = parse_hex_color(&bean.background_color).unwrap_or(Color::Gray);

  let mut title = vec![
    Span::styled("██ ", Style::default().fg(swatch)),
    Span::styled(bean.flavor_name.clone(), Style::default().fg(Color::White).bold()),
  ];
  if bean.sugar_free {
    title.push(Span::styled(
      " [Sugar-Free]",
      Style::default().fg(sugar_free_color(true)),
    ));
  }

  let groups = if bean.group_name.is_empty() {
    "Unassigned".to_string()
  } else {
    bean.group_name.join(", ")
  };
  let detail = Line::from(vec![
    Span::raw("   "),
    Span::styled(format!("{} · ", groups), Style::default().fg(Color::Cyan)),
    Span::styled(
      truncate(&bean.description, desc_width.saturating_sub(groups.chars().count() + 3)),
      Style::default().fg(Color::DarkGray),
    ),
  ]);

  ListItem::new(vec![Line::from(title), detail])
}

impl View for CatalogView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    if self.handle_overlays(key) {
      return ViewAction::None;
    }

    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.move_down(),
      KeyCode::Char('k') | KeyCode::Up => self.move_up(),
      KeyCode::Char('s') => self.open_sort_picker(),
      KeyCode::Char('f') => self.open_group_picker(),
      KeyCode::Char('r') => self.refresh(),
      KeyCode::Enter => {
        let selected = self
          .list_state
          .selected()
          .and_then(|idx| self.session.displayed().get(idx));
        if let Some(bean) = selected {
          return ViewAction::Push(Box::new(BeanDetailView::new(bean.clone())));
        }
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(1), // Sort and filter
        Constraint::Min(3),    // Cards
        Constraint::Length(1), // Summary
      ])
      .split(area);

    self.render_controls(frame, chunks[0]);
    self.render_list(frame, chunks[1]);
    self.render_status(frame, chunks[2]);

    self.search.render_overlay(frame, chunks[1]);
    self.sort_picker.render_overlay(frame, area);
    self.group_picker.render_overlay(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    "Beans".to_string()
  }

  fn tick(&mut self) {
    if self.query.poll() && self.query.data().is_some() {
      let count = self.records().len();
      self.restart(|session, records| session.reset(records));
      debug!(count, "catalog loaded");
    }
  }

  fn refresh(&mut self) {
    self.query.refetch();
  }

  fn is_capturing_input(&self) -> bool {
    self.search.is_active() || self.sort_picker.is_active() || self.group_picker.is_active()
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("s", "sort").with_priority(20),
      ShortcutInfo::new("f", "flavor group").with_priority(30),
      ShortcutInfo::new("/", "filter").with_priority(40),
      ShortcutInfo::new("r", "refresh").with_priority(50),
      ShortcutInfo::new("q", "quit").with_priority(90),
    ]
  }
}
