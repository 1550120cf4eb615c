use crate::browse::BrowseSession;
use crate::catalog::CachedCatalogClient;
use crate::config::Config;
use crate::event::{Event, EventHandler};
use crate::ui;
use crate::ui::components::{CommandEvent, CommandInput, KeyResult};
use crate::ui::view::{View, ViewAction};
use crate::ui::views::CatalogView;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::{stdout, Stdout};
use std::time::Duration;
use tracing::{info, warn};

const TICK_RATE: Duration = Duration::from_millis(100);

/// Main application state
pub struct App {
  /// Navigation stack - root is always the catalog
  view_stack: Vec<Box<dyn View>>,

  /// `:` command palette
  command: CommandInput,

  config: Config,

  client: CachedCatalogClient,

  /// Filter applied when the catalog view is (re)created
  initial_filter: String,

  /// Last command feedback, shown in the footer
  status: Option<String>,

  should_quit: bool,
}

impl App {
  pub fn new(config: Config, initial_filter: String) -> Result<Self> {
    let client = CachedCatalogClient::new(&config)?;

    let mut app = Self {
      view_stack: Vec::new(),
      command: CommandInput::new(),
      config,
      client,
      initial_filter,
      status: None,
      should_quit: false,
    };
    app.view_stack.push(app.catalog_view());
    Ok(app)
  }

  fn catalog_view(&self) -> Box<dyn View> {
    let session = BrowseSession::new(self.config.browse.page_size, self.config.browse.sort_key())
      .with_filter(self.initial_filter.clone());
    Box::new(CatalogView::new(
      self.config.title.clone(),
      self.client.clone(),
      session,
    ))
  }

  pub async fn run(&mut self) -> Result<()> {
    let mut terminal = setup_terminal()?;

    let result = self.event_loop(&mut terminal).await;

    // Restore even when the loop failed, so the error is readable
    restore_terminal()?;
    result
  }

  async fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    let mut events = EventHandler::new(TICK_RATE);

    info!(api = %self.client.base_url(), "jbs started");

    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      match events.next().await {
        Some(event) => self.handle_event(event),
        None => break,
      }
    }

    Ok(())
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      // Every view polls, so the catalog keeps loading under a detail card
      Event::Tick => self.view_stack.iter_mut().for_each(|view| view.tick()),
      Event::Resize => {}
    }
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    let capturing = self
      .current_view()
      .is_some_and(|view| view.is_capturing_input());

    if self.command.is_active() || !capturing {
      match self.command.handle_key(key) {
        KeyResult::Event(CommandEvent::Submitted(cmd)) => {
          self.execute_command(&cmd);
          return;
        }
        KeyResult::NotHandled => {}
        _ => return,
      }
    }

    self.status = None;

    let action = match self.view_stack.last_mut() {
      Some(view) => view.handle_key(key),
      None => return,
    };

    match action {
      ViewAction::None => {}
      ViewAction::Push(view) => self.view_stack.push(view),
      ViewAction::Pop => {
        if self.view_stack.len() > 1 {
          self.view_stack.pop();
        } else {
          self.should_quit = true;
        }
      }
    }
  }

  fn execute_command(&mut self, cmd: &str) {
    match cmd {
      "beans" => {
        let root = self.catalog_view();
        self.view_stack.clear();
        self.view_stack.push(root);
        self.status = None;
      }
      "refresh" => {
        self.view_stack.iter_mut().for_each(|view| view.refresh());
        self.status = Some("Reloading catalog...".to_string());
      }
      "quit" => self.should_quit = true,
      "" => {}
      other => {
        warn!(command = other, "unknown command");
        self.status = Some(format!("Unknown command: {}", other));
      }
    }
  }

  // Accessors for UI rendering

  pub fn current_view(&self) -> Option<&dyn View> {
    self.view_stack.last().map(|v| v.as_ref())
  }

  pub fn current_view_mut(&mut self) -> Option<&mut Box<dyn View>> {
    self.view_stack.last_mut()
  }

  pub fn command(&self) -> &CommandInput {
    &self.command
  }

  pub fn title(&self) -> &str {
    &self.config.title
  }

  pub fn api_url(&self) -> &str {
    &self.config.api.url
  }

  pub fn status(&self) -> Option<&str> {
    self.status.as_deref()
  }

  pub fn breadcrumbs(&self) -> Vec<String> {
    self
      .view_stack
      .iter()
      .map(|v| v.breadcrumb_label())
      .collect()
  }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
  enable_raw_mode()?;
  stdout().execute(EnterAlternateScreen)?;
  Ok(Terminal::new(CrosstermBackend::new(stdout()))?)
}

fn restore_terminal() -> Result<()> {
  disable_raw_mode()?;
  stdout().execute(LeaveAlternateScreen)?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::client::test_server::{bean_json, catalog, start};
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::sync::Arc;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn type_str(app: &mut App, text: &str) {
    for c in text.chars() {
      app.handle_key(key(KeyCode::Char(c)));
    }
  }

  async fn app_with_catalog(hits: Arc<AtomicUsize>) -> App {
    let items = vec![
      bean_json(1, "Apple", &["Fruit"]),
      bean_json(2, "Cinnamon", &["Spice"]),
    ];
    let mut config = Config::default();
    config.api.url = start(catalog(items, hits)).await;
    config.cache.enabled = false;
    App::new(config, String::new()).unwrap()
  }

  async fn wait_for_hits(hits: &AtomicUsize, expected: usize) {
    for _ in 0..200 {
      if hits.load(Ordering::SeqCst) >= expected {
        return;
      }
      tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("catalog service saw {} requests", hits.load(Ordering::SeqCst));
  }

  #[tokio::test]
  async fn test_starts_on_catalog() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = app_with_catalog(hits.clone()).await;

    assert_eq!(app.breadcrumbs(), vec!["Beans".to_string()]);
    wait_for_hits(&hits, 1).await;
  }

  #[tokio::test]
  async fn test_quit_command() {
    let mut app = app_with_catalog(Arc::new(AtomicUsize::new(0))).await;

    type_str(&mut app, ":quit");
    assert!(!app.should_quit);
    app.handle_key(key(KeyCode::Enter));
    assert!(app.should_quit);
  }

  #[tokio::test]
  async fn test_q_on_root_quits() {
    let mut app = app_with_catalog(Arc::new(AtomicUsize::new(0))).await;
    app.handle_key(key(KeyCode::Char('q')));
    assert!(app.should_quit);
  }

  #[tokio::test]
  async fn test_ctrl_c_quits_even_while_typing() {
    let mut app = app_with_catalog(Arc::new(AtomicUsize::new(0))).await;
    app.handle_key(key(KeyCode::Char('/')));
    app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(app.should_quit);
  }

  #[tokio::test]
  async fn test_colon_is_text_while_filtering() {
    let mut app = app_with_catalog(Arc::new(AtomicUsize::new(0))).await;
    app.handle_key(key(KeyCode::Char('/')));
    app.handle_key(key(KeyCode::Char(':')));
    assert!(!app.command().is_active());
  }

  #[tokio::test]
  async fn test_unknown_command_sets_status() {
    let mut app = app_with_catalog(Arc::new(AtomicUsize::new(0))).await;
    type_str(&mut app, ":xyzzy");
    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.status(), Some("Unknown command: xyzzy"));
    assert!(!app.should_quit);
  }

  #[tokio::test]
  async fn test_refresh_command_refetches() {
    let hits = Arc::new(AtomicUsize::new(0));
    let mut app = app_with_catalog(hits.clone()).await;
    wait_for_hits(&hits, 1).await;

    type_str(&mut app, ":refresh");
    app.handle_key(key(KeyCode::Enter));
    wait_for_hits(&hits, 2).await;
  }
}
