use crate::catalog::Bean;
use crate::ui::renderfns::{parse_hex_color, sugar_free_color};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// Full card for a single bean
pub struct BeanDetailView {
  bean: Bean,
  scroll: u16,
}

impl BeanDetailView {
  pub fn new(bean: Bean) -> Self {
    Self { bean, scroll: 0 }
  }

  fn field<'a>(label: &'a str, value: Span<'a>) -> Line<'a> {
    Line::from(vec![
      Span::styled(format!("{:<14}", label), Style::default().fg(Color::DarkGray)),
      value,
    ])
  }

  fn card_lines(&self) -> Vec<Line<'_>> {
    let bean = &self.bean;

    let mut lines = vec![Line::from(vec![
      Span::styled(&bean.flavor_name, Style::default().fg(Color::White).bold()),
      Span::raw("  "),
      if bean.sugar_free {
        Span::styled("[Sugar-Free]", Style::default().fg(sugar_free_color(true)))
      } else {
        Span::styled("[Regular]", Style::default().fg(sugar_free_color(false)))
      },
    ])];
    lines.push(Line::default());

    let groups = if bean.group_name.is_empty() {
      "Unassigned".to_string()
    } else {
      bean.group_name.join(", ")
    };
    lines.push(Self::field(
      "Flavor groups",
      Span::styled(groups, Style::default().fg(Color::Cyan)),
    ));

    let swatch = parse_hex_color(&bean.background_color).unwrap_or(Color::Gray);
    lines.push(Line::from(vec![
      Span::styled(format!("{:<14}", "Color"), Style::default().fg(Color::DarkGray)),
      Span::styled("██ ", Style::default().fg(swatch)),
      Span::raw(if bean.color_group.is_empty() {
        "-"
      } else {
        bean.color_group.as_str()
      }),
    ]));

    let flags = bean.dietary_flags();
    lines.push(Self::field(
      "Dietary",
      if flags.is_empty() {
        Span::raw("-")
      } else {
        Span::styled(flags.join(" · "), Style::default().fg(Color::Green))
      },
    ));

    lines.push(Line::default());
    lines.push(Line::from(bean.description.as_str()));
    lines.push(Line::default());

    lines.push(Line::styled(
      "Ingredients",
      Style::default().fg(Color::DarkGray),
    ));
    if bean.ingredients.is_empty() {
      lines.push(Line::from("  Not listed"));
    } else {
      lines.extend(
        bean
          .ingredients
          .iter()
          .map(|i| Line::from(format!("  • {}", i))),
      );
    }

    lines.push(Line::default());
    lines.push(Self::field(
      "Image",
      Span::styled(bean.image_url.as_str(), Style::default().fg(Color::Blue)),
    ));
    lines.push(Self::field("ID", Span::raw(bean.bean_id.to_string())));

    lines
  }
}

impl View for BeanDetailView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => {
        self.scroll = self.scroll.saturating_add(1);
        ViewAction::None
      }
      KeyCode::Char('k') | KeyCode::Up => {
        self.scroll = self.scroll.saturating_sub(1);
        ViewAction::None
      }
      KeyCode::Char('q') | KeyCode::Esc => ViewAction::Pop,
      _ => ViewAction::None,
    }
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let block = Block::default()
      .title(format!(" {} ", self.bean.flavor_name))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let paragraph = Paragraph::new(self.card_lines())
      .block(block)
      .wrap(Wrap { trim: false })
      .scroll((self.scroll, 0));
    frame.render_widget(paragraph, area);
  }

  fn breadcrumb_label(&self) -> String {
    self.bean.flavor_name.clone()
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("j/k", "scroll").with_priority(20),
      ShortcutInfo::new("q", "back").with_priority(90),
    ]
  }
}
