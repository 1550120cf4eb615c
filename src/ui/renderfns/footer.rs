use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Breadcrumb trail of the view stack, with an optional status on the right
pub fn draw_footer(frame: &mut Frame, area: Rect, breadcrumbs: &[String], status: Option<&str>) {
  let mut spans = vec![Span::raw(" ")];
  for (i, crumb) in breadcrumbs.iter().enumerate() {
    if i > 0 {
      spans.push(Span::styled(" › ", Style::default().fg(Color::DarkGray)));
    }
    let style = if i + 1 == breadcrumbs.len() {
      Style::default().fg(Color::White).bold()
    } else {
      Style::default().fg(Color::Gray)
    };
    spans.push(Span::styled(crumb.as_str(), style));
  }

  let chunks = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Min(0), Constraint::Length(40)])
    .split(area);

  let style = Style::default().bg(Color::Black);
  frame.render_widget(Paragraph::new(Line::from(spans)).style(style), chunks[0]);

  let status = Paragraph::new(status.unwrap_or_default())
    .style(style.fg(Color::DarkGray))
    .alignment(Alignment::Right);
  frame.render_widget(status, chunks[1]);
}
