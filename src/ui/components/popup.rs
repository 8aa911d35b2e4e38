use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::controller::Status;

// Helper function to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// "Delete Project?" style confirmation naming the record.
pub fn render_delete_confirmation<B: Backend>(
    frame: &mut Frame<B>,
    area: Rect,
    noun: &str,
    title: &str,
    busy: bool,
) {
    let popup_area = centered_rect(50, 30, area);
    let prompt = if busy { "Deleting..." } else { "<Y> Delete  <N> Cancel" };

    let popup = Paragraph::new(vec![
        Spans::from(""),
        Spans::from(vec![
            Span::raw("Are you sure you want to delete "),
            Span::styled(title.to_string(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("?"),
        ]),
        Spans::from("This action cannot be undone."),
        Spans::from(""),
        Spans::from(prompt),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title(format!("Delete {}?", noun))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    )
    .style(Style::default().fg(Color::White).bg(Color::Black));

    frame.render_widget(Clear, popup_area);
    frame.render_widget(popup, popup_area);
}

/// One-line banner for the controller status; blank when idle.
pub fn render_status_banner<B: Backend>(frame: &mut Frame<B>, area: Rect, status: &Status) {
    let (text, style) = match status {
        Status::Idle => (String::new(), Style::default()),
        Status::Loading => ("Loading...".to_string(), Style::default().fg(Color::Cyan)),
        Status::Error(message) => (format!("! {}", message), Style::default().fg(Color::Red)),
        Status::Success { message, .. } => (format!("✓ {}", message), Style::default().fg(Color::Green)),
    };
    frame.render_widget(Paragraph::new(text).style(style), area);
}
