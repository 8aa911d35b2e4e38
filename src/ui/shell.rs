use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::router::Route;

/// Which pane receives key input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    Content,
}

/// Sidebar position of the Logout entry, after every route.
pub const LOGOUT_INDEX: usize = Route::MENU.len();

/// Draws the sidebar and breadcrumb header, returning the area left for the
/// active screen.
pub fn render_shell<B: Backend>(
    frame: &mut Frame<B>,
    route: Route,
    focus: Focus,
    sidebar_index: usize,
) -> Rect {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(22), Constraint::Min(40)].as_ref())
        .split(frame.size());

    let mut items: Vec<ListItem> = Route::MENU
        .iter()
        .map(|r| {
            let style = if *r == route {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Span::styled(r.label(), style))
        })
        .collect();
    items.push(ListItem::new(Span::styled("Logout", Style::default().fg(Color::Red))));

    let border_style = match focus {
        Focus::Sidebar => Style::default().fg(Color::Yellow),
        Focus::Content => Style::default(),
    };
    let sidebar = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title("Assignment"),
        )
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    if focus == Focus::Sidebar {
        list_state.select(Some(sidebar_index));
    }
    frame.render_stateful_widget(sidebar, columns[0], &mut list_state);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)].as_ref())
        .split(columns[1]);

    let header = Paragraph::new(Spans::from(vec![
        Span::styled("Home", Style::default().fg(Color::Gray)),
        Span::raw(" / "),
        Span::styled(route.label(), Style::default().add_modifier(Modifier::BOLD)),
    ]))
    .block(Block::default().borders(Borders::ALL).title(route.path()));
    frame.render_widget(header, rows[0]);

    rows[1]
}
