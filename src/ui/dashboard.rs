use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::controller::ListController;
use crate::models::Project;
use crate::ui::components::popup::render_status_banner;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProjectStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
}

impl ProjectStats {
    pub fn from_projects(projects: &[Project]) -> Self {
        let active = projects.iter().filter(|p| p.is_active()).count();
        Self {
            total: projects.len(),
            active,
            inactive: projects.len() - active,
        }
    }
}

fn stat_card<'a>(label: &'a str, value: usize, color: Color) -> Paragraph<'a> {
    Paragraph::new(vec![
        Spans::from(""),
        Spans::from(Span::styled(
            value.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title(label))
}

pub fn render_dashboard<B: Backend>(frame: &mut Frame<B>, area: Rect, projects: &ListController<Project>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Length(2),
                Constraint::Length(5),
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .split(area);

    render_status_banner(frame, chunks[0], projects.status());

    let heading = Paragraph::new(Span::styled(
        "Overview of your projects",
        Style::default().fg(Color::Gray),
    ));
    frame.render_widget(heading, chunks[1]);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ]
            .as_ref(),
        )
        .split(chunks[2]);

    let stats = ProjectStats::from_projects(projects.items());
    frame.render_widget(stat_card("Total Projects", stats.total, Color::White), cards[0]);
    frame.render_widget(stat_card("Active", stats.active, Color::Green), cards[1]);
    frame.render_widget(stat_card("Inactive", stats.inactive, Color::DarkGray), cards[2]);

    let help = Paragraph::new("<R> Reload | <Tab> Menu")
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));
    frame.render_widget(help, chunks[3]);
}
