use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent};
use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::controller::{Command, ListController};
use crate::models::{Project, ProjectStatus};
use crate::ui::components::popup::{render_delete_confirmation, render_status_banner};
use crate::ui::project_form::{self, FormAction, ProjectFormState, render_project_form};

// Represents the state of the projects screen
pub struct ProjectsState {
    pub controller: ListController<Project>,
    table_state: TableState,
    searching: bool,
    form_state: ProjectFormState,
}

pub enum ProjectAction {
    Back,
    Run(Command<Project>),
}

impl ProjectsState {
    pub fn new(success_ttl: Duration) -> Self {
        Self {
            controller: ListController::new(Some(())).with_success_ttl(success_ttl),
            table_state: TableState::default(),
            searching: false,
            form_state: ProjectFormState::default(),
        }
    }

    pub fn next(&mut self) {
        let len = self.controller.filtered_items().len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.controller.filtered_items().len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => (i - 1).min(len - 1),
        };
        self.table_state.select(Some(i));
    }

    pub fn selected_project(&self) -> Option<&Project> {
        let i = self.table_state.selected()?;
        self.controller.filtered_items().get(i).copied()
    }

    /// Keeps the highlighted row inside the (possibly shrunk) filtered list.
    fn clamp_selection(&mut self) {
        let len = self.controller.filtered_items().len();
        let selected = match (len, self.table_state.selected()) {
            (0, _) => None,
            (_, Some(i)) => Some(i.min(len - 1)),
            (_, None) => Some(0),
        };
        self.table_state.select(selected);
    }
}

fn status_style(status: ProjectStatus) -> Style {
    match status {
        ProjectStatus::Active => Style::default().fg(Color::Green),
        ProjectStatus::Inactive => Style::default().fg(Color::DarkGray),
    }
}

pub fn render_projects<B: Backend>(frame: &mut Frame<B>, area: Rect, state: &mut ProjectsState) {
    state.clamp_selection();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(area);

    render_status_banner(frame, chunks[0], state.controller.status());

    let search_style = if state.searching {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let search = Paragraph::new(format!(
        "{}{}",
        state.controller.search_query(),
        if state.searching { "|" } else { "" }
    ))
    .style(search_style)
    .block(Block::default().borders(Borders::ALL).title("Search projects..."));
    frame.render_widget(search, chunks[1]);

    let filtered = state.controller.filtered_items();
    if filtered.is_empty() {
        let (headline, hint) = if state.controller.status().is_loading() {
            ("Loading projects...", "")
        } else if state.controller.search_query().is_empty() {
            ("No projects found", "Create your first project to get started")
        } else {
            ("No projects found", "Try adjusting your search terms")
        };
        let empty = Paragraph::new(vec![
            Spans::from(""),
            Spans::from(Span::styled(headline, Style::default().add_modifier(Modifier::BOLD))),
            Spans::from(hint),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Projects"));
        frame.render_widget(empty, chunks[2]);
    } else {
        let rows: Vec<Row> = filtered
            .iter()
            .map(|project| {
                Row::new(vec![
                    Cell::from(project.title.clone()),
                    Cell::from(project.description.clone()),
                    Cell::from(Span::styled(project.status.label(), status_style(project.status))),
                ])
            })
            .collect();

        let widths = [
            Constraint::Percentage(30),
            Constraint::Percentage(55),
            Constraint::Percentage(15),
        ];
        let table = Table::new(rows)
            .header(
                Row::new(vec!["Title", "Description", "Status"])
                    .style(Style::default().add_modifier(Modifier::BOLD))
                    .bottom_margin(1),
            )
            .block(Block::default().borders(Borders::ALL).title("Projects"))
            .widths(&widths)
            .highlight_style(
                Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_stateful_widget(table, chunks[2], &mut state.table_state);
    }

    let buttons_text = if state.searching {
        "Type to filter | <Enter>/<Esc> Done"
    } else if state.selected_project().is_some() {
        "<N> New | <E> Edit | <T> Toggle Status | <D> Delete | </> Search | <R> Reload | <Esc> Menu"
    } else {
        "<N> New Project | </> Search | <R> Reload | <Esc> Menu"
    };
    let buttons = Paragraph::new(buttons_text)
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));
    frame.render_widget(buttons, chunks[3]);

    let busy = state.controller.status().is_loading();
    if let Some(form) = state.controller.form() {
        render_project_form(frame, area, &state.form_state, form, busy);
    }
    if let Some(project) = state.controller.pending_delete() {
        render_delete_confirmation(frame, area, "Project", &project.title, busy);
    }
}

pub fn handle_key(state: &mut ProjectsState, key: KeyEvent) -> Option<ProjectAction> {
    let busy = state.controller.status().is_loading();

    if state.controller.pending_delete().is_some() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter if !busy => {
                return state.controller.confirm_delete().map(ProjectAction::Run);
            }
            KeyCode::Char('n') | KeyCode::Esc if !busy => state.controller.cancel_delete(),
            _ => {}
        }
        return None;
    }

    if let Some(form) = state.controller.form_mut() {
        match project_form::handle_key(&mut state.form_state, form, key) {
            Some(FormAction::Cancel) if !busy => state.controller.close_form(),
            Some(FormAction::Submit) if !busy => {
                return state.controller.submit().map(ProjectAction::Run);
            }
            _ => {}
        }
        return None;
    }

    if state.searching {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => state.searching = false,
            KeyCode::Backspace => {
                state.controller.search_query_mut().pop();
            }
            KeyCode::Char(c) => state.controller.search_query_mut().push(c),
            _ => {}
        }
        state.clamp_selection();
        return None;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => return Some(ProjectAction::Back),
        KeyCode::Down | KeyCode::Char('j') => state.next(),
        KeyCode::Up | KeyCode::Char('k') => state.previous(),
        KeyCode::Char('/') => state.searching = true,
        KeyCode::Char('n') => {
            state.form_state = ProjectFormState::default();
            state.controller.begin_create();
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(project) = state.selected_project().cloned() {
                state.form_state = ProjectFormState::default();
                state.controller.begin_edit(&project);
            }
        }
        KeyCode::Char('t') | KeyCode::Char(' ') => {
            if let Some(project) = state.selected_project().cloned() {
                return Some(ProjectAction::Run(state.controller.toggle_status(&project)));
            }
        }
        KeyCode::Char('d') => {
            if let Some(project) = state.selected_project().cloned() {
                state.controller.request_delete(&project);
            }
        }
        KeyCode::Char('r') => return state.controller.load().map(ProjectAction::Run),
        _ => {}
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Completion;
    use crate::models::ProjectId;
    use crossterm::event::KeyModifiers;
    use tui::{Terminal, backend::TestBackend};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn state_with(titles: &[&str]) -> ProjectsState {
        let mut state = ProjectsState::new(Duration::from_secs(3));
        let Some(Command::Fetch(ticket)) = state.controller.load() else {
            panic!("expected fetch");
        };
        let projects = titles
            .iter()
            .enumerate()
            .map(|(i, title)| Project {
                id: ProjectId::from(format!("p{}", i).as_str()),
                title: title.to_string(),
                description: format!("{} description", title),
                status: ProjectStatus::Active,
            })
            .collect();
        state.controller.complete(Completion::Fetched {
            ticket,
            result: Ok(projects),
        });
        state.clamp_selection();
        state
    }

    fn screen_text(state: &mut ProjectsState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal
            .draw(|f| {
                let area = f.size();
                render_projects(f, area, state);
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol.as_str())
            .collect()
    }

    #[test]
    fn delete_needs_confirmation() {
        let mut state = state_with(&["Alpha"]);

        assert!(handle_key(&mut state, press(KeyCode::Char('d'))).is_none());
        assert!(state.controller.pending_delete().is_some());
        assert!(screen_text(&mut state).contains("Delete Project?"));

        match handle_key(&mut state, press(KeyCode::Char('y'))) {
            Some(ProjectAction::Run(Command::Delete(id))) => assert_eq!(id, ProjectId::from("p0")),
            _ => panic!("expected delete command"),
        }
    }

    #[test]
    fn search_mode_filters_and_keeps_selection_valid() {
        let mut state = state_with(&["Alpha", "Beta", "Gamma"]);
        state.next();
        state.next();

        handle_key(&mut state, press(KeyCode::Char('/')));
        for c in "bet".chars() {
            handle_key(&mut state, press(KeyCode::Char(c)));
        }
        handle_key(&mut state, press(KeyCode::Enter));

        assert_eq!(state.selected_project().map(|p| p.title.as_str()), Some("Beta"));
        let text = screen_text(&mut state);
        assert!(text.contains("Beta"));
        assert!(!text.contains("Gamma"));
    }

    #[test]
    fn toggle_key_issues_update_without_local_change() {
        let mut state = state_with(&["Alpha"]);
        match handle_key(&mut state, press(KeyCode::Char('t'))) {
            Some(ProjectAction::Run(Command::Update { record, .. })) => {
                assert_eq!(record.status, ProjectStatus::Inactive)
            }
            _ => panic!("expected update command"),
        }
        assert_eq!(state.controller.items()[0].status, ProjectStatus::Active);
    }

    #[test]
    fn empty_list_shows_hint() {
        let mut state = state_with(&[]);
        assert!(screen_text(&mut state).contains("Create your first project to get started"));
    }

    #[test]
    fn escape_returns_to_menu() {
        let mut state = state_with(&["Alpha"]);
        assert!(matches!(handle_key(&mut state, press(KeyCode::Esc)), Some(ProjectAction::Back)));
    }
}
