use std::time::Duration;

use chrono::{Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent};
use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::controller::{Command, TaskBoard};
use crate::models::{Project, Task, TaskStatus, format_due_date};
use crate::ui::components::popup::{render_delete_confirmation, render_status_banner};
use crate::ui::project_form::FormAction;
use crate::ui::task_form::{self, TaskFormState, render_task_form};

pub struct TasksState {
    pub board: TaskBoard,
    table_state: TableState,
    searching: bool,
    form_state: TaskFormState,
}

pub enum TaskAction {
    Back,
    Run(Command<Task>),
    RunProjects(Command<Project>),
}

impl TasksState {
    pub fn new(success_ttl: Duration) -> Self {
        Self {
            board: TaskBoard::new().with_success_ttl(success_ttl),
            table_state: TableState::default(),
            searching: false,
            form_state: TaskFormState::default(),
        }
    }

    pub fn next(&mut self) {
        let len = self.board.tasks.filtered_items().len();
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
        let len = self.board.tasks.filtered_items().len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => (i - 1).min(len - 1),
        };
        self.table_state.select(Some(i));
    }

    pub fn selected_task(&self) -> Option<&Task> {
        let i = self.table_state.selected()?;
        self.board.tasks.filtered_items().get(i).copied()
    }

    fn clamp_selection(&mut self) {
        let len = self.board.tasks.filtered_items().len();
        let selected = match (len, self.table_state.selected()) {
            (0, _) => None,
            (_, Some(i)) => Some(i.min(len - 1)),
            (_, None) => Some(0),
        };
        self.table_state.select(selected);
    }

    fn change_project(&mut self, forward: bool) -> Option<TaskAction> {
        self.searching = false;
        self.table_state.select(None);
        self.board.cycle_project(forward).map(TaskAction::Run)
    }
}

fn status_style(status: TaskStatus) -> Style {
    match status {
        TaskStatus::Todo => Style::default().fg(Color::Yellow),
        TaskStatus::InProgress => Style::default().fg(Color::Cyan),
        TaskStatus::Completed => Style::default().fg(Color::Green),
    }
}

fn due_cell(task: &Task, today: NaiveDate) -> Cell<'static> {
    let formatted = format_due_date(task.due_date);
    if task.is_overdue(today) {
        Cell::from(Spans::from(vec![
            Span::raw(formatted),
            Span::styled(" Overdue", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        ]))
    } else {
        Cell::from(formatted)
    }
}

fn render_selector<B: Backend>(frame: &mut Frame<B>, area: Rect, board: &TaskBoard) {
    let line = match (board.selected_project(), board.projects.items().is_empty()) {
        (Some(project), _) => Spans::from(vec![
            Span::raw("< "),
            Span::styled(project.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" >"),
        ]),
        (None, true) if board.projects.status().is_loading() => Spans::from("Loading projects..."),
        (None, true) => Spans::from("No projects available"),
        (None, false) => Spans::from("< Select a project >"),
    };
    let selector = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Project [ / ] to change"),
    );
    frame.render_widget(selector, area);
}

fn render_empty<B: Backend>(frame: &mut Frame<B>, area: Rect, headline: &str, hint: &str) {
    let empty = Paragraph::new(vec![
        Spans::from(""),
        Spans::from(Span::styled(
            headline.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Spans::from(hint.to_string()),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title("Tasks"));
    frame.render_widget(empty, area);
}

pub fn render_tasks<B: Backend>(frame: &mut Frame<B>, area: Rect, state: &mut TasksState) {
    render_tasks_on(frame, area, state, Local::now().date_naive());
}

pub fn render_tasks_on<B: Backend>(
    frame: &mut Frame<B>,
    area: Rect,
    state: &mut TasksState,
    today: NaiveDate,
) {
    state.clamp_selection();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(area);

    // Selector failures surface here too, since the task list depends on them.
    let banner = if state.board.projects.status().is_error() {
        state.board.projects.status()
    } else {
        state.board.tasks.status()
    };
    render_status_banner(frame, chunks[0], banner);
    render_selector(frame, chunks[1], &state.board);

    let has_project = state.board.selected_project_id().is_some();
    if has_project {
        let search_style = if state.searching {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let search = Paragraph::new(format!(
            "{}{}",
            state.board.tasks.search_query(),
            if state.searching { "|" } else { "" }
        ))
        .style(search_style)
        .block(Block::default().borders(Borders::ALL).title("Search tasks..."));
        frame.render_widget(search, chunks[2]);
    }

    let filtered = state.board.tasks.filtered_items();
    if !has_project {
        render_empty(
            frame,
            chunks[3],
            "No Project Selected",
            "Please select a project to view and manage tasks",
        );
    } else if filtered.is_empty() {
        let hint = if state.board.tasks.status().is_loading() {
            "Loading tasks..."
        } else if state.board.tasks.search_query().is_empty() {
            "Create your first task for this project"
        } else {
            "Try adjusting your search terms"
        };
        render_empty(frame, chunks[3], "No tasks found", hint);
    } else {
        let rows: Vec<Row> = filtered
            .iter()
            .map(|task| {
                Row::new(vec![
                    Cell::from(task.title.clone()),
                    Cell::from(task.description.clone()),
                    Cell::from(Span::styled(task.status.label(), status_style(task.status))),
                    due_cell(task, today),
                ])
            })
            .collect();

        let widths = [
            Constraint::Percentage(25),
            Constraint::Percentage(40),
            Constraint::Percentage(15),
            Constraint::Percentage(20),
        ];
        let table = Table::new(rows)
            .header(
                Row::new(vec!["Title", "Description", "Status", "Due Date"])
                    .style(Style::default().add_modifier(Modifier::BOLD))
                    .bottom_margin(1),
            )
            .block(Block::default().borders(Borders::ALL).title("Tasks"))
            .widths(&widths)
            .highlight_style(
                Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_stateful_widget(table, chunks[3], &mut state.table_state);
    }

    let buttons_text = if state.searching {
        "Type to filter | <Enter>/<Esc> Done"
    } else if state.selected_task().is_some() {
        "<N> New | <E> Edit | <T> Next Status | <D> Delete | </> Search | <[ ]> Project | <Esc> Menu"
    } else {
        "<N> New Task | <[ ]> Project | <R> Reload | <Esc> Menu"
    };
    let buttons = Paragraph::new(buttons_text)
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));
    frame.render_widget(buttons, chunks[4]);

    let busy = state.board.tasks.status().is_loading();
    if let Some(form) = state.board.tasks.form() {
        render_task_form(
            frame,
            area,
            &state.form_state,
            form,
            state.board.projects.items(),
            busy,
        );
    }
    if let Some(task) = state.board.tasks.pending_delete() {
        render_delete_confirmation(frame, area, "Task", &task.title, busy);
    }
}

pub fn handle_key(state: &mut TasksState, key: KeyEvent) -> Option<TaskAction> {
    handle_key_on(state, key, Local::now().date_naive())
}

pub fn handle_key_on(state: &mut TasksState, key: KeyEvent, today: NaiveDate) -> Option<TaskAction> {
    let busy = state.board.tasks.status().is_loading();

    if state.board.tasks.pending_delete().is_some() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter if !busy => {
                return state.board.tasks.confirm_delete().map(TaskAction::Run);
            }
            KeyCode::Char('n') | KeyCode::Esc if !busy => state.board.tasks.cancel_delete(),
            _ => {}
        }
        return None;
    }

    if let Some(form) = state.board.tasks.form_mut() {
        let projects = state.board.projects.items();
        match task_form::handle_key(&mut state.form_state, form, projects, key, today) {
            Some(FormAction::Cancel) if !busy => state.board.tasks.close_form(),
            Some(FormAction::Submit) if !busy => {
                return state.board.tasks.submit_on(today).map(TaskAction::Run);
            }
            _ => {}
        }
        return None;
    }

    if state.searching {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => state.searching = false,
            KeyCode::Backspace => {
                state.board.tasks.search_query_mut().pop();
            }
            KeyCode::Char(c) => state.board.tasks.search_query_mut().push(c),
            _ => {}
        }
        state.clamp_selection();
        return None;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => return Some(TaskAction::Back),
        KeyCode::Down | KeyCode::Char('j') => state.next(),
        KeyCode::Up | KeyCode::Char('k') => state.previous(),
        KeyCode::Char(']') => return state.change_project(true),
        KeyCode::Char('[') => return state.change_project(false),
        KeyCode::Char('/') if state.board.selected_project_id().is_some() => state.searching = true,
        KeyCode::Char('n') => {
            state.form_state = TaskFormState::default();
            state.board.tasks.begin_create();
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(task) = state.selected_task().cloned() {
                state.form_state = TaskFormState::default();
                state.board.tasks.begin_edit(&task);
            }
        }
        KeyCode::Char('t') | KeyCode::Char(' ') => {
            if let Some(task) = state.selected_task().cloned() {
                return Some(TaskAction::Run(state.board.tasks.toggle_status(&task)));
            }
        }
        KeyCode::Char('d') => {
            if let Some(task) = state.selected_task().cloned() {
                state.board.tasks.request_delete(&task);
            }
        }
        KeyCode::Char('r') => {
            return match state.board.tasks.load() {
                Some(command) => Some(TaskAction::Run(command)),
                None => state.board.projects.load().map(TaskAction::RunProjects),
            };
        }
        _ => {}
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Completion;
    use crate::models::{ProjectId, ProjectStatus, TaskId};
    use crossterm::event::KeyModifiers;
    use tui::{Terminal, backend::TestBackend};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn project(id: &str, title: &str) -> Project {
        Project {
            id: ProjectId::from(id),
            title: title.to_string(),
            description: String::new(),
            status: ProjectStatus::Active,
        }
    }

    fn task(id: &str, title: &str, due: Option<NaiveDate>) -> Task {
        Task {
            id: TaskId::from(id),
            title: title.to_string(),
            description: String::new(),
            status: TaskStatus::Todo,
            due_date: due,
            project_id: Some(ProjectId::from("p1")),
        }
    }

    /// Loads the selector and answers the auto-selected project's task fetch.
    fn board_with(tasks: Vec<Task>) -> TasksState {
        let mut state = TasksState::new(Duration::from_secs(3));
        let Some(Command::Fetch(ticket)) = state.board.projects.load() else {
            panic!("expected project fetch");
        };
        let follow_up = state.board.projects_loaded(Completion::Fetched {
            ticket,
            result: Ok(vec![project("p1", "Website"), project("p2", "Mobile")]),
        });
        let Some(Command::Fetch(ticket)) = follow_up else {
            panic!("expected task fetch for default project");
        };
        state.board.tasks.complete(Completion::Fetched {
            ticket,
            result: Ok(tasks),
        });
        state
    }

    fn screen_text(state: &mut TasksState, today: NaiveDate) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal
            .draw(|f| {
                let area = f.size();
                render_tasks_on(f, area, state, today);
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
    fn overdue_tasks_are_marked() {
        let mut state = board_with(vec![
            task("t1", "Late", Some(day(2025, 1, 1))),
            task("t2", "Due today", Some(day(2025, 6, 1))),
        ]);
        let text = screen_text(&mut state, day(2025, 6, 1));
        assert!(text.contains("Jan 1, 2025 Overdue"));
        assert!(text.contains("Jun 1, 2025"));
        assert_eq!(text.matches("Overdue").count(), 1);
    }

    #[test]
    fn cycling_to_no_project_shows_prompt() {
        let mut state = board_with(vec![task("t1", "Wireframes", None)]);
        assert!(matches!(
            handle_key(&mut state, press(KeyCode::Char('['))),
            None
        ));
        assert!(state.board.selected_project_id().is_none());
        assert!(screen_text(&mut state, day(2025, 6, 1)).contains("No Project Selected"));
    }

    #[test]
    fn changing_project_issues_fetch_for_new_scope() {
        let mut state = board_with(vec![]);
        match handle_key(&mut state, press(KeyCode::Char(']'))) {
            Some(TaskAction::Run(Command::Fetch(ticket))) => {
                assert_eq!(ticket.scope, ProjectId::from("p2"))
            }
            _ => panic!("expected fetch for next project"),
        }
    }

    #[test]
    fn search_without_matches_suggests_adjusting() {
        let mut state = board_with(vec![task("t1", "Wireframes", None)]);
        handle_key(&mut state, press(KeyCode::Char('/')));
        handle_key(&mut state, press(KeyCode::Char('z')));
        handle_key(&mut state, press(KeyCode::Esc));
        let text = screen_text(&mut state, day(2025, 6, 1));
        assert!(text.contains("No tasks found"));
        assert!(text.contains("Try adjusting your search terms"));
    }

    #[test]
    fn new_task_defaults_to_selected_project() {
        let mut state = board_with(vec![]);
        handle_key(&mut state, press(KeyCode::Char('n')));
        let form = state.board.tasks.form().expect("form open");
        assert_eq!(form.draft().project_id, Some(ProjectId::from("p1")));
        assert_eq!(form.draft().status, TaskStatus::InProgress);
    }

    #[test]
    fn empty_submit_keeps_form_open() {
        let mut state = board_with(vec![]);
        handle_key(&mut state, press(KeyCode::Char('n')));
        let action = handle_key_on(&mut state, press(KeyCode::Char('s')), day(2025, 6, 1));
        assert!(action.is_none());
        let form = state.board.tasks.form().expect("form still open");
        assert!(!form.violations().is_empty());
    }
}
