use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use crate::controller::{Field, Form, FormMode};
use crate::models::{Project, Task};
use crate::ui::components::date_input::DateInputState;
use crate::ui::components::popup::centered_rect;
use crate::ui::project_form::FormAction;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TaskField {
    Project,
    Title,
    Description,
    Status,
    DueDate,
}

impl TaskField {
    const ALL: [TaskField; 5] = [
        TaskField::Project,
        TaskField::Title,
        TaskField::Description,
        TaskField::Status,
        TaskField::DueDate,
    ];

    fn label(self) -> &'static str {
        match self {
            TaskField::Project => "Project",
            TaskField::Title => "Title",
            TaskField::Description => "Description",
            TaskField::Status => "Status",
            TaskField::DueDate => "Due Date",
        }
    }

    fn validated_as(self) -> Option<Field> {
        match self {
            TaskField::Project => Some(Field::Project),
            TaskField::Title => Some(Field::Title),
            TaskField::Description => Some(Field::Description),
            TaskField::DueDate => Some(Field::DueDate),
            TaskField::Status => None,
        }
    }

    fn position(self) -> usize {
        TaskField::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }
}

#[derive(Debug)]
pub struct TaskFormState {
    pub current_field: TaskField,
    pub editing: bool,
    due_date_input: Option<DateInputState>,
}

impl Default for TaskFormState {
    fn default() -> Self {
        Self {
            current_field: TaskField::Title,
            editing: false,
            due_date_input: None,
        }
    }
}

impl TaskFormState {
    pub fn next_field(&mut self) {
        self.current_field = TaskField::ALL[(self.current_field.position() + 1) % TaskField::ALL.len()];
    }

    pub fn previous_field(&mut self) {
        let len = TaskField::ALL.len();
        self.current_field = TaskField::ALL[(self.current_field.position() + len - 1) % len];
    }

    fn start_editing(&mut self, form: &Form<Task>, today: NaiveDate) {
        self.editing = true;
        if self.current_field == TaskField::DueDate {
            let mut input = DateInputState::new(form.draft().due_date.unwrap_or(today));
            input.toggle_editing();
            self.due_date_input = Some(input);
        }
    }

    fn finish_editing(&mut self, form: &mut Form<Task>, keep: bool) {
        if let Some(input) = self.due_date_input.take() {
            if keep {
                form.draft_mut().due_date = Some(input.date);
                form.clear_violation(Field::DueDate);
            }
        }
        self.editing = false;
    }

    fn edit_text(&mut self, form: &mut Form<Task>, key: KeyCode) {
        let text = match self.current_field {
            TaskField::Title => &mut form.draft_mut().title,
            TaskField::Description => &mut form.draft_mut().description,
            _ => return,
        };
        match key {
            KeyCode::Char(c) => text.push(c),
            KeyCode::Backspace => {
                text.pop();
            }
            _ => return,
        }
        if let Some(field) = self.current_field.validated_as() {
            form.clear_violation(field);
        }
    }
}

/// Moves the draft's project through `projects`, wrapping at either end.
fn cycle_project(form: &mut Form<Task>, projects: &[Project], forward: bool) {
    if projects.is_empty() {
        return;
    }
    let current = form
        .draft()
        .project_id
        .as_ref()
        .and_then(|id| projects.iter().position(|p| &p.id == id));
    let next = match (current, forward) {
        (None, true) => 0,
        (None, false) => projects.len() - 1,
        (Some(i), true) => (i + 1) % projects.len(),
        (Some(i), false) => (i + projects.len() - 1) % projects.len(),
    };
    form.draft_mut().project_id = Some(projects[next].id.clone());
    form.clear_violation(Field::Project);
}

pub fn handle_key(
    state: &mut TaskFormState,
    form: &mut Form<Task>,
    projects: &[Project],
    key: KeyEvent,
    today: NaiveDate,
) -> Option<FormAction> {
    if state.editing {
        match key.code {
            KeyCode::Enter => state.finish_editing(form, true),
            KeyCode::Esc => state.finish_editing(form, false),
            code => match state.due_date_input.as_mut() {
                Some(input) => input.handle_input(code),
                None => state.edit_text(form, code),
            },
        }
        return None;
    }

    match (key.code, state.current_field) {
        (KeyCode::Esc, _) => return Some(FormAction::Cancel),
        (KeyCode::Char('s'), _) => return Some(FormAction::Submit),
        (KeyCode::Up, _) => state.previous_field(),
        (KeyCode::Down | KeyCode::Tab, _) => state.next_field(),
        (KeyCode::Left, TaskField::Project) => cycle_project(form, projects, false),
        (KeyCode::Right | KeyCode::Enter, TaskField::Project) => cycle_project(form, projects, true),
        (KeyCode::Left, TaskField::Status) => {
            let draft = form.draft_mut();
            draft.status = draft.status.previous();
        }
        (KeyCode::Right | KeyCode::Enter | KeyCode::Char(' '), TaskField::Status) => {
            let draft = form.draft_mut();
            draft.status = draft.status.next();
        }
        (KeyCode::Enter, _) => state.start_editing(form, today),
        _ => {}
    }
    None
}

pub fn render_task_form<B: Backend>(
    frame: &mut Frame<B>,
    area: Rect,
    state: &TaskFormState,
    form: &Form<Task>,
    projects: &[Project],
    busy: bool,
) {
    let popup = centered_rect(70, 70, area);
    frame.render_widget(Clear, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(3)].as_ref())
        .split(popup);

    let title = match form.mode() {
        FormMode::Create => "Create New Task",
        FormMode::Edit => "Edit Task",
    };

    let draft = form.draft();
    let items: Vec<ListItem> = TaskField::ALL
        .iter()
        .map(|&field| {
            let selected = field == state.current_field;
            let value = match field {
                TaskField::Project => match &draft.project_id {
                    Some(id) => projects
                        .iter()
                        .find(|p| &p.id == id)
                        .map(|p| format!("{} {}", p.title, if p.is_active() { "✓" } else { "(Inactive)" }))
                        .unwrap_or_else(|| id.to_string()),
                    None => "Select a project...".to_string(),
                },
                TaskField::Title => draft.title.clone(),
                TaskField::Description => draft.description.clone(),
                TaskField::Status => draft.status.label().to_string(),
                TaskField::DueDate => match (&state.due_date_input, draft.due_date) {
                    (Some(input), _) if selected => input.get_display_string(),
                    (_, Some(day)) => day.format("%Y-%m-%d").to_string(),
                    (_, None) => "Not set".to_string(),
                },
            };

            let label_style = if selected {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            let editing_here = selected && state.editing;
            let cursor = if editing_here && state.due_date_input.is_none() { "|" } else { "" };
            let value_style = if editing_here {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let mut lines = vec![Spans::from(vec![
                Span::styled(format!("{}: ", field.label()), label_style),
                Span::styled(format!("{}{}", value, cursor), value_style),
            ])];
            if let Some(message) = field.validated_as().and_then(|f| form.violation(f)) {
                lines.push(Spans::from(Span::styled(
                    format!("  {}", message),
                    Style::default().fg(Color::Red),
                )));
            }
            ListItem::new(lines)
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, chunks[0]);

    let help_text = if busy {
        match form.mode() {
            FormMode::Create => "Creating...",
            FormMode::Edit => "Updating...",
        }
    } else if state.editing && state.due_date_input.is_some() {
        "Digits - Type | Left/Right - Switch part | Up/Down - Step | Enter - Keep | Esc - Discard"
    } else if state.editing {
        "Enter/Esc - Done editing"
    } else {
        match state.current_field {
            TaskField::Project | TaskField::Status => {
                "Left/Right - Change | Up/Down - Navigate | S - Save | Esc - Cancel"
            }
            _ => "Enter - Edit field | Up/Down - Navigate | S - Save | Esc - Cancel",
        }
    };
    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::ListController;
    use crate::models::{ProjectId, ProjectStatus, TaskStatus};
    use crossterm::event::KeyModifiers;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn projects() -> Vec<Project> {
        ["p1", "p2"]
            .iter()
            .map(|id| Project {
                id: ProjectId::from(*id),
                title: id.to_uppercase(),
                description: String::new(),
                status: ProjectStatus::Active,
            })
            .collect()
    }

    #[test]
    fn project_field_cycles_through_the_list() {
        let mut controller = ListController::<Task>::new(Some(ProjectId::from("p1")));
        controller.begin_create();
        let form = controller.form_mut().unwrap();
        let mut state = TaskFormState::default();
        let projects = projects();

        state.previous_field();
        assert_eq!(state.current_field, TaskField::Project);
        handle_key(&mut state, form, &projects, press(KeyCode::Right), today());
        assert_eq!(form.draft().project_id, Some(ProjectId::from("p2")));
        handle_key(&mut state, form, &projects, press(KeyCode::Right), today());
        assert_eq!(form.draft().project_id, Some(ProjectId::from("p1")));
    }

    #[test]
    fn status_field_walks_the_cycle() {
        let mut controller = ListController::<Task>::new(None);
        controller.begin_create();
        let form = controller.form_mut().unwrap();
        let mut state = TaskFormState {
            current_field: TaskField::Status,
            ..TaskFormState::default()
        };

        assert_eq!(form.draft().status, TaskStatus::InProgress);
        handle_key(&mut state, form, &[], press(KeyCode::Right), today());
        assert_eq!(form.draft().status, TaskStatus::Completed);
        handle_key(&mut state, form, &[], press(KeyCode::Left), today());
        handle_key(&mut state, form, &[], press(KeyCode::Left), today());
        assert_eq!(form.draft().status, TaskStatus::Todo);
    }

    #[test]
    fn due_date_is_typed_and_kept_on_enter() {
        let mut controller = ListController::<Task>::new(None);
        controller.begin_create();
        let form = controller.form_mut().unwrap();
        let mut state = TaskFormState {
            current_field: TaskField::DueDate,
            ..TaskFormState::default()
        };

        handle_key(&mut state, form, &[], press(KeyCode::Enter), today());
        for c in "20260704".chars() {
            handle_key(&mut state, form, &[], press(KeyCode::Char(c)), today());
        }
        handle_key(&mut state, form, &[], press(KeyCode::Enter), today());

        assert!(!state.editing);
        assert_eq!(form.draft().due_date, NaiveDate::from_ymd_opt(2026, 7, 4));
    }

    #[test]
    fn escape_discards_the_date_being_typed() {
        let mut controller = ListController::<Task>::new(None);
        controller.begin_create();
        let form = controller.form_mut().unwrap();
        let mut state = TaskFormState {
            current_field: TaskField::DueDate,
            ..TaskFormState::default()
        };

        handle_key(&mut state, form, &[], press(KeyCode::Enter), today());
        handle_key(&mut state, form, &[], press(KeyCode::Esc), today());
        assert_eq!(form.draft().due_date, None);
    }
}
