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
use crate::models::Project;
use crate::ui::components::popup::centered_rect;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ProjectField {
    Title,
    Description,
    Status,
}

impl ProjectField {
    const ALL: [ProjectField; 3] = [ProjectField::Title, ProjectField::Description, ProjectField::Status];

    fn label(self) -> &'static str {
        match self {
            ProjectField::Title => "Title",
            ProjectField::Description => "Description",
            ProjectField::Status => "Status",
        }
    }

    fn validated_as(self) -> Option<Field> {
        match self {
            ProjectField::Title => Some(Field::Title),
            ProjectField::Description => Some(Field::Description),
            ProjectField::Status => None,
        }
    }
}

pub enum FormAction {
    Cancel,
    Submit,
}

/// Cursor over the project form; the field values live in the controller's draft.
#[derive(Debug)]
pub struct ProjectFormState {
    pub current_field: ProjectField,
    pub editing: bool,
}

impl Default for ProjectFormState {
    fn default() -> Self {
        Self {
            current_field: ProjectField::Title,
            editing: false,
        }
    }
}

impl ProjectFormState {
    pub fn next_field(&mut self) {
        self.current_field = match self.current_field {
            ProjectField::Title => ProjectField::Description,
            ProjectField::Description => ProjectField::Status,
            ProjectField::Status => ProjectField::Title,
        };
    }

    pub fn previous_field(&mut self) {
        self.current_field = match self.current_field {
            ProjectField::Title => ProjectField::Status,
            ProjectField::Description => ProjectField::Title,
            ProjectField::Status => ProjectField::Description,
        };
    }

    fn edit_current_field(&mut self, form: &mut Form<Project>, key: KeyCode) {
        let text = match self.current_field {
            ProjectField::Title => &mut form.draft_mut().title,
            ProjectField::Description => &mut form.draft_mut().description,
            ProjectField::Status => return,
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

pub fn handle_key(state: &mut ProjectFormState, form: &mut Form<Project>, key: KeyEvent) -> Option<FormAction> {
    if state.editing {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => state.editing = false,
            code => state.edit_current_field(form, code),
        }
        return None;
    }

    match key.code {
        KeyCode::Esc => return Some(FormAction::Cancel),
        KeyCode::Char('s') => return Some(FormAction::Submit),
        KeyCode::Up => state.previous_field(),
        KeyCode::Down | KeyCode::Tab => state.next_field(),
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right
            if state.current_field == ProjectField::Status =>
        {
            let draft = form.draft_mut();
            draft.status = draft.status.toggled();
        }
        KeyCode::Enter => state.editing = true,
        _ => {}
    }
    None
}

pub fn render_project_form<B: Backend>(
    frame: &mut Frame<B>,
    area: Rect,
    state: &ProjectFormState,
    form: &Form<Project>,
    busy: bool,
) {
    let popup = centered_rect(70, 60, area);
    frame.render_widget(Clear, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(3)].as_ref())
        .split(popup);

    let title = match form.mode() {
        FormMode::Create => "Create New Project",
        FormMode::Edit => "Edit Project",
    };

    let draft = form.draft();
    let items: Vec<ListItem> = ProjectField::ALL
        .iter()
        .map(|&field| {
            let value = match field {
                ProjectField::Title => draft.title.clone(),
                ProjectField::Description => draft.description.clone(),
                ProjectField::Status => draft.status.label().to_string(),
            };
            let selected = field == state.current_field;
            let label_style = if selected {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            let value_style = if selected && state.editing {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let cursor = if selected && state.editing { "|" } else { "" };

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
    } else if state.editing {
        "Enter/Esc - Done editing"
    } else if state.current_field == ProjectField::Status {
        "Enter - Toggle status | Up/Down - Navigate | S - Save | Esc - Cancel"
    } else {
        "Enter - Edit field | Up/Down - Navigate | S - Save | Esc - Cancel"
    };
    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, chunks[1]);
}
