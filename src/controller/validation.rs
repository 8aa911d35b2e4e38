use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{ProjectDraft, TaskDraft};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Title,
    Description,
    DueDate,
    Project,
}

impl Field {
    /// Wire name of the field.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Description => "description",
            Field::DueDate => "dueDate",
            Field::Project => "projectId",
        }
    }
}

/// Field -> message. Empty means the draft may be submitted.
pub type Violations = BTreeMap<Field, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

fn require_text(violations: &mut Violations, field: Field, value: &str, message: &str) {
    if value.trim().is_empty() {
        violations.insert(field, message.to_string());
    }
}

pub fn validate_project(draft: &ProjectDraft) -> Violations {
    let mut violations = Violations::new();
    require_text(&mut violations, Field::Title, &draft.title, "Title is required");
    require_text(&mut violations, Field::Description, &draft.description, "Description is required");
    violations
}

/// The past-date rule only applies when creating; an existing task that has
/// slipped past its due date can still be edited.
pub fn validate_task(draft: &TaskDraft, mode: FormMode, today: NaiveDate) -> Violations {
    let mut violations = Violations::new();
    require_text(&mut violations, Field::Title, &draft.title, "Title is required");
    require_text(&mut violations, Field::Description, &draft.description, "Description is required");

    match draft.due_date {
        None => {
            violations.insert(Field::DueDate, "Due date is required".to_string());
        }
        Some(due) if mode == FormMode::Create && due < today => {
            violations.insert(Field::DueDate, "Due date cannot be in the past".to_string());
        }
        Some(_) => {}
    }

    if draft.project_id.as_ref().is_none_or(|id| id.is_blank()) {
        violations.insert(Field::Project, "Project is required".to_string());
    }

    violations
}
