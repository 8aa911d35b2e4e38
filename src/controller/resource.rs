use std::fmt;

use chrono::NaiveDate;

use super::validation::{FormMode, Violations, validate_project, validate_task};
use crate::models::{Project, ProjectDraft, ProjectId, Task, TaskDraft, TaskId, TaskStatus};

/// A record type a [`ListController`](super::ListController) can manage.
pub trait Resource: Clone + fmt::Debug + Send + Sync + 'static {
    type Id: Clone + PartialEq + fmt::Debug + fmt::Display + Send + Sync + 'static;
    /// What a list fetch is parameterized by: nothing for projects, the
    /// owning project for tasks.
    type Scope: Clone + PartialEq + fmt::Debug + Send + Sync + 'static;
    type Draft: Clone + fmt::Debug + Default + Send + Sync + 'static;

    /// Capitalized noun used in banner messages.
    const NOUN: &'static str;
    const SINGULAR: &'static str;
    const PLURAL: &'static str;

    fn id(&self) -> &Self::Id;
    fn title(&self) -> &str;
    fn description(&self) -> &str;
    fn status_name(&self) -> &'static str;

    fn blank_draft(scope: Option<&Self::Scope>) -> Self::Draft;
    fn to_draft(&self, scope: Option<&Self::Scope>) -> Self::Draft;
    /// Full record to send on update: identity from `self`, fields from the draft.
    fn apply_draft(&self, draft: &Self::Draft) -> Self;
    fn with_next_status(&self) -> Self;
    fn validate(draft: &Self::Draft, mode: FormMode, today: NaiveDate) -> Violations;
}

impl Resource for Project {
    type Id = ProjectId;
    type Scope = ();
    type Draft = ProjectDraft;

    const NOUN: &'static str = "Project";
    const SINGULAR: &'static str = "project";
    const PLURAL: &'static str = "projects";

    fn id(&self) -> &ProjectId {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn status_name(&self) -> &'static str {
        self.status.as_str()
    }

    fn blank_draft(_scope: Option<&()>) -> ProjectDraft {
        ProjectDraft::default()
    }

    fn to_draft(&self, _scope: Option<&()>) -> ProjectDraft {
        ProjectDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status,
        }
    }

    fn apply_draft(&self, draft: &ProjectDraft) -> Self {
        Project {
            id: self.id.clone(),
            title: draft.title.clone(),
            description: draft.description.clone(),
            status: draft.status,
        }
    }

    fn with_next_status(&self) -> Self {
        Project {
            status: self.status.toggled(),
            ..self.clone()
        }
    }

    fn validate(draft: &ProjectDraft, _mode: FormMode, _today: NaiveDate) -> Violations {
        validate_project(draft)
    }
}

impl Resource for Task {
    type Id = TaskId;
    type Scope = ProjectId;
    type Draft = TaskDraft;

    const NOUN: &'static str = "Task";
    const SINGULAR: &'static str = "task";
    const PLURAL: &'static str = "tasks";

    fn id(&self) -> &TaskId {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn status_name(&self) -> &'static str {
        self.status.as_str()
    }

    fn blank_draft(scope: Option<&ProjectId>) -> TaskDraft {
        TaskDraft {
            status: TaskStatus::InProgress,
            project_id: scope.cloned(),
            ..TaskDraft::default()
        }
    }

    fn to_draft(&self, scope: Option<&ProjectId>) -> TaskDraft {
        TaskDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status,
            due_date: self.due_date,
            project_id: self.project_id.clone().or_else(|| scope.cloned()),
        }
    }

    fn apply_draft(&self, draft: &TaskDraft) -> Self {
        Task {
            id: self.id.clone(),
            title: draft.title.clone(),
            description: draft.description.clone(),
            status: draft.status,
            due_date: draft.due_date,
            project_id: draft.project_id.clone(),
        }
    }

    fn with_next_status(&self) -> Self {
        Task {
            status: self.status.next(),
            ..self.clone()
        }
    }

    fn validate(draft: &TaskDraft, mode: FormMode, today: NaiveDate) -> Violations {
        validate_task(draft, mode, today)
    }
}
