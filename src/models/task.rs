use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::ProjectId;
use super::wire::{ProjectRef, parse_date_prefix, serialize_day};

/// Server-assigned task identifier (`_id` on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId(s.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Completed];

    /// Next step in the todo -> inprogress -> completed -> todo cycle.
    pub fn next(self) -> Self {
        match self {
            TaskStatus::Todo => TaskStatus::InProgress,
            TaskStatus::InProgress => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::Todo,
        }
    }

    pub fn previous(self) -> Self {
        self.next().next()
    }

    /// Reads a status as the server spells it. Unknown or missing values
    /// fall back to `Todo`.
    pub fn from_wire(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("inprogress") => TaskStatus::InProgress,
            Some("completed") => TaskStatus::Completed,
            _ => TaskStatus::Todo,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "inprogress",
            TaskStatus::Completed => "completed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTask")]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    #[serde(rename = "dueDate", serialize_with = "serialize_day")]
    pub due_date: Option<NaiveDate>,
    #[serde(rename = "projectId", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ProjectId>,
}

impl Task {
    /// Due strictly before `today`; a task due today is not overdue.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_date.is_some_and(|due| due < today)
    }
}

pub fn format_due_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(day) => day.format("%b %-d, %Y").to_string(),
        None => "N/A".to_string(),
    }
}

/// Fields of the task form. The project is carried separately from the
/// create body because it goes into the request path.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub project_id: Option<ProjectId>,
}

impl TaskDraft {
    /// Body of a create call; the project travels in the path instead.
    pub fn create_body(&self) -> NewTask<'_> {
        NewTask {
            title: &self.title,
            description: &self.description,
            status: self.status,
            due_date: self.due_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NewTask<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub status: TaskStatus,
    #[serde(rename = "dueDate", serialize_with = "serialize_day")]
    pub due_date: Option<NaiveDate>,
}

#[derive(Deserialize)]
struct RawTask {
    #[serde(rename = "_id", default)]
    mongo_id: Option<TaskId>,
    #[serde(default)]
    id: Option<TaskId>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(rename = "dueDate", default)]
    due_date: Option<String>,
    #[serde(rename = "projectId", default)]
    project_id: Option<ProjectRef>,
}

impl TryFrom<RawTask> for Task {
    type Error = String;

    fn try_from(raw: RawTask) -> Result<Self, Self::Error> {
        let id = raw
            .mongo_id
            .or(raw.id)
            .ok_or_else(|| format!("task '{}' has no _id", raw.title))?;

        let due_date = match raw.due_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(value) => match parse_date_prefix(value) {
                Ok(day) => Some(day),
                Err(err) => {
                    warn!(task = %id, due_date = value, error = %err, "ignoring unreadable due date");
                    None
                }
            },
        };

        Ok(Task {
            id,
            title: raw.title,
            description: raw.description,
            status: TaskStatus::from_wire(raw.status.as_deref()),
            due_date,
            project_id: raw.project_id.and_then(ProjectRef::into_id),
        })
    }
}
