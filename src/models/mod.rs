mod project;
mod task;
mod wire;

pub use project::{Project, ProjectDraft, ProjectId, ProjectStatus};
pub use task::{NewTask, Task, TaskDraft, TaskId, TaskStatus, format_due_date};
pub use wire::{ListBody, parse_date_prefix};
