pub mod components;
pub mod dashboard;
pub mod project_form;
pub mod projects;
pub mod shell;
pub mod task_form;
pub mod tasks;
