use std::time::Duration;

use tracing::debug;

use super::{Command, Completion, ListController};
use crate::models::{Project, ProjectId, Task};

/// First active project, else the first one listed.
pub fn default_selection(projects: &[Project]) -> Option<&Project> {
    projects.iter().find(|p| p.is_active()).or_else(|| projects.first())
}

/// The task screen: a project list used as a selector plus the task list
/// scoped to whichever project is selected.
#[derive(Debug)]
pub struct TaskBoard {
    pub projects: ListController<Project>,
    pub tasks: ListController<Task>,
    auto_selected: bool,
}

impl Default for TaskBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskBoard {
    pub fn new() -> Self {
        Self {
            projects: ListController::new(Some(())),
            tasks: ListController::new(None),
            auto_selected: false,
        }
    }

    pub fn with_success_ttl(mut self, ttl: Duration) -> Self {
        self.projects = self.projects.with_success_ttl(ttl);
        self.tasks = self.tasks.with_success_ttl(ttl);
        self
    }

    pub fn selected_project_id(&self) -> Option<&ProjectId> {
        self.tasks.scope()
    }

    pub fn selected_project(&self) -> Option<&Project> {
        let id = self.selected_project_id()?;
        self.projects.items().iter().find(|p| &p.id == id)
    }

    pub fn select_project(&mut self, id: Option<ProjectId>) -> Option<Command<Task>> {
        self.tasks.select_scope(id)
    }

    /// Applies a project-list completion. The first time a non-empty list
    /// arrives with nothing selected, a default project is picked and its
    /// task fetch returned. A selection whose project has disappeared from
    /// the list is replaced the same way.
    pub fn projects_loaded(&mut self, completion: Completion<Project>) -> Option<Command<Task>> {
        // Only fetches are issued through the selector, so there is no follow-up.
        let _ = self.projects.complete(completion);

        match self.tasks.scope() {
            Some(_) if self.selected_project().is_some() => None,
            Some(gone) => {
                debug!(project = %gone, "selected project no longer listed");
                let pick = default_selection(self.projects.items()).map(|p| p.id.clone());
                self.select_project(pick)
            }
            None if self.auto_selected => None,
            None => {
                let pick = default_selection(self.projects.items())?.id.clone();
                debug!(project = %pick, "selecting default project");
                self.auto_selected = true;
                self.select_project(Some(pick))
            }
        }
    }

    /// Moves the selection through "none" followed by every listed project.
    pub fn cycle_project(&mut self, forward: bool) -> Option<Command<Task>> {
        let ids: Vec<Option<ProjectId>> = std::iter::once(None)
            .chain(self.projects.items().iter().map(|p| Some(p.id.clone())))
            .collect();
        let current = ids
            .iter()
            .position(|id| id.as_ref() == self.selected_project_id())
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % ids.len()
        } else {
            (current + ids.len() - 1) % ids.len()
        };
        self.select_project(ids[next].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProjectStatus;

    fn project(id: &str, status: ProjectStatus) -> Project {
        Project {
            id: ProjectId::from(id),
            title: id.to_uppercase(),
            description: String::new(),
            status,
        }
    }

    fn loaded(board: &mut TaskBoard, projects: Vec<Project>) -> Option<Command<Task>> {
        let Some(Command::Fetch(ticket)) = board.projects.load() else {
            panic!("project list should always be fetchable");
        };
        board.projects_loaded(Completion::Fetched {
            ticket,
            result: Ok(projects),
        })
    }

    #[test]
    fn prefers_first_active_project() {
        let projects = vec![
            project("p1", ProjectStatus::Inactive),
            project("p2", ProjectStatus::Active),
        ];
        assert_eq!(default_selection(&projects).map(|p| p.id.as_str()), Some("p2"));

        let dormant = vec![project("p1", ProjectStatus::Inactive)];
        assert_eq!(default_selection(&dormant).map(|p| p.id.as_str()), Some("p1"));
        assert!(default_selection(&[]).is_none());
    }

    #[test]
    fn first_load_selects_and_fetches_tasks() {
        let mut board = TaskBoard::new();
        let command = loaded(&mut board, vec![project("p1", ProjectStatus::Active)]);

        match command {
            Some(Command::Fetch(ticket)) => assert_eq!(ticket.scope, ProjectId::from("p1")),
            other => panic!("expected task fetch, got {:?}", other),
        }
        assert_eq!(board.selected_project().map(|p| p.title.as_str()), Some("P1"));
    }

    #[test]
    fn later_loads_keep_the_user_choice() {
        let mut board = TaskBoard::new();
        loaded(&mut board, vec![project("p1", ProjectStatus::Active)]);
        board.select_project(None);

        let command = loaded(&mut board, vec![project("p1", ProjectStatus::Active)]);
        assert!(command.is_none());
        assert!(board.selected_project_id().is_none());
    }

    #[test]
    fn removed_selection_is_replaced_on_reload() {
        let mut board = TaskBoard::new();
        loaded(
            &mut board,
            vec![project("p1", ProjectStatus::Active), project("p2", ProjectStatus::Active)],
        );
        assert_eq!(board.selected_project_id(), Some(&ProjectId::from("p1")));

        let command = loaded(&mut board, vec![project("p2", ProjectStatus::Active)]);

        match command {
            Some(Command::Fetch(ticket)) => assert_eq!(ticket.scope, ProjectId::from("p2")),
            other => panic!("expected task fetch for p2, got {:?}", other),
        }
        assert_eq!(board.selected_project().map(|p| p.id.as_str()), Some("p2"));
    }

    #[test]
    fn removing_the_last_project_clears_the_selection() {
        let mut board = TaskBoard::new();
        loaded(&mut board, vec![project("p1", ProjectStatus::Active)]);

        assert!(loaded(&mut board, vec![]).is_none());
        assert!(board.selected_project_id().is_none());
        assert!(board.tasks.items().is_empty());
    }

    #[test]
    fn empty_first_load_defers_the_pick() {
        let mut board = TaskBoard::new();
        assert!(loaded(&mut board, vec![]).is_none());
        assert!(loaded(&mut board, vec![project("p3", ProjectStatus::Active)]).is_some());
    }

    #[test]
    fn cycling_passes_through_no_selection() {
        let mut board = TaskBoard::new();
        loaded(
            &mut board,
            vec![project("p1", ProjectStatus::Active), project("p2", ProjectStatus::Active)],
        );
        assert_eq!(board.selected_project_id(), Some(&ProjectId::from("p1")));

        board.cycle_project(true);
        assert_eq!(board.selected_project_id(), Some(&ProjectId::from("p2")));
        assert!(board.cycle_project(true).is_none());
        assert!(board.selected_project_id().is_none());
        board.cycle_project(false);
        assert_eq!(board.selected_project_id(), Some(&ProjectId::from("p2")));
    }
}
