use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info};
use tui::{Frame, Terminal, backend::Backend};

use crate::api::{ApiClient, RemoteCollection};
use crate::controller::{Command, Completion, Resource, execute};
use crate::models::{Project, Task};
use crate::router::Route;
use crate::ui::{
    dashboard::render_dashboard,
    projects::{self, ProjectAction, ProjectsState, render_projects},
    shell::{Focus, LOGOUT_INDEX, render_shell},
    tasks::{self, TaskAction, TasksState, render_tasks},
};

const TICK_RATE: Duration = Duration::from_millis(250);

/// Everything the main loop reacts to.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Tick,
    /// Result of a projects-screen command.
    Projects(Completion<Project>),
    /// Result of a fetch for the task screen's project selector.
    Selector(Completion<Project>),
    Tasks(Completion<Task>),
}

// Main application state
pub struct App {
    client: Arc<ApiClient>,
    events: UnboundedSender<AppEvent>,
    route: Route,
    focus: Focus,
    sidebar_index: usize,
    projects: ProjectsState,
    tasks: TasksState,
    should_quit: bool,
}

impl App {
    pub fn new(
        client: Arc<ApiClient>,
        events: UnboundedSender<AppEvent>,
        route: Route,
        success_ttl: Duration,
    ) -> Self {
        Self {
            client,
            events,
            route,
            focus: Focus::Content,
            sidebar_index: route.menu_index(),
            projects: ProjectsState::new(success_ttl),
            tasks: TasksState::new(success_ttl),
            should_quit: false,
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn projects(&self) -> &ProjectsState {
        &self.projects
    }

    pub fn tasks(&self) -> &TasksState {
        &self.tasks
    }

    /// Mounts the initial route.
    pub fn start(&mut self) {
        self.navigate(self.route);
    }

    /// Runs `command` on the runtime and posts its completion back as an event.
    fn spawn<R, F>(&self, command: Command<R>, wrap: F)
    where
        R: Resource,
        ApiClient: RemoteCollection<R>,
        F: FnOnce(Completion<R>) -> AppEvent + Send + 'static,
    {
        let client = Arc::clone(&self.client);
        let events = self.events.clone();
        tokio::spawn(async move {
            let completion = execute(client.as_ref(), command).await;
            // The receiver is only gone once the app is shutting down.
            let _ = events.send(wrap(completion));
        });
    }

    fn navigate(&mut self, route: Route) {
        info!(route = %route, "navigating");
        self.route = route;
        self.sidebar_index = route.menu_index();
        self.focus = Focus::Content;

        match route {
            Route::Dashboard | Route::Projects => {
                if let Some(command) = self.projects.controller.load() {
                    self.spawn(command, AppEvent::Projects);
                }
            }
            Route::Tasks => {
                if let Some(command) = self.tasks.board.projects.load() {
                    self.spawn(command, AppEvent::Selector);
                }
                if let Some(command) = self.tasks.board.tasks.load() {
                    self.spawn(command, AppEvent::Tasks);
                }
            }
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Tick => {
                let now = Instant::now();
                self.projects.controller.tick(now);
                self.tasks.board.projects.tick(now);
                self.tasks.board.tasks.tick(now);
            }
            AppEvent::Projects(completion) => {
                if let Some(command) = self.projects.controller.complete(completion) {
                    self.spawn(command, AppEvent::Projects);
                }
            }
            AppEvent::Selector(completion) => {
                if let Some(command) = self.tasks.board.projects_loaded(completion) {
                    self.spawn(command, AppEvent::Tasks);
                }
            }
            AppEvent::Tasks(completion) => {
                if let Some(command) = self.tasks.board.tasks.complete(completion) {
                    self.spawn(command, AppEvent::Tasks);
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.focus {
            Focus::Sidebar => self.handle_sidebar_key(key),
            Focus::Content => self.handle_content_key(key),
        }
    }

    fn handle_sidebar_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.sidebar_index = (self.sidebar_index + LOGOUT_INDEX) % (LOGOUT_INDEX + 1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.sidebar_index = (self.sidebar_index + 1) % (LOGOUT_INDEX + 1);
            }
            KeyCode::Enter => match Route::MENU.get(self.sidebar_index) {
                Some(route) => self.navigate(*route),
                None => {
                    info!("logout requested");
                    self.should_quit = true;
                }
            },
            KeyCode::Tab | KeyCode::Esc => self.focus = Focus::Content,
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_content_key(&mut self, key: KeyEvent) {
        match self.route {
            Route::Dashboard => match key.code {
                KeyCode::Char('r') => {
                    if let Some(command) = self.projects.controller.load() {
                        self.spawn(command, AppEvent::Projects);
                    }
                }
                KeyCode::Tab | KeyCode::Esc | KeyCode::Char('q') => self.focus = Focus::Sidebar,
                _ => {}
            },
            Route::Projects => match projects::handle_key(&mut self.projects, key) {
                Some(ProjectAction::Back) => self.focus = Focus::Sidebar,
                Some(ProjectAction::Run(command)) => self.spawn(command, AppEvent::Projects),
                None => {}
            },
            Route::Tasks => match tasks::handle_key(&mut self.tasks, key) {
                Some(TaskAction::Back) => self.focus = Focus::Sidebar,
                Some(TaskAction::Run(command)) => self.spawn(command, AppEvent::Tasks),
                Some(TaskAction::RunProjects(command)) => self.spawn(command, AppEvent::Selector),
                None => {}
            },
        }
    }

    pub fn render<B: Backend>(&mut self, frame: &mut Frame<B>) {
        let area = render_shell(frame, self.route, self.focus, self.sidebar_index);
        match self.route {
            Route::Dashboard => render_dashboard(frame, area, &self.projects.controller),
            Route::Projects => render_projects(frame, area, &mut self.projects),
            Route::Tasks => render_tasks(frame, area, &mut self.tasks),
        }
    }
}

/// Forwards terminal key presses from a blocking reader thread.
pub fn spawn_input(events: UnboundedSender<AppEvent>) {
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if events.send(AppEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    error!(error = %err, "terminal input failed");
                    break;
                }
            }
        }
    });
}

/// Drives banner expiry.
pub fn spawn_ticker(events: UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(TICK_RATE);
        loop {
            interval.tick().await;
            if events.send(AppEvent::Tick).is_err() {
                break;
            }
        }
    });
}

pub async fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    mut events: UnboundedReceiver<AppEvent>,
) -> Result<()> {
    loop {
        // Render current screen
        terminal.draw(|f| app.render(f))?;

        let Some(event) = events.recv().await else {
            debug!("event channel closed");
            break;
        };
        app.handle_event(event);

        if app.should_quit() {
            break;
        }
    }

    Ok(())
}
