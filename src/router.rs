use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Screens reachable from the sidebar, addressed by URL-style path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Dashboard,
    Projects,
    Tasks,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("no screen is mounted at '{0}' (expected /dashboard, /projects or /tasks)")]
pub struct UnknownRoute(pub String);

impl Route {
    /// Sidebar order.
    pub const MENU: [Route; 3] = [Route::Dashboard, Route::Projects, Route::Tasks];

    pub fn path(self) -> &'static str {
        match self {
            Route::Dashboard => "/dashboard",
            Route::Projects => "/projects",
            Route::Tasks => "/tasks",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::Projects => "Projects",
            Route::Tasks => "Tasks",
        }
    }

    pub fn menu_index(self) -> usize {
        Route::MENU.iter().position(|r| *r == self).unwrap_or(0)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Route {
    type Err = UnknownRoute;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = s.trim();
        let path = if path.len() > 1 { path.trim_end_matches('/') } else { path };
        match path {
            "/" | "/dashboard" => Ok(Route::Dashboard),
            "/projects" => Ok(Route::Projects),
            "/tasks" => Ok(Route::Tasks),
            other => Err(UnknownRoute(other.to_string())),
        }
    }
}
