//! Client-side CRUD state machine shared by the project and task screens.
//!
//! Every user intent is a transition on [`ListController`] that may hand back
//! a [`Command`] describing the one network call it needs. Whoever owns the
//! runtime executes the command (see [`execute`]) and feeds the resulting
//! [`Completion`] back through [`ListController::complete`].

mod driver;
mod list;
mod resource;
mod selection;
mod validation;

use std::time::Instant;

use crate::api::ApiError;

pub use driver::execute;
pub use list::{Form, ListController};
pub use resource::Resource;
pub use selection::{TaskBoard, default_selection};
pub use validation::{Field, FormMode, Violations, validate_project, validate_task};

/// What the presentation layer shows in its banner.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Idle,
    Loading,
    Error(String),
    Success { message: String, shown_at: Instant },
}

impl Status {
    pub fn message(&self) -> Option<&str> {
        match self {
            Status::Error(message) | Status::Success { message, .. } => Some(message),
            Status::Idle | Status::Loading => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Status::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Status::Error(_))
    }
}

/// A fetch is tagged with the generation it was issued under so a late
/// reply for a superseded selection can be recognised and dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket<R: Resource> {
    pub generation: u64,
    pub scope: R::Scope,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateIntent {
    /// Full replace from the edit form.
    Edit,
    /// Status badge click; carries the status being requested.
    Toggle { status: &'static str },
}

/// A network effect requested by a controller transition.
#[derive(Debug, Clone)]
pub enum Command<R: Resource> {
    Fetch(FetchTicket<R>),
    Create(R::Draft),
    Update { record: R, intent: UpdateIntent },
    Delete(R::Id),
}

/// The outcome of executing a [`Command`].
#[derive(Debug)]
pub enum Completion<R: Resource> {
    Fetched {
        ticket: FetchTicket<R>,
        result: Result<Vec<R>, ApiError>,
    },
    Created(Result<(), ApiError>),
    Updated {
        intent: UpdateIntent,
        result: Result<(), ApiError>,
    },
    Deleted {
        id: R::Id,
        result: Result<(), ApiError>,
    },
}
