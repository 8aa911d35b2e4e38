use std::time::{Duration, Instant};

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use super::validation::{Field, FormMode, Violations};
use super::{Command, Completion, FetchTicket, Resource, Status, UpdateIntent};
use crate::api::ApiError;

pub const DEFAULT_SUCCESS_TTL: Duration = Duration::from_secs(3);

/// The create/edit form. `editing` is `None` in create mode.
#[derive(Debug, Clone)]
pub struct Form<R: Resource> {
    editing: Option<R>,
    draft: R::Draft,
    violations: Violations,
}

impl<R: Resource> Form<R> {
    pub fn mode(&self) -> FormMode {
        if self.editing.is_some() {
            FormMode::Edit
        } else {
            FormMode::Create
        }
    }

    pub fn editing(&self) -> Option<&R> {
        self.editing.as_ref()
    }

    pub fn draft(&self) -> &R::Draft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut R::Draft {
        &mut self.draft
    }

    pub fn violations(&self) -> &Violations {
        &self.violations
    }

    pub fn violation(&self, field: Field) -> Option<&str> {
        self.violations.get(&field).map(String::as_str)
    }

    /// Typing into a field drops its stale message; the rest wait for the
    /// next submit.
    pub fn clear_violation(&mut self, field: Field) {
        self.violations.remove(&field);
    }
}

/// Owns the client-side view of one remote collection.
///
/// `items` is only ever replaced by a completed fetch. Mutations never touch
/// it directly; a successful mutation always schedules a fresh [`load`].
///
/// [`load`]: ListController::load
#[derive(Debug)]
pub struct ListController<R: Resource> {
    items: Vec<R>,
    status: Status,
    form: Option<Form<R>>,
    search_query: String,
    pending_delete: Option<R>,
    scope: Option<R::Scope>,
    fetch_generation: u64,
    success_ttl: Duration,
}

impl<R: Resource> ListController<R> {
    pub fn new(scope: Option<R::Scope>) -> Self {
        Self {
            items: Vec::new(),
            status: Status::Idle,
            form: None,
            search_query: String::new(),
            pending_delete: None,
            scope,
            fetch_generation: 0,
            success_ttl: DEFAULT_SUCCESS_TTL,
        }
    }

    pub fn with_success_ttl(mut self, ttl: Duration) -> Self {
        self.success_ttl = ttl;
        self
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn form(&self) -> Option<&Form<R>> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut Form<R>> {
        self.form.as_mut()
    }

    pub fn is_form_open(&self) -> bool {
        self.form.is_some()
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn search_query_mut(&mut self) -> &mut String {
        &mut self.search_query
    }

    pub fn pending_delete(&self) -> Option<&R> {
        self.pending_delete.as_ref()
    }

    pub fn scope(&self) -> Option<&R::Scope> {
        self.scope.as_ref()
    }

    /// Items whose title or description contains the search query,
    /// ignoring case. Computed on every call.
    pub fn filtered_items(&self) -> Vec<&R> {
        let needle = self.search_query.to_lowercase();
        self.items
            .iter()
            .filter(|item| {
                needle.is_empty()
                    || item.title().to_lowercase().contains(&needle)
                    || item.description().to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Requests the full collection for the current scope. Returns `None`
    /// when there is no scope to fetch for.
    pub fn load(&mut self) -> Option<Command<R>> {
        let scope = self.scope.clone()?;
        self.fetch_generation += 1;

        // A refresh that follows a successful mutation keeps the banner up.
        if !matches!(self.status, Status::Success { .. }) {
            self.status = Status::Loading;
        }

        debug!(
            resource = R::PLURAL,
            generation = self.fetch_generation,
            ?scope,
            "fetching collection"
        );
        Some(Command::Fetch(FetchTicket {
            generation: self.fetch_generation,
            scope,
        }))
    }

    /// Replaces the scope (the selected project for tasks). Items from the
    /// previous scope are dropped immediately and any fetch still in flight
    /// for it will be discarded on arrival.
    pub fn select_scope(&mut self, scope: Option<R::Scope>) -> Option<Command<R>> {
        debug!(resource = R::PLURAL, ?scope, "scope changed");
        self.scope = scope;
        self.items.clear();
        self.pending_delete = None;
        self.fetch_generation += 1;
        if self.status.is_loading() {
            self.status = Status::Idle;
        }
        self.load()
    }

    pub fn begin_create(&mut self) {
        self.open_form(None, R::blank_draft(self.scope.as_ref()));
    }

    pub fn begin_edit(&mut self, record: &R) {
        let draft = record.to_draft(self.scope.as_ref());
        self.open_form(Some(record.clone()), draft);
    }

    fn open_form(&mut self, editing: Option<R>, draft: R::Draft) {
        self.form = Some(Form {
            editing,
            draft,
            violations: Violations::new(),
        });
        if self.status.is_error() {
            self.status = Status::Idle;
        }
    }

    pub fn close_form(&mut self) {
        self.form = None;
        if self.status.is_error() {
            self.status = Status::Idle;
        }
    }

    /// Validates against today's local date and submits.
    pub fn submit(&mut self) -> Option<Command<R>> {
        self.submit_on(chrono::Local::now().date_naive())
    }

    /// Validates the open form's draft and, if it passes, issues a create or
    /// a full-record update. A failing draft never reaches the network.
    pub fn submit_on(&mut self, today: NaiveDate) -> Option<Command<R>> {
        let form = self.form.as_mut()?;

        let violations = R::validate(&form.draft, form.mode(), today);
        if !violations.is_empty() {
            debug!(resource = R::SINGULAR, fields = violations.len(), "form rejected");
            form.violations = violations;
            return None;
        }
        form.violations.clear();

        let command = match &form.editing {
            Some(record) => Command::Update {
                record: record.apply_draft(&form.draft),
                intent: UpdateIntent::Edit,
            },
            None => Command::Create(form.draft.clone()),
        };
        self.status = Status::Loading;
        Some(command)
    }

    /// Asks for the record's next status. The displayed record is left as is
    /// until a fetch confirms the change.
    pub fn toggle_status(&mut self, record: &R) -> Command<R> {
        if self.status.is_error() {
            self.status = Status::Idle;
        }
        let next = record.with_next_status();
        Command::Update {
            intent: UpdateIntent::Toggle {
                status: next.status_name(),
            },
            record: next,
        }
    }

    pub fn request_delete(&mut self, record: &R) {
        self.pending_delete = Some(record.clone());
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Second step of deletion. Without a prior [`request_delete`] this does
    /// nothing.
    ///
    /// [`request_delete`]: ListController::request_delete
    pub fn confirm_delete(&mut self) -> Option<Command<R>> {
        let id = self.pending_delete.as_ref()?.id().clone();
        self.status = Status::Loading;
        Some(Command::Delete(id))
    }

    /// Reverts an expired success banner to idle. Returns whether anything
    /// changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match &self.status {
            Status::Success { shown_at, .. }
                if now.saturating_duration_since(*shown_at) >= self.success_ttl =>
            {
                self.status = Status::Idle;
                true
            }
            _ => false,
        }
    }

    /// Applies the outcome of a command, returning the follow-up fetch a
    /// successful mutation calls for.
    pub fn complete(&mut self, completion: Completion<R>) -> Option<Command<R>> {
        match completion {
            Completion::Fetched { ticket, result } => {
                self.apply_fetch(ticket, result);
                None
            }
            Completion::Created(result) => self.finish_submit(result, "created"),
            Completion::Updated {
                intent: UpdateIntent::Edit,
                result,
            } => self.finish_submit(result, "updated"),
            Completion::Updated {
                intent: UpdateIntent::Toggle { status },
                result,
            } => match result {
                Ok(()) => {
                    info!(resource = R::SINGULAR, status, "status changed");
                    self.show_success(format!("{} status changed to {}", R::NOUN, status));
                    self.load()
                }
                Err(err) => {
                    warn!(resource = R::SINGULAR, error = %err, "status change failed");
                    self.status = Status::Error(err.message_or("Failed to update status"));
                    None
                }
            },
            Completion::Deleted { id, result } => match result {
                Ok(()) => {
                    info!(resource = R::SINGULAR, %id, "deleted");
                    if self.pending_delete.as_ref().is_some_and(|r| r.id() == &id) {
                        self.pending_delete = None;
                    }
                    self.show_success(format!("{} deleted successfully!", R::NOUN));
                    self.load()
                }
                Err(err) => {
                    warn!(resource = R::SINGULAR, %id, error = %err, "delete failed");
                    let fallback = format!("Failed to delete {}", R::SINGULAR);
                    self.status = Status::Error(err.message_or(&fallback));
                    None
                }
            },
        }
    }

    fn apply_fetch(&mut self, ticket: FetchTicket<R>, result: Result<Vec<R>, ApiError>) {
        if ticket.generation != self.fetch_generation || self.scope.as_ref() != Some(&ticket.scope) {
            debug!(
                resource = R::PLURAL,
                stale = ticket.generation,
                current = self.fetch_generation,
                "discarding superseded fetch"
            );
            return;
        }

        match result {
            Ok(items) => {
                debug!(resource = R::PLURAL, count = items.len(), "collection loaded");
                self.items = items;
                if matches!(self.status, Status::Loading | Status::Error(_)) {
                    self.status = Status::Idle;
                }
            }
            Err(err) => {
                warn!(resource = R::PLURAL, error = %err, "fetch failed");
                let fallback = format!("Failed to fetch {}", R::PLURAL);
                self.status = Status::Error(err.message_or(&fallback));
            }
        }
    }

    fn finish_submit(&mut self, result: Result<(), ApiError>, verb: &str) -> Option<Command<R>> {
        match result {
            Ok(()) => {
                info!(resource = R::SINGULAR, verb, "form saved");
                self.form = None;
                self.show_success(format!("{} {} successfully!", R::NOUN, verb));
                self.load()
            }
            Err(err) => {
                warn!(resource = R::SINGULAR, error = %err, "form save failed");
                let fallback = format!("Failed to save {}", R::SINGULAR);
                self.status = Status::Error(err.message_or(&fallback));
                None
            }
        }
    }

    fn show_success(&mut self, message: String) {
        self.status = Status::Success {
            message,
            shown_at: Instant::now(),
        };
    }
}
