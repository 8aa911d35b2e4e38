use super::{Command, Completion, ListController, Resource};
use crate::api::RemoteCollection;

/// Performs the network call a [`Command`] describes.
pub async fn execute<R, B>(backend: &B, command: Command<R>) -> Completion<R>
where
    R: Resource,
    B: RemoteCollection<R> + ?Sized,
{
    match command {
        Command::Fetch(ticket) => {
            let result = backend.list(&ticket.scope).await;
            Completion::Fetched { ticket, result }
        }
        Command::Create(draft) => Completion::Created(backend.create(&draft).await),
        Command::Update { record, intent } => Completion::Updated {
            intent,
            result: backend.update(&record).await,
        },
        Command::Delete(id) => {
            let result = backend.delete(&id).await;
            Completion::Deleted { id, result }
        }
    }
}

impl<R: Resource> ListController<R> {
    /// Runs `command` and any follow-ups to completion, in order. Useful when
    /// nothing else needs to interleave, e.g. scripts and tests.
    pub async fn run<B>(&mut self, backend: &B, command: Option<Command<R>>)
    where
        B: RemoteCollection<R> + ?Sized,
    {
        let mut next = command;
        while let Some(command) = next {
            let completion = execute(backend, command).await;
            next = self.complete(completion);
        }
    }
}
