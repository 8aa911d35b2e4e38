//! Client for the remote project/task API.

mod client;
mod error;
mod token;

use async_trait::async_trait;

use crate::controller::Resource;

pub use client::ApiClient;
pub use error::ApiError;
pub use token::TokenStore;

/// The four calls a [`ListController`](crate::controller::ListController)
/// needs from whatever holds the collection.
#[async_trait]
pub trait RemoteCollection<R: Resource>: Send + Sync {
    async fn list(&self, scope: &R::Scope) -> Result<Vec<R>, ApiError>;
    async fn create(&self, draft: &R::Draft) -> Result<(), ApiError>;
    async fn update(&self, record: &R) -> Result<(), ApiError>;
    async fn delete(&self, id: &R::Id) -> Result<(), ApiError>;
}
