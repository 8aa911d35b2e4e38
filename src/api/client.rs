use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{ApiError, RemoteCollection, TokenStore};
use crate::config::Config;
use crate::models::{ListBody, Project, ProjectDraft, ProjectId, Task, TaskDraft, TaskId};

/// HTTP client for the dashboard API. Every request carries the `token`
/// header when a token is configured.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: TokenStore,
}

impl ApiClient {
    pub fn new(base_url: &str, token: TokenStore, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(
            &config.api_base_url,
            TokenStore::new(config.api_token.clone()),
            config.request_timeout(),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!(%method, path, "api request");
        let request = self.http.request(method, format!("{}{}", self.base_url, path));
        match self.token.get() {
            Some(token) => request.header("token", token),
            None => request,
        }
    }

    /// Sends the request and returns the body of a 2xx response. Anything
    /// else becomes [`ApiError::Server`] carrying the body's `message`.
    async fn send(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return Ok(body);
        }

        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string));
        warn!(status = status.as_u16(), ?message, "api call rejected");

        Err(ApiError::Server {
            status: status.as_u16(),
            message,
        })
    }

    /// Decodes a list response record by record; a record that cannot be
    /// read is logged and left out instead of failing the whole list.
    async fn fetch_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let body = self.send(self.request(Method::GET, path)).await?;
        let list: ListBody<Value> = serde_json::from_str(&body)?;

        let items = list
            .into_items()
            .into_iter()
            .filter_map(|raw| match serde_json::from_value(raw) {
                Ok(item) => Some(item),
                Err(err) => {
                    warn!(path, error = %err, "skipping unreadable record");
                    None
                }
            })
            .collect();
        Ok(items)
    }

    async fn send_json<B: Serialize + ?Sized>(&self, method: Method, path: &str, body: &B) -> Result<(), ApiError> {
        self.send(self.request(method, path).json(body)).await?;
        Ok(())
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.fetch_list("/get/project").await
    }

    pub async fn create_project(&self, draft: &ProjectDraft) -> Result<(), ApiError> {
        self.send_json(Method::POST, "/create/project", draft).await
    }

    pub async fn update_project(&self, project: &Project) -> Result<(), ApiError> {
        let path = format!("/update/project/{}", project.id);
        self.send_json(Method::PUT, &path, project).await
    }

    pub async fn delete_project(&self, id: &ProjectId) -> Result<(), ApiError> {
        let path = format!("/delete/project/{}", id);
        self.send(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }

    pub async fn list_tasks(&self, project_id: &ProjectId) -> Result<Vec<Task>, ApiError> {
        self.fetch_list(&format!("/get/{}", project_id)).await
    }

    pub async fn create_task(&self, draft: &TaskDraft) -> Result<(), ApiError> {
        let project_id = draft
            .project_id
            .as_ref()
            .filter(|id| !id.is_blank())
            .ok_or_else(|| ApiError::InvalidRequest("task has no project".into()))?;
        let path = format!("/create/{}", project_id);
        self.send_json(Method::POST, &path, &draft.create_body()).await
    }

    pub async fn update_task(&self, task: &Task) -> Result<(), ApiError> {
        let path = format!("/{}", task.id);
        self.send_json(Method::PUT, &path, task).await
    }

    pub async fn delete_task(&self, id: &TaskId) -> Result<(), ApiError> {
        let path = format!("/delete/{}", id);
        self.send(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }
}

#[async_trait]
impl RemoteCollection<Project> for ApiClient {
    async fn list(&self, _scope: &()) -> Result<Vec<Project>, ApiError> {
        self.list_projects().await
    }

    async fn create(&self, draft: &ProjectDraft) -> Result<(), ApiError> {
        self.create_project(draft).await
    }

    async fn update(&self, record: &Project) -> Result<(), ApiError> {
        self.update_project(record).await
    }

    async fn delete(&self, id: &ProjectId) -> Result<(), ApiError> {
        self.delete_project(id).await
    }
}

#[async_trait]
impl RemoteCollection<Task> for ApiClient {
    async fn list(&self, scope: &ProjectId) -> Result<Vec<Task>, ApiError> {
        self.list_tasks(scope).await
    }

    async fn create(&self, draft: &TaskDraft) -> Result<(), ApiError> {
        self.create_task(draft).await
    }

    async fn update(&self, record: &Task) -> Result<(), ApiError> {
        self.update_task(record).await
    }

    async fn delete(&self, id: &TaskId) -> Result<(), ApiError> {
        self.delete_task(id).await
    }
}
