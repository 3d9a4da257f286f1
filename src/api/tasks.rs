//! Tasks service (v3).

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;

use crate::client::paginated::PaginatedStream;
use crate::client::params::{ApiRequest, MultiValue, Parameters};
use crate::client::{ClientInner, PaginatedRequest};
use crate::models::{PageQueryV3, PaginatedResponse, Task, TaskState};
use crate::{Error, Result};

/// Service for task operations.
///
/// # Example
///
/// ```no_run
/// use cloudfoundry_rs::api::CreateTaskRequest;
///
/// # async fn example(client: cloudfoundry_rs::CloudFoundryClient) -> cloudfoundry_rs::Result<()> {
/// let task = client
///     .tasks()
///     .create(&CreateTaskRequest::new(
///         "a7c47787-a982-467c-95d7-9ab17cbcc918",
///         "bin/rake db:migrate",
///     ))
///     .await?;
/// println!("task {} is {}", task.guid, task.state);
/// # Ok(())
/// # }
/// ```
pub struct TasksService {
    inner: Arc<ClientInner>,
}

/// Filters for listing tasks.
#[derive(Debug, Clone, Default)]
pub struct ListTasksRequest {
    /// Match any of these task names
    pub names: Option<Vec<String>>,
    /// Match tasks in any of these states
    pub states: Option<Vec<TaskState>>,
    /// Match tasks of any of these applications
    pub application_ids: Option<Vec<String>>,
    /// Paging
    pub page: PageQueryV3,
}

impl ApiRequest for ListTasksRequest {
    fn parameters(&self, params: &mut Parameters) {
        params
            .query_list("names", self.names.as_deref(), MultiValue::CommaJoined)
            .query_list("states", self.states.as_deref(), MultiValue::CommaJoined)
            .query_list("app_guids", self.application_ids.as_deref(), MultiValue::CommaJoined);
        self.page.declare(params);
    }
}

impl PaginatedRequest for ListTasksRequest {
    fn with_page(&self, page: u32) -> Self {
        Self {
            page: self.page.at(page),
            ..self.clone()
        }
    }
}

/// Creates a task for an application.
///
/// The application GUID goes in the path; the remaining fields form the
/// JSON request body.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateTaskRequest {
    /// Application GUID
    #[serde(skip_serializing)]
    pub application_id: String,
    /// Command to run
    pub command: String,
    /// Task name; the server generates one when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Memory limit in megabytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_in_mb: Option<u32>,
    /// Extra environment variables
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_variables: Option<HashMap<String, String>>,
}

impl CreateTaskRequest {
    /// A task running `command` in the context of the application.
    pub fn new(application_id: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            application_id: application_id.into(),
            command: command.into(),
            ..Default::default()
        }
    }
}

impl ApiRequest for CreateTaskRequest {
    fn parameters(&self, params: &mut Parameters) {
        params.path("application_id", &self.application_id);
    }

    fn validate(&self) -> Result<()> {
        if self.command.trim().is_empty() {
            return Err(Error::Validation("command must be specified".to_string()));
        }
        Ok(())
    }
}

/// Identifies a single task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRequest {
    /// Task GUID
    pub task_id: String,
}

impl TaskRequest {
    /// Target the task with the given GUID.
    pub fn new(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
        }
    }
}

impl ApiRequest for TaskRequest {
    fn parameters(&self, params: &mut Parameters) {
        params.path("task_id", &self.task_id);
    }
}

impl TasksService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Create and start a task.
    pub async fn create(&self, request: &CreateTaskRequest) -> Result<Task> {
        self.inner
            .execute_with_body(
                Method::POST,
                "/v3/apps/{application_id}/tasks",
                request,
                request,
            )
            .await
    }

    /// Get a task by GUID.
    pub async fn get(&self, request: &TaskRequest) -> Result<Task> {
        self.inner
            .execute(Method::GET, "/v3/tasks/{task_id}", request)
            .await
    }

    /// Ask the server to stop a running task.
    ///
    /// The returned task is usually in the `CANCELING` state.
    pub async fn cancel(&self, request: &TaskRequest) -> Result<Task> {
        self.inner
            .execute(Method::POST, "/v3/tasks/{task_id}/actions/cancel", request)
            .await
    }

    /// Fetch a single page of tasks.
    pub async fn list(&self, request: &ListTasksRequest) -> Result<PaginatedResponse<Task>> {
        self.inner.execute(Method::GET, "/v3/tasks", request).await
    }

    /// Stream every task matching `request`.
    pub fn list_stream(&self, request: ListTasksRequest) -> PaginatedStream<Task> {
        self.inner
            .paginate::<_, PaginatedResponse<Task>>("/v3/tasks", request)
    }
}
