//! Task models (v3).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::TaskState;
use super::pagination::Link;

/// A one-off task run in the context of an application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Task GUID
    pub guid: String,
    /// Task name
    pub name: String,
    /// Command the task runs
    #[serde(default)]
    pub command: Option<String>,
    /// Lifecycle state
    pub state: TaskState,
    /// Memory limit in megabytes
    #[serde(default)]
    pub memory_in_mb: Option<u32>,
    /// Environment variables set for the task
    #[serde(default)]
    pub environment_variables: HashMap<String, String>,
    /// Outcome details
    #[serde(default)]
    pub result: Option<TaskResult>,
    /// Related resources
    #[serde(default)]
    pub links: HashMap<String, Link>,
    /// Creation time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Outcome details of a task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskResult {
    /// Why the task failed, if it did
    #[serde(default)]
    pub failure_reason: Option<String>,
}
