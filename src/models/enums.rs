//! Enumeration types for the Cloud Foundry API.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sort direction for v2 list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    /// Ascending (server default)
    #[default]
    Asc,
    /// Descending
    Desc,
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderDirection::Asc => write!(f, "asc"),
            OrderDirection::Desc => write!(f, "desc"),
        }
    }
}

/// Lifecycle state of a v3 task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    /// Accepted, not yet running
    Pending,
    /// Currently running
    Running,
    /// Cancellation requested
    Canceling,
    /// Exited successfully
    Succeeded,
    /// Exited with a failure
    Failed,
    /// State not known to this client
    #[serde(other)]
    Unknown,
}

impl TaskState {
    /// Returns `true` if the task can no longer change state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Succeeded | TaskState::Failed)
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskState::Pending => "PENDING",
            TaskState::Running => "RUNNING",
            TaskState::Canceling => "CANCELING",
            TaskState::Succeeded => "SUCCEEDED",
            TaskState::Failed => "FAILED",
            TaskState::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}
