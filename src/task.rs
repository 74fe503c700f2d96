// Task model for TaskList

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single to-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Build a task with explicit fields
    pub fn with_id(id: impl Into<String>, title: impl Into<String>, completed: bool, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            completed,
            created_at,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.completed
    }
}

/// Trim a title, rejecting blank input
pub fn normalize_title(title: &str) -> Option<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

/// Time-ordered unique id for a new task
pub fn new_id() -> String {
    Uuid::now_v7().to_string()
}
