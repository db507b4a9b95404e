use crate::id::{ListId, TaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a task sits in its pick/complete lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    Available,
    Picked,
    Completed,
}

/// A single task. `list_id` is fixed at creation; nothing re-parents a task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub list_id: ListId,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picked_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(
        id: TaskId,
        list_id: ListId,
        description: impl Into<String>,
        category: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            list_id,
            description: description.into(),
            category,
            created_at,
            picked_at: None,
            completed_at: None,
        }
    }

    /// Completion wins over picking.
    pub fn status(&self) -> TaskStatus {
        match (self.picked_at, self.completed_at) {
            (_, Some(_)) => TaskStatus::Completed,
            (Some(_), None) => TaskStatus::Picked,
            (None, None) => TaskStatus::Available,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status() == TaskStatus::Available
    }

    pub fn belongs_to(&self, list_id: &ListId) -> bool {
        &self.list_id == list_id
    }
}

/// The settable fields of a task. `None` leaves a field untouched; for the
/// optional fields, `Some(None)` clears them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskUpdate {
    pub description: Option<String>,
    pub category: Option<Option<String>>,
    pub picked_at: Option<Option<DateTime<Utc>>>,
    pub completed_at: Option<Option<DateTime<Utc>>>,
}

impl TaskUpdate {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn category(mut self, category: Option<String>) -> Self {
        self.category = Some(category);
        self
    }

    pub fn picked_at(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.picked_at = Some(at);
        self
    }

    pub fn completed_at(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.completed_at = Some(at);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to(self, task: &mut Task) {
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(category) = self.category {
            task.category = category;
        }
        if let Some(picked_at) = self.picked_at {
            task.picked_at = picked_at;
        }
        if let Some(completed_at) = self.completed_at {
            task.completed_at = completed_at;
        }
    }
}
