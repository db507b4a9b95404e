use crate::id::ListId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named list of tasks, with the categories offered when adding to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskList {
    pub id: ListId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
}

impl TaskList {
    pub fn new(id: ListId, name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            created_at,
            categories: Vec::new(),
        }
    }

    pub fn has_category(&self, name: &str) -> bool {
        self.categories
            .iter()
            .any(|c| c.to_lowercase() == name.to_lowercase())
    }

    /// Add a category unless an equal one (ignoring case) exists.
    pub fn add_category(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.has_category(name) {
            return false;
        }
        self.categories.push(name.to_string());
        true
    }

    pub fn remove_category(&mut self, name: &str) -> bool {
        let before = self.categories.len();
        let name = name.trim().to_lowercase();
        self.categories.retain(|c| c.to_lowercase() != name);
        self.categories.len() != before
    }
}

/// The settable fields of a list. Identifier and creation time never change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListUpdate {
    pub name: Option<String>,
    pub categories: Option<Vec<String>>,
}

impl ListUpdate {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn categories(mut self, categories: Vec<String>) -> Self {
        self.categories = Some(categories);
        self
    }

    pub fn apply_to(self, list: &mut TaskList) {
        if let Some(name) = self.name {
            list.name = name;
        }
        if let Some(categories) = self.categories {
            list.categories.clear();
            for category in &categories {
                list.add_category(category);
            }
        }
    }
}
