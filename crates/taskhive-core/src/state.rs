use crate::error::Rejection;
use crate::id::{ListId, TaskId};
use crate::model::{DeletedTask, ListUpdate, Task, TaskList, TaskUpdate};
use crate::selection;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The root aggregate: every list, every task in display order, the undo
/// buffer of deleted tasks, and which list is active.
///
/// Each method is one complete transition. A method that returns a
/// `Rejection` or reports "not found" has left the state untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default)]
    pub lists: Vec<TaskList>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub deleted_tasks: Vec<DeletedTask>,
    #[serde(default)]
    pub active_list_id: Option<ListId>,
    #[serde(default)]
    pub sidebar_is_open: bool,
}

/// What [`AppState::remove_orphans`] dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Orphans {
    pub tasks: usize,
    pub deleted_tasks: usize,
    pub stale_active: bool,
}

impl Orphans {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl AppState {
    // --- Queries ---

    pub fn list(&self, id: &ListId) -> Option<&TaskList> {
        self.lists.iter().find(|l| &l.id == id)
    }

    fn list_mut(&mut self, id: &ListId) -> Option<&mut TaskList> {
        self.lists.iter_mut().find(|l| &l.id == id)
    }

    /// The active list, if the active id names a list that exists.
    pub fn active_list(&self) -> Option<&TaskList> {
        self.active_list_id.as_ref().and_then(|id| self.list(id))
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    /// Global index of a task in the display sequence.
    pub fn task_index(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| &t.id == id)
    }

    fn task_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| &t.id == id)
    }

    pub fn tasks_in<'a>(&'a self, list_id: &'a ListId) -> impl Iterator<Item = &'a Task> + 'a {
        self.tasks.iter().filter(move |t| t.belongs_to(list_id))
    }

    /// Declared categories of the list, then any other labels its tasks use.
    pub fn list_categories(&self, list_id: &ListId) -> Vec<String> {
        let mut categories: Vec<String> = self
            .list(list_id)
            .map(|l| l.categories.clone())
            .unwrap_or_default();
        for category in self.tasks_in(list_id).filter_map(|t| t.category.as_deref()) {
            let known = categories
                .iter()
                .any(|c| c.to_lowercase() == category.to_lowercase());
            if !known {
                categories.push(category.to_string());
            }
        }
        categories
    }

    fn require_active_list(&self) -> Result<ListId, Rejection> {
        self.active_list()
            .map(|l| l.id.clone())
            .ok_or(Rejection::NoActiveList)
    }

    // --- Lists ---

    /// Append a new list and make it active if nothing usable is active.
    pub fn add_list(
        &mut self,
        id: ListId,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<&TaskList, Rejection> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Rejection::EmptyName);
        }
        if self.active_list().is_none() {
            self.active_list_id = Some(id.clone());
        }
        self.lists.push(TaskList::new(id, name, now));
        Ok(&self.lists[self.lists.len() - 1])
    }

    /// Returns `Ok(false)` when no list has this id.
    pub fn update_list(&mut self, id: &ListId, mut update: ListUpdate) -> Result<bool, Rejection> {
        if let Some(name) = update.name.as_mut() {
            let trimmed = name.trim().to_string();
            if trimmed.is_empty() {
                return Err(Rejection::EmptyName);
            }
            *name = trimmed;
        }
        match self.list_mut(id) {
            Some(list) => {
                update.apply_to(list);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove a list with all of its tasks and pending undo records.
    ///
    /// When the active list goes, the first remaining list takes over.
    pub fn delete_list(&mut self, id: &ListId) -> bool {
        let Some(position) = self.lists.iter().position(|l| &l.id == id) else {
            return false;
        };
        self.lists.remove(position);
        self.tasks.retain(|t| !t.belongs_to(id));
        self.deleted_tasks.retain(|d| &d.list_id != id);
        if self.active_list_id.as_ref() == Some(id) {
            self.active_list_id = self.lists.first().map(|l| l.id.clone());
        }
        true
    }

    /// No existence check: an unknown id simply leaves no list active.
    pub fn set_active_list(&mut self, id: Option<ListId>) {
        self.active_list_id = id;
    }

    pub fn add_category(&mut self, list_id: &ListId, name: &str) -> bool {
        self.list_mut(list_id)
            .map(|l| l.add_category(name))
            .unwrap_or(false)
    }

    pub fn remove_category(&mut self, list_id: &ListId, name: &str) -> bool {
        self.list_mut(list_id)
            .map(|l| l.remove_category(name))
            .unwrap_or(false)
    }

    // --- Tasks ---

    /// Append a task for the active list at the end of the global sequence.
    pub fn add_task(
        &mut self,
        id: TaskId,
        description: &str,
        category: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<&Task, Rejection> {
        let list_id = self.require_active_list()?;
        let description = description.trim();
        if description.is_empty() {
            return Err(Rejection::EmptyDescription);
        }
        let category = normalize_category(category);
        self.tasks
            .push(Task::new(id, list_id, description, category, now));
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    /// Returns `Ok(false)` when no task has this id.
    pub fn update_task(&mut self, id: &TaskId, mut update: TaskUpdate) -> Result<bool, Rejection> {
        if let Some(description) = update.description.as_mut() {
            let trimmed = description.trim().to_string();
            if trimmed.is_empty() {
                return Err(Rejection::EmptyDescription);
            }
            *description = trimmed;
        }
        if let Some(category) = update.category.as_mut() {
            *category = normalize_category(category.as_deref());
        }
        match self.task_mut(id) {
            Some(task) => {
                update.apply_to(task);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove a task and remember where it was for undo.
    pub fn delete_task(&mut self, id: &TaskId) -> bool {
        let Some(index) = self.task_index(id) else {
            return false;
        };
        let task = self.tasks.remove(index);
        self.deleted_tasks.push(DeletedTask {
            list_id: task.list_id.clone(),
            index,
            task,
        });
        true
    }

    /// Restore the most recent deletion recorded for the active list.
    ///
    /// Only records of the active list are considered, even when another
    /// list has a newer deletion.
    pub fn undo_delete_task(&mut self) -> Option<TaskId> {
        let list_id = self.active_list()?.id.clone();
        let record_pos = self
            .deleted_tasks
            .iter()
            .rposition(|d| d.list_id == list_id)?;
        let record = self.deleted_tasks.remove(record_pos);
        let index = record.index.min(self.tasks.len());
        let id = record.task.id.clone();
        self.tasks.insert(index, record.task);
        Some(id)
    }

    /// Clear picked and completed timestamps for every task in the list.
    /// Returns how many tasks had something to clear.
    pub fn reset_tasks(&mut self, list_id: &ListId) -> usize {
        let mut cleared = 0;
        for task in self.tasks.iter_mut().filter(|t| t.belongs_to(list_id)) {
            if task.picked_at.is_some() || task.completed_at.is_some() {
                cleared += 1;
            }
            task.picked_at = None;
            task.completed_at = None;
        }
        cleared
    }

    /// Flip completion. Returns the new completed state, `None` if not found.
    pub fn toggle_task_completion(&mut self, id: &TaskId, now: DateTime<Utc>) -> Option<bool> {
        let task = self.task_mut(id)?;
        task.completed_at = match task.completed_at {
            Some(_) => None,
            None => Some(now),
        };
        Some(task.completed_at.is_some())
    }

    /// Flip the picked mark. Completed tasks cannot be picked or unpicked;
    /// they report `None` like a missing task.
    pub fn toggle_task_picked(&mut self, id: &TaskId, now: DateTime<Utc>) -> Option<bool> {
        let task = self.task_mut(id)?;
        if task.completed_at.is_some() {
            return None;
        }
        task.picked_at = match task.picked_at {
            Some(_) => None,
            None => Some(now),
        };
        Some(task.picked_at.is_some())
    }

    /// Pick an available task of the active list at random and mark it.
    pub fn select_random_task<R: Rng + ?Sized>(
        &mut self,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<&Task, Rejection> {
        let list_id = self.require_active_list()?;
        let index = selection::pick_random(&mut self.tasks, &list_id, now, rng)?;
        Ok(&self.tasks[index])
    }

    /// Shuffle the available tasks of the active list in place.
    pub fn shuffle_tasks<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<usize, Rejection> {
        let list_id = self.require_active_list()?;
        selection::shuffle_available(&mut self.tasks, &list_id, rng)
    }

    pub fn toggle_sidebar(&mut self) -> bool {
        self.sidebar_is_open = !self.sidebar_is_open;
        self.sidebar_is_open
    }

    /// Drop tasks and undo records whose list no longer exists, and clear an
    /// active id that names no list.
    pub fn remove_orphans(&mut self) -> Orphans {
        let lists = &self.lists;
        let known = |id: &ListId| lists.iter().any(|l| &l.id == id);

        let tasks_before = self.tasks.len();
        self.tasks.retain(|t| known(&t.list_id));
        let deleted_before = self.deleted_tasks.len();
        self.deleted_tasks.retain(|d| known(&d.list_id));
        let stale_active = self.active_list_id.as_ref().is_some_and(|id| !known(id));
        if stale_active {
            self.active_list_id = None;
        }

        Orphans {
            tasks: tasks_before - self.tasks.len(),
            deleted_tasks: deleted_before - self.deleted_tasks.len(),
            stale_active,
        }
    }
}

/// Trimmed label, or `None` when blank.
fn normalize_category(category: Option<&str>) -> Option<String> {
    category
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}
