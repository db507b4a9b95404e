use crate::config::StoreConfig;
use crate::notice::Notice;
use crate::storage::SnapshotStorage;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use taskhive_core::geometry::{HexLayout, Point};
use taskhive_core::serialize::{decode_snapshot, encode_snapshot};
use taskhive_core::stats::{self, ActivitySeries, Progress};
use taskhive_core::{
    AppState, Clock, ListId, ListUpdate, Rejection, SystemClock, Task, TaskId, TaskList,
    TaskUpdate,
};
use tracing::{debug, info, warn};

/// Handle returned by [`TaskStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// What subscribers are told.
#[derive(Debug)]
pub enum StoreEvent<'a> {
    /// A mutation was applied; this is the new state.
    Changed(&'a AppState),
    /// A message for the user about the last operation.
    Notice(&'a Notice),
}

type Listener = Box<dyn FnMut(&StoreEvent<'_>)>;

/// The single mutation surface over [`AppState`].
///
/// Every successful mutation writes a full snapshot to storage and then
/// tells subscribers. Storage failures are logged and otherwise ignored:
/// the in-memory state stays authoritative for the session.
pub struct TaskStore {
    state: AppState,
    config: StoreConfig,
    storage: Box<dyn SnapshotStorage>,
    clock: Box<dyn Clock>,
    rng: Box<dyn RngCore>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl TaskStore {
    /// Load the snapshot under the configured key, using wall-clock time and
    /// an entropy-seeded random source.
    pub fn open(storage: impl SnapshotStorage + 'static, config: StoreConfig) -> Self {
        Self::open_with(storage, config, SystemClock, StdRng::from_entropy())
    }

    /// Like [`open`](Self::open) with explicit time and randomness.
    pub fn open_with(
        storage: impl SnapshotStorage + 'static,
        config: StoreConfig,
        clock: impl Clock + 'static,
        rng: impl RngCore + 'static,
    ) -> Self {
        let config = config.or_defaults();
        let state = load_state(&storage, &config.storage_key);
        Self {
            state,
            config,
            storage: Box::new(storage),
            clock: Box::new(clock),
            rng: Box::new(rng),
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    // --- Subscriptions ---

    pub fn subscribe(&mut self, listener: impl FnMut(&StoreEvent<'_>) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    // --- Reads ---

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn lists(&self) -> &[TaskList] {
        &self.state.lists
    }

    pub fn tasks(&self) -> &[Task] {
        &self.state.tasks
    }

    pub fn active_list_id(&self) -> Option<&ListId> {
        self.state.active_list_id.as_ref()
    }

    pub fn active_list(&self) -> Option<&TaskList> {
        self.state.active_list()
    }

    /// Tasks of the active list in display order.
    pub fn active_tasks(&self) -> Vec<&Task> {
        match self.state.active_list_id.as_ref() {
            Some(id) => self.state.tasks_in(id).collect(),
            None => Vec::new(),
        }
    }

    pub fn list_categories(&self, list_id: &ListId) -> Vec<String> {
        self.state.list_categories(list_id)
    }

    pub fn progress(&self, list_id: &ListId) -> Progress {
        stats::progress(self.state.tasks_in(list_id))
    }

    /// Daily pick/complete counts for a list, `None` if the list is unknown.
    pub fn activity(&self, list_id: &ListId) -> Option<ActivitySeries> {
        let list = self.state.list(list_id)?;
        Some(stats::daily_activity(list, &self.state.tasks, self.clock.now()))
    }

    /// The active list's tasks in display order, each with its token position.
    pub fn layout(&self, container_width: f64, radius: f64) -> Vec<(Point, &Task)> {
        let tasks = self.active_tasks();
        HexLayout::new(container_width, radius)
            .with_spacing(self.config.hex_spacing)
            .place(&tasks)
            .into_iter()
            .map(|(point, task)| (point, *task))
            .collect()
    }

    // --- Lists ---

    pub fn add_list(&mut self, name: &str) -> Result<ListId, Rejection> {
        let id = ListId::random(&mut *self.rng);
        let now = self.clock.now();
        let result = self
            .state
            .add_list(id, name, now)
            .map(|l| (l.id.clone(), l.name.clone()));
        match result {
            Ok((id, name)) => {
                debug!(list = %id, "list created");
                self.commit(Some(Notice::success(format!("List \"{name}\" created"))));
                Ok(id)
            }
            Err(rejection) => self.reject(rejection),
        }
    }

    pub fn update_list(&mut self, id: &ListId, update: ListUpdate) -> Result<bool, Rejection> {
        match self.state.update_list(id, update) {
            Ok(true) => {
                debug!(list = %id, "list updated");
                self.commit(Some(Notice::success("List updated")));
                Ok(true)
            }
            Ok(false) => Ok(false),
            Err(rejection) => self.reject(rejection),
        }
    }

    pub fn delete_list(&mut self, id: &ListId) -> bool {
        if !self.state.delete_list(id) {
            return false;
        }
        debug!(list = %id, active = ?self.state.active_list_id, "list deleted");
        self.commit(Some(Notice::success("List deleted")));
        true
    }

    pub fn set_active_list(&mut self, id: Option<ListId>) {
        debug!(list = ?id, "active list set");
        self.state.set_active_list(id);
        self.commit(None);
    }

    pub fn add_category(&mut self, list_id: &ListId, name: &str) -> bool {
        if !self.state.add_category(list_id, name) {
            return false;
        }
        self.commit(Some(Notice::success(format!(
            "Category \"{}\" added",
            name.trim()
        ))));
        true
    }

    pub fn remove_category(&mut self, list_id: &ListId, name: &str) -> bool {
        if !self.state.remove_category(list_id, name) {
            return false;
        }
        self.commit(Some(Notice::success(format!(
            "Category \"{}\" removed",
            name.trim()
        ))));
        true
    }

    // --- Tasks ---

    pub fn add_task(&mut self, description: &str, category: Option<&str>) -> Result<TaskId, Rejection> {
        let id = TaskId::random(&mut *self.rng);
        let now = self.clock.now();
        let result = self
            .state
            .add_task(id, description, category, now)
            .map(|t| t.id.clone());
        match result {
            Ok(id) => {
                debug!(task = %id, "task added");
                self.commit(Some(Notice::success("Task added")));
                Ok(id)
            }
            Err(rejection) => self.reject(rejection),
        }
    }

    /// Add one task per non-blank line of `text`, all or nothing.
    pub fn add_tasks(&mut self, text: &str, category: Option<&str>) -> Result<Vec<TaskId>, Rejection> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        if self.state.active_list().is_none() {
            return self.reject(Rejection::NoActiveList);
        }
        if lines.is_empty() {
            return self.reject(Rejection::EmptyDescription);
        }

        let now = self.clock.now();
        let mut next = self.state.clone();
        let mut ids = Vec::with_capacity(lines.len());
        for line in lines {
            let id = TaskId::random(&mut *self.rng);
            match next.add_task(id, line, category, now) {
                Ok(task) => ids.push(task.id.clone()),
                Err(rejection) => return self.reject(rejection),
            }
        }
        self.state = next;

        debug!(count = ids.len(), "tasks added");
        let message = match ids.len() {
            1 => "Task added".to_string(),
            n => format!("{n} tasks added"),
        };
        self.commit(Some(Notice::success(message)));
        Ok(ids)
    }

    /// An update that sets nothing is not persisted.
    pub fn update_task(&mut self, id: &TaskId, update: TaskUpdate) -> Result<bool, Rejection> {
        if update.is_empty() {
            return Ok(self.state.task(id).is_some());
        }
        match self.state.update_task(id, update) {
            Ok(true) => {
                debug!(task = %id, "task updated");
                self.commit(Some(Notice::success("Task updated")));
                Ok(true)
            }
            Ok(false) => Ok(false),
            Err(rejection) => self.reject(rejection),
        }
    }

    pub fn delete_task(&mut self, id: &TaskId) -> bool {
        if !self.state.delete_task(id) {
            self.emit_notice(Notice::error("Task does not exist"));
            return false;
        }
        debug!(task = %id, pending_undo = self.state.deleted_tasks.len(), "task deleted");
        self.commit(Some(Notice::success("Task deleted")));
        true
    }

    /// Bring back the latest deletion recorded for the active list.
    pub fn undo_delete_task(&mut self) -> Option<TaskId> {
        match self.state.undo_delete_task() {
            Some(id) => {
                debug!(task = %id, "task restored");
                self.commit(Some(Notice::success("Task restored")));
                Some(id)
            }
            None => {
                self.emit_notice(Notice::info("Nothing to undo"));
                None
            }
        }
    }

    /// Clear picked/completed marks on every task of a list.
    pub fn reset_tasks(&mut self, list_id: &ListId) -> usize {
        if self.state.list(list_id).is_none() {
            return 0;
        }
        let cleared = self.state.reset_tasks(list_id);
        debug!(list = %list_id, cleared, "tasks reset");
        self.commit(Some(Notice::success("Tasks reset")));
        cleared
    }

    pub fn toggle_task_completion(&mut self, id: &TaskId) -> Option<bool> {
        let now = self.clock.now();
        let completed = self.state.toggle_task_completion(id, now)?;
        debug!(task = %id, completed, "completion toggled");
        self.commit(None);
        Some(completed)
    }

    /// `None` for unknown and for completed tasks.
    pub fn toggle_task_picked(&mut self, id: &TaskId) -> Option<bool> {
        let now = self.clock.now();
        let picked = self.state.toggle_task_picked(id, now)?;
        debug!(task = %id, picked, "pick toggled");
        self.commit(None);
        Some(picked)
    }

    /// Pick an available task of the active list at random and mark it.
    pub fn select_random_task(&mut self) -> Result<Task, Rejection> {
        let now = self.clock.now();
        let result = self
            .state
            .select_random_task(now, &mut *self.rng)
            .map(Task::clone);
        match result {
            Ok(task) => {
                debug!(task = %task.id, "task picked");
                self.commit(Some(Notice::success(format!(
                    "Random task selected: {}",
                    task.description
                ))));
                Ok(task)
            }
            Err(rejection) => self.reject(rejection),
        }
    }

    /// Reorder the available tasks of the active list. Picked and completed
    /// tasks, and every other list's tasks, keep their positions.
    pub fn shuffle_tasks(&mut self) -> Result<usize, Rejection> {
        match self.state.shuffle_tasks(&mut *self.rng) {
            Ok(moved) => {
                debug!(moved, "tasks shuffled");
                self.commit(Some(Notice::success("Tasks shuffled")));
                Ok(moved)
            }
            Err(rejection) => self.reject(rejection),
        }
    }

    pub fn toggle_sidebar(&mut self) -> bool {
        let open = self.state.toggle_sidebar();
        self.commit(None);
        open
    }

    // --- Internals ---

    fn commit(&mut self, notice: Option<Notice>) {
        self.persist();
        let event = StoreEvent::Changed(&self.state);
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
        if let Some(notice) = notice {
            self.emit_notice(notice);
        }
    }

    fn reject<T>(&mut self, rejection: Rejection) -> Result<T, Rejection> {
        debug!(%rejection, "operation rejected");
        self.emit_notice(rejection.into());
        Err(rejection)
    }

    fn emit_notice(&mut self, notice: Notice) {
        let event = StoreEvent::Notice(&notice);
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }

    fn persist(&mut self) {
        let key = &self.config.storage_key;
        let text = match encode_snapshot(&self.state, self.config.pretty) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "failed to encode snapshot");
                return;
            }
        };
        if let Err(e) = self.storage.write(key, &text) {
            warn!(error = %e, key = %key, "failed to persist snapshot");
        }
    }
}

/// Read and decode the snapshot; anything unusable becomes the empty state.
fn load_state(storage: &dyn SnapshotStorage, key: &str) -> AppState {
    let text = match storage.read(key) {
        Ok(Some(text)) => text,
        Ok(None) => {
            info!(key, "no saved snapshot, starting empty");
            return AppState::default();
        }
        Err(e) => {
            warn!(error = %e, key, "failed to read snapshot, starting empty");
            return AppState::default();
        }
    };

    let mut state = match decode_snapshot(&text) {
        Ok(state) => state,
        Err(e) => {
            warn!(error = %e, key, "corrupt snapshot, starting empty");
            return AppState::default();
        }
    };

    let orphans = state.remove_orphans();
    if !orphans.is_empty() {
        warn!(
            tasks = orphans.tasks,
            deleted_tasks = orphans.deleted_tasks,
            stale_active = orphans.stale_active,
            "repaired references to lists that no longer exist"
        );
    }
    info!(
        lists = state.lists.len(),
        tasks = state.tasks.len(),
        "snapshot loaded"
    );
    state
}
