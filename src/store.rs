// In-memory task list store with filtered views and change notification

use crate::filter::Filter;
use crate::task::{Task, new_id, normalize_title};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Aggregate counts over the whole store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub total: usize,
    pub completed: usize,
}

impl Counts {
    pub fn active(&self) -> usize {
        self.total - self.completed
    }
}

/// A single state transition, delivered to observers after it is applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Added { id: String },
    Removed { id: String },
    Toggled { id: String, completed: bool },
    SetAll { completed: bool, changed: usize },
    ClearedCompleted { removed_ids: Vec<String> },
}

/// Handle returned by [`TaskListStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&Change, &[Task])>;

struct Subscriber {
    id: SubscriptionId,
    callback: Callback,
}

/// Ordered, exclusively owned collection of tasks
///
/// Newest tasks sit at the front. Every operation is synchronous and
/// infallible: blank titles and unknown ids are silently ignored.
///
/// The store does no locking. Keep one store per session and drive it from a
/// single thread.
pub struct TaskListStore {
    tasks: Vec<Task>,
    subscribers: Vec<Subscriber>,
    next_subscription: u64,
    generate_id: fn() -> String,
}

impl Default for TaskListStore {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            subscribers: Vec::new(),
            next_subscription: 0,
            generate_id: new_id,
        }
    }
}

impl TaskListStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with tasks, kept in the given order
    ///
    /// Seed tasks with a blank title or an id seen earlier in the seed are
    /// dropped (first occurrence wins).
    pub fn with_tasks<I>(seed: I) -> Self
    where
        I: IntoIterator<Item = Task>,
    {
        let mut seen = HashSet::new();
        let mut tasks = Vec::new();

        for mut task in seed {
            let Some(title) = normalize_title(&task.title) else {
                warn!(id = %task.id, "Skipping seed task with blank title");
                continue;
            };
            if task.id.trim().is_empty() {
                warn!(title = %title, "Skipping seed task with blank id");
                continue;
            }
            if !seen.insert(task.id.clone()) {
                warn!(id = %task.id, "Skipping seed task with duplicate id");
                continue;
            }
            task.title = title;
            tasks.push(task);
        }

        debug!(count = tasks.len(), "Seeded task list store");
        Self {
            tasks,
            ..Self::default()
        }
    }

    /// Replace the id source used by [`add`](Self::add) (UUIDv7 by default)
    pub fn with_id_generator(mut self, generate_id: fn() -> String) -> Self {
        self.generate_id = generate_id;
        self
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Add a task to the front of the list
    ///
    /// Returns the created task, or `None` if the title was blank.
    pub fn add(&mut self, title: &str) -> Option<Task> {
        let Some(title) = normalize_title(title) else {
            debug!("add: blank title ignored");
            return None;
        };

        let mut id = (self.generate_id)();
        while self.position(&id).is_some() {
            debug!(id = %id, "add: generated id already taken, retrying");
            id = (self.generate_id)();
        }

        let task = Task::with_id(id, title, false, Utc::now());

        self.tasks.insert(0, task.clone());
        debug!(id = %task.id, total = self.tasks.len(), "add: task added");

        self.notify(Change::Added { id: task.id.clone() });
        Some(task)
    }

    /// Remove the task with the given id; returns whether one was removed
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(index) = self.position(id) else {
            debug!(id, "remove: no such task");
            return false;
        };

        let task = self.tasks.remove(index);
        debug!(id, completed = task.completed, total = self.tasks.len(), "remove: task removed");

        self.notify(Change::Removed { id: task.id });
        true
    }

    /// Flip the completion flag; returns the new flag, or `None` if absent
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        let Some(index) = self.position(id) else {
            debug!(id, "toggle: no such task");
            return None;
        };

        let task = &mut self.tasks[index];
        task.completed = !task.completed;
        let completed = task.completed;
        debug!(id, completed, "toggle: task toggled");

        self.notify(Change::Toggled {
            id: id.to_string(),
            completed,
        });
        Some(completed)
    }

    /// Set every task's completion flag; returns how many tasks changed
    pub fn set_all(&mut self, completed: bool) -> usize {
        let mut changed = 0;
        for task in self.tasks.iter_mut().filter(|t| t.completed != completed) {
            task.completed = completed;
            changed += 1;
        }

        debug!(completed, changed, "set_all: applied");
        if changed > 0 {
            self.notify(Change::SetAll { completed, changed });
        }
        changed
    }

    /// Remove every completed task in one batch; returns how many were removed
    pub fn clear_completed(&mut self) -> usize {
        if !self.has_completed() {
            debug!("clear_completed: nothing to clear");
            return 0;
        }

        let (removed, kept): (Vec<Task>, Vec<Task>) = std::mem::take(&mut self.tasks)
            .into_iter()
            .partition(|t| t.completed);
        self.tasks = kept;

        let removed_ids: Vec<String> = removed.into_iter().map(|t| t.id).collect();
        let count = removed_ids.len();
        debug!(removed = count, total = self.tasks.len(), "clear_completed: applied");

        self.notify(Change::ClearedCompleted { removed_ids });
        count
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// All tasks in store order (newest first)
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks matching the filter, borrowed, in store order
    pub fn view(&self, filter: Filter) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(move |t| filter.matches(t))
    }

    /// Snapshot of the tasks matching the filter, in store order
    pub fn filtered_view(&self, filter: Filter) -> Vec<Task> {
        self.view(filter).cloned().collect()
    }

    pub fn counts(&self) -> Counts {
        Counts {
            total: self.tasks.len(),
            completed: self.tasks.iter().filter(|t| t.completed).count(),
        }
    }

    /// True when there is at least one task and every task is completed
    pub fn all_completed(&self) -> bool {
        !self.tasks.is_empty() && self.tasks.iter().all(|t| t.completed)
    }

    pub fn has_completed(&self) -> bool {
        self.tasks.iter().any(|t| t.completed)
    }

    // ========================================================================
    // Observers
    // ========================================================================

    /// Register a callback invoked once after every effective mutation
    ///
    /// The callback receives the change and the full task list as it stands
    /// after the change. No-op calls (blank add, unknown id, bulk operations
    /// that touch nothing) do not notify.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Change, &[Task]) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push(Subscriber {
            id,
            callback: Box::new(callback),
        });
        debug!(subscription = id.0, "Observer subscribed");
        id
    }

    /// Drop a subscription; returns whether it existed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        before != self.subscribers.len()
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    fn notify(&mut self, change: Change) {
        for subscriber in &mut self.subscribers {
            (subscriber.callback)(&change, &self.tasks);
        }
    }
}

impl std::fmt::Debug for TaskListStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskListStore")
            .field("tasks", &self.tasks)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
