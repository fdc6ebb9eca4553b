// In-memory task store with filtered queries

use crate::event::{Observer, StoreEvent};
use crate::filter::Filter;
use crate::models::{Category, Priority, Task, TaskId};
use chrono::NaiveDate;
use tracing::debug;

/// Task totals derived from the current collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub remaining: usize,
    pub completed: usize,
    pub total: usize,
}

/// Ordered collection of tasks plus the current filter selection
///
/// Tasks stay in insertion order; no operation reorders them.
pub struct TaskStore {
    tasks: Vec<Task>,
    next_id: TaskId,
    filter: Filter,
    observers: Vec<Observer>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
            filter: Filter::All,
            observers: Vec::new(),
        }
    }

    /// Start with a different filter selected
    pub fn with_filter(filter: Filter) -> Self {
        Self {
            filter,
            ..Self::new()
        }
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Add a task to the end of the list
    ///
    /// Returns `None` without touching the store when `text` is empty after
    /// trimming.
    pub fn add(&mut self, text: &str, category: Category, priority: Priority, due_date: Option<NaiveDate>) -> Option<Task> {
        let text = text.trim();
        if text.is_empty() {
            debug!("Ignoring task with empty text");
            return None;
        }

        let id = self.next_id;
        self.next_id += 1;

        let task = Task {
            id,
            text: text.to_string(),
            completed: false,
            category,
            priority,
            due_date,
        };
        self.tasks.push(task.clone());

        debug!(id, %category, %priority, "Added task");
        self.notify(&StoreEvent::Added(task.clone()));

        Some(task)
    }

    /// Flip the completion flag of a task
    ///
    /// Returns whether a task with `id` exists.
    pub fn toggle(&mut self, id: TaskId) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            debug!(id, "Toggle of unknown task ignored");
            return false;
        };

        task.completed = !task.completed;
        let completed = task.completed;

        debug!(id, completed, "Toggled task");
        self.notify(&StoreEvent::Toggled { id, completed });
        true
    }

    /// Remove a task for good
    ///
    /// Returns whether a task with `id` existed.
    pub fn remove(&mut self, id: TaskId) -> bool {
        let Some(index) = self.tasks.iter().position(|t| t.id == id) else {
            debug!(id, "Removal of unknown task ignored");
            return false;
        };

        self.tasks.remove(index);

        debug!(id, "Removed task");
        self.notify(&StoreEvent::Removed(id));
        true
    }

    /// Change the current selection
    pub fn set_filter(&mut self, filter: Filter) {
        if self.filter == filter {
            return;
        }

        self.filter = filter;
        debug!(%filter, "Filter changed");
        self.notify(&StoreEvent::FilterChanged(filter));
    }

    /// Register a callback run after every applied mutation
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&StoreEvent) + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    fn notify(&mut self, event: &StoreEvent) {
        for observer in self.observers.iter_mut() {
            observer(event);
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Tasks selected by `filter`, in insertion order
    ///
    /// Evaluated lazily against the collection as it is now; the borrow keeps
    /// the store from changing until the iterator is dropped.
    pub fn query(&self, filter: Filter) -> impl Iterator<Item = &Task> + '_ {
        self.tasks.iter().filter(move |task| filter.matches(task))
    }

    /// Tasks selected by the current filter
    pub fn visible(&self) -> impl Iterator<Item = &Task> + '_ {
        self.query(self.filter)
    }

    pub fn counts(&self) -> Counts {
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        Counts {
            remaining: self.tasks.len() - completed,
            completed,
            total: self.tasks.len(),
        }
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TaskStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskStore")
            .field("tasks", &self.tasks)
            .field("next_id", &self.next_id)
            .field("filter", &self.filter)
            .field("observers", &self.observers.len())
            .finish()
    }
}
