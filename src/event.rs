// Change notifications emitted by the store

use crate::filter::Filter;
use crate::models::{Task, TaskId};

/// A mutation that has been applied to a `TaskStore`
///
/// Only emitted when state actually changed. Rejected adds and
/// toggles/removals of unknown ids produce no event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Added(Task),
    Toggled { id: TaskId, completed: bool },
    Removed(TaskId),
    FilterChanged(Filter),
}

/// Callback registered with `TaskStore::subscribe`
pub type Observer = Box<dyn FnMut(&StoreEvent)>;
