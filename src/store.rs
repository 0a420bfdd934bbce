use chrono::Utc;
use tracing::debug;

use crate::task::{Draft, Status, Task};

/// Ordered collection of tasks, the sole source of truth.
///
/// Every mutating operation returns whether the store actually changed, so
/// the caller knows when to write it back to storage. Lookup misses and
/// validation failures are silent no-ops.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Appends a new task built from the draft, in insertion order.
    /// Rejected (no-op) when the trimmed title is empty.
    pub fn add(&mut self, draft: &Draft) -> bool {
        if draft.title.trim().is_empty() {
            return false;
        }
        let task = Task {
            id: self.next_id(),
            title: draft.title.clone(),
            description: draft.description.clone(),
            priority: draft.priority,
            status: draft.status,
            created_at: Utc::now(),
        };
        debug!(id = task.id, title = %task.title, "add task");
        self.tasks.push(task);
        true
    }

    /// Replaces the task with the same id in place, keeping order.
    /// Rejected when the trimmed title is empty; no-op when the id is gone.
    pub fn update(&mut self, edited: &Task) -> bool {
        if edited.title.trim().is_empty() {
            return false;
        }
        match self.tasks.iter_mut().find(|t| t.id == edited.id) {
            Some(slot) => {
                debug!(id = edited.id, "update task");
                *slot = edited.clone();
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    /// Patches only the status field; the rest of the task is untouched.
    /// Unlike `add`/`update` this never validates the title.
    pub fn set_status(&mut self, id: i64, status: Status) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.status = status;
                true
            }
            None => false,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.tasks)
    }

    /// Unique id seeded from the current Unix-millis timestamp, bumped past
    /// any task already holding it.
    fn next_id(&self) -> i64 {
        let mut id = Utc::now().timestamp_millis();
        while self.tasks.iter().any(|t| t.id == id) {
            id += 1;
        }
        id
    }
}
