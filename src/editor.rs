use crate::task::{Draft, Priority, Status, Task};

/// The two mutually exclusive form modes: filling in a new-task draft, or
/// holding a copy of an existing task. The copy never touches the store
/// until the edit is confirmed.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorState {
    Creating(Draft),
    Editing(Task),
}

impl Default for EditorState {
    fn default() -> Self {
        EditorState::Creating(Draft::default())
    }
}

impl EditorState {
    pub fn is_editing(&self) -> bool {
        matches!(self, EditorState::Editing(_))
    }

    /// Loads a copy of `task` for editing, replacing whatever was active.
    pub fn begin_edit(&mut self, task: &Task) {
        *self = EditorState::Editing(task.clone());
    }

    /// Discards the active edit copy. A draft in progress stays put.
    pub fn cancel(&mut self) {
        if self.is_editing() {
            *self = EditorState::default();
        }
    }

    pub fn title(&self) -> &str {
        match self {
            EditorState::Creating(d) => &d.title,
            EditorState::Editing(t) => &t.title,
        }
    }

    pub fn title_mut(&mut self) -> &mut String {
        match self {
            EditorState::Creating(d) => &mut d.title,
            EditorState::Editing(t) => &mut t.title,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            EditorState::Creating(d) => &d.description,
            EditorState::Editing(t) => &t.description,
        }
    }

    pub fn description_mut(&mut self) -> &mut String {
        match self {
            EditorState::Creating(d) => &mut d.description,
            EditorState::Editing(t) => &mut t.description,
        }
    }

    pub fn priority(&self) -> Priority {
        match self {
            EditorState::Creating(d) => d.priority,
            EditorState::Editing(t) => t.priority,
        }
    }

    pub fn cycle_priority(&mut self) {
        match self {
            EditorState::Creating(d) => d.priority = d.priority.cycle(),
            EditorState::Editing(t) => t.priority = t.priority.cycle(),
        }
    }

    pub fn status(&self) -> Status {
        match self {
            EditorState::Creating(d) => d.status,
            EditorState::Editing(t) => t.status,
        }
    }

    pub fn cycle_status(&mut self) {
        match self {
            EditorState::Creating(d) => d.status = d.status.cycle(),
            EditorState::Editing(t) => t.status = t.status.cycle(),
        }
    }
}
