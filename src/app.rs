use tracing::{debug, warn};

use crate::editor::EditorState;
use crate::filter::{self, Criterion};
use crate::storage::Storage;
use crate::store::TaskStore;
use crate::task::{Status, Task};

/// Storage key the whole task list lives under.
pub const TASKS_KEY: &str = "tasks";

/// Everything the UI can ask of the application state.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Confirm the form: adds the draft when creating, saves the copy when
    /// editing.
    Submit,
    /// Drop the active edit copy and go back to the draft form.
    CancelEdit,
    /// Load a copy of the task into the form.
    EditTask(i64),
    DeleteTask(i64),
    SetStatus(i64, Status),
    SetFilter(Criterion),
}

/// Application state: the task store, the form state machine and the active
/// filter, bound to the storage that outlives the session. All mutation goes
/// through [`App::apply`]; every store change is written back immediately.
pub struct App<S: Storage> {
    store: TaskStore,
    pub editor: EditorState,
    pub filter: Criterion,
    storage: S,
}

impl<S: Storage> App<S> {
    /// Reads the persisted task list and builds the initial state. Missing
    /// or unparseable data degrades to an empty store.
    pub fn load(storage: S) -> Self {
        let tasks: Vec<Task> = match storage.read(TASKS_KEY) {
            Ok(Some(data)) => serde_json::from_str(&data).unwrap_or_else(|err| {
                warn!(%err, "stored tasks are unreadable, starting empty");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(%err, "could not read stored tasks, starting empty");
                Vec::new()
            }
        };
        debug!(count = tasks.len(), "loaded tasks");
        Self {
            store: TaskStore::new(tasks),
            editor: EditorState::default(),
            filter: Criterion::All,
            storage,
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Tasks matching the active filter, in insertion order.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        filter::select(self.store.tasks(), self.filter)
    }

    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::Submit => self.submit(),
            AppEvent::CancelEdit => self.editor.cancel(),
            AppEvent::EditTask(id) => {
                if let Some(task) = self.store.get(id) {
                    let copy = task.clone();
                    self.editor.begin_edit(&copy);
                }
            }
            AppEvent::DeleteTask(id) => {
                if self.store.remove(id) {
                    self.persist();
                }
            }
            AppEvent::SetStatus(id, status) => {
                if self.store.set_status(id, status) {
                    self.persist();
                }
            }
            AppEvent::SetFilter(criterion) => self.filter = criterion,
        }
    }

    fn submit(&mut self) {
        match &self.editor {
            EditorState::Creating(draft) => {
                let draft = draft.clone();
                if self.store.add(&draft) {
                    self.editor = EditorState::default();
                    self.persist();
                }
            }
            EditorState::Editing(edited) => {
                if edited.title.trim().is_empty() {
                    return;
                }
                let edited = edited.clone();
                let changed = self.store.update(&edited);
                // The title passed validation, so the form leaves edit mode
                // even when the task vanished underneath it.
                self.editor = EditorState::default();
                if changed {
                    self.persist();
                }
            }
        }
    }

    /// Best-effort write-back of the full store. Failure is logged, never
    /// fatal; the in-memory state stays authoritative for the session.
    fn persist(&mut self) {
        let json = match self.store.to_json() {
            Ok(json) => json,
            Err(err) => {
                warn!(%err, "could not serialize tasks");
                return;
            }
        };
        if let Err(err) = self.storage.write(TASKS_KEY, &json) {
            warn!(%err, "could not persist tasks");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::task::Priority;
    use pretty_assertions::assert_eq;

    fn app() -> App<MemoryStorage> {
        App::load(MemoryStorage::new())
    }

    fn add_task(app: &mut App<MemoryStorage>, title: &str) -> i64 {
        app.editor.title_mut().push_str(title);
        app.apply(AppEvent::Submit);
        app.store().tasks().last().expect("task was added").id
    }

    #[test]
    fn starts_empty_without_stored_data() {
        let app = app();
        assert!(app.store().tasks().is_empty());
        assert_eq!(app.filter, Criterion::All);
        assert!(!app.editor.is_editing());
    }

    #[test]
    fn corrupt_stored_data_falls_back_to_empty() {
        for garbage in ["{not json", "42", "{\"tasks\":[]}", "\u{0}\u{1}"] {
            let storage = MemoryStorage::with_value(TASKS_KEY, garbage);
            let app = App::load(storage);
            assert!(app.store().tasks().is_empty(), "input: {garbage:?}");
        }
    }

    #[test]
    fn load_round_trips_through_storage() {
        let mut first = app();
        add_task(&mut first, "persisted");
        let App { storage, .. } = first;

        let second = App::load(storage);
        assert_eq!(second.store().tasks().len(), 1);
        assert_eq!(second.store().tasks()[0].title, "persisted");
    }

    #[test]
    fn submit_adds_draft_and_resets_form() {
        let mut app = app();
        app.editor.title_mut().push_str("Buy milk");
        app.apply(AppEvent::Submit);

        assert_eq!(app.store().tasks().len(), 1);
        let task = &app.store().tasks()[0];
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.status, Status::Todo);

        // Draft is back to defaults, still in create mode.
        assert!(!app.editor.is_editing());
        assert_eq!(app.editor.title(), "");
    }

    #[test]
    fn submit_with_blank_draft_changes_nothing() {
        let mut app = app();
        app.editor.title_mut().push_str("   ");
        app.apply(AppEvent::Submit);
        assert!(app.store().tasks().is_empty());
        // The half-typed draft is kept for the user to fix.
        assert_eq!(app.editor.title(), "   ");
    }

    #[test]
    fn edit_confirm_keeps_id_and_created_at() {
        let mut app = app();
        let id = add_task(&mut app, "original");
        let created_at = app.store().tasks()[0].created_at;

        app.apply(AppEvent::EditTask(id));
        assert!(app.editor.is_editing());
        app.editor.title_mut().clear();
        app.editor.title_mut().push_str("X");
        app.apply(AppEvent::Submit);

        assert_eq!(app.store().tasks().len(), 1);
        let task = &app.store().tasks()[0];
        assert_eq!(task.title, "X");
        assert_eq!(task.id, id);
        assert_eq!(task.created_at, created_at);
        assert!(!app.editor.is_editing());
    }

    #[test]
    fn edit_with_blank_title_stays_in_edit_mode() {
        let mut app = app();
        let id = add_task(&mut app, "original");

        app.apply(AppEvent::EditTask(id));
        app.editor.title_mut().clear();
        app.apply(AppEvent::Submit);

        assert!(app.editor.is_editing());
        assert_eq!(app.store().tasks()[0].title, "original");
    }

    #[test]
    fn cancel_edit_discards_the_copy() {
        let mut app = app();
        let id = add_task(&mut app, "original");

        app.apply(AppEvent::EditTask(id));
        app.editor.title_mut().push_str(" scratch");
        app.apply(AppEvent::CancelEdit);

        assert!(!app.editor.is_editing());
        assert_eq!(app.store().tasks()[0].title, "original");
    }

    #[test]
    fn edit_missing_id_is_a_no_op() {
        let mut app = app();
        app.apply(AppEvent::EditTask(12345));
        assert!(!app.editor.is_editing());
    }

    #[test]
    fn status_change_drives_the_filter_scenario() {
        let mut app = app();
        let first = add_task(&mut app, "first");
        let second = add_task(&mut app, "second");

        app.apply(AppEvent::SetStatus(first, Status::Done));

        app.apply(AppEvent::SetFilter(Criterion::Done));
        let done: Vec<i64> = app.visible_tasks().iter().map(|t| t.id).collect();
        assert_eq!(done, vec![first]);

        app.apply(AppEvent::SetFilter(Criterion::Todo));
        let todo: Vec<i64> = app.visible_tasks().iter().map(|t| t.id).collect();
        assert_eq!(todo, vec![second]);
    }

    #[test]
    fn delete_persists_and_is_idempotent() {
        let mut app = app();
        let id = add_task(&mut app, "doomed");
        app.apply(AppEvent::DeleteTask(id));
        app.apply(AppEvent::DeleteTask(id));
        assert!(app.store().tasks().is_empty());

        let App { storage, .. } = app;
        let reloaded = App::load(storage);
        assert!(reloaded.store().tasks().is_empty());
    }

    #[test]
    fn mutations_write_through_to_storage() {
        let mut app = app();
        let id = add_task(&mut app, "task");
        app.apply(AppEvent::SetStatus(id, Status::InProgress));

        let App { storage, .. } = app;
        let raw = storage.read(TASKS_KEY).unwrap().expect("written");
        assert!(raw.contains("\"inProgress\""));
        assert!(raw.contains("\"createdAt\""));
    }
}
