//! Client-side optimistic-state layer.
//!
//! The list is mutated locally before the storage round-trip resolves. Each
//! mutation is a transition over an immutable snapshot: `begin_*` applies the
//! change and hands back a [`PendingMutation`] holding the pre-mutation list;
//! `commit`/`commit_add` finalize and `rollback` restores the snapshot.
//!
//! Two invariants hold by construction:
//! - a mutation the backend rejected never remains visible (rollback swaps
//!   the whole snapshot back);
//! - a confirmed add never retains its temporary identifier (`commit_add`
//!   replaces the temp record with the server-confirmed one).

use chrono::{DateTime, Utc};

use crate::errors::AppError;
use crate::model::{Priority, Todo, TodoId};

/// Fields for a new todo before the server has seen it
#[derive(Debug, Clone)]
pub struct TodoDraft {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Priority,
    pub category: Option<String>,
}

/// Partial edit applied to an existing todo
#[derive(Debug, Clone, Default)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub priority: Option<Priority>,
    pub category: Option<Option<String>>,
}

impl TodoPatch {
    pub fn apply(&self, todo: &mut Todo) {
        if let Some(title) = &self.title {
            todo.title = title.clone();
        }
        if let Some(description) = &self.description {
            todo.description = description.clone();
        }
        if let Some(due_date) = self.due_date {
            todo.due_date = due_date;
        }
        if let Some(priority) = self.priority {
            todo.priority = priority;
        }
        if let Some(category) = &self.category {
            todo.category = category.clone();
        }
    }
}

/// In-flight mutation: the pre-mutation snapshot plus the temp id for adds
#[derive(Debug)]
pub struct PendingMutation {
    snapshot: Vec<Todo>,
    temp_id: Option<TodoId>,
}

impl PendingMutation {
    pub fn temp_id(&self) -> Option<TodoId> {
        self.temp_id
    }
}

/// Status filter over the visible list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    /// Incomplete with no due date, or due date at/after now
    InProgress,
    /// Incomplete with due date before now
    Overdue,
}

/// Sort order for the visible list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// high > medium > low
    Priority,
    /// Ascending; undated items always last
    DueDate,
    /// Newest first
    #[default]
    CreatedDate,
    /// Case-insensitive title ordering
    Title,
}

/// Combined view filter
#[derive(Debug, Clone, Default)]
pub struct TodoFilter {
    /// Case-insensitive substring match on title
    pub search: Option<String>,
    pub status: StatusFilter,
    pub priority: Option<Priority>,
}

/// How the UI should react to a failed mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reaction {
    /// Session expired: navigate to the login screen
    RedirectToLogin,
    /// Anything else: transient notification with the message
    Notify(String),
}

/// Single cross-cutting failure policy shared by every mutation path
pub fn classify_failure(err: &AppError) -> Reaction {
    match err {
        AppError::SessionExpired => Reaction::RedirectToLogin,
        other => Reaction::Notify(other.message()),
    }
}

/// The in-memory todo collection with optimistic mutations
#[derive(Debug, Default)]
pub struct TodoListState {
    todos: Vec<Todo>,
}

impl TodoListState {
    /// Seed from an initial fetch; ordered by creation descending
    pub fn from_fetch(mut todos: Vec<Todo>) -> Self {
        todos.sort_by(|a, b| b.created_date.cmp(&a.created_date));
        Self { todos }
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn contains(&self, id: TodoId) -> bool {
        self.todos.iter().any(|t| t.id == id)
    }

    /// Insert a temporary record ahead of the create round-trip
    pub fn begin_add(&mut self, draft: TodoDraft, user_id: &str) -> PendingMutation {
        let snapshot = self.todos.clone();
        let temp_id = TodoId::new();

        self.todos.insert(
            0,
            Todo {
                id: temp_id,
                user_id: user_id.to_string(),
                title: draft.title,
                description: draft.description,
                created_date: Utc::now(),
                due_date: draft.due_date,
                priority: draft.priority,
                category: draft.category,
                completed: false,
            },
        );

        PendingMutation {
            snapshot,
            temp_id: Some(temp_id),
        }
    }

    /// Apply an edit locally; None if the id is unknown
    pub fn begin_edit(&mut self, id: TodoId, patch: &TodoPatch) -> Option<PendingMutation> {
        let snapshot = self.todos.clone();
        let todo = self.todos.iter_mut().find(|t| t.id == id)?;
        patch.apply(todo);
        Some(PendingMutation {
            snapshot,
            temp_id: None,
        })
    }

    /// Flip completion locally; None if the id is unknown
    pub fn begin_toggle(&mut self, id: TodoId) -> Option<PendingMutation> {
        let snapshot = self.todos.clone();
        let todo = self.todos.iter_mut().find(|t| t.id == id)?;
        todo.completed = !todo.completed;
        Some(PendingMutation {
            snapshot,
            temp_id: None,
        })
    }

    /// Remove locally; None if the id is unknown
    pub fn begin_delete(&mut self, id: TodoId) -> Option<PendingMutation> {
        if !self.contains(id) {
            return None;
        }
        let snapshot = self.todos.clone();
        self.todos.retain(|t| t.id != id);
        Some(PendingMutation {
            snapshot,
            temp_id: None,
        })
    }

    /// Backend accepted a non-add mutation; the optimistic state is final
    pub fn commit(&mut self, _pending: PendingMutation) {}

    /// Backend accepted an add: swap the temp record for the confirmed one
    /// (real id, server-assigned timestamps)
    pub fn commit_add(&mut self, pending: PendingMutation, confirmed: Todo) {
        if let Some(temp_id) = pending.temp_id {
            if let Some(slot) = self.todos.iter_mut().find(|t| t.id == temp_id) {
                *slot = confirmed;
                return;
            }
        }
        // Temp record vanished (e.g. concurrent local delete); keep the
        // confirmed record anyway.
        self.todos.insert(0, confirmed);
    }

    /// Backend rejected the mutation: restore the pre-mutation snapshot
    pub fn rollback(&mut self, pending: PendingMutation) {
        self.todos = pending.snapshot;
    }

    /// Derived, filtered and sorted view
    pub fn view(&self, filter: &TodoFilter, sort: SortKey, now: DateTime<Utc>) -> Vec<&Todo> {
        let search = filter.search.as_deref().map(str::to_lowercase);

        let mut visible: Vec<&Todo> = self
            .todos
            .iter()
            .filter(|t| match &search {
                Some(needle) => t.title.to_lowercase().contains(needle),
                None => true,
            })
            .filter(|t| match filter.status {
                StatusFilter::All => true,
                StatusFilter::Completed => t.completed,
                StatusFilter::InProgress => {
                    !t.completed && t.due_date.map(|d| d >= now).unwrap_or(true)
                }
                StatusFilter::Overdue => {
                    !t.completed && t.due_date.map(|d| d < now).unwrap_or(false)
                }
            })
            .filter(|t| match filter.priority {
                Some(priority) => t.priority == priority,
                None => true,
            })
            .collect();

        match sort {
            SortKey::Priority => {
                visible.sort_by(|a, b| {
                    a.priority
                        .rank()
                        .cmp(&b.priority.rank())
                        .then(b.created_date.cmp(&a.created_date))
                });
            }
            SortKey::DueDate => {
                visible.sort_by(|a, b| match (a.due_date, b.due_date) {
                    (Some(x), Some(y)) => x.cmp(&y),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => b.created_date.cmp(&a.created_date),
                });
            }
            SortKey::CreatedDate => {
                visible.sort_by(|a, b| b.created_date.cmp(&a.created_date));
            }
            SortKey::Title => {
                visible.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
            }
        }

        visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap()
    }

    fn todo(title: &str, created_h: u32) -> Todo {
        Todo {
            id: TodoId::new(),
            user_id: "u".to_string(),
            title: title.to_string(),
            description: None,
            created_date: Utc.with_ymd_and_hms(2025, 6, 1, created_h, 0, 0).unwrap(),
            due_date: None,
            priority: Priority::Medium,
            category: None,
            completed: false,
        }
    }

    fn draft(title: &str) -> TodoDraft {
        TodoDraft {
            title: title.to_string(),
            description: None,
            due_date: None,
            priority: Priority::Medium,
            category: None,
        }
    }

    #[test]
    fn test_fetch_orders_created_descending() {
        let state = TodoListState::from_fetch(vec![todo("old", 1), todo("new", 9)]);
        assert_eq!(state.todos()[0].title, "new");
    }

    #[test]
    fn test_add_failure_removes_temp_record() {
        let mut state = TodoListState::from_fetch(vec![todo("existing", 1)]);
        let pending = state.begin_add(draft("optimistic"), "u");
        let temp_id = pending.temp_id().unwrap();
        assert!(state.contains(temp_id));
        assert_eq!(state.todos().len(), 2);

        // Backend rejected the create
        state.rollback(pending);
        assert!(!state.contains(temp_id));
        assert_eq!(state.todos().len(), 1);
        assert_eq!(state.todos()[0].title, "existing");
    }

    #[test]
    fn test_add_success_replaces_temp_id() {
        let mut state = TodoListState::default();
        let pending = state.begin_add(draft("write report"), "u");
        let temp_id = pending.temp_id().unwrap();

        let confirmed = Todo {
            title: "write report".to_string(),
            ..todo("write report", 10)
        };
        let real_id = confirmed.id;
        state.commit_add(pending, confirmed);

        assert!(!state.contains(temp_id));
        assert!(state.contains(real_id));
        assert_eq!(state.todos().len(), 1);
    }

    #[test]
    fn test_edit_rollback_restores_previous_value() {
        let original = todo("before", 1);
        let id = original.id;
        let mut state = TodoListState::from_fetch(vec![original]);

        let patch = TodoPatch {
            title: Some("after".to_string()),
            ..Default::default()
        };
        let pending = state.begin_edit(id, &patch).unwrap();
        assert_eq!(state.todos()[0].title, "after");

        state.rollback(pending);
        assert_eq!(state.todos()[0].title, "before");
    }

    #[test]
    fn test_toggle_and_commit() {
        let original = todo("t", 1);
        let id = original.id;
        let mut state = TodoListState::from_fetch(vec![original]);

        let pending = state.begin_toggle(id).unwrap();
        assert!(state.todos()[0].completed);
        state.commit(pending);
        assert!(state.todos()[0].completed);
    }

    #[test]
    fn test_delete_rollback_restores_record() {
        let original = todo("keep me", 1);
        let id = original.id;
        let mut state = TodoListState::from_fetch(vec![original]);

        let pending = state.begin_delete(id).unwrap();
        assert!(state.todos().is_empty());
        state.rollback(pending);
        assert!(state.contains(id));
    }

    #[test]
    fn test_begin_on_unknown_id_is_none() {
        let mut state = TodoListState::default();
        assert!(state.begin_toggle(TodoId::new()).is_none());
        assert!(state.begin_delete(TodoId::new()).is_none());
    }

    #[test]
    fn test_failure_classification() {
        assert_eq!(
            classify_failure(&AppError::SessionExpired),
            Reaction::RedirectToLogin
        );
        match classify_failure(&AppError::StorageError("down".to_string())) {
            Reaction::Notify(msg) => assert!(msg.contains("down")),
            other => panic!("expected Notify, got {other:?}"),
        }
    }

    #[test]
    fn test_overdue_filter_excludes_completed() {
        let mut overdue = todo("yesterday", 1);
        overdue.due_date = Some(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap());
        let mut done = todo("yesterday done", 2);
        done.due_date = Some(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap());
        done.completed = true;

        let state = TodoListState::from_fetch(vec![overdue, done]);
        let filter = TodoFilter {
            status: StatusFilter::Overdue,
            ..Default::default()
        };
        let view = state.view(&filter, SortKey::CreatedDate, now());
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].title, "yesterday");
    }

    #[test]
    fn test_in_progress_includes_undated() {
        let undated = todo("undated", 1);
        let mut future = todo("future", 2);
        future.due_date = Some(Utc.with_ymd_and_hms(2025, 6, 3, 12, 0, 0).unwrap());
        let mut past = todo("past", 3);
        past.due_date = Some(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap());

        let state = TodoListState::from_fetch(vec![undated, future, past]);
        let filter = TodoFilter {
            status: StatusFilter::InProgress,
            ..Default::default()
        };
        let titles: Vec<&str> = state
            .view(&filter, SortKey::CreatedDate, now())
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        assert!(titles.contains(&"undated"));
        assert!(titles.contains(&"future"));
        assert!(!titles.contains(&"past"));
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let state = TodoListState::from_fetch(vec![todo("Weekly Report", 1), todo("gym", 2)]);
        let filter = TodoFilter {
            search: Some("report".to_string()),
            ..Default::default()
        };
        let view = state.view(&filter, SortKey::CreatedDate, now());
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].title, "Weekly Report");
    }

    #[test]
    fn test_due_date_sort_places_undated_last() {
        let undated = todo("undated", 5);
        let mut early = todo("early", 1);
        early.due_date = Some(Utc.with_ymd_and_hms(2025, 6, 3, 9, 0, 0).unwrap());
        let mut late = todo("late", 2);
        late.due_date = Some(Utc.with_ymd_and_hms(2025, 6, 5, 9, 0, 0).unwrap());

        let state = TodoListState::from_fetch(vec![undated, late, early]);
        let view = state.view(&TodoFilter::default(), SortKey::DueDate, now());
        let titles: Vec<&str> = view.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["early", "late", "undated"]);
    }

    #[test]
    fn test_priority_sort_high_first() {
        let mut high = todo("h", 1);
        high.priority = Priority::High;
        let mut low = todo("l", 2);
        low.priority = Priority::Low;
        let medium = todo("m", 3);

        let state = TodoListState::from_fetch(vec![low, medium, high]);
        let view = state.view(&TodoFilter::default(), SortKey::Priority, now());
        let titles: Vec<&str> = view.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["h", "m", "l"]);
    }
}
