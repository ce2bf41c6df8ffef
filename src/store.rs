//! In-process stores standing in for the managed storage collaborator.
//!
//! Every todo mutation is keyed by both record id and the caller's user id,
//! so a request against someone else's record reads as not-found rather than
//! leaking or mutating cross-user data.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::client::TodoPatch;
use crate::errors::{AppError, Result};
use crate::model::{Article, Todo, TodoId};

/// Todo table keyed by id, filterable by user
#[derive(Debug, Default)]
pub struct TodoStore {
    todos: DashMap<TodoId, Todo>,
}

impl TodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All todos for a user, creation date descending
    pub fn list(&self, user_id: &str) -> Vec<Todo> {
        let mut todos: Vec<Todo> = self
            .todos
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .map(|entry| entry.clone())
            .collect();
        todos.sort_by(|a, b| b.created_date.cmp(&a.created_date));
        todos
    }

    pub fn insert(&self, todo: Todo) -> Todo {
        self.todos.insert(todo.id, todo.clone());
        tracing::debug!(todo_id = %todo.id, user_id = %todo.user_id, "stored todo");
        todo
    }

    /// Fetch scoped by id and owner
    pub fn get(&self, user_id: &str, id: TodoId) -> Result<Todo> {
        self.todos
            .get(&id)
            .filter(|t| t.user_id == user_id)
            .map(|t| t.clone())
            .ok_or_else(|| AppError::TodoNotFound(id.to_string()))
    }

    /// Apply a partial update scoped by id and owner
    pub fn update(&self, user_id: &str, id: TodoId, patch: &TodoPatch) -> Result<Todo> {
        let mut entry = self
            .todos
            .get_mut(&id)
            .filter(|t| t.user_id == user_id)
            .ok_or_else(|| AppError::TodoNotFound(id.to_string()))?;
        patch.apply(&mut entry);
        Ok(entry.clone())
    }

    /// Flip completion scoped by id and owner
    pub fn toggle(&self, user_id: &str, id: TodoId) -> Result<Todo> {
        let mut entry = self
            .todos
            .get_mut(&id)
            .filter(|t| t.user_id == user_id)
            .ok_or_else(|| AppError::TodoNotFound(id.to_string()))?;
        entry.completed = !entry.completed;
        Ok(entry.clone())
    }

    /// Delete scoped by id and owner
    pub fn delete(&self, user_id: &str, id: TodoId) -> Result<()> {
        let owned = self
            .todos
            .get(&id)
            .map(|t| t.user_id == user_id)
            .unwrap_or(false);
        if !owned {
            return Err(AppError::TodoNotFound(id.to_string()));
        }
        self.todos.remove(&id);
        Ok(())
    }
}

/// Board article table with sequential ids
#[derive(Debug)]
pub struct ArticleStore {
    next_id: AtomicU64,
    articles: DashMap<u64, Article>,
}

impl Default for ArticleStore {
    fn default() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            articles: DashMap::new(),
        }
    }
}

impl ArticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, title: String, content: String) -> Article {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let article = Article { id, title, content };
        self.articles.insert(id, article.clone());
        article
    }

    pub fn find(&self, id: u64) -> Option<Article> {
        self.articles.get(&id).map(|a| a.clone())
    }

    /// All articles, id ascending
    pub fn all(&self) -> Vec<Article> {
        let mut articles: Vec<Article> = self.articles.iter().map(|a| a.clone()).collect();
        articles.sort_by_key(|a| a.id);
        articles
    }

    /// Save only if the target exists, mirroring the board's update path
    pub fn update(&self, article: Article) -> bool {
        match self.articles.get_mut(&article.id) {
            Some(mut entry) => {
                *entry = article;
                true
            }
            None => false,
        }
    }

    pub fn delete(&self, id: u64) -> bool {
        self.articles.remove(&id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Priority;
    use chrono::Utc;

    fn todo(user_id: &str, title: &str) -> Todo {
        Todo {
            id: TodoId::new(),
            user_id: user_id.to_string(),
            title: title.to_string(),
            description: None,
            created_date: Utc::now(),
            due_date: None,
            priority: Priority::Medium,
            category: None,
            completed: false,
        }
    }

    #[test]
    fn test_list_is_scoped_by_user() {
        let store = TodoStore::new();
        store.insert(todo("alice", "a1"));
        store.insert(todo("bob", "b1"));

        let alice = store.list("alice");
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].title, "a1");
    }

    #[test]
    fn test_cross_user_mutation_reads_as_not_found() {
        let store = TodoStore::new();
        let t = store.insert(todo("alice", "a1"));

        assert_eq!(
            store.toggle("bob", t.id).unwrap_err().code(),
            "TODO_NOT_FOUND"
        );
        assert_eq!(
            store.delete("bob", t.id).unwrap_err().code(),
            "TODO_NOT_FOUND"
        );
        // Record untouched
        assert!(!store.get("alice", t.id).unwrap().completed);
    }

    #[test]
    fn test_toggle_flips_completion() {
        let store = TodoStore::new();
        let t = store.insert(todo("alice", "a1"));
        assert!(store.toggle("alice", t.id).unwrap().completed);
        assert!(!store.toggle("alice", t.id).unwrap().completed);
    }

    #[test]
    fn test_update_applies_patch() {
        let store = TodoStore::new();
        let t = store.insert(todo("alice", "before"));
        let patch = TodoPatch {
            title: Some("after".to_string()),
            priority: Some(Priority::High),
            ..Default::default()
        };
        let updated = store.update("alice", t.id, &patch).unwrap();
        assert_eq!(updated.title, "after");
        assert_eq!(updated.priority, Priority::High);
    }

    #[test]
    fn test_article_lifecycle() {
        let store = ArticleStore::new();
        let a = store.create("제목".to_string(), "내용".to_string());
        assert_eq!(a.id, 1);
        assert_eq!(store.all().len(), 1);

        let updated = Article {
            id: a.id,
            title: "수정".to_string(),
            content: a.content.clone(),
        };
        assert!(store.update(updated));
        assert_eq!(store.find(a.id).unwrap().title, "수정");

        // Update against a missing id is a no-op, matching the board
        assert!(!store.update(Article {
            id: 999,
            title: "x".to_string(),
            content: "y".to_string()
        }));

        assert!(store.delete(a.id));
        assert!(store.find(a.id).is_none());
    }
}
