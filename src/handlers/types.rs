//! Shared request/response types for the API surface.

use serde::{Deserialize, Serialize};

use crate::model::{Priority, Todo};

// =============================================================================
// EXTRACTION ENDPOINT
// =============================================================================

/// Response for the structured-extraction endpoint: a todo-shaped object
/// ready to be accepted into the create form
#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractResponse {
    pub title: String,
    pub description: Option<String>,
    /// ISO date-time combining the model's date and time fields
    pub due_date: String,
    pub priority: Priority,
    pub category: Option<String>,
    pub completed: bool,
}

// =============================================================================
// SUMMARY ENDPOINT
// =============================================================================

/// Response for the summary endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
    #[serde(rename = "urgentTasks")]
    pub urgent_tasks: Vec<String>,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Fixed schema the model is asked to return for summaries. The urgent list
/// falls back to the locally computed one, the other arrays to empty.
#[derive(Debug, Deserialize)]
pub struct SummaryModelOutput {
    pub summary: String,
    #[serde(rename = "urgentTasks", default)]
    pub urgent_tasks: Option<Vec<String>>,
    #[serde(default)]
    pub insights: Option<Vec<String>>,
    #[serde(default)]
    pub recommendations: Option<Vec<String>>,
}

// =============================================================================
// TODO CRUD SURFACE
// =============================================================================

/// Request to list todos
#[derive(Debug, Deserialize)]
pub struct ListTodosRequest {
    pub user_id: String,
}

/// Response for todo list operations
#[derive(Debug, Serialize)]
pub struct TodoListResponse {
    pub count: usize,
    pub todos: Vec<Todo>,
}

/// Request to create a new todo
#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Request to update a todo. Omitted fields are left untouched; explicit
/// nulls for due_date/description/category clear them.
#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    pub user_id: String,
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, with = "serde_with_double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, with = "serde_with_double_option")]
    pub due_date: Option<Option<chrono::DateTime<chrono::Utc>>>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default, with = "serde_with_double_option")]
    pub category: Option<Option<String>>,
}

/// Distinguishes "field absent" from "field explicitly null"
mod serde_with_double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

/// Request addressing one todo by id and owner
#[derive(Debug, Deserialize)]
pub struct TodoActionRequest {
    pub user_id: String,
    pub id: String,
}

/// Response for single-todo operations
#[derive(Debug, Serialize)]
pub struct TodoResponse {
    pub success: bool,
    pub todo: Option<Todo>,
}

// =============================================================================
// BOARD SURFACE
// =============================================================================

/// Form body for article create
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ArticleForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Form body for article update
#[derive(Debug, Deserialize)]
pub struct ArticleUpdateForm {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}
