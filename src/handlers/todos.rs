//! Todo CRUD handlers: the storage collaborator surface consumed by the
//! client state layer. Every mutation is scoped by record id and owner.

use axum::{extract::State, response::Json};
use chrono::Utc;
use uuid::Uuid;

use super::router::AppState;
use super::types::{
    CreateTodoRequest, ListTodosRequest, TodoActionRequest, TodoListResponse, TodoResponse,
    UpdateTodoRequest,
};
use crate::client::TodoPatch;
use crate::errors::{AppError, Result, ValidationErrorExt};
use crate::model::{Todo, TodoId};
use crate::validation;

fn parse_todo_id(raw: &str) -> Result<TodoId> {
    Uuid::parse_str(raw)
        .map(TodoId)
        .map_err(|e| AppError::InvalidRequest {
            field: "id".to_string(),
            reason: format!("invalid todo id: {e}"),
        })
}

/// POST /api/todos/list
#[tracing::instrument(skip(state))]
pub async fn list_todos(
    State(state): State<AppState>,
    Json(req): Json<ListTodosRequest>,
) -> Result<Json<TodoListResponse>> {
    validation::validate_user_id(&req.user_id).map_validation_err("user_id")?;

    let todos = state.todos.list(&req.user_id);
    Ok(Json(TodoListResponse {
        count: todos.len(),
        todos,
    }))
}

/// POST /api/todos/add
#[tracing::instrument(skip(state, req))]
pub async fn create_todo(
    State(state): State<AppState>,
    Json(req): Json<CreateTodoRequest>,
) -> Result<Json<TodoResponse>> {
    validation::validate_user_id(&req.user_id).map_validation_err("user_id")?;

    let title = validation::normalize_text(&req.title);
    if title.is_empty() {
        return Err(AppError::InvalidRequest {
            field: "title".to_string(),
            reason: "title cannot be empty".to_string(),
        });
    }

    let todo = state.todos.insert(Todo {
        id: TodoId::new(),
        user_id: req.user_id,
        title,
        description: req.description,
        created_date: Utc::now(),
        due_date: req.due_date,
        priority: req.priority.unwrap_or_default(),
        category: req.category,
        completed: false,
    });

    Ok(Json(TodoResponse {
        success: true,
        todo: Some(todo),
    }))
}

/// POST /api/todos/update
///
/// Due dates entered here are stored as-is: past-date correction is an
/// extraction-path behavior only.
#[tracing::instrument(skip(state, req))]
pub async fn update_todo(
    State(state): State<AppState>,
    Json(req): Json<UpdateTodoRequest>,
) -> Result<Json<TodoResponse>> {
    validation::validate_user_id(&req.user_id).map_validation_err("user_id")?;
    let id = parse_todo_id(&req.id)?;

    let patch = TodoPatch {
        title: req.title.map(|t| validation::normalize_text(&t)),
        description: req.description,
        due_date: req.due_date,
        priority: req.priority,
        category: req.category,
    };

    let todo = state.todos.update(&req.user_id, id, &patch)?;
    Ok(Json(TodoResponse {
        success: true,
        todo: Some(todo),
    }))
}

/// POST /api/todos/toggle
#[tracing::instrument(skip(state))]
pub async fn toggle_todo(
    State(state): State<AppState>,
    Json(req): Json<TodoActionRequest>,
) -> Result<Json<TodoResponse>> {
    validation::validate_user_id(&req.user_id).map_validation_err("user_id")?;
    let id = parse_todo_id(&req.id)?;

    let todo = state.todos.toggle(&req.user_id, id)?;
    Ok(Json(TodoResponse {
        success: true,
        todo: Some(todo),
    }))
}

/// POST /api/todos/delete
#[tracing::instrument(skip(state))]
pub async fn delete_todo(
    State(state): State<AppState>,
    Json(req): Json<TodoActionRequest>,
) -> Result<Json<TodoResponse>> {
    validation::validate_user_id(&req.user_id).map_validation_err("user_id")?;
    let id = parse_todo_id(&req.id)?;

    state.todos.delete(&req.user_id, id)?;
    Ok(Json(TodoResponse {
        success: true,
        todo: None,
    }))
}
