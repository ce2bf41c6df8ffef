//! Board article handlers, a form-backed CRUD surface kept separate from the
//! todo API. Mutations arrive as form posts and answer with redirects; reads
//! answer with JSON in place of server-rendered pages.

use axum::{
    extract::{Form, Path, State},
    response::{Json, Redirect},
};

use super::router::AppState;
use super::types::{ArticleForm, ArticleUpdateForm};
use crate::errors::{AppError, Result};
use crate::model::Article;

/// GET /articles
#[tracing::instrument(skip(state))]
pub async fn list_articles(State(state): State<AppState>) -> Json<Vec<Article>> {
    Json(state.articles.all())
}

/// GET /articles/new
///
/// Blank form scaffold for the create page
pub async fn new_article_form() -> Json<ArticleForm> {
    Json(ArticleForm::default())
}

/// POST /articles/create
#[tracing::instrument(skip(state, form))]
pub async fn create_article(
    State(state): State<AppState>,
    Form(form): Form<ArticleForm>,
) -> Redirect {
    let article = state.articles.create(form.title, form.content);
    tracing::info!(article_id = article.id, "created article");
    Redirect::to(&format!("/articles/{}", article.id))
}

/// GET /articles/{id}
#[tracing::instrument(skip(state))]
pub async fn show_article(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Article>> {
    state
        .articles
        .find(id)
        .map(Json)
        .ok_or(AppError::ArticleNotFound(id))
}

/// GET /articles/{id}/edit
///
/// Prefilled edit form for an existing article
#[tracing::instrument(skip(state))]
pub async fn edit_article_form(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Article>> {
    state
        .articles
        .find(id)
        .map(Json)
        .ok_or(AppError::ArticleNotFound(id))
}

/// POST /articles/update
///
/// Saves only when the target still exists, then redirects to the detail
/// page either way.
#[tracing::instrument(skip(state, form))]
pub async fn update_article(
    State(state): State<AppState>,
    Form(form): Form<ArticleUpdateForm>,
) -> Redirect {
    let id = form.id;
    let saved = state.articles.update(Article {
        id,
        title: form.title,
        content: form.content,
    });
    if !saved {
        tracing::warn!(article_id = id, "update targeted a missing article");
    }
    Redirect::to(&format!("/articles/{id}"))
}

/// GET /articles/{id}/delete
#[tracing::instrument(skip(state))]
pub async fn delete_article(State(state): State<AppState>, Path(id): Path<u64>) -> Redirect {
    state.articles.delete(id);
    Redirect::to("/articles")
}
