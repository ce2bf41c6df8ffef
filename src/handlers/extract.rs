//! Structured-extraction endpoint: free text in, todo-shaped object out.

use axum::{extract::State, response::Json};

use super::router::AppState;
use super::types::ExtractResponse;
use crate::dates::DateAnchors;
use crate::errors::{AppError, Result, ValidationErrorExt};
use crate::extraction;
use crate::prompts;
use crate::validation;

/// POST /api/ai/extract
///
/// Validation runs before any provider call; an out-of-range input never
/// reaches the model. The credential check likewise happens inside the
/// provider before network traffic.
#[tracing::instrument(skip(state, body))]
pub async fn extract_todo(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<ExtractResponse>> {
    // The body may be arbitrary JSON; "input must be a string" is part of
    // the endpoint contract, not a framework-level deserialization failure.
    let raw_input = body
        .get("input")
        .and_then(|v| v.as_str())
        .ok_or_else(|| AppError::InvalidRequest {
            field: "input".to_string(),
            reason: "input must be a string".to_string(),
        })?;

    let input = validation::normalize_text(raw_input);
    validation::validate_extraction_input(&input).map_validation_err("input")?;

    let today = chrono::Utc::now().date_naive();
    let anchors = DateAnchors::compute(today);
    let prompt = prompts::extraction_prompt(&input, &anchors);

    let raw_output = state.inference.generate(&prompt).await?;

    let draft = extraction::parse_model_output(&raw_output)?;
    let processed = extraction::post_process(draft, today)?;

    tracing::info!(
        title = %processed.title,
        due_date = %processed.due_date,
        "extracted todo from free text"
    );

    Ok(Json(ExtractResponse {
        due_date: processed.due_date_time(),
        title: processed.title,
        description: processed.description,
        priority: processed.priority,
        category: processed.category,
        completed: false,
    }))
}
