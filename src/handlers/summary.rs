//! Summary endpoint: deterministic statistics plus a model-written report.

use axum::{extract::State, response::Json};

use super::router::AppState;
use super::types::{SummaryModelOutput, SummaryResponse};
use crate::errors::{AppError, Result};
use crate::inference::extract_json;
use crate::model::{Period, Todo};
use crate::prompts;
use crate::stats::TodoStatistics;

/// POST /api/ai/summary
///
/// An empty todo list returns the canned zero-data response without
/// invoking inference.
#[tracing::instrument(skip(state, body))]
pub async fn summarize_todos(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<SummaryResponse>> {
    let todos_value = body
        .get("todos")
        .filter(|v| v.is_array())
        .cloned()
        .ok_or_else(|| AppError::InvalidRequest {
            field: "todos".to_string(),
            reason: "todos must be a list".to_string(),
        })?;

    let period = body
        .get("period")
        .and_then(|v| v.as_str())
        .and_then(Period::parse)
        .ok_or_else(|| AppError::InvalidRequest {
            field: "period".to_string(),
            reason: "period must be 'today' or 'week'".to_string(),
        })?;

    let todos: Vec<Todo> =
        serde_json::from_value(todos_value).map_err(|e| AppError::InvalidRequest {
            field: "todos".to_string(),
            reason: format!("malformed todo record: {e}"),
        })?;

    if todos.is_empty() {
        return Ok(Json(empty_summary(period)));
    }

    let today = chrono::Utc::now().date_naive();
    let stats = TodoStatistics::compute(&todos, today);
    let prompt = prompts::summary_prompt(period, &stats);

    let raw_output = state.inference.generate(&prompt).await?;

    let parsed: SummaryModelOutput = serde_json::from_str(&extract_json(&raw_output))
        .map_err(|e| AppError::MalformedModelOutput(format!("unparseable summary: {e}")))?;

    tracing::info!(total = stats.total, period = ?period, "summarized todo list");

    Ok(Json(SummaryResponse {
        summary: parsed.summary,
        // The model may omit its urgent list; fall back to the locally
        // computed one.
        urgent_tasks: parsed.urgent_tasks.unwrap_or(stats.urgent_titles),
        insights: parsed.insights.unwrap_or_default(),
        recommendations: parsed.recommendations.unwrap_or_default(),
    }))
}

/// Canned response when there is nothing to summarize
pub fn empty_summary(period: Period) -> SummaryResponse {
    let summary = match period {
        Period::Today => "오늘 등록된 할 일이 없습니다. 새로운 할 일을 추가해보세요!",
        Period::Week => "이번 주 등록된 할 일이 없습니다. 새로운 할 일을 추가해보세요!",
    };
    SummaryResponse {
        summary: summary.to_string(),
        urgent_tasks: Vec::new(),
        insights: Vec::new(),
        recommendations: Vec::new(),
    }
}
