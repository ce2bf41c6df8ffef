//! Deterministic post-processing of model output on the extraction path.
//!
//! The model is trusted to apply the prompt rules; code enforces only the
//! invariants that must hold regardless of what came back: title bounds, no
//! past due dates, defaults for omitted fields, and strict date/time formats.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::errors::{AppError, Result};
use crate::model::{Priority, DEFAULT_DUE_TIME, TITLE_PLACEHOLDER};
use crate::validation::{self, MAX_TITLE_CHARS};

/// Fixed schema the model is asked to return
#[derive(Debug, Deserialize)]
pub struct ModelTodoDraft {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub due_time: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Draft after code-enforced post-processing, formats already validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedDraft {
    pub title: String,
    pub description: Option<String>,
    /// `YYYY-MM-DD`, never before `today`
    pub due_date: String,
    /// `HH:mm`
    pub due_time: String,
    pub priority: Priority,
    pub category: Option<String>,
}

impl ProcessedDraft {
    /// Combined ISO date-time for the response body
    pub fn due_date_time(&self) -> String {
        format!("{}T{}:00", self.due_date, self.due_time)
    }
}

/// Parse raw model text into the fixed draft schema
pub fn parse_model_output(raw: &str) -> Result<ModelTodoDraft> {
    let json = crate::inference::extract_json(raw);
    serde_json::from_str(&json)
        .map_err(|e| AppError::MalformedModelOutput(format!("unparseable model output: {e}")))
}

/// Apply the code-enforced corrections, then validate the final formats
pub fn post_process(draft: ModelTodoDraft, today: NaiveDate) -> Result<ProcessedDraft> {
    let title = clamp_title(draft.title.as_deref().unwrap_or(""));

    let due_date = correct_past_date(draft.due_date.as_deref().unwrap_or(""), today);

    let due_time = draft
        .due_time
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_DUE_TIME.to_string());

    if !validation::is_valid_date_format(&due_date) {
        return Err(AppError::MalformedModelOutput(format!(
            "due_date '{due_date}' is not YYYY-MM-DD"
        )));
    }
    if !validation::is_valid_time_format(&due_time) {
        return Err(AppError::MalformedModelOutput(format!(
            "due_time '{due_time}' is not HH:mm"
        )));
    }

    let description = draft
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    let category = draft
        .category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    Ok(ProcessedDraft {
        title,
        description,
        due_date,
        due_time,
        priority: Priority::parse_lenient(draft.priority.as_deref()),
        category,
    })
}

/// Titles under 2 chars become the fixed placeholder; titles over 100 chars
/// are cut to 97 chars plus a 3-char ellipsis, landing on exactly 100
fn clamp_title(raw: &str) -> String {
    let title = validation::normalize_text(raw);
    let len = title.chars().count();

    if len < 2 {
        return TITLE_PLACEHOLDER.to_string();
    }

    if len > MAX_TITLE_CHARS {
        let mut clamped: String = title.chars().take(MAX_TITLE_CHARS - 3).collect();
        clamped.push_str("...");
        return clamped;
    }

    title
}

/// A well-formed date strictly before today is rewritten to today
/// (date-only comparison). Malformed input passes through untouched so the
/// format validation downstream reports it.
fn correct_past_date(raw: &str, today: NaiveDate) -> String {
    let value = raw.trim();

    if validation::is_valid_date_format(value) {
        if let Ok(parsed) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            if parsed < today {
                return today.format("%Y-%m-%d").to_string();
            }
        }
    }

    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    fn draft(title: &str, due_date: &str) -> ModelTodoDraft {
        ModelTodoDraft {
            title: Some(title.to_string()),
            description: None,
            due_date: Some(due_date.to_string()),
            due_time: None,
            priority: None,
            category: None,
        }
    }

    #[test]
    fn test_short_title_becomes_placeholder() {
        let out = post_process(draft("잠", "2025-06-03"), today()).unwrap();
        assert_eq!(out.title, TITLE_PLACEHOLDER);

        let missing = ModelTodoDraft {
            title: None,
            ..draft("", "2025-06-03")
        };
        let out = post_process(missing, today()).unwrap();
        assert_eq!(out.title, TITLE_PLACEHOLDER);
    }

    #[test]
    fn test_long_title_is_exactly_100_chars_with_ellipsis() {
        let long = "할".repeat(150);
        let out = post_process(draft(&long, "2025-06-03"), today()).unwrap();
        assert_eq!(out.title.chars().count(), 100);
        assert!(out.title.ends_with("..."));
        assert!(out.title.starts_with(&"할".repeat(97)));
    }

    #[test]
    fn test_title_at_bound_is_untouched() {
        let exactly = "a".repeat(100);
        let out = post_process(draft(&exactly, "2025-06-03"), today()).unwrap();
        assert_eq!(out.title, exactly);
    }

    #[test]
    fn test_past_date_rewritten_to_today() {
        let out = post_process(draft("팀 회의", "2025-05-30"), today()).unwrap();
        assert_eq!(out.due_date, "2025-06-02");
    }

    #[test]
    fn test_today_and_future_dates_kept() {
        let out = post_process(draft("팀 회의", "2025-06-02"), today()).unwrap();
        assert_eq!(out.due_date, "2025-06-02");

        let out = post_process(draft("팀 회의", "2025-06-10"), today()).unwrap();
        assert_eq!(out.due_date, "2025-06-10");
    }

    #[test]
    fn test_defaults_for_missing_time_and_priority() {
        let out = post_process(draft("팀 회의", "2025-06-03"), today()).unwrap();
        assert_eq!(out.due_time, "09:00");
        assert_eq!(out.priority, Priority::Medium);
    }

    #[test]
    fn test_malformed_date_is_rejected() {
        let err = post_process(draft("팀 회의", "내일"), today()).unwrap_err();
        assert_eq!(err.code(), "MALFORMED_MODEL_OUTPUT");

        let err = post_process(draft("팀 회의", ""), today()).unwrap_err();
        assert_eq!(err.code(), "MALFORMED_MODEL_OUTPUT");
    }

    #[test]
    fn test_malformed_time_is_rejected() {
        let mut d = draft("팀 회의", "2025-06-03");
        d.due_time = Some("9시".to_string());
        let err = post_process(d, today()).unwrap_err();
        assert_eq!(err.code(), "MALFORMED_MODEL_OUTPUT");
    }

    #[test]
    fn test_due_date_time_combines_parts() {
        let mut d = draft("팀 회의", "2025-06-03");
        d.due_time = Some("10:00".to_string());
        let out = post_process(d, today()).unwrap();
        assert_eq!(out.due_date_time(), "2025-06-03T10:00:00");
    }

    #[test]
    fn test_parse_model_output_with_fences() {
        let raw = "```json\n{\"title\":\"팀 회의 준비\",\"due_date\":\"2025-06-03\",\"due_time\":\"10:00\",\"priority\":\"medium\"}\n```";
        let draft = parse_model_output(raw).unwrap();
        assert_eq!(draft.title.as_deref(), Some("팀 회의 준비"));
        assert_eq!(draft.due_time.as_deref(), Some("10:00"));
    }

    #[test]
    fn test_parse_model_output_garbage_is_malformed() {
        let err = parse_model_output("I could not do that").unwrap_err();
        assert_eq!(err.code(), "MALFORMED_MODEL_OUTPUT");
    }
}
