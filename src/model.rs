//! Domain types: todos and board articles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Suggested categories surfaced in the UI. Free-text categories are allowed;
/// this set is a suggestion, not an enforced enum.
pub const SUGGESTED_CATEGORIES: [&str; 4] = ["업무", "개인", "건강", "학습"];

/// Fallback title when the model produces something unusably short
pub const TITLE_PLACEHOLDER: &str = "할 일";

/// Default due time when the model omits one
pub const DEFAULT_DUE_TIME: &str = "09:00";

/// Unique todo identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TodoId(pub Uuid);

impl TodoId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Todo priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Sort rank, high first
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }

    /// Lenient parse used on model output: unknown values fall back to medium
    pub fn parse_lenient(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("high") => Self::High,
            Some("low") => Self::Low,
            _ => Self::Medium,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "높음",
            Self::Medium => "보통",
            Self::Low => "낮음",
        }
    }
}

/// The single domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_date: DateTime<Utc>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

impl Todo {
    /// Date-only overdue check (a todo due earlier today is not overdue here;
    /// the client-side status filter uses instant comparison instead)
    pub fn is_overdue_on(&self, today: chrono::NaiveDate) -> bool {
        !self.completed
            && self
                .due_date
                .map(|d| d.date_naive() < today)
                .unwrap_or(false)
    }
}

/// Report period for the summary endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Today,
    Week,
}

impl Period {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "today" => Some(Self::Today),
            "week" => Some(Self::Week),
            _ => None,
        }
    }

    /// Korean phrase interpolated into the summary prompt
    pub fn phrase(&self) -> &'static str {
        match self {
            Self::Today => "오늘",
            Self::Week => "이번 주",
        }
    }
}

/// Board article (independent CRUD surface, ported from the form-backed board)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: u64,
    pub title: String,
    pub content: String,
}
