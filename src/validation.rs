//! Input validation for the API surface.
//!
//! Validation runs before any external call; the extraction endpoint must
//! reject out-of-range input without ever touching the inference provider.

use anyhow::{anyhow, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Length bounds for extraction input, counted in chars after normalization
pub const MIN_INPUT_CHARS: usize = 2;
pub const MAX_INPUT_CHARS: usize = 500;

/// Title bound enforced by extraction post-processing
pub const MAX_TITLE_CHARS: usize = 100;

pub const MAX_USER_ID_LENGTH: usize = 128;

static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

static TIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{2}:\d{2}$").unwrap());

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Trim and collapse internal whitespace runs to a single space
pub fn normalize_text(input: &str) -> String {
    WHITESPACE_RUN.replace_all(input.trim(), " ").into_owned()
}

/// Validate already-normalized extraction input
pub fn validate_extraction_input(input: &str) -> Result<()> {
    let len = input.chars().count();

    if len == 0 {
        return Err(anyhow!("input cannot be empty"));
    }

    if len < MIN_INPUT_CHARS {
        return Err(anyhow!(
            "input too short: {len} chars (min: {MIN_INPUT_CHARS})"
        ));
    }

    if len > MAX_INPUT_CHARS {
        return Err(anyhow!(
            "input too long: {len} chars (max: {MAX_INPUT_CHARS})"
        ));
    }

    Ok(())
}

/// Validate user_id
pub fn validate_user_id(user_id: &str) -> Result<()> {
    if user_id.is_empty() {
        return Err(anyhow!("user_id cannot be empty"));
    }

    if user_id.len() > MAX_USER_ID_LENGTH {
        return Err(anyhow!(
            "user_id too long: {} chars (max: {})",
            user_id.len(),
            MAX_USER_ID_LENGTH
        ));
    }

    // Only allow alphanumeric, dash, underscore, @, .
    if !user_id
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '@' || c == '.')
    {
        return Err(anyhow!(
            "user_id contains invalid characters (allowed: alphanumeric, -, _, @, .)"
        ));
    }

    Ok(())
}

/// Check a model-produced date against `YYYY-MM-DD`
pub fn is_valid_date_format(value: &str) -> bool {
    DATE_PATTERN.is_match(value)
}

/// Check a model-produced time against `HH:mm`
pub fn is_valid_time_format(value: &str) -> bool {
    TIME_PATTERN.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize_text("  내일  오전   10시 \n 회의 "), "내일 오전 10시 회의");
        assert_eq!(normalize_text("\t\n "), "");
    }

    #[test]
    fn test_input_length_bounds() {
        assert!(validate_extraction_input("").is_err());
        assert!(validate_extraction_input("a").is_err());
        assert!(validate_extraction_input("ab").is_ok());
        assert!(validate_extraction_input(&"가".repeat(500)).is_ok());
        assert!(validate_extraction_input(&"가".repeat(501)).is_err());
    }

    #[test]
    fn test_input_length_counts_chars_not_bytes() {
        // 300 Hangul chars are 900 bytes but still within the 500-char bound
        assert!(validate_extraction_input(&"할".repeat(300)).is_ok());
    }

    #[test]
    fn test_valid_user_id() {
        assert!(validate_user_id("alice").is_ok());
        assert!(validate_user_id("user@example.com").is_ok());
        assert!(validate_user_id("").is_err());
        assert!(validate_user_id("user/123").is_err());
        assert!(validate_user_id(&"a".repeat(200)).is_err());
    }

    #[test]
    fn test_date_format() {
        assert!(is_valid_date_format("2025-06-02"));
        assert!(!is_valid_date_format("2025-6-2"));
        assert!(!is_valid_date_format("2025/06/02"));
        assert!(!is_valid_date_format("tomorrow"));
    }

    #[test]
    fn test_time_format() {
        assert!(is_valid_time_format("09:00"));
        assert!(is_valid_time_format("23:59"));
        assert!(!is_valid_time_format("9:00"));
        assert!(!is_valid_time_format("0900"));
    }
}
