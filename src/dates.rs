//! Named date anchors interpolated into the extraction prompt.
//!
//! The model receives a small reference table (today, tomorrow, ...) so that
//! relative-day words in the user's text resolve deterministically instead of
//! depending on the model's own notion of the current date.

use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Deterministic date reference table relative to "today"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateAnchors {
    pub today: NaiveDate,
    pub tomorrow: NaiveDate,
    pub day_after_tomorrow: NaiveDate,
    /// Today if today is Friday, otherwise the next Friday
    pub this_friday: NaiveDate,
    /// The Monday seven days out if today is Monday, otherwise the nearest
    /// upcoming Monday
    pub next_monday: NaiveDate,
}

impl DateAnchors {
    pub fn compute(today: NaiveDate) -> Self {
        let from_monday = today.weekday().num_days_from_monday() as u64;

        let this_friday = if today.weekday() == Weekday::Fri {
            today
        } else {
            // Friday is 4 days from Monday
            let ahead = (4 + 7 - from_monday) % 7;
            today + Days::new(ahead)
        };

        // 1..=7 days ahead; lands on 7 exactly when today is Monday
        let next_monday = today + Days::new(7 - from_monday);

        Self {
            today,
            tomorrow: today + Days::new(1),
            day_after_tomorrow: today + Days::new(2),
            this_friday,
            next_monday,
        }
    }
}

/// Korean weekday name, Sunday through Saturday
pub fn korean_weekday(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "일요일",
        Weekday::Mon => "월요일",
        Weekday::Tue => "화요일",
        Weekday::Wed => "수요일",
        Weekday::Thu => "목요일",
        Weekday::Fri => "금요일",
        Weekday::Sat => "토요일",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_anchors_on_monday() {
        // 2025-06-02 is a Monday
        let anchors = DateAnchors::compute(d(2025, 6, 2));
        assert_eq!(anchors.tomorrow, d(2025, 6, 3));
        assert_eq!(anchors.day_after_tomorrow, d(2025, 6, 4));
        assert_eq!(anchors.this_friday, d(2025, 6, 6));
        // Today is Monday: next Monday is seven days out, not today
        assert_eq!(anchors.next_monday, d(2025, 6, 9));
    }

    #[test]
    fn test_this_friday_on_friday_is_today() {
        let friday = d(2025, 6, 6);
        assert_eq!(DateAnchors::compute(friday).this_friday, friday);
    }

    #[test]
    fn test_this_friday_on_saturday_is_next_week() {
        let saturday = d(2025, 6, 7);
        assert_eq!(DateAnchors::compute(saturday).this_friday, d(2025, 6, 13));
    }

    #[test]
    fn test_next_monday_on_sunday_is_tomorrow() {
        let sunday = d(2025, 6, 8);
        assert_eq!(DateAnchors::compute(sunday).next_monday, d(2025, 6, 9));
    }

    #[test]
    fn test_anchors_cross_month_boundary() {
        // 2025-06-30 is a Monday
        let anchors = DateAnchors::compute(d(2025, 6, 30));
        assert_eq!(anchors.tomorrow, d(2025, 7, 1));
        assert_eq!(anchors.this_friday, d(2025, 7, 4));
        assert_eq!(anchors.next_monday, d(2025, 7, 7));
    }
}
