//! Deterministic statistics computed over a todo list before inference.
//!
//! Everything here is derived from the request payload; nothing is stored.
//! The summary endpoint serializes these numbers into the report prompt, and
//! falls back to `urgent_titles` when the model omits its own urgent list.

use chrono::{Datelike, Days, NaiveDate, Timelike, Weekday};

use crate::dates::korean_weekday;
use crate::model::{Priority, Todo};

/// Maximum urgent task titles surfaced
pub const URGENT_TASK_CAP: usize = 5;

/// round(100 * completed / total, 1); zero total yields 0.0
pub fn completion_rate(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (completed as f64 / total as f64 * 1000.0).round() / 10.0
}

/// Total/completed counter for one grouping bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BucketStat {
    pub total: usize,
    pub completed: usize,
}

impl BucketStat {
    fn add(&mut self, completed: bool) {
        self.total += 1;
        if completed {
            self.completed += 1;
        }
    }

    pub fn rate(&self) -> f64 {
        completion_rate(self.completed, self.total)
    }
}

/// An incomplete todo past its due date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverdueItem {
    pub title: String,
    pub days_overdue: i64,
}

/// The full battery of deterministic statistics
#[derive(Debug, Clone)]
pub struct TodoStatistics {
    pub total: usize,
    pub completed: usize,
    pub completion_rate: f64,

    pub high: BucketStat,
    pub medium: BucketStat,
    pub low: BucketStat,

    /// Incomplete tasks that are high-priority or due today/tomorrow,
    /// capped at [`URGENT_TASK_CAP`]
    pub urgent_titles: Vec<String>,

    /// Time-of-day buckets ranked by completion rate descending; the first
    /// entry is the most productive slot
    pub time_of_day: Vec<(&'static str, BucketStat)>,

    /// Category buckets including the unclassified bucket
    pub categories: Vec<(String, BucketStat)>,

    /// (completed tasks with due_date >= today) / (tasks with any due_date)
    pub deadline_compliance_rate: f64,

    pub overdue: Vec<OverdueItem>,

    /// Day-of-week buckets by creation date, ranked by completion rate
    pub by_weekday: Vec<(&'static str, BucketStat)>,

    /// Completed tasks whose due_date minus created_date is at most one day
    pub quick_completed: Vec<String>,
}

/// Korean label for the unclassified category bucket
const UNCLASSIFIED: &str = "미분류";

const TIME_SLOTS: [&str; 4] = ["오전", "오후", "저녁", "시간 미지정"];

fn time_slot_index(hour: Option<u32>) -> usize {
    match hour {
        Some(h) if h < 12 => 0,
        Some(h) if h < 18 => 1,
        Some(_) => 2,
        None => 3,
    }
}

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

impl TodoStatistics {
    pub fn compute(todos: &[Todo], today: NaiveDate) -> Self {
        let total = todos.len();
        let completed = todos.iter().filter(|t| t.completed).count();
        let tomorrow = today + Days::new(1);

        let mut high = BucketStat::default();
        let mut medium = BucketStat::default();
        let mut low = BucketStat::default();

        let mut slots = [BucketStat::default(); 4];
        let mut weekday_buckets = [BucketStat::default(); 7];
        let mut categories: Vec<(String, BucketStat)> = Vec::new();

        let mut urgent_titles = Vec::new();
        let mut overdue = Vec::new();
        let mut quick_completed = Vec::new();

        let mut with_due = 0usize;
        let mut met_deadline = 0usize;

        for todo in todos {
            match todo.priority {
                Priority::High => high.add(todo.completed),
                Priority::Medium => medium.add(todo.completed),
                Priority::Low => low.add(todo.completed),
            }

            let due_day = todo.due_date.map(|d| d.date_naive());

            slots[time_slot_index(todo.due_date.map(|d| d.hour()))].add(todo.completed);

            let weekday = todo.created_date.date_naive().weekday();
            let weekday_idx = WEEKDAYS.iter().position(|w| *w == weekday).unwrap_or(0);
            weekday_buckets[weekday_idx].add(todo.completed);

            let category = todo
                .category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .unwrap_or(UNCLASSIFIED);
            match categories.iter_mut().find(|(name, _)| name == category) {
                Some((_, bucket)) => bucket.add(todo.completed),
                None => {
                    let mut bucket = BucketStat::default();
                    bucket.add(todo.completed);
                    categories.push((category.to_string(), bucket));
                }
            }

            if !todo.completed
                && urgent_titles.len() < URGENT_TASK_CAP
                && (todo.priority == Priority::High
                    || due_day == Some(today)
                    || due_day == Some(tomorrow))
            {
                urgent_titles.push(todo.title.clone());
            }

            if let Some(day) = due_day {
                with_due += 1;
                if todo.completed && day >= today {
                    met_deadline += 1;
                }
                if !todo.completed && day < today {
                    overdue.push(OverdueItem {
                        title: todo.title.clone(),
                        days_overdue: (today - day).num_days(),
                    });
                }
            }

            if todo.completed {
                if let Some(due) = todo.due_date {
                    if due - todo.created_date <= chrono::Duration::days(1) {
                        quick_completed.push(todo.title.clone());
                    }
                }
            }
        }

        let mut time_of_day: Vec<(&'static str, BucketStat)> = TIME_SLOTS
            .iter()
            .zip(slots)
            .map(|(label, bucket)| (*label, bucket))
            .filter(|(_, bucket)| bucket.total > 0)
            .collect();
        time_of_day.sort_by(|a, b| {
            b.1.rate()
                .partial_cmp(&a.1.rate())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut by_weekday: Vec<(&'static str, BucketStat)> = WEEKDAYS
            .iter()
            .zip(weekday_buckets)
            .map(|(w, bucket)| (korean_weekday(*w), bucket))
            .filter(|(_, bucket)| bucket.total > 0)
            .collect();
        by_weekday.sort_by(|a, b| {
            b.1.rate()
                .partial_cmp(&a.1.rate())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Self {
            total,
            completed,
            completion_rate: completion_rate(completed, total),
            high,
            medium,
            low,
            urgent_titles,
            time_of_day,
            categories,
            deadline_compliance_rate: completion_rate(met_deadline, with_due),
            overdue,
            by_weekday,
            quick_completed,
        }
    }
}
