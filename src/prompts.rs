//! Prompt construction for the two AI endpoints.
//!
//! Keyword-to-value mapping (relative-day words, urgency words, category
//! hints) lives here in the prompt text and is applied by the hosted model;
//! only the date anchors and statistics interpolated below are computed in
//! code.

use chrono::Datelike;
use std::fmt::Write;

use crate::dates::{korean_weekday, DateAnchors};
use crate::model::Period;
use crate::stats::TodoStatistics;

/// Rule-laden instruction for structured extraction
pub fn extraction_prompt(input: &str, anchors: &DateAnchors) -> String {
    format!(
        r#"당신은 자연어 문장을 할 일(todo) 레코드로 변환하는 도우미입니다.
반드시 JSON 객체 하나만 출력하세요. 설명이나 마크다운 없이 JSON만 출력합니다.

날짜 기준표 (상대 표현은 반드시 이 표로 해석):
- 오늘: {today} ({today_weekday})
- 내일: {tomorrow}
- 모레: {day_after}
- 이번 주 금요일: {this_friday}
- 다음 주 월요일: {next_monday}

규칙:
1. title: 할 일의 핵심 행동을 간결한 한 문장으로. 100자 이내.
2. description: 부가 정보가 있으면 채우고, 없으면 null.
3. due_date: "YYYY-MM-DD" 형식. 날짜 표현이 없으면 오늘 날짜를 사용.
4. due_time: "HH:mm" 형식. "오전"은 09:00-11:00, "점심"은 12:00, "오후"는 14:00-17:00,
   "저녁"은 19:00, 시각 표현이 없으면 null.
5. priority: "급한", "긴급", "중요", "빨리", "ASAP" 등 긴급 표현이 있으면 "high",
   "여유", "천천히", "나중에" 등이 있으면 "low", 그 외에는 "medium".
6. category: 회의/업무/보고서/프로젝트는 "업무", 운동/병원/건강검진은 "건강",
   공부/강의/시험/책은 "학습", 약속/쇼핑/집안일은 "개인", 분류가 애매하면 null.

입력: "{input}"

출력 형식:
{{"title":"...","description":null,"due_date":"YYYY-MM-DD","due_time":"HH:mm","priority":"high|medium|low","category":null}}"#,
        today = anchors.today.format("%Y-%m-%d"),
        today_weekday = korean_weekday(anchors.today.weekday()),
        tomorrow = anchors.tomorrow.format("%Y-%m-%d"),
        day_after = anchors.day_after_tomorrow.format("%Y-%m-%d"),
        this_friday = anchors.this_friday.format("%Y-%m-%d"),
        next_monday = anchors.next_monday.format("%Y-%m-%d"),
    )
}

/// Natural-language report prompt built from the precomputed statistics
pub fn summary_prompt(period: Period, stats: &TodoStatistics) -> String {
    let phrase = period.phrase();
    let mut body = String::new();

    let _ = writeln!(
        body,
        "전체 {}건 중 {}건 완료 (완료율 {:.1}%)",
        stats.total, stats.completed, stats.completion_rate
    );
    let _ = writeln!(
        body,
        "우선순위별 완료율: 높음 {:.1}% ({}/{}), 보통 {:.1}% ({}/{}), 낮음 {:.1}% ({}/{})",
        stats.high.rate(),
        stats.high.completed,
        stats.high.total,
        stats.medium.rate(),
        stats.medium.completed,
        stats.medium.total,
        stats.low.rate(),
        stats.low.completed,
        stats.low.total,
    );

    if !stats.urgent_titles.is_empty() {
        let _ = writeln!(body, "긴급 할 일: {}", stats.urgent_titles.join(", "));
    }

    for (label, bucket) in &stats.time_of_day {
        let _ = writeln!(
            body,
            "시간대 {}: {}건 중 {}건 완료 ({:.1}%)",
            label,
            bucket.total,
            bucket.completed,
            bucket.rate()
        );
    }

    for (category, bucket) in &stats.categories {
        let _ = writeln!(
            body,
            "카테고리 {}: {}건 중 {}건 완료 ({:.1}%)",
            category,
            bucket.total,
            bucket.completed,
            bucket.rate()
        );
    }

    let _ = writeln!(
        body,
        "마감일 준수율: {:.1}%",
        stats.deadline_compliance_rate
    );

    if !stats.overdue.is_empty() {
        let overdue: Vec<String> = stats
            .overdue
            .iter()
            .map(|o| format!("{} ({}일 지연)", o.title, o.days_overdue))
            .collect();
        let _ = writeln!(body, "기한 초과: {}", overdue.join(", "));
    }

    for (weekday, bucket) in &stats.by_weekday {
        let _ = writeln!(
            body,
            "요일 {}: {}건 중 {}건 완료 ({:.1}%)",
            weekday,
            bucket.total,
            bucket.completed,
            bucket.rate()
        );
    }

    if !stats.quick_completed.is_empty() {
        let _ = writeln!(
            body,
            "빠르게 완료한 할 일: {}",
            stats.quick_completed.join(", ")
        );
    }

    format!(
        r#"당신은 할 일 관리 코치입니다. 아래는 {phrase} 할 일 통계입니다.

{body}
위 통계를 바탕으로 JSON 객체 하나만 출력하세요. 설명이나 마크다운 없이 JSON만 출력합니다.
- summary: {phrase} 할 일 현황을 2-3문장으로 요약 (한국어, 친근한 말투)
- urgentTasks: 먼저 처리해야 할 할 일 제목 목록 (최대 5개)
- insights: 통계에서 발견한 패턴 2-3개
- recommendations: 생산성을 높일 구체적인 제안 2-3개

출력 형식:
{{"summary":"...","urgentTasks":["..."],"insights":["..."],"recommendations":["..."]}}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::TodoStatistics;
    use chrono::NaiveDate;

    #[test]
    fn test_extraction_prompt_contains_all_anchors() {
        let anchors = DateAnchors::compute(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
        let prompt = extraction_prompt("내일 오전 10시에 팀 회의 준비", &anchors);
        assert!(prompt.contains("2025-06-02"));
        assert!(prompt.contains("2025-06-03"));
        assert!(prompt.contains("2025-06-04"));
        assert!(prompt.contains("2025-06-06"));
        assert!(prompt.contains("2025-06-09"));
        assert!(prompt.contains("내일 오전 10시에 팀 회의 준비"));
    }

    #[test]
    fn test_summary_prompt_uses_period_phrase() {
        let stats = TodoStatistics::compute(&[], NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
        let today = summary_prompt(Period::Today, &stats);
        let week = summary_prompt(Period::Week, &stats);
        assert!(today.contains("오늘 할 일 통계"));
        assert!(week.contains("이번 주 할 일 통계"));
    }
}
