use std::collections::BTreeSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::catalog::Catalog;
use crate::error::{JourneyError, Result};
use crate::models::CompletionRecord;
use crate::quiz::round_half_up_percent;

pub const MAX_SCORE: u8 = 100;

// Upsert a completion for `lesson_id`. An existing record is replaced in
// place, so re-completing a lesson overwrites the old score and date.
pub fn record_completion(
    records: &[CompletionRecord],
    catalog: &Catalog,
    lesson_id: &str,
    score: u8,
    now: DateTime<Utc>,
) -> Result<Vec<CompletionRecord>> {
    if score > MAX_SCORE {
        return Err(JourneyError::validation(format!(
            "Score must be between 0 and {}, got {}",
            MAX_SCORE, score
        )));
    }
    if !catalog.contains(lesson_id) {
        return Err(JourneyError::validation(format!(
            "Unknown lesson '{}'",
            lesson_id
        )));
    }

    let mut updated = records.to_vec();
    let record = CompletionRecord::new(lesson_id, score, now);
    match updated.iter_mut().find(|r| r.lesson_id == lesson_id) {
        Some(existing) => *existing = record,
        None => updated.push(record),
    }
    Ok(updated)
}

pub fn find<'a>(records: &'a [CompletionRecord], lesson_id: &str) -> Option<&'a CompletionRecord> {
    records.iter().find(|r| r.lesson_id == lesson_id)
}

pub fn is_completed(records: &[CompletionRecord], lesson_id: &str) -> bool {
    find(records, lesson_id).is_some_and(|r| r.completed)
}

pub fn completed_count(records: &[CompletionRecord]) -> usize {
    records.iter().filter(|r| r.completed).count()
}

pub fn average_score(records: &[CompletionRecord]) -> u8 {
    let completed: Vec<_> = records.iter().filter(|r| r.completed).collect();
    if completed.is_empty() {
        return 0;
    }
    let total: usize = completed.iter().map(|r| r.score as usize).sum();
    // mean of percentages, rounded half up
    ((2 * total + completed.len()) / (2 * completed.len())).min(100) as u8
}

pub fn completion_percentage(records: &[CompletionRecord], catalog: &Catalog) -> u8 {
    let done = catalog
        .lessons()
        .iter()
        .filter(|l| is_completed(records, l.id))
        .count();
    round_half_up_percent(done, catalog.len())
}

// Completions within the last seven days (rolling, not calendar week)
pub fn weekly_activity(records: &[CompletionRecord], now: DateTime<Utc>) -> usize {
    let week_ago = now - Duration::days(7);
    records
        .iter()
        .filter(|r| r.completed && r.completed_at >= week_ago)
        .count()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreDistribution {
    pub excellent: usize,
    pub good: usize,
    pub fair: usize,
    pub needs_work: usize,
}

pub fn score_distribution(records: &[CompletionRecord]) -> ScoreDistribution {
    let mut dist = ScoreDistribution::default();
    for r in records.iter().filter(|r| r.completed) {
        match r.score {
            90..=u8::MAX => dist.excellent += 1,
            70..=89 => dist.good += 1,
            50..=69 => dist.fair += 1,
            _ => dist.needs_work += 1,
        }
    }
    dist
}

fn completion_days(records: &[CompletionRecord]) -> BTreeSet<NaiveDate> {
    records
        .iter()
        .filter(|r| r.completed)
        .map(|r| r.completed_at.date_naive())
        .collect()
}

// Longest run of consecutive UTC calendar days that each have a completion
pub fn longest_streak(records: &[CompletionRecord]) -> u32 {
    let mut best = 0;
    let mut run = 0;
    let mut prev: Option<NaiveDate> = None;
    for day in completion_days(records) {
        run = match prev {
            Some(p) if p.succ_opt() == Some(day) => run + 1,
            _ => 1,
        };
        best = best.max(run);
        prev = Some(day);
    }
    best
}

// Run ending today, or ending yesterday when nothing is done yet today
pub fn current_streak(records: &[CompletionRecord], today: NaiveDate) -> u32 {
    let days = completion_days(records);
    let mut cursor = if days.contains(&today) {
        today
    } else {
        match today.pred_opt() {
            Some(y) if days.contains(&y) => y,
            _ => return 0,
        }
    };

    let mut streak = 0;
    while days.contains(&cursor) {
        streak += 1;
        cursor = match cursor.pred_opt() {
            Some(d) => d,
            None => break,
        };
    }
    streak
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressSummary {
    pub lessons_completed: usize,
    pub lessons_total: usize,
    pub completion_percentage: u8,
    pub average_score: u8,
    pub weekly_activity: usize,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub distribution: ScoreDistribution,
}

impl ProgressSummary {
    pub fn compute(records: &[CompletionRecord], catalog: &Catalog, now: DateTime<Utc>) -> Self {
        Self {
            lessons_completed: completed_count(records),
            lessons_total: catalog.len(),
            completion_percentage: completion_percentage(records, catalog),
            average_score: average_score(records),
            weekly_activity: weekly_activity(records, now),
            current_streak: current_streak(records, now.date_naive()),
            longest_streak: longest_streak(records),
            distribution: score_distribution(records),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
    }

    fn catalog() -> Catalog {
        Catalog::builtin().unwrap()
    }

    fn record(lesson_id: &str, score: u8, day: u32) -> CompletionRecord {
        CompletionRecord::new(lesson_id, score, at(day, 12))
    }

    mod record_completion_tests {
        use super::*;

        #[test]
        fn appends_new_record() {
            let records = record_completion(&[], &catalog(), "online-safety", 80, at(1, 9)).unwrap();
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].lesson_id, "online-safety");
            assert!(records[0].completed);
            assert_eq!(records[0].score, 80);
            assert_eq!(records[0].completed_at, at(1, 9));
        }

        #[test]
        fn upsert_overwrites_score_not_duplicates() {
            let c = catalog();
            let first = record_completion(&[], &c, "goal-setting", 40, at(1, 9)).unwrap();
            let second = record_completion(&first, &c, "goal-setting", 90, at(2, 9)).unwrap();
            assert_eq!(second.len(), 1);
            assert_eq!(second[0].score, 90);
            assert_eq!(second[0].completed_at, at(2, 9));
        }

        #[test]
        fn upsert_keeps_position() {
            let c = catalog();
            let records = vec![
                record("online-safety", 50, 1),
                record("goal-setting", 60, 1),
                record("time-management", 70, 1),
            ];
            let updated = record_completion(&records, &c, "goal-setting", 100, at(3, 9)).unwrap();
            let ids: Vec<_> = updated.iter().map(|r| r.lesson_id.as_str()).collect();
            assert_eq!(ids, vec!["online-safety", "goal-setting", "time-management"]);
            assert_eq!(updated[1].score, 100);
        }

        #[test]
        fn lower_score_still_overwrites() {
            let c = catalog();
            let records = vec![record("online-safety", 100, 1)];
            let updated = record_completion(&records, &c, "online-safety", 0, at(2, 9)).unwrap();
            assert_eq!(updated[0].score, 0);
        }

        #[test]
        fn rejects_score_above_100() {
            let err = record_completion(&[], &catalog(), "online-safety", 101, at(1, 9)).unwrap_err();
            assert!(matches!(err, JourneyError::Validation(_)));
        }

        #[test]
        fn rejects_unknown_lesson() {
            let err = record_completion(&[], &catalog(), "juggling", 50, at(1, 9)).unwrap_err();
            assert_eq!(err.to_string(), "Unknown lesson 'juggling'");
        }

        #[test]
        fn input_is_untouched() {
            let records = vec![record("online-safety", 50, 1)];
            let _ = record_completion(&records, &catalog(), "online-safety", 90, at(2, 9)).unwrap();
            assert_eq!(records[0].score, 50);
        }
    }

    mod summary_tests {
        use super::*;

        #[test]
        fn average_of_empty_is_zero() {
            assert_eq!(average_score(&[]), 0);
        }

        #[test]
        fn average_rounds_half_up() {
            let records = vec![record("online-safety", 50, 1), record("goal-setting", 51, 1)];
            assert_eq!(average_score(&records), 51); // 50.5
        }

        #[test]
        fn distribution_buckets() {
            let records = vec![
                record("online-safety", 100, 1),
                record("goal-setting", 90, 1),
                record("time-management", 89, 1),
                record("financial-literacy", 70, 1),
                record("effective-communication", 69, 1),
                record("intro-digital-literacy", 49, 1),
            ];
            let dist = score_distribution(&records);
            assert_eq!(
                dist,
                ScoreDistribution {
                    excellent: 2,
                    good: 2,
                    fair: 1,
                    needs_work: 1,
                }
            );
        }

        #[test]
        fn weekly_activity_uses_rolling_window() {
            let records = vec![
                record("online-safety", 50, 1),
                record("goal-setting", 50, 8),
                record("time-management", 50, 10),
            ];
            // window starts March 3rd 12:00
            assert_eq!(weekly_activity(&records, at(10, 12)), 2);
        }

        #[test]
        fn completion_percentage_of_catalog() {
            let records = vec![record("online-safety", 50, 1), record("goal-setting", 50, 1)];
            assert_eq!(completion_percentage(&records, &catalog()), 25);
            assert_eq!(completion_percentage(&[], &catalog()), 0);
        }

        #[test]
        fn summary_bundles_everything() {
            let records = vec![record("online-safety", 80, 9), record("goal-setting", 100, 10)];
            let summary = ProgressSummary::compute(&records, &catalog(), at(10, 18));
            assert_eq!(summary.lessons_completed, 2);
            assert_eq!(summary.lessons_total, 8);
            assert_eq!(summary.average_score, 90);
            assert_eq!(summary.weekly_activity, 2);
            assert_eq!(summary.current_streak, 2);
            assert_eq!(summary.longest_streak, 2);
            assert_eq!(summary.distribution.excellent, 1);
        }
    }

    mod streak_tests {
        use super::*;

        #[test]
        fn empty_has_no_streak() {
            assert_eq!(longest_streak(&[]), 0);
            assert_eq!(current_streak(&[], at(5, 0).date_naive()), 0);
        }

        #[test]
        fn same_day_counts_once() {
            let records = vec![record("online-safety", 50, 4), record("goal-setting", 50, 4)];
            assert_eq!(longest_streak(&records), 1);
        }

        #[test]
        fn gap_breaks_run() {
            let records = vec![
                record("online-safety", 50, 1),
                record("goal-setting", 50, 2),
                record("time-management", 50, 4),
                record("financial-literacy", 50, 5),
                record("effective-communication", 50, 6),
            ];
            assert_eq!(longest_streak(&records), 3);
        }

        #[test]
        fn crosses_month_boundary() {
            let records = vec![
                CompletionRecord::new("online-safety", 50, Utc.with_ymd_and_hms(2026, 2, 28, 23, 0, 0).unwrap()),
                CompletionRecord::new("goal-setting", 50, Utc.with_ymd_and_hms(2026, 3, 1, 1, 0, 0).unwrap()),
            ];
            assert_eq!(longest_streak(&records), 2);
        }

        #[test]
        fn current_streak_from_yesterday() {
            let records = vec![record("online-safety", 50, 3), record("goal-setting", 50, 4)];
            assert_eq!(current_streak(&records, at(5, 0).date_naive()), 2);
        }

        #[test]
        fn current_streak_broken_two_days_ago() {
            let records = vec![record("online-safety", 50, 3)];
            assert_eq!(current_streak(&records, at(5, 0).date_naive()), 0);
        }
    }
}
