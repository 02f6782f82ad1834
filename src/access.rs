use crate::models::{CompletionRecord, LessonDefinition};
use crate::progress;

// A lesson is open when every prerequisite has a completion record.
// The score on that record does not matter, 0% still counts.
pub fn is_unlocked(lesson: &LessonDefinition, records: &[CompletionRecord]) -> bool {
    lesson
        .prerequisites
        .iter()
        .all(|id| progress::is_completed(records, id))
}

pub fn missing_prerequisites(lesson: &LessonDefinition, records: &[CompletionRecord]) -> Vec<String> {
    lesson
        .prerequisites
        .iter()
        .filter(|id| !progress::is_completed(records, id))
        .map(|id| id.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use chrono::{TimeZone, Utc};

    fn record(lesson_id: &str, score: u8) -> CompletionRecord {
        CompletionRecord::new(
            lesson_id,
            score,
            Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        )
    }

    #[test]
    fn no_prerequisites_always_unlocked() {
        let catalog = Catalog::builtin().unwrap();
        let lesson = catalog.get("online-safety").unwrap();
        assert!(is_unlocked(lesson, &[]));
        assert!(missing_prerequisites(lesson, &[]).is_empty());
    }

    #[test]
    fn locked_until_prerequisite_completed() {
        let catalog = Catalog::builtin().unwrap();
        let lesson = catalog.get("critical-thinking").unwrap();
        assert!(!is_unlocked(lesson, &[]));
        assert_eq!(
            missing_prerequisites(lesson, &[]),
            vec!["intro-digital-literacy".to_string()]
        );

        let records = vec![record("intro-digital-literacy", 100)];
        assert!(is_unlocked(lesson, &records));
    }

    #[test]
    fn zero_score_satisfies_prerequisite() {
        let catalog = Catalog::builtin().unwrap();
        let lesson = catalog.get("digital-marketing-intro").unwrap();
        assert!(is_unlocked(lesson, &[record("intro-digital-literacy", 0)]));
    }

    #[test]
    fn unrelated_completions_do_not_unlock() {
        let catalog = Catalog::builtin().unwrap();
        let lesson = catalog.get("critical-thinking").unwrap();
        let records = vec![record("online-safety", 100), record("goal-setting", 100)];
        assert!(!is_unlocked(lesson, &records));
    }

    #[test]
    fn every_prerequisite_is_required() {
        use crate::models::Difficulty;

        let catalog = Catalog::new(vec![
            LessonDefinition {
                id: "a",
                title: "A",
                description: "",
                category: "Test",
                difficulty: Difficulty::Beginner,
                duration_minutes: 5,
                prerequisites: &[],
                quiz: crate::catalog::LESSONS[0].quiz,
            },
            LessonDefinition {
                id: "b",
                title: "B",
                description: "",
                category: "Test",
                difficulty: Difficulty::Beginner,
                duration_minutes: 5,
                prerequisites: &[],
                quiz: crate::catalog::LESSONS[0].quiz,
            },
            LessonDefinition {
                id: "c",
                title: "C",
                description: "",
                category: "Test",
                difficulty: Difficulty::Advanced,
                duration_minutes: 5,
                prerequisites: &["a", "b"],
                quiz: crate::catalog::LESSONS[0].quiz,
            },
        ])
        .unwrap();
        let lesson = catalog.get("c").unwrap();

        let only_a = vec![record("a", 70)];
        assert!(!is_unlocked(lesson, &only_a));
        assert_eq!(missing_prerequisites(lesson, &only_a), vec!["b".to_string()]);

        let both = vec![record("b", 10), record("a", 70)];
        assert!(is_unlocked(lesson, &both));
    }
}
