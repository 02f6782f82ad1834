use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Lesson difficulty as shown on catalog cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "beginner" | "b" => Some(Difficulty::Beginner),
            "intermediate" | "i" => Some(Difficulty::Intermediate),
            "advanced" | "a" => Some(Difficulty::Advanced),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct QuizQuestion {
    pub question: &'static str,
    pub options: &'static [&'static str],
    pub correct: usize,
}

// A compiled-in lesson. Catalog construction checks the invariants.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LessonDefinition {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub difficulty: Difficulty,
    pub duration_minutes: u32,
    pub prerequisites: &'static [&'static str],
    pub quiz: &'static [QuizQuestion],
}

impl LessonDefinition {
    pub fn answer_key(&self) -> Vec<usize> {
        self.quiz.iter().map(|q| q.correct).collect()
    }

    pub fn has_prerequisites(&self) -> bool {
        !self.prerequisites.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub lesson_id: String,
    pub completed: bool,
    pub score: u8,
    pub completed_at: DateTime<Utc>,
}

impl CompletionRecord {
    pub fn new(lesson_id: &str, score: u8, completed_at: DateTime<Utc>) -> Self {
        Self {
            lesson_id: lesson_id.to_string(),
            completed: true,
            score,
            completed_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BadgeId {
    Welcome,
    FirstLesson,
    FiveLessons,
    AiExplorer,
    PerfectScore,
    WeekStreak,
}

impl BadgeId {
    pub const ALL: [BadgeId; 6] = [
        BadgeId::Welcome,
        BadgeId::FirstLesson,
        BadgeId::FiveLessons,
        BadgeId::AiExplorer,
        BadgeId::PerfectScore,
        BadgeId::WeekStreak,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeId::Welcome => "welcome",
            BadgeId::FirstLesson => "first-lesson",
            BadgeId::FiveLessons => "five-lessons",
            BadgeId::AiExplorer => "ai-explorer",
            BadgeId::PerfectScore => "perfect-score",
            BadgeId::WeekStreak => "week-streak",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct BadgeDefinition {
    pub id: BadgeId,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

// Earned state of one badge. `earned_at` doubles as the earned flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeState {
    pub id: BadgeId,
    pub earned_at: Option<DateTime<Utc>>,
}

impl BadgeState {
    pub fn unearned(id: BadgeId) -> Self {
        Self {
            id,
            earned_at: None,
        }
    }

    pub fn earned(id: BadgeId, at: DateTime<Utc>) -> Self {
        Self {
            id,
            earned_at: Some(at),
        }
    }

    pub fn is_earned(&self) -> bool {
        self.earned_at.is_some()
    }
}

// Languages offered during onboarding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Es,
    Fr,
    De,
    Zh,
    Ar,
    Hi,
    Pt,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::De => "de",
            Language::Zh => "zh",
            Language::Ar => "ar",
            Language::Hi => "hi",
            Language::Pt => "pt",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Some(Language::En),
            "es" | "spanish" | "español" => Some(Language::Es),
            "fr" | "french" | "français" => Some(Language::Fr),
            "de" | "german" | "deutsch" => Some(Language::De),
            "zh" | "chinese" => Some(Language::Zh),
            "ar" | "arabic" => Some(Language::Ar),
            "hi" | "hindi" => Some(Language::Hi),
            "pt" | "portuguese" | "português" => Some(Language::Pt),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Es => "Español",
            Language::Fr => "Français",
            Language::De => "Deutsch",
            Language::Zh => "中文",
            Language::Ar => "العربية",
            Language::Hi => "हिन्दी",
            Language::Pt => "Português",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub join_date: DateTime<Utc>,
    pub language: Language,
}

// Everything persisted for the learner, saved and loaded as one unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileAggregate {
    pub user: UserProfile,
    pub progress: Vec<CompletionRecord>,
    pub badges: Vec<BadgeState>,
    #[serde(default)]
    pub tutor_questions: u32,
}

impl ProfileAggregate {
    pub fn badge(&self, id: BadgeId) -> Option<&BadgeState> {
        self.badges.iter().find(|b| b.id == id)
    }

    pub fn has_badge(&self, id: BadgeId) -> bool {
        self.badge(id).is_some_and(BadgeState::is_earned)
    }

    pub fn earned_count(&self) -> usize {
        self.badges.iter().filter(|b| b.is_earned()).count()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LessonStatus {
    pub lesson: LessonDefinition,
    pub unlocked: bool,
    pub missing_prerequisites: Vec<String>,
    pub record: Option<CompletionRecord>,
}

impl LessonStatus {
    pub fn state_label(&self) -> &'static str {
        match (&self.record, self.unlocked) {
            (Some(_), _) => "Completed",
            (None, true) => "Available",
            (None, false) => "Locked",
        }
    }
}

// JSON output wrapper for CLI
#[derive(Debug, Serialize)]
pub struct JsonOutput<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}
