use thiserror::Error;

// Errors from loading or saving the profile blob
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Stored profile is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Stored profile has version {found}, expected {expected}")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Stored profile is invalid: {0}")]
    InvalidProfile(String),
}

// Problems with the compiled-in lesson table
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Duplicate lesson id '{0}'")]
    DuplicateLesson(String),

    #[error("Lesson '{lesson}' requires unknown lesson '{missing}'")]
    DanglingPrerequisite { lesson: String, missing: String },

    #[error("Prerequisite cycle through lesson '{0}'")]
    PrerequisiteCycle(String),

    #[error("Lesson '{0}' has a zero duration")]
    ZeroDuration(String),

    #[error("Lesson '{0}' has no quiz questions")]
    EmptyQuiz(String),

    #[error("Lesson '{lesson}' question {question} has an invalid answer key")]
    InvalidAnswerKey { lesson: String, question: usize },
}

#[derive(Error, Debug)]
pub enum JourneyError {
    #[error("{0}")]
    Validation(String),

    #[error("Lesson '{lesson_id}' is locked. Complete first: {}", missing.join(", "))]
    AccessDenied {
        lesson_id: String,
        missing: Vec<String>,
    },

    #[error("No profile found. Run `empower init` first")]
    NotOnboarded,

    #[error("A profile already exists. Pass --reset to start over")]
    AlreadyOnboarded,

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl JourneyError {
    pub fn validation(msg: impl Into<String>) -> Self {
        JourneyError::Validation(msg.into())
    }

    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            JourneyError::Validation(_)
                | JourneyError::AccessDenied { .. }
                | JourneyError::NotOnboarded
                | JourneyError::AlreadyOnboarded
        )
    }
}

pub type Result<T, E = JourneyError> = std::result::Result<T, E>;
