use std::collections::{HashMap, HashSet};

use crate::error::CatalogError;
use crate::models::{BadgeDefinition, BadgeId, Difficulty, LessonDefinition, QuizQuestion};

const INTRO_QUIZ: &[QuizQuestion] = &[
    QuizQuestion {
        question: "What is digital literacy?",
        options: &[
            "Only knowing how to type",
            "The ability to use technology to find, evaluate, and communicate information",
            "Playing video games",
            "Using social media",
        ],
        correct: 1,
    },
    QuizQuestion {
        question: "Why is digital literacy important today?",
        options: &[
            "It's not important",
            "Only for young people",
            "Essential for education, work, and everyday life",
            "Only for tech professionals",
        ],
        correct: 2,
    },
];

// Lessons without authored content share this quiz
const GENERIC_QUIZ: &[QuizQuestion] = &[
    QuizQuestion {
        question: "What is the main purpose of this lesson?",
        options: &[
            "Entertainment",
            "To develop new skills and knowledge",
            "To waste time",
            "To confuse learners",
        ],
        correct: 1,
    },
    QuizQuestion {
        question: "How can you get the most out of this lesson?",
        options: &[
            "Skip to the end",
            "Just read without thinking",
            "Practice and apply what you learn",
            "Memorize without understanding",
        ],
        correct: 2,
    },
];

pub const LESSONS: &[LessonDefinition] = &[
    LessonDefinition {
        id: "intro-digital-literacy",
        title: "Introduction to Digital Literacy",
        description: "Learn the basics of navigating the digital world safely and effectively",
        category: "Digital Skills",
        difficulty: Difficulty::Beginner,
        duration_minutes: 15,
        prerequisites: &[],
        quiz: INTRO_QUIZ,
    },
    LessonDefinition {
        id: "online-safety",
        title: "Online Safety & Privacy",
        description: "Understand how to protect yourself and your information online",
        category: "Digital Skills",
        difficulty: Difficulty::Beginner,
        duration_minutes: 20,
        prerequisites: &[],
        quiz: GENERIC_QUIZ,
    },
    LessonDefinition {
        id: "effective-communication",
        title: "Effective Communication Skills",
        description: "Master the art of clear and confident communication",
        category: "Soft Skills",
        difficulty: Difficulty::Beginner,
        duration_minutes: 25,
        prerequisites: &[],
        quiz: GENERIC_QUIZ,
    },
    LessonDefinition {
        id: "time-management",
        title: "Time Management Essentials",
        description: "Learn techniques to manage your time and boost productivity",
        category: "Productivity",
        difficulty: Difficulty::Beginner,
        duration_minutes: 20,
        prerequisites: &[],
        quiz: GENERIC_QUIZ,
    },
    LessonDefinition {
        id: "critical-thinking",
        title: "Critical Thinking & Problem Solving",
        description: "Develop skills to analyze problems and find creative solutions",
        category: "Soft Skills",
        difficulty: Difficulty::Intermediate,
        duration_minutes: 30,
        prerequisites: &["intro-digital-literacy"],
        quiz: GENERIC_QUIZ,
    },
    LessonDefinition {
        id: "financial-literacy",
        title: "Financial Literacy Basics",
        description: "Understand budgeting, saving, and making informed financial decisions",
        category: "Life Skills",
        difficulty: Difficulty::Beginner,
        duration_minutes: 25,
        prerequisites: &[],
        quiz: GENERIC_QUIZ,
    },
    LessonDefinition {
        id: "goal-setting",
        title: "Goal Setting & Achievement",
        description: "Learn how to set and achieve meaningful personal and professional goals",
        category: "Personal Development",
        difficulty: Difficulty::Beginner,
        duration_minutes: 20,
        prerequisites: &[],
        quiz: GENERIC_QUIZ,
    },
    LessonDefinition {
        id: "digital-marketing-intro",
        title: "Introduction to Digital Marketing",
        description: "Explore the fundamentals of marketing in the digital age",
        category: "Professional Skills",
        difficulty: Difficulty::Intermediate,
        duration_minutes: 35,
        prerequisites: &["intro-digital-literacy"],
        quiz: GENERIC_QUIZ,
    },
];

pub const BADGES: &[BadgeDefinition] = &[
    BadgeDefinition {
        id: BadgeId::Welcome,
        name: "Welcome Badge",
        description: "Completed onboarding",
        icon: "🎉",
    },
    BadgeDefinition {
        id: BadgeId::FirstLesson,
        name: "First Lesson",
        description: "Complete your first lesson",
        icon: "📚",
    },
    BadgeDefinition {
        id: BadgeId::FiveLessons,
        name: "Learning Streak",
        description: "Complete 5 lessons",
        icon: "🔥",
    },
    BadgeDefinition {
        id: BadgeId::AiExplorer,
        name: "AI Explorer",
        description: "Ask 10 questions to AI Tutor",
        icon: "🤖",
    },
    BadgeDefinition {
        id: BadgeId::PerfectScore,
        name: "Perfect Score",
        description: "Score 100% on a lesson",
        icon: "⭐",
    },
    BadgeDefinition {
        id: BadgeId::WeekStreak,
        name: "7-Day Streak",
        description: "Learn for 7 consecutive days",
        icon: "💪",
    },
];

pub fn badge_definition(id: BadgeId) -> &'static BadgeDefinition {
    let idx = match id {
        BadgeId::Welcome => 0,
        BadgeId::FirstLesson => 1,
        BadgeId::FiveLessons => 2,
        BadgeId::AiExplorer => 3,
        BadgeId::PerfectScore => 4,
        BadgeId::WeekStreak => 5,
    };
    &BADGES[idx]
}

#[derive(Debug, Clone)]
pub struct Catalog {
    lessons: Vec<LessonDefinition>,
}

impl Catalog {
    pub fn new(lessons: Vec<LessonDefinition>) -> Result<Self, CatalogError> {
        validate(&lessons)?;
        Ok(Self { lessons })
    }

    pub fn builtin() -> Result<Self, CatalogError> {
        Self::new(LESSONS.to_vec())
    }

    pub fn lessons(&self) -> &[LessonDefinition] {
        &self.lessons
    }

    pub fn get(&self, id: &str) -> Option<&LessonDefinition> {
        self.lessons.iter().find(|l| l.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    // Distinct categories in catalog order
    pub fn categories(&self) -> Vec<&'static str> {
        let mut seen = HashSet::new();
        self.lessons
            .iter()
            .filter(|l| seen.insert(l.category))
            .map(|l| l.category)
            .collect()
    }

    pub fn in_category<'a>(
        &'a self,
        category: Option<&'a str>,
    ) -> impl Iterator<Item = &'a LessonDefinition> + 'a {
        self.lessons.iter().filter(move |l| match category {
            Some(c) => l.category.eq_ignore_ascii_case(c),
            None => true,
        })
    }
}

fn validate(lessons: &[LessonDefinition]) -> Result<(), CatalogError> {
    let mut by_id: HashMap<&str, &LessonDefinition> = HashMap::new();
    for lesson in lessons {
        if by_id.insert(lesson.id, lesson).is_some() {
            return Err(CatalogError::DuplicateLesson(lesson.id.to_string()));
        }
    }

    for lesson in lessons {
        if lesson.duration_minutes == 0 {
            return Err(CatalogError::ZeroDuration(lesson.id.to_string()));
        }
        if lesson.quiz.is_empty() {
            return Err(CatalogError::EmptyQuiz(lesson.id.to_string()));
        }
        for (i, q) in lesson.quiz.iter().enumerate() {
            if q.options.len() < 2 || q.correct >= q.options.len() {
                return Err(CatalogError::InvalidAnswerKey {
                    lesson: lesson.id.to_string(),
                    question: i,
                });
            }
        }
        for prereq in lesson.prerequisites {
            if !by_id.contains_key(prereq) {
                return Err(CatalogError::DanglingPrerequisite {
                    lesson: lesson.id.to_string(),
                    missing: prereq.to_string(),
                });
            }
        }
    }

    // Depth-first walk; reaching a lesson that is still Visiting closes a cycle
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Visiting,
        Done,
    }

    fn visit<'a>(
        id: &'a str,
        by_id: &HashMap<&'a str, &'a LessonDefinition>,
        marks: &mut HashMap<&'a str, Mark>,
    ) -> Result<(), CatalogError> {
        match marks.get(id) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Visiting) => return Err(CatalogError::PrerequisiteCycle(id.to_string())),
            None => {}
        }
        marks.insert(id, Mark::Visiting);
        if let Some(lesson) = by_id.get(id) {
            for prereq in lesson.prerequisites {
                visit(prereq, by_id, marks)?;
            }
        }
        marks.insert(id, Mark::Done);
        Ok(())
    }

    let mut marks = HashMap::new();
    for lesson in lessons {
        visit(lesson.id, &by_id, &mut marks)?;
    }

    Ok(())
}
