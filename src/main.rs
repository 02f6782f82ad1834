mod access;
mod badges;
mod catalog;
mod db;
mod error;
mod journey;
mod models;
mod progress;
mod quiz;
mod tui;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use catalog::Catalog;
use db::Database;
use error::JourneyError;
use journey::{Journey, OnboardingInput};
use models::{Difficulty, JsonOutput, Language};

const DEFAULT_DB_NAME: &str = "empower.db";
const DEFAULT_LOG_FILTER: &str = "empower=warn";
const RECENT_ACHIEVEMENTS: usize = 5;

#[derive(Parser)]
#[command(name = "empower")]
#[command(about = "Track lessons, quiz scores and badges on your learning journey")]
#[command(version)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create your learner profile
    Init {
        /// Your name
        #[arg(long, short)]
        name: String,

        /// Your email address
        #[arg(long, short)]
        email: String,

        /// Preferred language (en, es, fr, de, zh, ar, hi, pt)
        #[arg(long, short, default_value = "en")]
        language: String,

        /// Replace an existing profile and start over
        #[arg(long)]
        reset: bool,
    },

    /// List lessons with their lock state and scores
    Lessons {
        /// Filter by category
        #[arg(long, short)]
        category: Option<String>,

        /// Filter by difficulty (beginner, intermediate, advanced)
        #[arg(long, short)]
        difficulty: Option<String>,
    },

    /// Show lesson details and quiz questions
    Lesson {
        /// Lesson ID
        id: String,
    },

    /// Submit quiz answers and complete a lesson
    Complete {
        /// Lesson ID
        id: String,

        /// Comma-separated option numbers, 0-based; - marks unanswered
        #[arg(long, short)]
        answers: String,
    },

    /// Ask the AI tutor a question
    Ask {
        /// Your question
        question: String,
    },

    /// Show your badge collection
    Badges,

    /// Show your progress dashboard
    Progress,

    /// Show your identity card and share text
    Card,

    /// Launch interactive terminal UI
    Tui,
}

fn get_db_path() -> PathBuf {
    if let Ok(path) = std::env::var("EMPOWER_DB") {
        return PathBuf::from(path);
    }

    let config_dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("empower");

    std::fs::create_dir_all(&config_dir).ok();
    config_dir.join(DEFAULT_DB_NAME)
}

// Logs go to stderr so --json output on stdout stays parseable
fn init_tracing() {
    let filter = EnvFilter::try_from_env("EMPOWER_LOG")
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(e) = run(cli) {
        if let Some(err) = e.downcast_ref::<JourneyError>() {
            if !err.is_user_error() {
                debug!(error = ?err, "command failed");
            }
        }
        if json {
            let out = JsonOutput::<()>::err(e.to_string());
            if let Ok(s) = serde_json::to_string(&out) {
                println!("{}", s);
            }
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

fn open_journey(db: Database) -> Result<Journey<Database>, JourneyError> {
    Journey::open(Catalog::builtin()?, db)
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let db_path = get_db_path();
    let db = Database::open(&db_path)?;
    db.init()?;
    debug!(path = %db_path.display(), "database ready");

    match cli.command {
        Commands::Init {
            name,
            email,
            language,
            reset,
        } => {
            let language = Language::from_str(&language).ok_or_else(|| {
                format!(
                    "Invalid language '{}'. Use one of: en, es, fr, de, zh, ar, hi, pt",
                    language
                )
            })?;
            let input = OnboardingInput {
                name,
                email,
                language,
            };
            let journey = Journey::onboard(Catalog::builtin()?, db, input, reset)?;
            let profile = journey.profile();

            if cli.json {
                println!("{}", serde_json::to_string(&JsonOutput::ok(&profile.user))?);
            } else {
                println!("Welcome, {}!", profile.user.name);
                println!("Profile ID: {}", profile.user.id);
                println!("Language: {}", profile.user.language.label());
                println!("Badge earned: {}", catalog::badge_definition(models::BadgeId::Welcome).name);
                println!("Data stored at: {}", db_path.display());
            }
        }

        Commands::Lessons {
            category,
            difficulty,
        } => {
            let difficulty = difficulty
                .map(|d| {
                    Difficulty::from_str(&d).ok_or_else(|| {
                        format!(
                            "Invalid difficulty '{}'. Use: beginner, intermediate, or advanced",
                            d
                        )
                    })
                })
                .transpose()?;
            let journey = open_journey(db)?;
            if let Some(c) = &category {
                let known = journey.catalog().categories();
                if !known.iter().any(|k| k.eq_ignore_ascii_case(c)) {
                    return Err(format!(
                        "Unknown category '{}'. Available: {}",
                        c,
                        known.join(", ")
                    )
                    .into());
                }
            }
            let mut statuses = journey.lesson_statuses(category.as_deref());
            if let Some(d) = difficulty {
                debug!(difficulty = d.as_str(), "filtering lessons");
                statuses.retain(|s| s.lesson.difficulty == d);
            }

            if cli.json {
                println!("{}", serde_json::to_string(&JsonOutput::ok(&statuses))?);
            } else {
                println!(
                    "{:<26} {:<36} {:<20} {:<10} SCORE",
                    "ID", "TITLE", "CATEGORY", "STATUS"
                );
                println!("{}", "-".repeat(100));
                for s in &statuses {
                    let score = s
                        .record
                        .as_ref()
                        .map(|r| format!("{}%", r.score))
                        .unwrap_or_else(|| "-".to_string());
                    println!(
                        "{:<26} {:<36} {:<20} {:<10} {}",
                        s.lesson.id,
                        truncate(s.lesson.title, 34),
                        truncate(s.lesson.category, 18),
                        s.state_label(),
                        score
                    );
                }
            }
        }

        Commands::Lesson { id } => {
            let journey = open_journey(db)?;
            let status = journey.lesson_status(&id)?;

            if cli.json {
                println!("{}", serde_json::to_string(&JsonOutput::ok(&status))?);
            } else {
                let lesson = &status.lesson;
                println!("Lesson: {}", lesson.title);
                println!("ID: {}", lesson.id);
                println!("Description: {}", lesson.description);
                println!("Category: {}", lesson.category);
                println!("Difficulty: {}", lesson.difficulty.label());
                println!("Duration: {} min", lesson.duration_minutes);
                if lesson.has_prerequisites() {
                    println!("Prerequisites: {}", lesson.prerequisites.join(", "));
                }
                println!("Status: {}", status.state_label());
                if let Some(r) = &status.record {
                    println!("Score: {}% (completed {})", r.score, r.completed_at.format("%Y-%m-%d"));
                }

                if !status.unlocked {
                    println!();
                    println!("Complete first: {}", status.missing_prerequisites.join(", "));
                    return Ok(());
                }

                println!();
                println!("--- Quiz ---");
                for (i, q) in lesson.quiz.iter().enumerate() {
                    println!("{}. {}", i + 1, q.question);
                    for (j, option) in q.options.iter().enumerate() {
                        println!("   [{}] {}", j, option);
                    }
                }
                println!();
                println!("Submit your answers with:");
                println!("  empower complete {} --answers <n,n,...>", lesson.id);
            }
        }

        Commands::Complete { id, answers } => {
            let selections = quiz::parse_answers(&answers)?;
            let mut journey = open_journey(db)?;
            let outcome = journey.complete_lesson(&id, &selections)?;

            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string(&JsonOutput::ok(serde_json::json!({
                        "lesson_id": id,
                        "score": outcome.score,
                        "newly_earned": outcome.newly_earned,
                        "persisted": outcome.persist_error.is_none(),
                        "progress": outcome.progress,
                        "badges": outcome.badges
                    })))?
                );
            } else {
                println!("Lesson '{}' completed with score {}%.", id, outcome.score);
                for badge in &outcome.newly_earned {
                    let def = catalog::badge_definition(*badge);
                    println!("New badge: {} {}", def.icon, def.name);
                }
                if let Some(e) = &outcome.persist_error {
                    eprintln!("Warning: progress could not be saved: {}", e);
                }
            }
        }

        Commands::Ask { question } => {
            let mut journey = open_journey(db)?;
            let outcome = journey.record_tutor_question(&question)?;

            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string(&JsonOutput::ok(serde_json::json!({
                        "questions_asked": outcome.questions_asked,
                        "newly_earned": outcome.newly_earned,
                        "persisted": outcome.persist_error.is_none()
                    })))?
                );
            } else {
                println!("Question recorded ({} asked so far).", outcome.questions_asked);
                for badge in &outcome.newly_earned {
                    let def = catalog::badge_definition(*badge);
                    println!("New badge: {} {}", def.icon, def.name);
                }
                if let Some(e) = &outcome.persist_error {
                    eprintln!("Warning: progress could not be saved: {}", e);
                }
            }
        }

        Commands::Badges => {
            let journey = open_journey(db)?;
            let views = journey.badge_collection();
            let earned = views.iter().filter(|v| v.earned).count();

            if cli.json {
                println!("{}", serde_json::to_string(&JsonOutput::ok(&views))?);
            } else {
                println!(
                    "=== Badges: {}/{} ({}%) ===",
                    earned,
                    views.len(),
                    quiz::round_half_up_percent(earned, views.len())
                );
                for v in &views {
                    let when = v
                        .earned_at
                        .map(|t| t.format("%Y-%m-%d").to_string())
                        .unwrap_or_else(|| "locked".to_string());
                    println!(
                        "{} {:<16} {:<10} {}",
                        v.definition.icon, v.definition.name, when, v.definition.description
                    );
                }
            }
        }

        Commands::Progress => {
            let journey = open_journey(db)?;
            let summary = journey.summary();
            let recent = journey.recent_achievements(RECENT_ACHIEVEMENTS);

            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string(&JsonOutput::ok(serde_json::json!({
                        "summary": summary,
                        "recent_achievements": recent
                    })))?
                );
            } else {
                let d = &summary.distribution;
                println!("=== Learning Progress ===");
                println!(
                    "Lessons completed: {}/{} ({}%)",
                    summary.lessons_completed, summary.lessons_total, summary.completion_percentage
                );
                println!("Average score: {}%", summary.average_score);
                println!("This week: {}", summary.weekly_activity);
                println!(
                    "Streak: {} days (best {})",
                    summary.current_streak, summary.longest_streak
                );
                println!();
                println!("--- Scores ---");
                println!("90-100%: {}", d.excellent);
                println!("70-89%:  {}", d.good);
                println!("50-69%:  {}", d.fair);
                println!("0-49%:   {}", d.needs_work);
                if !recent.is_empty() {
                    println!();
                    println!("--- Recent Achievements ---");
                    for b in &recent {
                        let def = catalog::badge_definition(b.id);
                        let when = b
                            .earned_at
                            .map(|t| t.format("%Y-%m-%d").to_string())
                            .unwrap_or_default();
                        println!("{} {:<16} {}", def.icon, def.name, when);
                    }
                }
            }
        }

        Commands::Card => {
            let journey = open_journey(db)?;
            let card = journey.identity_card();
            let share = journey.share_text();

            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string(&JsonOutput::ok(serde_json::json!({
                        "card": card,
                        "share_text": share
                    })))?
                );
            } else {
                println!("=== {} ===", card.name);
                println!("ID: {}", card.id);
                println!("Lessons: {}  Badges: {}  Score: {}%", card.lessons, card.badges, card.score);
                println!();
                println!("QR payload: {}", serde_json::to_string(&card)?);
                println!();
                println!("{}", share);
            }
        }

        Commands::Tui => {
            let journey = open_journey(db)?;
            tui::run(journey)?;
        }
    }

    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
