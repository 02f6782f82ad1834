//! The learner's aggregate and the only code path that mutates it.
//!
//! Order for every write: validate, score, upsert, re-evaluate badges,
//! commit in memory, persist.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::access;
use crate::badges::{self, BadgeContext};
use crate::catalog::{self, Catalog};
use crate::db::ProfileStore;
use crate::error::{JourneyError, Result, StoreError};
use crate::models::{
    BadgeDefinition, BadgeId, BadgeState, CompletionRecord, Language, LessonDefinition, LessonStatus,
    ProfileAggregate, UserProfile,
};
use crate::progress::{self, ProgressSummary};
use crate::quiz;

const PROFILE_ID_LEN: usize = 9;
const PROFILE_ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone)]
pub struct OnboardingInput {
    pub name: String,
    pub email: String,
    pub language: Language,
}

impl OnboardingInput {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(JourneyError::validation("Name cannot be empty"));
        }
        let email = self.email.trim();
        let valid_email = match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty() && !domain.is_empty() && !email.contains(char::is_whitespace)
            }
            None => false,
        };
        if !valid_email {
            return Err(JourneyError::validation(format!(
                "Invalid email address '{}'",
                self.email
            )));
        }
        Ok(())
    }
}

// Result of one lesson completion. The in-memory state is already
// committed; `persist_error` says whether the durable copy kept up.
#[derive(Debug)]
pub struct CompletionOutcome {
    pub score: u8,
    pub progress: Vec<CompletionRecord>,
    pub badges: Vec<BadgeState>,
    pub newly_earned: Vec<BadgeId>,
    pub persist_error: Option<StoreError>,
}

#[derive(Debug)]
pub struct TutorOutcome {
    pub questions_asked: u32,
    pub newly_earned: Vec<BadgeId>,
    pub persist_error: Option<StoreError>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BadgeView {
    #[serde(flatten)]
    pub definition: BadgeDefinition,
    pub earned: bool,
    pub earned_at: Option<DateTime<Utc>>,
}

// Payload of the shareable identity card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityCard {
    pub id: String,
    pub name: String,
    pub badges: usize,
    pub lessons: usize,
    pub score: u8,
}

impl IdentityCard {
    pub fn share_text(&self) -> String {
        format!(
            "Check out my learning progress!\n📚 {} lessons completed\n🏆 {} badges earned\n⭐ {}% average score",
            self.lessons, self.badges, self.score
        )
    }
}

pub struct Journey<S: ProfileStore> {
    catalog: Catalog,
    store: S,
    profile: ProfileAggregate,
}

impl<S: ProfileStore> Journey<S> {
    pub fn open(catalog: Catalog, store: S) -> Result<Self> {
        let loaded = store.load()?.ok_or(JourneyError::NotOnboarded)?;
        let profile = checked_profile(&catalog, loaded)?;
        debug!(user = %profile.user.id, "opened journey");
        Ok(Self {
            catalog,
            store,
            profile,
        })
    }

    pub fn onboard(catalog: Catalog, store: S, input: OnboardingInput, reset: bool) -> Result<Self> {
        Self::onboard_at(catalog, store, input, reset, Utc::now())
    }

    pub fn onboard_at(
        catalog: Catalog,
        store: S,
        input: OnboardingInput,
        reset: bool,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        input.validate()?;

        match store.load() {
            Ok(None) => {}
            Ok(Some(_)) | Err(_) if reset => {
                store.clear()?;
                info!("cleared existing profile");
            }
            Ok(Some(_)) => return Err(JourneyError::AlreadyOnboarded),
            Err(e) => return Err(e.into()),
        }

        let profile = ProfileAggregate {
            user: UserProfile {
                id: generate_profile_id(&mut rand::thread_rng()),
                name: input.name.trim().to_string(),
                email: input.email.trim().to_string(),
                join_date: now,
                language: input.language,
            },
            progress: Vec::new(),
            badges: badges::initial_badges(now),
            tutor_questions: 0,
        };

        // Onboarding has nothing in memory to fall back on, so a failed
        // save is an error here rather than a degraded success.
        store.save(&profile)?;
        info!(user = %profile.user.id, language = profile.user.language.as_str(), "onboarded");

        Ok(Self {
            catalog,
            store,
            profile,
        })
    }

    // Re-read the stored profile, picking up writes from other processes
    pub fn reload(&mut self) -> Result<()> {
        let loaded = self.store.load()?.ok_or(JourneyError::NotOnboarded)?;
        self.profile = checked_profile(&self.catalog, loaded)?;
        debug!(records = self.profile.progress.len(), "reloaded profile");
        Ok(())
    }

    pub fn profile(&self) -> &ProfileAggregate {
        &self.profile
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn complete_lesson(
        &mut self,
        lesson_id: &str,
        selections: &[Option<usize>],
    ) -> Result<CompletionOutcome> {
        self.complete_lesson_at(lesson_id, selections, Utc::now())
    }

    pub fn complete_lesson_at(
        &mut self,
        lesson_id: &str,
        selections: &[Option<usize>],
        now: DateTime<Utc>,
    ) -> Result<CompletionOutcome> {
        let lesson = *self
            .catalog
            .get(lesson_id)
            .ok_or_else(|| JourneyError::validation(format!("Unknown lesson '{}'", lesson_id)))?;

        if !access::is_unlocked(&lesson, &self.profile.progress) {
            let missing = access::missing_prerequisites(&lesson, &self.profile.progress);
            warn!(lesson_id, ?missing, "attempt to complete locked lesson");
            return Err(JourneyError::AccessDenied {
                lesson_id: lesson.id.to_string(),
                missing,
            });
        }

        let score = quiz::score(selections, &lesson.answer_key())?;
        let progress =
            progress::record_completion(&self.profile.progress, &self.catalog, lesson.id, score, now)?;
        let ctx = BadgeContext {
            progress: &progress,
            latest_score: Some(score),
            tutor_questions: self.profile.tutor_questions,
        };
        let badges = badges::evaluate_badges(&self.profile.badges, &ctx, now);
        let newly_earned = badges::newly_earned(&self.profile.badges, &badges);

        self.profile.progress = progress;
        self.profile.badges = badges;

        info!(lesson_id, score, "lesson completed");
        for id in &newly_earned {
            info!(badge = id.as_str(), "badge earned");
        }

        let persist_error = self.persist();
        Ok(CompletionOutcome {
            score,
            progress: self.profile.progress.clone(),
            badges: self.profile.badges.clone(),
            newly_earned,
            persist_error,
        })
    }

    pub fn record_tutor_question(&mut self, question: &str) -> Result<TutorOutcome> {
        self.record_tutor_question_at(question, Utc::now())
    }

    pub fn record_tutor_question_at(
        &mut self,
        question: &str,
        now: DateTime<Utc>,
    ) -> Result<TutorOutcome> {
        if question.trim().is_empty() {
            return Err(JourneyError::validation("Question cannot be empty"));
        }

        let questions_asked = self.profile.tutor_questions.saturating_add(1);
        let ctx = BadgeContext {
            progress: &self.profile.progress,
            latest_score: None,
            tutor_questions: questions_asked,
        };
        let badges = badges::evaluate_badges(&self.profile.badges, &ctx, now);
        let newly_earned = badges::newly_earned(&self.profile.badges, &badges);

        self.profile.tutor_questions = questions_asked;
        self.profile.badges = badges;

        debug!(questions_asked, "tutor question recorded");
        for id in &newly_earned {
            info!(badge = id.as_str(), "badge earned");
        }

        let persist_error = self.persist();
        Ok(TutorOutcome {
            questions_asked,
            newly_earned,
            persist_error,
        })
    }

    fn persist(&self) -> Option<StoreError> {
        match self.store.save(&self.profile) {
            Ok(()) => None,
            Err(e) => {
                warn!(error = %e, "failed to persist profile, keeping in-memory state");
                Some(e)
            }
        }
    }

    pub fn lesson_status(&self, lesson_id: &str) -> Result<LessonStatus> {
        let lesson = self
            .catalog
            .get(lesson_id)
            .ok_or_else(|| JourneyError::validation(format!("Unknown lesson '{}'", lesson_id)))?;
        Ok(self.status_of(lesson))
    }

    pub fn lesson_statuses(&self, category: Option<&str>) -> Vec<LessonStatus> {
        self.catalog
            .in_category(category)
            .map(|l| self.status_of(l))
            .collect()
    }

    fn status_of(&self, lesson: &LessonDefinition) -> LessonStatus {
        let records = &self.profile.progress;
        LessonStatus {
            lesson: *lesson,
            unlocked: access::is_unlocked(lesson, records),
            missing_prerequisites: access::missing_prerequisites(lesson, records),
            record: progress::find(records, lesson.id).cloned(),
        }
    }

    pub fn summary(&self) -> ProgressSummary {
        self.summary_at(Utc::now())
    }

    pub fn summary_at(&self, now: DateTime<Utc>) -> ProgressSummary {
        ProgressSummary::compute(&self.profile.progress, &self.catalog, now)
    }

    pub fn badge_collection(&self) -> Vec<BadgeView> {
        catalog::BADGES
            .iter()
            .map(|def| {
                let earned_at = self.profile.badge(def.id).and_then(|b| b.earned_at);
                BadgeView {
                    definition: *def,
                    earned: self.profile.has_badge(def.id),
                    earned_at,
                }
            })
            .collect()
    }

    pub fn recent_achievements(&self, limit: usize) -> Vec<BadgeState> {
        badges::recent_achievements(&self.profile.badges, limit)
    }

    pub fn identity_card(&self) -> IdentityCard {
        IdentityCard {
            id: self.profile.user.id.clone(),
            name: self.profile.user.name.clone(),
            badges: self.profile.earned_count(),
            lessons: progress::completed_count(&self.profile.progress),
            score: progress::average_score(&self.profile.progress),
        }
    }

    pub fn share_text(&self) -> String {
        self.identity_card().share_text()
    }
}

fn generate_profile_id<R: Rng>(rng: &mut R) -> String {
    (0..PROFILE_ID_LEN)
        .map(|_| PROFILE_ID_ALPHABET[rng.gen_range(0..PROFILE_ID_ALPHABET.len())] as char)
        .collect()
}

// A stored aggregate may predate the current catalog or have been edited by
// hand. Records for unknown lessons are dropped and duplicates collapse to
// the latest completion; records that could never have been written are
// refused.
fn checked_profile(
    catalog: &Catalog,
    mut profile: ProfileAggregate,
) -> std::result::Result<ProfileAggregate, StoreError> {
    if let Some(bad) = profile
        .progress
        .iter()
        .find(|r| !r.completed || r.score > 100)
    {
        return Err(StoreError::InvalidProfile(format!(
            "record for '{}' has completed={} score={}",
            bad.lesson_id, bad.completed, bad.score
        )));
    }

    let mut kept: Vec<CompletionRecord> = Vec::with_capacity(profile.progress.len());
    for record in profile.progress.drain(..) {
        if !catalog.contains(&record.lesson_id) {
            warn!(lesson_id = %record.lesson_id, "dropping record for unknown lesson");
            continue;
        }
        match kept.iter_mut().find(|k| k.lesson_id == record.lesson_id) {
            Some(existing) => {
                warn!(lesson_id = %record.lesson_id, "collapsing duplicate completion records");
                if record.completed_at > existing.completed_at {
                    *existing = record;
                }
            }
            None => kept.push(record),
        }
    }
    profile.progress = kept;
    Ok(profile)
}
