use chrono::{DateTime, Utc};

use crate::models::{BadgeId, BadgeState, CompletionRecord};
use crate::progress;

pub const FIVE_LESSONS: usize = 5;
pub const AI_EXPLORER_QUESTIONS: u32 = 10;
pub const WEEK_STREAK_DAYS: u32 = 7;
pub const PERFECT_SCORE: u8 = 100;

// What the rules look at after an event
#[derive(Debug, Clone, Copy)]
pub struct BadgeContext<'a> {
    pub progress: &'a [CompletionRecord],
    // Score produced by the triggering completion, None for non-lesson events
    pub latest_score: Option<u8>,
    pub tutor_questions: u32,
}

/// Badge states for a brand new profile: everything unearned except `welcome`.
pub fn initial_badges(now: DateTime<Utc>) -> Vec<BadgeState> {
    BadgeId::ALL
        .iter()
        .map(|&id| match id {
            BadgeId::Welcome => BadgeState::earned(id, now),
            _ => BadgeState::unearned(id),
        })
        .collect()
}

pub fn condition_met(id: BadgeId, ctx: &BadgeContext) -> bool {
    match id {
        // granted by onboarding only
        BadgeId::Welcome => false,
        BadgeId::FirstLesson => progress::completed_count(ctx.progress) >= 1,
        BadgeId::FiveLessons => progress::completed_count(ctx.progress) >= FIVE_LESSONS,
        BadgeId::PerfectScore => ctx.latest_score == Some(PERFECT_SCORE),
        BadgeId::AiExplorer => ctx.tutor_questions >= AI_EXPLORER_QUESTIONS,
        BadgeId::WeekStreak => progress::longest_streak(ctx.progress) >= WEEK_STREAK_DAYS,
    }
}

/// Marks `id` earned at `now` unless it already is. Returns true on the
/// unearned to earned transition; an earned badge keeps its original date.
pub fn award_badge(states: &mut Vec<BadgeState>, id: BadgeId, now: DateTime<Utc>) -> bool {
    match states.iter_mut().find(|s| s.id == id) {
        Some(state) if state.is_earned() => false,
        Some(state) => {
            state.earned_at = Some(now);
            true
        }
        None => {
            states.push(BadgeState::earned(id, now));
            true
        }
    }
}

// One state per badge in BadgeId::ALL order. Older blobs may lack newer
// badges; duplicates keep the first entry.
fn normalize(previous: &[BadgeState]) -> Vec<BadgeState> {
    BadgeId::ALL
        .iter()
        .map(|&id| {
            previous
                .iter()
                .find(|s| s.id == id)
                .copied()
                .unwrap_or_else(|| BadgeState::unearned(id))
        })
        .collect()
}

pub fn evaluate_badges(
    previous: &[BadgeState],
    ctx: &BadgeContext,
    now: DateTime<Utc>,
) -> Vec<BadgeState> {
    let mut states = normalize(previous);
    for id in BadgeId::ALL {
        if condition_met(id, ctx) {
            award_badge(&mut states, id, now);
        }
    }
    states
}

pub fn newly_earned(before: &[BadgeState], after: &[BadgeState]) -> Vec<BadgeId> {
    after
        .iter()
        .filter(|s| s.is_earned())
        .filter(|s| !before.iter().any(|b| b.id == s.id && b.is_earned()))
        .map(|s| s.id)
        .collect()
}

// Most recently earned first
pub fn recent_achievements(states: &[BadgeState], limit: usize) -> Vec<BadgeState> {
    let mut earned: Vec<_> = states.iter().filter(|s| s.is_earned()).copied().collect();
    earned.sort_by(|a, b| b.earned_at.cmp(&a.earned_at));
    earned.truncate(limit);
    earned
}
