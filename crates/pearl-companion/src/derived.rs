//! Derived stats: happiness and mood.
//!
//! Both are pure functions of the raw state. [`refresh`] recomputes them
//! together with the status flags, in the fixed order happiness, flags, mood,
//! so mood always reads fresh inputs. Running it twice is a no-op.

use chrono::{DateTime, Utc};
use pearl_types::{CompanionState, Mood, StatusFlag};

use crate::config::CompanionConfig;
use crate::flags::{self, FlagTransition};
use crate::vitals::clamp_meter;

/// Weight of hunger in happiness.
pub const HUNGER_WEIGHT: f64 = 0.35;
/// Weight of energy in happiness.
pub const ENERGY_WEIGHT: f64 = 0.30;
/// Weight of hygiene in happiness.
pub const HYGIENE_WEIGHT: f64 = 0.20;
/// Weight of the engagement score in happiness.
pub const ENGAGEMENT_WEIGHT: f64 = 0.15;
/// Engagement score contributed by each distinct activity today.
pub const ENGAGEMENT_POINTS: f64 = 10.0;
/// Upper bound of the engagement score.
pub const ENGAGEMENT_SCORE_MAX: f64 = 100.0;
/// Upper bound of the accumulated transient happiness bonus.
pub const HAPPINESS_BONUS_MAX: f64 = 15.0;

/// Happiness below this is distressed.
pub const DISTRESSED_BELOW: f64 = 25.0;
/// Happiness below this is low.
pub const LOW_BELOW: f64 = 45.0;
/// Happiness below this is neutral; at or above it is happy (or playful).
pub const NEUTRAL_BELOW: f64 = 75.0;

/// Weighted happiness from meters, engagement, and the transient bonus.
pub fn compute_happiness(state: &CompanionState) -> f64 {
    let engagement =
        (f64::from(state.engagement_count) * ENGAGEMENT_POINTS).min(ENGAGEMENT_SCORE_MAX);
    let weighted = HUNGER_WEIGHT.mul_add(
        state.hunger,
        ENERGY_WEIGHT.mul_add(
            state.energy,
            HYGIENE_WEIGHT.mul_add(state.hygiene, ENGAGEMENT_WEIGHT * engagement),
        ),
    );
    clamp_meter(weighted + state.happiness_bonus)
}

/// Mood from the current flags and happiness.
///
/// Priority: `leavingWarning`, then `sick`, then the happiness bands, with
/// `playful` only reachable from the top band.
pub fn compute_mood(state: &CompanionState) -> Mood {
    if state.has_flag(StatusFlag::LeavingWarning) {
        return Mood::Distressed;
    }
    if state.has_flag(StatusFlag::Sick) {
        return Mood::Low;
    }
    let happiness = state.happiness;
    if happiness < DISTRESSED_BELOW {
        Mood::Distressed
    } else if happiness < LOW_BELOW {
        Mood::Low
    } else if happiness < NEUTRAL_BELOW {
        Mood::Neutral
    } else if state.has_flag(StatusFlag::Playful) {
        Mood::Playful
    } else {
        Mood::Happy
    }
}

/// Add to the transient happiness bonus, up to [`HAPPINESS_BONUS_MAX`].
pub const fn add_happiness_bonus(state: &mut CompanionState, amount: f64) {
    state.happiness_bonus = (state.happiness_bonus + amount).clamp(0.0, HAPPINESS_BONUS_MAX);
}

/// Recompute happiness, status flags, and mood, in that order.
///
/// Returns which flags were raised and cleared relative to the previous set.
pub fn refresh(
    state: &mut CompanionState,
    config: &CompanionConfig,
    now: DateTime<Utc>,
) -> FlagTransition {
    state.happiness = compute_happiness(state);
    let next = flags::evaluate_flags(state, config, now);
    let transition = FlagTransition::between(&state.status_flags, &next);
    state.status_flags = next;
    state.mood = compute_mood(state);
    transition
}
