//! Companion creation and validation of externally supplied state.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, FixedOffset, Utc};
use pearl_types::{CompanionId, CompanionState, Mood};

use crate::bond::{MAX_BOND_LEVEL, PROGRESS_PER_LEVEL};
use crate::config::CompanionConfig;
use crate::derived;
use crate::error::CompanionError;
use crate::vitals::{METER_MAX, clamp_meter, local_day};

/// Create a fresh companion at `now` with the configured starting values.
///
/// Every timestamp is set to `now`, both cooldowns are already expired, and
/// derived values are refreshed before returning.
pub fn create_companion(
    config: &CompanionConfig,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> CompanionState {
    let mut state = CompanionState {
        companion_id: CompanionId::new(),
        hunger: clamp_meter(config.starting_hunger),
        energy: clamp_meter(config.starting_energy),
        hygiene: clamp_meter(config.starting_hygiene),
        happiness: 0.0,
        mood: Mood::Neutral,
        happiness_bonus: 0.0,
        affection: 0,
        trust: clamp_meter(config.starting_trust),
        comfort: clamp_meter(config.starting_comfort),
        bond_level: 0,
        bond_progress: 0.0,
        status_flags: BTreeSet::new(),
        last_updated: now,
        last_interaction: now,
        current_day: local_day(now, offset),
        daily_affection_gained: 0,
        rare_cooldown_until: now,
        engagement_count: 0,
        today_activities: BTreeSet::new(),
        currency: config.starting_currency,
        unlocked_clips: BTreeSet::new(),
        gift_cooldown_until: now,
        streak_days: 0,
        last_login: now,
        activity_counts: BTreeMap::new(),
        lifetime_affection: 0,
        achievements: BTreeSet::new(),
    };
    derived::refresh(&mut state, config, now);
    state
}

fn check_meter(name: &str, value: f64) -> Result<(), CompanionError> {
    if value.is_finite() && (0.0..=METER_MAX).contains(&value) {
        Ok(())
    } else {
        Err(CompanionError::InvalidState {
            reason: format!("{name} = {value} is outside [0, 100]"),
        })
    }
}

/// Check that a state obeys the ranges the engine maintains.
///
/// Used on restored saves; states produced by the engine always pass.
pub fn validate_state(state: &CompanionState) -> Result<(), CompanionError> {
    check_meter("hunger", state.hunger)?;
    check_meter("energy", state.energy)?;
    check_meter("hygiene", state.hygiene)?;
    check_meter("happiness", state.happiness)?;
    check_meter("trust", state.trust)?;
    check_meter("comfort", state.comfort)?;

    if state.bond_level > MAX_BOND_LEVEL {
        return Err(CompanionError::InvalidState {
            reason: format!("bond level {} exceeds {MAX_BOND_LEVEL}", state.bond_level),
        });
    }
    if !state.bond_progress.is_finite()
        || state.bond_progress < 0.0
        || state.bond_progress >= PROGRESS_PER_LEVEL
    {
        return Err(CompanionError::InvalidState {
            reason: format!("bond progress {} is outside [0, 100)", state.bond_progress),
        });
    }
    if !state.happiness_bonus.is_finite() || state.happiness_bonus < 0.0 {
        return Err(CompanionError::InvalidState {
            reason: format!("happiness bonus {} is negative", state.happiness_bonus),
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use pearl_types::StatusFlag;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 14, 18, 0, 0).unwrap()
    }

    #[test]
    fn fresh_companion_defaults() {
        let config = CompanionConfig::default();
        let state = create_companion(&config, now(), FixedOffset::east_opt(0).unwrap());

        assert!((state.hunger - 70.0).abs() < 1e-9);
        assert!((state.energy - 65.0).abs() < 1e-9);
        assert!((state.hygiene - 80.0).abs() < 1e-9);
        assert!((state.trust - 50.0).abs() < 1e-9);
        assert!((state.comfort - 40.0).abs() < 1e-9);
        assert_eq!(state.currency, 300);
        assert_eq!(state.bond_level, 0);
        assert_eq!(state.streak_days, 0);
        assert_eq!(state.last_interaction, now());
        assert_eq!(state.gift_cooldown_until, now());
        assert!((state.happiness - 60.0).abs() < 1e-9);
        assert_eq!(state.mood, Mood::Neutral);
        assert!(state.has_flag(StatusFlag::Playful));
    }

    #[test]
    fn fresh_companion_is_valid() {
        let config = CompanionConfig::default();
        let state = create_companion(&config, now(), FixedOffset::east_opt(0).unwrap());
        assert!(validate_state(&state).is_ok());
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let config = CompanionConfig::default();
        let base = create_companion(&config, now(), FixedOffset::east_opt(0).unwrap());

        let mut state = base.clone();
        state.hunger = 140.0;
        assert!(validate_state(&state).is_err());

        let mut state = base.clone();
        state.bond_level = 7;
        assert!(validate_state(&state).is_err());

        let mut state = base.clone();
        state.bond_progress = 100.0;
        assert!(validate_state(&state).is_err());

        let mut state = base;
        state.trust = f64::NAN;
        assert!(validate_state(&state).is_err());
    }
}
