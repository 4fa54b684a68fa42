//! Hard preconditions for activities.
//!
//! A failed precondition is deterministic and leaves the state untouched,
//! including `last_interaction`. In-character refusals that depend on a roll
//! are not preconditions; they live in the handlers.

use chrono::{DateTime, Utc};
use pearl_types::{Activity, ActivityKind, CompanionState, Mood};

use super::costs;

/// Why an activity was not allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Not enough gems to pay.
    InsufficientCurrency {
        /// Gems the activity costs.
        needed: u32,
        /// Gems on hand.
        available: u32,
    },
    /// Hunger is already full.
    AlreadyFull,
    /// Energy is too low for the activity.
    TooTired(ActivityKind),
    /// Energy is too high to settle in to sleep.
    NotTiredEnough,
    /// Too hungry to settle in to sleep.
    TooHungryToSleep,
    /// She does not need comforting right now.
    NotNeeded,
    /// The bond is not deep enough yet.
    BondTooLow {
        /// Bond level required.
        required: u8,
        /// Current bond level.
        current: u8,
    },
    /// The previous gift is still on cooldown.
    GiftCooldown,
}

impl Rejection {
    /// In-character explanation for the player.
    pub fn message(self) -> String {
        match self {
            Self::InsufficientCurrency { needed, .. } => {
                format!("Not enough gems! You need {needed} gems to feed Pearl.")
            }
            Self::AlreadyFull => "She's already full and doesn't want to eat right now.".into(),
            Self::TooTired(ActivityKind::Tidy) => "She's too tired to tidy up right now.".into(),
            Self::TooTired(_) => "She's too tired to play right now.".into(),
            Self::NotTiredEnough => "She's not tired enough for sleep right now.".into(),
            Self::TooHungryToSleep => "She's too hungry to sleep comfortably.".into(),
            Self::NotNeeded => "She seems okay right now.".into(),
            Self::BondTooLow { .. } => "She's not ready to share personal things yet.".into(),
            Self::GiftCooldown => "She's still appreciating your last gift.".into(),
        }
    }
}

/// Check the hard preconditions of `activity` against `state` at `now`.
pub fn check_preconditions(
    state: &CompanionState,
    activity: Activity,
    now: DateTime<Utc>,
) -> Result<(), Rejection> {
    match activity {
        Activity::Feed(_) => validate_feed(state),
        Activity::Play(_) => validate_energy(state, costs::PLAY_MIN_ENERGY, ActivityKind::Play),
        Activity::Tidy => validate_energy(state, costs::TIDY_MIN_ENERGY, ActivityKind::Tidy),
        Activity::SleepAssist => validate_sleep(state),
        Activity::Comfort => validate_comfort(state),
        Activity::Confide => validate_confide(state),
        Activity::GiveGift(_) => validate_gift(state, now),
        Activity::Talk(_) | Activity::Wash | Activity::MiniGame(_) => Ok(()),
    }
}

const fn validate_feed(state: &CompanionState) -> Result<(), Rejection> {
    if state.currency < costs::FEED_COST {
        return Err(Rejection::InsufficientCurrency {
            needed: costs::FEED_COST,
            available: state.currency,
        });
    }
    if state.hunger >= 100.0 {
        return Err(Rejection::AlreadyFull);
    }
    Ok(())
}

const fn validate_energy(
    state: &CompanionState,
    minimum: f64,
    kind: ActivityKind,
) -> Result<(), Rejection> {
    if state.energy < minimum {
        return Err(Rejection::TooTired(kind));
    }
    Ok(())
}

const fn validate_sleep(state: &CompanionState) -> Result<(), Rejection> {
    if state.energy >= costs::SLEEP_ENERGY_BELOW {
        return Err(Rejection::NotTiredEnough);
    }
    if state.hunger < costs::SLEEP_MIN_HUNGER {
        return Err(Rejection::TooHungryToSleep);
    }
    Ok(())
}

const fn validate_comfort(state: &CompanionState) -> Result<(), Rejection> {
    if matches!(state.mood, Mood::Low | Mood::Distressed) {
        Ok(())
    } else {
        Err(Rejection::NotNeeded)
    }
}

const fn validate_confide(state: &CompanionState) -> Result<(), Rejection> {
    if state.bond_level < costs::CONFIDE_MIN_BOND {
        return Err(Rejection::BondTooLow {
            required: costs::CONFIDE_MIN_BOND,
            current: state.bond_level,
        });
    }
    Ok(())
}

fn validate_gift(state: &CompanionState, now: DateTime<Utc>) -> Result<(), Rejection> {
    if now < state.gift_cooldown_until {
        return Err(Rejection::GiftCooldown);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use chrono::{FixedOffset, TimeDelta, TimeZone};
    use pearl_types::{FoodType, GiftType, PlayType};

    use super::*;
    use crate::companion::create_companion;
    use crate::config::CompanionConfig;

    fn setup() -> (CompanionState, DateTime<Utc>) {
        let now = Utc.with_ymd_and_hms(2025, 4, 1, 10, 0, 0).unwrap();
        let state = create_companion(
            &CompanionConfig::default(),
            now,
            FixedOffset::east_opt(0).unwrap(),
        );
        (state, now)
    }

    #[test]
    fn feed_needs_gems_and_appetite() {
        let (mut state, now) = setup();
        state.currency = 4;
        assert_eq!(
            check_preconditions(&state, Activity::Feed(FoodType::Healthy), now),
            Err(Rejection::InsufficientCurrency {
                needed: 5,
                available: 4
            })
        );
        state.currency = 5;
        state.hunger = 100.0;
        assert_eq!(
            check_preconditions(&state, Activity::Feed(FoodType::Healthy), now),
            Err(Rejection::AlreadyFull)
        );
    }

    #[test]
    fn play_energy_floor_is_inclusive() {
        let (mut state, now) = setup();
        state.energy = 25.0;
        assert!(check_preconditions(&state, Activity::Play(PlayType::Game), now).is_ok());
        state.energy = 24.9;
        assert_eq!(
            check_preconditions(&state, Activity::Play(PlayType::Game), now),
            Err(Rejection::TooTired(ActivityKind::Play))
        );
    }

    #[test]
    fn sleep_window() {
        let (mut state, now) = setup();
        state.energy = 40.0;
        assert_eq!(
            check_preconditions(&state, Activity::SleepAssist, now),
            Err(Rejection::NotTiredEnough)
        );
        state.energy = 39.0;
        state.hunger = 19.0;
        assert_eq!(
            check_preconditions(&state, Activity::SleepAssist, now),
            Err(Rejection::TooHungryToSleep)
        );
        state.hunger = 20.0;
        assert!(check_preconditions(&state, Activity::SleepAssist, now).is_ok());
    }

    #[test]
    fn comfort_only_when_down() {
        let (mut state, now) = setup();
        state.mood = Mood::Happy;
        assert_eq!(
            check_preconditions(&state, Activity::Comfort, now),
            Err(Rejection::NotNeeded)
        );
        state.mood = Mood::Low;
        assert!(check_preconditions(&state, Activity::Comfort, now).is_ok());
    }

    #[test]
    fn confide_needs_bond_three() {
        let (mut state, now) = setup();
        state.bond_level = 2;
        let rejection = check_preconditions(&state, Activity::Confide, now).unwrap_err();
        assert_eq!(rejection.message(), "She's not ready to share personal things yet.");
        state.bond_level = 3;
        assert!(check_preconditions(&state, Activity::Confide, now).is_ok());
    }

    #[test]
    fn gift_cooldown() {
        let (mut state, now) = setup();
        state.gift_cooldown_until = now + TimeDelta::hours(1);
        assert_eq!(
            check_preconditions(&state, Activity::GiveGift(GiftType::Tea), now),
            Err(Rejection::GiftCooldown)
        );
        assert!(
            check_preconditions(
                &state,
                Activity::GiveGift(GiftType::Tea),
                now + TimeDelta::hours(1)
            )
            .is_ok()
        );
    }

    #[test]
    fn tired_messages_name_the_activity() {
        assert!(Rejection::TooTired(ActivityKind::Play).message().contains("play"));
        assert!(Rejection::TooTired(ActivityKind::Tidy).message().contains("tidy"));
    }
}
