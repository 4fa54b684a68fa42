//! Notification content for simulation events.
//!
//! The simulation decides *when* to notify; delivery belongs to whatever
//! sink the engine was given.

use pearl_types::{CompanionState, Notification, NotificationKind, StatusFlag};

use crate::config::CompanionConfig;
use crate::economy::DailyReward;
use crate::flags::FlagTransition;
use crate::vitals::StatSnapshot;

/// A primary meter is in the critical band.
pub fn stats_critical() -> Notification {
    Notification::new(
        NotificationKind::StatsCritical,
        "Pearl misses you",
        "Come back and look after her.",
    )
}

/// A status flag was raised.
pub fn flag_raised(flag: StatusFlag) -> Notification {
    let (title, body) = match flag {
        StatusFlag::Sick => ("She's Under the Weather", "Gentle care needed."),
        StatusFlag::Playful => ("She's in a Playful Mood", "Perfect timing for activities!"),
        StatusFlag::LeavingWarning => ("She's Close to Giving Up", "One more day like this..."),
        StatusFlag::Withdrawn => ("She's Withdrawn", "She hasn't heard from you in a while."),
    };
    Notification::new(NotificationKind::FlagRaised, title, body)
}

/// The daily reward was granted.
pub fn daily_reward(reward: DailyReward) -> Notification {
    Notification::new(
        NotificationKind::DailyReward,
        "Daily reward",
        format!("+{} gems | Day {} streak", reward.reward, reward.streak),
    )
}

/// An achievement was unlocked.
pub fn achievement(name: &str) -> Notification {
    Notification::new(
        NotificationKind::AchievementUnlocked,
        "New achievement",
        format!("{name} unlocked"),
    )
}

/// A rare clip was unlocked.
pub fn rare_unlocked() -> Notification {
    Notification::new(
        NotificationKind::RareUnlocked,
        "A rare moment",
        "You unlocked a new memory with her.",
    )
}

/// Whether any primary meter of `state` is in the critical band.
pub const fn is_critical(state: &CompanionState, config: &CompanionConfig) -> bool {
    StatSnapshot::capture(state).min_meter() < config.critical_meter_below
}

/// Notifications for a state change: entering the critical band, and each
/// newly raised flag.
pub fn after_change(
    before: &StatSnapshot,
    state: &CompanionState,
    transition: &FlagTransition,
    config: &CompanionConfig,
) -> Vec<Notification> {
    let mut out = Vec::new();
    let was_critical = before.min_meter() < config.critical_meter_below;
    if !was_critical && is_critical(state, config) {
        out.push(stats_critical());
    }
    out.extend(transition.raised.iter().copied().map(flag_raised));
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::{FixedOffset, TimeZone, Utc};

    use super::*;
    use crate::companion::create_companion;

    #[test]
    fn daily_reward_body() {
        let n = daily_reward(DailyReward { streak: 3, reward: 30 });
        assert_eq!(n.kind, NotificationKind::DailyReward);
        assert_eq!(n.body, "+30 gems | Day 3 streak");
    }

    #[test]
    fn critical_only_on_entry() {
        let config = CompanionConfig::default();
        let now = Utc.with_ymd_and_hms(2025, 5, 5, 5, 0, 0).unwrap();
        let mut state = create_companion(&config, now, FixedOffset::east_opt(0).unwrap());
        let before = StatSnapshot::capture(&state);
        state.hunger = 10.0;

        let fired = after_change(&before, &state, &FlagTransition::default(), &config);
        assert_eq!(fired, vec![stats_critical()]);

        let before = StatSnapshot::capture(&state);
        state.energy = 5.0;
        let fired = after_change(&before, &state, &FlagTransition::default(), &config);
        assert!(fired.is_empty());
    }

    #[test]
    fn raised_flags_each_notify() {
        let config = CompanionConfig::default();
        let now = Utc.with_ymd_and_hms(2025, 5, 5, 5, 0, 0).unwrap();
        let state = create_companion(&config, now, FixedOffset::east_opt(0).unwrap());
        let before = StatSnapshot::capture(&state);
        let transition = FlagTransition {
            raised: vec![StatusFlag::Sick, StatusFlag::Withdrawn],
            cleared: vec![StatusFlag::Playful],
        };
        let fired = after_change(&before, &state, &transition, &config);
        assert_eq!(fired.len(), 2);
        assert_eq!(fired[0].title, "She's Under the Weather");
        assert!(fired.iter().all(|n| n.kind == NotificationKind::FlagRaised));
    }
}
