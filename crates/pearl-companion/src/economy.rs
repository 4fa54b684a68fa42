//! Daily login streak, the daily gem reward, and achievements.

use chrono::{DateTime, Utc};
use pearl_types::CompanionState;
use tracing::info;

use crate::config::CompanionConfig;

/// Name of the achievement for lifetime affection.
pub const FIRST_KISS: &str = "First Kiss";

/// A daily reward granted at session start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyReward {
    /// Streak length after this session start.
    pub streak: u32,
    /// Gems granted.
    pub reward: u32,
}

/// Gems granted for a streak of the given length.
pub fn daily_reward_for(streak: u32, config: &CompanionConfig) -> u32 {
    config
        .daily_reward_per_streak_day
        .saturating_mul(streak.min(config.daily_reward_streak_cap))
}

/// Grant the daily reward if at least one whole day passed since the last
/// rewarded session, or if no session was ever rewarded.
///
/// A gap of exactly one day extends the streak; a longer gap restarts it.
pub fn start_session(
    state: &mut CompanionState,
    config: &CompanionConfig,
    now: DateTime<Utc>,
) -> Option<DailyReward> {
    let days = now.signed_duration_since(state.last_login).num_days();
    let streak = if state.streak_days == 0 {
        1
    } else if days < 1 {
        return None;
    } else if days == 1 {
        state.streak_days.saturating_add(1)
    } else {
        1
    };

    let reward = daily_reward_for(streak, config);
    state.streak_days = streak;
    state.currency = state.currency.saturating_add(reward);
    state.last_login = now;
    info!(
        companion_id = %state.companion_id,
        streak,
        reward,
        currency = state.currency,
        "daily reward granted"
    );
    Some(DailyReward { streak, reward })
}

/// Unlock any achievements whose conditions now hold. Returns the names
/// unlocked by this call.
pub fn check_achievements(state: &mut CompanionState, config: &CompanionConfig) -> Vec<String> {
    let mut unlocked = Vec::new();
    if state.lifetime_affection >= config.first_kiss_affection
        && state.achievements.insert(FIRST_KISS.to_string())
    {
        unlocked.push(FIRST_KISS.to_string());
    }
    unlocked
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use chrono::{FixedOffset, TimeDelta, TimeZone};

    use super::*;
    use crate::companion::create_companion;

    fn setup() -> (CompanionState, CompanionConfig, DateTime<Utc>) {
        let config = CompanionConfig::default();
        let now = Utc.with_ymd_and_hms(2025, 9, 1, 7, 30, 0).unwrap();
        let state = create_companion(&config, now, FixedOffset::east_opt(0).unwrap());
        (state, config, now)
    }

    #[test]
    fn first_session_starts_streak() {
        let (mut state, config, now) = setup();
        let reward = start_session(&mut state, &config, now).unwrap();
        assert_eq!(reward, DailyReward { streak: 1, reward: 10 });
        assert_eq!(state.currency, 310);
    }

    #[test]
    fn same_day_session_grants_nothing() {
        let (mut state, config, now) = setup();
        start_session(&mut state, &config, now);
        assert!(start_session(&mut state, &config, now + TimeDelta::hours(20)).is_none());
        assert_eq!(state.streak_days, 1);
    }

    #[test]
    fn consecutive_days_extend_streak() {
        let (mut state, config, now) = setup();
        start_session(&mut state, &config, now);
        let reward = start_session(&mut state, &config, now + TimeDelta::hours(25)).unwrap();
        assert_eq!(reward, DailyReward { streak: 2, reward: 20 });
    }

    #[test]
    fn gap_resets_streak() {
        let (mut state, config, now) = setup();
        state.streak_days = 5;
        let reward = start_session(&mut state, &config, now + TimeDelta::days(3)).unwrap();
        assert_eq!(reward.streak, 1);
    }

    #[test]
    fn reward_caps_at_seven_days() {
        let config = CompanionConfig::default();
        assert_eq!(daily_reward_for(7, &config), 70);
        assert_eq!(daily_reward_for(30, &config), 70);
    }

    #[test]
    fn first_kiss_unlocks_once() {
        let (mut state, config, _) = setup();
        state.lifetime_affection = 99;
        assert!(check_achievements(&mut state, &config).is_empty());
        state.lifetime_affection = 100;
        assert_eq!(check_achievements(&mut state, &config), vec![FIRST_KISS.to_string()]);
        assert!(check_achievements(&mut state, &config).is_empty());
    }
}
