//! Low-probability, cooldown-gated rare clip unlocks.

use chrono::{DateTime, Utc};
use pearl_types::CompanionState;
use tracing::info;

use crate::config::CompanionConfig;
use crate::random::RandomSource;

/// Roll for a rare unlock after a successful activity.
///
/// Requires enough engagement today and an expired cooldown. On a winning
/// roll, picks one clip not yet unlocked, records it, and starts the cooldown.
/// Returns the unlocked clip id.
pub fn check_rare_unlock(
    state: &mut CompanionState,
    config: &CompanionConfig,
    pool: &[String],
    now: DateTime<Utc>,
    rng: &mut dyn RandomSource,
) -> Option<String> {
    if state.engagement_count < config.rare_min_engagement || now < state.rare_cooldown_until {
        return None;
    }
    if !rng.chance(config.rare_chance) {
        return None;
    }

    let remaining: Vec<&String> = pool
        .iter()
        .filter(|clip| !state.unlocked_clips.contains(*clip))
        .collect();
    let clip = (*remaining.get(rng.pick(remaining.len()))?).clone();

    state.unlocked_clips.insert(clip.clone());
    state.rare_cooldown_until = now
        .checked_add_signed(config.rare_cooldown())
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    info!(
        companion_id = %state.companion_id,
        clip = %clip,
        unlocked = state.unlocked_clips.len(),
        "rare clip unlocked"
    );
    Some(clip)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing
)]
mod tests {
    use chrono::{FixedOffset, TimeDelta, TimeZone};

    use super::*;
    use crate::companion::create_companion;
    use crate::media::MediaCatalog;
    use crate::random::ScriptedRolls;

    fn setup() -> (CompanionState, CompanionConfig, DateTime<Utc>) {
        let config = CompanionConfig::default();
        let now = Utc.with_ymd_and_hms(2025, 7, 4, 15, 0, 0).unwrap();
        let mut state = create_companion(&config, now, FixedOffset::east_opt(0).unwrap());
        state.engagement_count = 3;
        (state, config, now)
    }

    #[test]
    fn winning_roll_unlocks_and_starts_cooldown() {
        let (mut state, config, now) = setup();
        let pool = MediaCatalog::default().rare;
        let mut rng = ScriptedRolls::new(vec![0.1, 0.0]);

        let clip = check_rare_unlock(&mut state, &config, &pool, now, &mut rng);

        assert_eq!(clip.as_deref(), Some("/videos/alexa_neutral_1.mp4"));
        assert!(state.unlocked_clips.contains("/videos/alexa_neutral_1.mp4"));
        assert_eq!(state.rare_cooldown_until, now + TimeDelta::hours(6));
    }

    #[test]
    fn losing_roll_changes_nothing() {
        let (mut state, config, now) = setup();
        let pool = MediaCatalog::default().rare;
        let before = state.clone();
        let mut rng = ScriptedRolls::constant(0.15);

        assert!(check_rare_unlock(&mut state, &config, &pool, now, &mut rng).is_none());
        assert_eq!(state, before);
    }

    #[test]
    fn low_engagement_blocks_unlock() {
        let (mut state, config, now) = setup();
        state.engagement_count = 2;
        let pool = MediaCatalog::default().rare;
        let mut rng = ScriptedRolls::constant(0.0);
        assert!(check_rare_unlock(&mut state, &config, &pool, now, &mut rng).is_none());
    }

    #[test]
    fn cooldown_blocks_unlock() {
        let (mut state, config, now) = setup();
        state.rare_cooldown_until = now + TimeDelta::minutes(1);
        let pool = MediaCatalog::default().rare;
        let mut rng = ScriptedRolls::constant(0.0);
        assert!(check_rare_unlock(&mut state, &config, &pool, now, &mut rng).is_none());

        let later = now + TimeDelta::minutes(1);
        assert!(check_rare_unlock(&mut state, &config, &pool, later, &mut rng).is_some());
    }

    #[test]
    fn exhausted_pool_unlocks_nothing() {
        let (mut state, config, now) = setup();
        let pool = MediaCatalog::default().rare;
        state.unlocked_clips = pool.iter().cloned().collect();
        let mut rng = ScriptedRolls::constant(0.0);
        assert!(check_rare_unlock(&mut state, &config, &pool, now, &mut rng).is_none());
        assert_eq!(state.rare_cooldown_until, now);
    }

    #[test]
    fn skips_already_unlocked_clips() {
        let (mut state, config, now) = setup();
        let pool = MediaCatalog::default().rare;
        state.unlocked_clips.insert(pool[0].clone());
        let mut rng = ScriptedRolls::constant(0.0);
        let clip = check_rare_unlock(&mut state, &config, &pool, now, &mut rng);
        assert_eq!(clip.as_ref(), Some(&pool[1]));
    }
}
