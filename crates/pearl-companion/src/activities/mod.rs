//! Activity resolution: validation, execution, and shared bookkeeping.
//!
//! [`perform_activity`] runs the full pipeline for one player activity:
//!
//! 1. Roll the daily counters over if needed
//! 2. Check hard preconditions ([`validation`]); on failure return a
//!    rejection without touching the state
//! 3. Apply the activity's effects ([`handlers`]), which may include an
//!    in-character refusal
//! 4. Record the interaction, engagement, lifetime counters, and affection
//! 5. Convert affection into bond progress
//! 6. Refresh happiness, flags, and mood
//! 7. Roll for a rare unlock (successes only)
//! 8. Pick a reaction clip
//!
//! # Submodules
//!
//! - [`costs`] -- Prices, thresholds, and effects per activity.
//! - [`validation`] -- Hard preconditions.
//! - [`handlers`] -- Stat effects and in-character refusals.

pub mod costs;
pub mod handlers;
pub mod validation;

use chrono::{DateTime, FixedOffset, Utc};
use pearl_types::{Activity, ActivityResult, CompanionState, Notification};
use tracing::debug;

use crate::alerts;
use crate::bond;
use crate::config::CompanionConfig;
use crate::derived;
use crate::economy;
use crate::media::{self, MediaCatalog, MediaCue};
use crate::random::RandomSource;
use crate::rare;
use crate::vitals::{self, StatSnapshot};

/// Collaborators an activity needs besides the state itself.
pub struct ActivityContext<'a> {
    /// Mechanics configuration.
    pub config: &'a CompanionConfig,
    /// Clip catalog for reactions and the rare pool.
    pub catalog: &'a MediaCatalog,
    /// Offset that defines the local calendar day.
    pub offset: FixedOffset,
    /// Source of rolls.
    pub rng: &'a mut dyn RandomSource,
}

/// Everything an activity produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityReport {
    /// The result for the presentation layer.
    pub result: ActivityResult,
    /// Notifications raised along the way.
    pub notifications: Vec<Notification>,
}

/// Resolve one activity against `state` at `now`.
///
/// Never fails: rejections come back as a result with `success == false`.
pub fn perform_activity(
    state: &mut CompanionState,
    activity: Activity,
    now: DateTime<Utc>,
    ctx: ActivityContext<'_>,
) -> ActivityReport {
    let ActivityContext {
        config,
        catalog,
        offset,
        rng,
    } = ctx;
    let kind = activity.kind();

    let before = StatSnapshot::capture(state);
    let mut notifications = Vec::new();
    if vitals::roll_over_day(state, now, offset) {
        let transition = derived::refresh(state, config, now);
        notifications.extend(alerts::after_change(&before, state, &transition, config));
    }

    if let Err(rejection) = validation::check_preconditions(state, activity, now) {
        debug!(activity = kind.as_str(), ?rejection, "activity rejected");
        let mut result = ActivityResult::rejected(kind, rejection.message());
        result.media_id = media::resolve_media(
            catalog,
            state.mood,
            &state.status_flags,
            Some(MediaCue::new(activity, false)),
            rng,
        );
        return ActivityReport {
            result,
            notifications,
        };
    }

    let before = StatSnapshot::capture(state);
    let outcome = handlers::execute(state, activity, now, config, rng);
    let after_handler = StatSnapshot::capture(state);

    state.last_interaction = now;
    if outcome.success {
        if state.today_activities.insert(kind) {
            state.engagement_count = state.engagement_count.saturating_add(1);
        }
        let count = state.activity_counts.entry(kind).or_insert(0);
        *count = count.saturating_add(1);
    }
    state.daily_affection_gained = state
        .daily_affection_gained
        .saturating_add(outcome.affection_gained);
    state.lifetime_affection = state
        .lifetime_affection
        .saturating_add(outcome.affection_gained);

    let bond = bond::update_bond_progress(state, config);
    let transition = derived::refresh(state, config, now);
    notifications.extend(alerts::after_change(&before, state, &transition, config));
    for name in economy::check_achievements(state, config) {
        notifications.push(alerts::achievement(&name));
    }

    let rare_unlock = if outcome.success {
        rare::check_rare_unlock(state, config, &catalog.rare, now, rng)
    } else {
        None
    };
    if rare_unlock.is_some() {
        notifications.push(alerts::rare_unlocked());
    }

    let media_id = media::resolve_media(
        catalog,
        state.mood,
        &state.status_flags,
        Some(MediaCue::new(activity, outcome.success)),
        rng,
    );

    let stat_deltas = before.deltas_to(&StatSnapshot {
        happiness: state.happiness,
        ..after_handler
    });

    debug!(
        activity = kind.as_str(),
        success = outcome.success,
        affection = outcome.affection_gained,
        engagement = state.engagement_count,
        mood = state.mood.as_str(),
        "activity resolved"
    );

    let level_up = bond.and_then(|b| b.level_up);
    ActivityReport {
        result: ActivityResult {
            activity: kind,
            success: outcome.success,
            message: outcome.message,
            media_id,
            stat_deltas,
            bond_level_up: level_up,
            bond_title: level_up.map(|level| bond::title(level).to_owned()),
            rare_unlock,
        },
        notifications,
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing
)]
mod tests {
    use chrono::{TimeDelta, TimeZone};
    use pearl_types::{
        ActivityKind, FoodType, GiftType, Mood, NotificationKind, PlayType, Stat, StatusFlag,
        TalkTopic,
    };

    use super::*;
    use crate::companion::create_companion;
    use crate::random::ScriptedRolls;

    struct Fixture {
        state: CompanionState,
        config: CompanionConfig,
        catalog: MediaCatalog,
        rng: ScriptedRolls,
        now: DateTime<Utc>,
    }

    impl Fixture {
        fn new() -> Self {
            let config = CompanionConfig::default();
            let now = Utc.with_ymd_and_hms(2025, 10, 3, 9, 0, 0).unwrap();
            let state = create_companion(&config, now, utc());
            Self {
                state,
                config,
                catalog: MediaCatalog::default(),
                rng: ScriptedRolls::constant(0.0),
                now,
            }
        }

        fn perform(&mut self, activity: Activity) -> ActivityReport {
            let ctx = ActivityContext {
                config: &self.config,
                catalog: &self.catalog,
                offset: utc(),
                rng: &mut self.rng,
            };
            perform_activity(&mut self.state, activity, self.now, ctx)
        }
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn healthy_meal_scenario() {
        let mut fx = Fixture::new();
        fx.state.currency = 10;

        let report = fx.perform(Activity::Feed(FoodType::Healthy));
        let result = report.result;

        assert!(result.success);
        assert!(close(fx.state.hunger, 100.0));
        assert_eq!(fx.state.currency, 5);
        assert!(close(result.stat_deltas[&Stat::Hunger], 30.0));
        assert!(close(result.stat_deltas[&Stat::Affection], 5.0));
        assert!(close(result.stat_deltas[&Stat::Currency], -5.0));
        assert_eq!(result.media_id.as_deref(), Some("/videos/healthy_meal_1.mp4"));
    }

    #[test]
    fn tired_play_is_rejected_without_mutation() {
        let mut fx = Fixture::new();
        fx.state.energy = 10.0;
        fx.state.last_interaction = fx.now - TimeDelta::hours(3);
        let before = fx.state.clone();

        let report = fx.perform(Activity::Play(PlayType::Game));

        assert!(!report.result.success);
        assert!(report.result.message.contains("tired"));
        assert!(report.result.stat_deltas.is_empty());
        assert_eq!(fx.state, before);
    }

    #[test]
    fn broke_feed_is_rejected_without_mutation() {
        let mut fx = Fixture::new();
        fx.state.currency = 4;
        fx.state.hunger = 40.0;
        fx.state.last_interaction = fx.now - TimeDelta::hours(3);
        let before = fx.state.clone();

        let report = fx.perform(Activity::Feed(FoodType::Healthy));

        assert!(!report.result.success);
        assert!(report.result.message.contains("gems"));
        assert!(report.result.stat_deltas.is_empty());
        assert!(report.notifications.is_empty());
        assert_eq!(fx.state, before);
    }

    #[test]
    fn confide_at_low_bond_is_rejected() {
        let mut fx = Fixture::new();
        fx.state.bond_level = 2;
        let before = fx.state.clone();

        let report = fx.perform(Activity::Confide);

        assert!(!report.result.success);
        assert_eq!(fx.state, before);
    }

    #[test]
    fn soft_failure_refreshes_interaction() {
        let mut fx = Fixture::new();
        fx.state.mood = Mood::Distressed;
        fx.state.last_interaction = fx.now - TimeDelta::hours(5);

        let report = fx.perform(Activity::Talk(TalkTopic::Light));

        assert!(!report.result.success);
        assert_eq!(fx.state.last_interaction, fx.now);
        assert_eq!(fx.state.engagement_count, 0);
        assert!(fx.state.activity_counts.is_empty());
    }

    #[test]
    fn engagement_counts_each_kind_once_per_day() {
        let mut fx = Fixture::new();
        fx.perform(Activity::Talk(TalkTopic::Light));
        fx.perform(Activity::Talk(TalkTopic::Supportive));
        fx.perform(Activity::Wash);

        assert_eq!(fx.state.engagement_count, 2);
        assert_eq!(fx.state.activity_counts[&ActivityKind::Talk], 2);

        fx.now += TimeDelta::days(1);
        fx.perform(Activity::Talk(TalkTopic::Light));
        assert_eq!(fx.state.engagement_count, 1);
    }

    #[test]
    fn wash_cures_sickness() {
        let mut fx = Fixture::new();
        fx.state.hygiene = 20.0;
        fx.state.last_interaction = fx.now - TimeDelta::hours(50);
        derived::refresh(&mut fx.state, &fx.config, fx.now);
        assert!(fx.state.has_flag(StatusFlag::Sick));

        let report = fx.perform(Activity::Wash);

        assert!(report.result.success);
        assert!(!fx.state.has_flag(StatusFlag::Sick));
    }

    #[test]
    fn meters_stay_bounded() {
        let mut fx = Fixture::new();
        fx.rng = ScriptedRolls::new(vec![0.3, 0.95, 0.6, 0.05, 0.8]);
        let activities = [
            Activity::Feed(FoodType::Junk),
            Activity::Play(PlayType::Friend),
            Activity::Tidy,
            Activity::Wash,
            Activity::Talk(TalkTopic::Supportive),
            Activity::SleepAssist,
            Activity::GiveGift(GiftType::Music),
            Activity::MiniGame(500),
        ];
        for step in 0..60 {
            fx.now += TimeDelta::minutes(7);
            let activity = activities[step % activities.len()];
            fx.perform(activity);
            for meter in [
                fx.state.hunger,
                fx.state.energy,
                fx.state.hygiene,
                fx.state.happiness,
                fx.state.trust,
                fx.state.comfort,
            ] {
                assert!((0.0..=100.0).contains(&meter));
            }
            assert!((0.0..100.0).contains(&fx.state.bond_progress));
        }
    }

    #[test]
    fn bond_level_up_is_reported() {
        let mut fx = Fixture::new();
        fx.state.bond_progress = 99.0;

        let report = fx.perform(Activity::Talk(TalkTopic::Light));

        assert_eq!(report.result.bond_level_up, Some(1));
        assert_eq!(report.result.bond_title.as_deref(), Some("Familiar"));
        assert_eq!(fx.state.bond_level, 1);
    }

    #[test]
    fn first_kiss_notifies() {
        let mut fx = Fixture::new();
        fx.state.lifetime_affection = 96;

        let report = fx.perform(Activity::Talk(TalkTopic::Light));

        assert!(
            report
                .notifications
                .iter()
                .any(|n| n.kind == NotificationKind::AchievementUnlocked)
        );
        assert!(fx.state.achievements.contains(economy::FIRST_KISS));
    }

    #[test]
    fn rare_unlock_after_third_distinct_activity() {
        let mut fx = Fixture::new();
        fx.perform(Activity::Talk(TalkTopic::Light));
        fx.perform(Activity::Wash);
        assert!(fx.state.unlocked_clips.is_empty());

        let report = fx.perform(Activity::MiniGame(10));

        assert!(report.result.rare_unlock.is_some());
        assert_eq!(fx.state.unlocked_clips.len(), 1);
        assert!(
            report
                .notifications
                .iter()
                .any(|n| n.kind == NotificationKind::RareUnlocked)
        );
    }

    #[test]
    fn gift_cooldown_blocks_second_gift() {
        let mut fx = Fixture::new();
        assert!(fx.perform(Activity::GiveGift(GiftType::Book)).result.success);
        let report = fx.perform(Activity::GiveGift(GiftType::Tea));
        assert!(!report.result.success);
        assert_eq!(report.result.message, "She's still appreciating your last gift.");
    }
}
