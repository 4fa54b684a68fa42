//! Execution handlers for each activity.
//!
//! Each handler assumes the hard preconditions already passed. It applies the
//! activity's stat effects (including in-character refusals that depend on a
//! roll) and reports whether the activity succeeded. Bookkeeping shared by all
//! activities (interaction time, engagement, bond, refresh) is done by the
//! caller.

use chrono::{DateTime, Utc};
use pearl_types::{Activity, CompanionState, FoodType, GiftType, Mood, PlayType, TalkTopic};

use crate::config::CompanionConfig;
use crate::derived::add_happiness_bonus;
use crate::random::RandomSource;
use crate::vitals::clamp_meter;

use super::costs;

/// What a handler did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerOutcome {
    /// Whether the activity succeeded.
    pub success: bool,
    /// In-character description.
    pub message: String,
    /// Affection added to the accumulator.
    pub affection_gained: u32,
}

impl HandlerOutcome {
    fn success(message: impl Into<String>, affection_gained: u32) -> Self {
        Self {
            success: true,
            message: message.into(),
            affection_gained,
        }
    }

    fn failure(message: impl Into<String>, affection_gained: u32) -> Self {
        Self {
            success: false,
            message: message.into(),
            affection_gained,
        }
    }
}

const fn adjust(meter: &mut f64, delta: f64) {
    *meter = clamp_meter(*meter + delta);
}

const fn gain_affection(state: &mut CompanionState, amount: u32) -> u32 {
    state.affection = state.affection.saturating_add(amount);
    amount
}

/// Dispatch to the handler for `activity`.
pub fn execute(
    state: &mut CompanionState,
    activity: Activity,
    now: DateTime<Utc>,
    config: &CompanionConfig,
    rng: &mut dyn RandomSource,
) -> HandlerOutcome {
    match activity {
        Activity::Feed(food) => execute_feed(state, food, rng),
        Activity::Talk(topic) => execute_talk(state, topic, rng),
        Activity::Play(play) => execute_play(state, play, rng),
        Activity::Wash => execute_wash(state),
        Activity::SleepAssist => execute_sleep(state),
        Activity::Tidy => execute_tidy(state),
        Activity::Comfort => execute_comfort(state, rng),
        Activity::Confide => execute_confide(state),
        Activity::GiveGift(gift) => execute_gift(state, gift, now, config),
        Activity::MiniGame(score) => execute_mini_game(state, score),
    }
}

/// Serve a meal. A well-fed companion with low trust may refuse it, in which
/// case nothing is charged.
pub fn execute_feed(
    state: &mut CompanionState,
    food: FoodType,
    rng: &mut dyn RandomSource,
) -> HandlerOutcome {
    if state.hunger > costs::FEED_REFUSE_HUNGER_ABOVE
        && state.trust < costs::FEED_REFUSE_TRUST_BELOW
        && rng.chance(costs::FEED_REFUSE_CHANCE)
    {
        return HandlerOutcome::failure("She's not hungry right now.", 0);
    }

    state.currency = state.currency.saturating_sub(costs::FEED_COST);
    adjust(&mut state.hunger, costs::FEED_HUNGER_GAIN);
    let gained = gain_affection(state, costs::FEED_AFFECTION);
    let message = match food {
        FoodType::Healthy => "She enjoyed the meal!",
        FoodType::Quick => "She happily munched on the snack.",
        FoodType::Junk => "The comfort food hit the spot.",
    };
    HandlerOutcome::success(message, gained)
}

/// Have a conversation. Light talk can be brushed off while she is
/// distressed, costing a little trust.
pub fn execute_talk(
    state: &mut CompanionState,
    topic: TalkTopic,
    rng: &mut dyn RandomSource,
) -> HandlerOutcome {
    if state.mood == Mood::Distressed
        && topic == TalkTopic::Light
        && rng.chance(costs::TALK_BRUSH_OFF_CHANCE)
    {
        adjust(&mut state.trust, -costs::TALK_BRUSH_OFF_TRUST_LOSS);
        return HandlerOutcome::failure(
            "She doesn't seem in the mood for light conversation.",
            0,
        );
    }

    let effect = costs::talk_effect(topic);
    adjust(&mut state.comfort, effect.comfort);
    adjust(&mut state.trust, effect.trust);
    let gained = gain_affection(state, effect.affection);
    let topic_name = match topic {
        TalkTopic::Light => "light",
        TalkTopic::Supportive => "supportive",
    };
    HandlerOutcome::success(format!("She appreciated your {topic_name} conversation."), gained)
}

/// Play together. The chance of a good session depends on mood; a poor
/// session still yields a little affection.
pub fn execute_play(
    state: &mut CompanionState,
    play: PlayType,
    rng: &mut dyn RandomSource,
) -> HandlerOutcome {
    if !rng.chance(costs::play_success_chance(state.mood)) {
        adjust(&mut state.energy, -costs::PLAY_WEAK_ENERGY_COST);
        let gained = gain_affection(state, costs::PLAY_WEAK_AFFECTION);
        return HandlerOutcome::failure(
            "She played for a bit, but her heart wasn't in it.",
            gained,
        );
    }

    adjust(&mut state.energy, -costs::PLAY_ENERGY_COST);
    add_happiness_bonus(state, costs::PLAY_HAPPINESS_BONUS);
    let gained = gain_affection(state, costs::PLAY_AFFECTION);
    let message = match play {
        PlayType::Game => "She had fun playing!",
        PlayType::Friend => "She had a lovely time with her friend!",
    };
    HandlerOutcome::success(message, gained)
}

/// Wash up. Already-clean companions only appreciate the gesture.
pub fn execute_wash(state: &mut CompanionState) -> HandlerOutcome {
    if state.hygiene >= costs::WASH_ALREADY_CLEAN {
        let gained = gain_affection(state, costs::WASH_GESTURE_AFFECTION);
        return HandlerOutcome::success(
            "She's already clean, but she appreciated the gesture.",
            gained,
        );
    }

    state.hygiene = 100.0;
    adjust(&mut state.comfort, costs::WASH_COMFORT);
    let gained = gain_affection(state, costs::WASH_AFFECTION);
    HandlerOutcome::success("She feels much cleaner now!", gained)
}

/// Help her settle in to sleep.
pub fn execute_sleep(state: &mut CompanionState) -> HandlerOutcome {
    adjust(&mut state.energy, costs::SLEEP_ENERGY_GAIN);
    adjust(&mut state.hunger, -costs::SLEEP_HUNGER_COST);
    adjust(&mut state.hygiene, -costs::SLEEP_HYGIENE_COST);
    adjust(&mut state.trust, costs::SLEEP_TRUST);
    let gained = gain_affection(state, costs::SLEEP_AFFECTION);
    HandlerOutcome::success("She's settling in for a good rest.", gained)
}

/// Tidy her space together.
pub fn execute_tidy(state: &mut CompanionState) -> HandlerOutcome {
    adjust(&mut state.energy, -costs::TIDY_ENERGY_COST);
    adjust(&mut state.trust, costs::TIDY_TRUST);
    add_happiness_bonus(state, costs::TIDY_HAPPINESS_BONUS);
    let gained = gain_affection(state, costs::TIDY_AFFECTION);
    HandlerOutcome::success("She feels better with a tidy space!", gained)
}

/// Comfort her. The approach is gentle most of the time; an encouraging
/// approach only lands once she trusts you enough.
pub fn execute_comfort(state: &mut CompanionState, rng: &mut dyn RandomSource) -> HandlerOutcome {
    let gentle = rng.chance(costs::COMFORT_GENTLE_CHANCE);
    if !gentle && state.trust <= costs::COMFORT_ENCOURAGING_TRUST_ABOVE {
        adjust(&mut state.comfort, -costs::COMFORT_MISS_PENALTY);
        return HandlerOutcome::failure("She needed a different kind of support.", 0);
    }

    adjust(&mut state.trust, costs::COMFORT_TRUST);
    adjust(&mut state.comfort, costs::COMFORT_COMFORT);
    let gained = gain_affection(state, costs::COMFORT_AFFECTION);
    HandlerOutcome::success("Your comfort helped her feel better.", gained)
}

/// Let her confide. What she shares deepens with the bond.
pub fn execute_confide(state: &mut CompanionState) -> HandlerOutcome {
    let Some(tier) = costs::confide_tier(state.bond_level) else {
        return HandlerOutcome::failure("She's not ready to share personal things yet.", 0);
    };
    adjust(&mut state.trust, tier.trust);
    adjust(&mut state.comfort, tier.comfort);
    let gained = gain_affection(state, costs::CONFIDE_AFFECTION);
    HandlerOutcome::success(tier.message, gained)
}

/// Affection a gift is worth at the given bond level.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn gift_affection(gift: GiftType, bond_level: u8) -> u32 {
    let base = f64::from(costs::gift_value(gift).affection);
    let scaled = base * costs::GIFT_BOND_SCALE.mul_add(f64::from(bond_level), 1.0);
    // Bounded by base * 2.2, well inside u32.
    scaled.round().max(0.0) as u32
}

/// Give a gift and start the gift cooldown.
pub fn execute_gift(
    state: &mut CompanionState,
    gift: GiftType,
    now: DateTime<Utc>,
    config: &CompanionConfig,
) -> HandlerOutcome {
    let value = costs::gift_value(gift);
    adjust(&mut state.comfort, value.comfort);
    let gained = gain_affection(state, gift_affection(gift, state.bond_level));
    state.gift_cooldown_until = now
        .checked_add_signed(config.gift_cooldown())
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    HandlerOutcome::success(value.message, gained)
}

/// Award gems for a finished mini-game.
pub fn execute_mini_game(state: &mut CompanionState, score: u32) -> HandlerOutcome {
    let award = score.min(costs::MINI_GAME_MAX_AWARD);
    state.currency = state.currency.saturating_add(award);
    HandlerOutcome::success(format!("You earned {award} gems!"), 0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use chrono::{FixedOffset, TimeDelta, TimeZone};

    use super::*;
    use crate::companion::create_companion;
    use crate::random::ScriptedRolls;

    fn setup() -> (CompanionState, CompanionConfig, DateTime<Utc>) {
        let config = CompanionConfig::default();
        let now = Utc.with_ymd_and_hms(2025, 8, 20, 16, 0, 0).unwrap();
        let state = create_companion(&config, now, FixedOffset::east_opt(0).unwrap());
        (state, config, now)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn feed_charges_and_fills() {
        let (mut state, _, _) = setup();
        state.currency = 10;
        let mut rng = ScriptedRolls::constant(0.0);

        let outcome = execute_feed(&mut state, FoodType::Healthy, &mut rng);

        assert!(outcome.success);
        assert_eq!(outcome.affection_gained, 5);
        assert_eq!(state.currency, 5);
        assert!(close(state.hunger, 100.0));
    }

    #[test]
    fn full_distrustful_companion_can_refuse_food() {
        let (mut state, _, _) = setup();
        state.hunger = 85.0;
        state.trust = 20.0;
        let mut rng = ScriptedRolls::constant(0.1);

        let outcome = execute_feed(&mut state, FoodType::Quick, &mut rng);

        assert!(!outcome.success);
        assert_eq!(outcome.message, "She's not hungry right now.");
        assert_eq!(state.currency, 300);
        assert!(close(state.hunger, 85.0));
    }

    #[test]
    fn refusal_needs_low_trust() {
        let (mut state, _, _) = setup();
        state.hunger = 85.0;
        state.trust = 30.0;
        let mut rng = ScriptedRolls::constant(0.0);
        assert!(execute_feed(&mut state, FoodType::Quick, &mut rng).success);
    }

    #[test]
    fn light_talk_brushed_off_when_distressed() {
        let (mut state, _, _) = setup();
        state.mood = Mood::Distressed;
        let mut rng = ScriptedRolls::constant(0.2);

        let outcome = execute_talk(&mut state, TalkTopic::Light, &mut rng);

        assert!(!outcome.success);
        assert!(close(state.trust, 49.0));
    }

    #[test]
    fn supportive_talk_lands_when_distressed() {
        let (mut state, _, _) = setup();
        state.mood = Mood::Distressed;
        let mut rng = ScriptedRolls::constant(0.0);

        let outcome = execute_talk(&mut state, TalkTopic::Supportive, &mut rng);

        assert!(outcome.success);
        assert_eq!(outcome.affection_gained, 8);
        assert!(close(state.comfort, 43.0));
        assert!(close(state.trust, 51.0));
        assert_eq!(outcome.message, "She appreciated your supportive conversation.");
    }

    #[test]
    fn play_success_and_weak_session() {
        let (mut state, _, _) = setup();
        state.mood = Mood::Neutral;

        let mut rng = ScriptedRolls::constant(0.5);
        let outcome = execute_play(&mut state, PlayType::Game, &mut rng);
        assert!(outcome.success);
        assert_eq!(outcome.affection_gained, 15);
        assert!(close(state.energy, 55.0));
        assert!(close(state.happiness_bonus, 5.0));

        let mut rng = ScriptedRolls::constant(0.9);
        let outcome = execute_play(&mut state, PlayType::Friend, &mut rng);
        assert!(!outcome.success);
        assert_eq!(outcome.affection_gained, 5);
        assert!(close(state.energy, 50.0));
    }

    #[test]
    fn wash_restores_hygiene() {
        let (mut state, _, _) = setup();
        state.hygiene = 30.0;
        let outcome = execute_wash(&mut state);
        assert!(outcome.success);
        assert!(close(state.hygiene, 100.0));
        assert!(close(state.comfort, 41.0));
        assert_eq!(outcome.affection_gained, 2);
    }

    #[test]
    fn wash_when_clean_is_a_gesture() {
        let (mut state, _, _) = setup();
        state.hygiene = 96.0;
        let outcome = execute_wash(&mut state);
        assert!(outcome.success);
        assert!(outcome.message.contains("gesture"));
        assert_eq!(outcome.affection_gained, 1);
        assert!(close(state.comfort, 40.0));
    }

    #[test]
    fn sleep_effects() {
        let (mut state, _, _) = setup();
        state.energy = 20.0;
        state.hunger = 50.0;
        execute_sleep(&mut state);
        assert!(close(state.energy, 60.0));
        assert!(close(state.hunger, 40.0));
        assert!(close(state.hygiene, 75.0));
        assert!(close(state.trust, 53.0));
    }

    #[test]
    fn comfort_encouraging_needs_trust() {
        let (mut state, _, _) = setup();
        state.trust = 60.0;
        let mut rng = ScriptedRolls::constant(0.8);
        let outcome = execute_comfort(&mut state, &mut rng);
        assert!(!outcome.success);
        assert!(close(state.comfort, 37.0));

        state.trust = 61.0;
        let outcome = execute_comfort(&mut state, &mut rng);
        assert!(outcome.success);
        assert!(close(state.trust, 65.0));
    }

    #[test]
    fn gift_scales_with_bond_and_sets_cooldown() {
        let (mut state, config, now) = setup();
        state.bond_level = 3;
        let outcome = execute_gift(&mut state, GiftType::Flower, now, &config);
        // 10 * 1.6
        assert_eq!(outcome.affection_gained, 16);
        assert_eq!(state.gift_cooldown_until, now + TimeDelta::hours(24));
        assert_eq!(gift_affection(GiftType::Tea, 1), 7);
    }

    #[test]
    fn confide_tier_effects() {
        let (mut state, _, _) = setup();
        state.bond_level = 4;
        let outcome = execute_confide(&mut state);
        assert_eq!(outcome.message, "She talks about her dreams.");
        assert!(close(state.trust, 60.0));
        assert!(close(state.comfort, 46.0));
    }

    #[test]
    fn mini_game_award_is_capped() {
        let (mut state, _, _) = setup();
        execute_mini_game(&mut state, 120);
        assert_eq!(state.currency, 350);
        execute_mini_game(&mut state, 7);
        assert_eq!(state.currency, 357);
    }
}
