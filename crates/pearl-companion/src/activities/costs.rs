//! Prices, thresholds, and stat effects for each activity.
//!
//! Affection amounts are whole numbers; meter and hidden-stat effects are
//! `f64` and are clamped by the handler that applies them.

use pearl_types::{GiftType, Mood, TalkTopic};

// --- feed ---

/// Gems charged per meal.
pub const FEED_COST: u32 = 5;
/// Hunger restored by a meal.
pub const FEED_HUNGER_GAIN: f64 = 40.0;
/// Affection from a meal.
pub const FEED_AFFECTION: u32 = 5;
/// A meal can be refused when hunger is above this...
pub const FEED_REFUSE_HUNGER_ABOVE: f64 = 80.0;
/// ...and trust is below this...
pub const FEED_REFUSE_TRUST_BELOW: f64 = 30.0;
/// ...with this probability.
pub const FEED_REFUSE_CHANCE: f64 = 0.2;

// --- talk ---

/// Probability that light talk is brushed off while distressed.
pub const TALK_BRUSH_OFF_CHANCE: f64 = 0.3;
/// Trust lost when light talk is brushed off.
pub const TALK_BRUSH_OFF_TRUST_LOSS: f64 = 1.0;

/// Effects of a conversation on a given topic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TalkEffect {
    /// Affection gained.
    pub affection: u32,
    /// Comfort gained.
    pub comfort: f64,
    /// Trust gained.
    pub trust: f64,
}

/// Effects of a successful conversation.
pub const fn talk_effect(topic: TalkTopic) -> TalkEffect {
    match topic {
        TalkTopic::Light => TalkEffect {
            affection: 5,
            comfort: 1.0,
            trust: 0.0,
        },
        TalkTopic::Supportive => TalkEffect {
            affection: 8,
            comfort: 3.0,
            trust: 1.0,
        },
    }
}

// --- play ---

/// Energy required to play.
pub const PLAY_MIN_ENERGY: f64 = 25.0;
/// Energy spent by a good play session.
pub const PLAY_ENERGY_COST: f64 = 10.0;
/// Affection from a good play session.
pub const PLAY_AFFECTION: u32 = 15;
/// Transient happiness bonus from a good play session.
pub const PLAY_HAPPINESS_BONUS: f64 = 5.0;
/// Energy spent by a half-hearted play session.
pub const PLAY_WEAK_ENERGY_COST: f64 = 5.0;
/// Affection from a half-hearted play session.
pub const PLAY_WEAK_AFFECTION: u32 = 5;

/// Probability that play goes well in the given mood.
#[allow(clippy::match_same_arms)]
pub const fn play_success_chance(mood: Mood) -> f64 {
    match mood {
        Mood::Happy => 0.95,
        Mood::Playful => 0.95,
        Mood::Neutral => 0.85,
        Mood::Low => 0.65,
        Mood::Distressed => 0.40,
    }
}

// --- wash ---

/// Affection from a wash.
pub const WASH_AFFECTION: u32 = 2;
/// Comfort from a wash.
pub const WASH_COMFORT: f64 = 1.0;
/// At or above this hygiene a wash is only a gesture.
pub const WASH_ALREADY_CLEAN: f64 = 95.0;
/// Affection from the gesture.
pub const WASH_GESTURE_AFFECTION: u32 = 1;

// --- sleep ---

/// Energy must be below this to settle in to sleep.
pub const SLEEP_ENERGY_BELOW: f64 = 40.0;
/// Hunger must be at least this to settle in to sleep.
pub const SLEEP_MIN_HUNGER: f64 = 20.0;
/// Energy restored by sleep.
pub const SLEEP_ENERGY_GAIN: f64 = 40.0;
/// Hunger spent while sleeping.
pub const SLEEP_HUNGER_COST: f64 = 10.0;
/// Hygiene lost while sleeping.
pub const SLEEP_HYGIENE_COST: f64 = 5.0;
/// Trust from helping her sleep.
pub const SLEEP_TRUST: f64 = 3.0;
/// Affection from helping her sleep.
pub const SLEEP_AFFECTION: u32 = 5;

// --- tidy ---

/// Energy required to tidy.
pub const TIDY_MIN_ENERGY: f64 = 30.0;
/// Energy spent tidying.
pub const TIDY_ENERGY_COST: f64 = 8.0;
/// Trust from tidying together.
pub const TIDY_TRUST: f64 = 2.0;
/// Affection from tidying together.
pub const TIDY_AFFECTION: u32 = 6;
/// Transient happiness bonus from a tidy space.
pub const TIDY_HAPPINESS_BONUS: f64 = 5.0;

// --- comfort ---

/// Probability of a gentle approach, which always lands.
pub const COMFORT_GENTLE_CHANCE: f64 = 0.7;
/// An encouraging approach lands only above this trust.
pub const COMFORT_ENCOURAGING_TRUST_ABOVE: f64 = 60.0;
/// Trust from comfort that lands.
pub const COMFORT_TRUST: f64 = 4.0;
/// Comfort gained from comfort that lands.
pub const COMFORT_COMFORT: f64 = 6.0;
/// Affection from comfort that lands.
pub const COMFORT_AFFECTION: u32 = 5;
/// Comfort lost when the approach misses.
pub const COMFORT_MISS_PENALTY: f64 = 3.0;

// --- confide ---

/// Bond level needed before she confides.
pub const CONFIDE_MIN_BOND: u8 = 3;
/// Affection from a confided story.
pub const CONFIDE_AFFECTION: u32 = 8;

/// What confiding at a bond tier yields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfideTier {
    /// Trust gained.
    pub trust: f64,
    /// Comfort gained.
    pub comfort: f64,
    /// What she shares.
    pub message: &'static str,
}

/// The confide tier for a bond level. `None` below [`CONFIDE_MIN_BOND`].
pub const fn confide_tier(bond_level: u8) -> Option<ConfideTier> {
    let tier = match bond_level {
        0..=2 => return None,
        3 => ConfideTier {
            trust: 8.0,
            comfort: 4.0,
            message: "She shares a childhood memory.",
        },
        4 => ConfideTier {
            trust: 10.0,
            comfort: 6.0,
            message: "She talks about her dreams.",
        },
        5 => ConfideTier {
            trust: 12.0,
            comfort: 8.0,
            message: "She opens up about her fears.",
        },
        _ => ConfideTier {
            trust: 15.0,
            comfort: 10.0,
            message: "She shares her deepest thoughts.",
        },
    };
    Some(tier)
}

// --- gift ---

/// Extra affection per bond level, as a fraction of the gift's base value.
pub const GIFT_BOND_SCALE: f64 = 0.2;

/// Base value of a gift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GiftValue {
    /// Affection before bond scaling.
    pub affection: u32,
    /// Comfort gained.
    pub comfort: f64,
    /// Her reaction.
    pub message: &'static str,
}

/// Base value of each gift.
pub const fn gift_value(gift: GiftType) -> GiftValue {
    match gift {
        GiftType::Book => GiftValue {
            affection: 8,
            comfort: 3.0,
            message: "She loves the book you chose!",
        },
        GiftType::Tea => GiftValue {
            affection: 6,
            comfort: 5.0,
            message: "The tea smells wonderful to her.",
        },
        GiftType::Flower => GiftValue {
            affection: 10,
            comfort: 2.0,
            message: "She's touched by the beautiful flower.",
        },
        GiftType::Music => GiftValue {
            affection: 7,
            comfort: 4.0,
            message: "The music brings her joy.",
        },
    }
}

// --- mini-game ---

/// Most gems a single mini-game can award.
pub const MINI_GAME_MAX_AWARD: u32 = 50;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_chance_ordered_by_mood() {
        assert!(play_success_chance(Mood::Happy) > play_success_chance(Mood::Neutral));
        assert!(play_success_chance(Mood::Neutral) > play_success_chance(Mood::Low));
        assert!(play_success_chance(Mood::Low) > play_success_chance(Mood::Distressed));
    }

    #[test]
    fn confide_tiers() {
        assert!(confide_tier(2).is_none());
        assert_eq!(confide_tier(3).map(|t| t.message), Some("She shares a childhood memory."));
        assert_eq!(confide_tier(6).map(|t| t.message), Some("She shares her deepest thoughts."));
        assert_eq!(confide_tier(6), confide_tier(9));
    }

    #[test]
    fn supportive_talk_is_worth_more() {
        let light = talk_effect(TalkTopic::Light);
        let supportive = talk_effect(TalkTopic::Supportive);
        assert!(supportive.affection > light.affection);
        assert!(supportive.trust > light.trust);
    }
}
