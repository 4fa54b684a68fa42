//! Enumeration types for the Pearl companion engine.
//!
//! Serialized names are the wire names the presentation layer and the
//! persisted state record use, so renaming a variant is a format change.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Mood and status
// ---------------------------------------------------------------------------

/// The companion's derived mood.
///
/// Always recomputed from the rest of the state; never set directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum Mood {
    /// Well cared for and content.
    Happy,
    /// Neither good nor bad.
    Neutral,
    /// Down, tired, or unwell.
    Low,
    /// Struggling; needs attention urgently.
    Distressed,
    /// Energetic and wants to play.
    Playful,
}

impl Mood {
    /// All moods, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Happy,
        Self::Neutral,
        Self::Low,
        Self::Distressed,
        Self::Playful,
    ];

    /// Wire name of the mood.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Neutral => "neutral",
            Self::Low => "low",
            Self::Distressed => "distressed",
            Self::Playful => "playful",
        }
    }
}

/// A level-triggered behavioral condition.
///
/// Ordering follows declaration order, which is also the order flags are
/// listed in serialized state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum StatusFlag {
    /// Poor hygiene combined with long neglect.
    Sick,
    /// Neglected and barely engaged with today.
    Withdrawn,
    /// All primary meters are in the well-cared-for band.
    Playful,
    /// Severe neglect; the companion is close to giving up.
    LeavingWarning,
}

impl StatusFlag {
    /// Wire name of the flag.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sick => "sick",
            Self::Withdrawn => "withdrawn",
            Self::Playful => "playful",
            Self::LeavingWarning => "leavingWarning",
        }
    }
}

// ---------------------------------------------------------------------------
// Activities
// ---------------------------------------------------------------------------

/// The kind of an activity, without its parameters.
///
/// Used as the key for engagement tracking and the lifetime histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum ActivityKind {
    /// Feed a meal.
    Feed,
    /// Have a conversation.
    Talk,
    /// Play together.
    Play,
    /// Wash up.
    Wash,
    /// Help her settle in to sleep.
    Sleep,
    /// Tidy her space.
    Tidy,
    /// Comfort her when she is down.
    Comfort,
    /// Let her confide a personal story.
    Confide,
    /// Give a gift.
    Gift,
    /// Play the currency mini-game.
    MiniGame,
}

impl ActivityKind {
    /// Wire name of the activity.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Feed => "feed",
            Self::Talk => "talk",
            Self::Play => "play",
            Self::Wash => "wash",
            Self::Sleep => "sleep",
            Self::Tidy => "tidy",
            Self::Comfort => "comfort",
            Self::Confide => "confide",
            Self::Gift => "gift",
            Self::MiniGame => "miniGame",
        }
    }
}

/// What kind of meal is served by `feed`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum FoodType {
    /// A proper healthy meal.
    #[default]
    Healthy,
    /// A quick snack.
    Quick,
    /// Comfort food.
    Junk,
}

/// Conversation topic for `talk`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum TalkTopic {
    /// Small talk.
    #[default]
    Light,
    /// An emotionally supportive conversation.
    Supportive,
}

/// Kind of play session for `play`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum PlayType {
    /// A game together.
    #[default]
    Game,
    /// Hanging out with a friend.
    Friend,
}

/// Gift choices for `give_gift`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum GiftType {
    /// A novel.
    Book,
    /// A box of tea.
    Tea,
    /// A single flower.
    #[default]
    Flower,
    /// A music album.
    Music,
}

/// Outcome of an activity, as seen by media resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum Outcome {
    /// The activity succeeded.
    Success,
    /// The activity was rejected or went poorly.
    Failure,
}

// ---------------------------------------------------------------------------
// Stats and notifications
// ---------------------------------------------------------------------------

/// A stat that an activity can change, used as the key of stat deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum Stat {
    /// Fullness meter.
    Hunger,
    /// Rest meter.
    Energy,
    /// Cleanliness meter.
    Hygiene,
    /// Derived happiness.
    Happiness,
    /// Raw affection accumulator.
    Affection,
    /// Hidden trust.
    Trust,
    /// Hidden comfort.
    Comfort,
    /// Gem balance.
    Currency,
}

/// Category of an outbound notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum NotificationKind {
    /// A primary meter dropped into the critical band.
    StatsCritical,
    /// The once-per-day login reward was granted.
    DailyReward,
    /// An achievement was unlocked.
    AchievementUnlocked,
    /// A status flag was raised.
    FlagRaised,
    /// A rare clip was unlocked.
    RareUnlocked,
}
