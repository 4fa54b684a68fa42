//! Activity request and result types exchanged with the presentation layer.
//!
//! [`ActivityResult`] is the only thing the UI consumes after an activity; it
//! carries everything needed to render the outcome without redoing any stat
//! math.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ActivityKind, FoodType, GiftType, PlayType, Stat, TalkTopic};

/// A player-invoked activity together with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", tag = "type", content = "params")]
#[ts(export, export_to = "bindings/")]
pub enum Activity {
    /// Serve a meal of the given kind.
    Feed(FoodType),
    /// Talk about the given topic.
    Talk(TalkTopic),
    /// Play in the given way.
    Play(PlayType),
    /// Wash up.
    Wash,
    /// Help her settle in to sleep.
    SleepAssist,
    /// Tidy her space.
    Tidy,
    /// Comfort her.
    Comfort,
    /// Invite her to confide.
    Confide,
    /// Give a gift.
    GiveGift(GiftType),
    /// Report a finished mini-game with the given score.
    MiniGame(u32),
}

impl Activity {
    /// The parameterless kind of this activity.
    pub const fn kind(self) -> ActivityKind {
        match self {
            Self::Feed(_) => ActivityKind::Feed,
            Self::Talk(_) => ActivityKind::Talk,
            Self::Play(_) => ActivityKind::Play,
            Self::Wash => ActivityKind::Wash,
            Self::SleepAssist => ActivityKind::Sleep,
            Self::Tidy => ActivityKind::Tidy,
            Self::Comfort => ActivityKind::Comfort,
            Self::Confide => ActivityKind::Confide,
            Self::GiveGift(_) => ActivityKind::Gift,
            Self::MiniGame(_) => ActivityKind::MiniGame,
        }
    }
}

/// Applied change per stat. Only stats that actually moved are present.
pub type StatDeltas = BTreeMap<Stat, f64>;

/// Structured outcome of an activity call.
///
/// Rejections are represented with `success == false` and a readable
/// message; an activity never raises an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ActivityResult {
    /// Which activity produced this result.
    pub activity: ActivityKind,
    /// Whether the activity succeeded.
    pub success: bool,
    /// In-character description of what happened.
    pub message: String,
    /// Clip to play, if the catalog had one.
    pub media_id: Option<String>,
    /// Applied stat changes (after clamping).
    pub stat_deltas: StatDeltas,
    /// The new bond level, if this activity caused a level-up.
    pub bond_level_up: Option<u8>,
    /// Title of the new bond level, set together with `bond_level_up`.
    pub bond_title: Option<String>,
    /// A rare clip unlocked by this activity, if any.
    pub rare_unlock: Option<String>,
}

impl ActivityResult {
    /// A rejection with no stat changes.
    pub fn rejected(activity: ActivityKind, message: impl Into<String>) -> Self {
        Self {
            activity,
            success: false,
            message: message.into(),
            media_id: None,
            stat_deltas: StatDeltas::new(),
            bond_level_up: None,
            bond_title: None,
            rare_unlock: None,
        }
    }
}
