//! Mapping from simulation state to a clip identifier.
//!
//! Resolution walks a fixed priority list and stops at the first non-empty
//! clip set:
//!
//! 1. Status clips, checked in the order `sick`, `leavingWarning`, `withdrawn`
//! 2. The activity cue, if any: variant clips on success, then the activity's
//!    success or failure set
//! 3. The playful idle set while the `playful` flag holds
//! 4. The idle set for the current mood
//! 5. The neutral idle set
//!
//! The catalog is plain data; [`MediaCatalog::default`] holds the stock clips.

use std::collections::{BTreeMap, BTreeSet};

use pearl_types::{Activity, ActivityKind, FoodType, Mood, Outcome, PlayType, StatusFlag};

use crate::random::RandomSource;

/// Status flags that override everything else, in priority order.
pub const STATUS_PRIORITY: [StatusFlag; 3] = [
    StatusFlag::Sick,
    StatusFlag::LeavingWarning,
    StatusFlag::Withdrawn,
];

/// Parameter-specific clip sets that take precedence on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MediaVariant {
    /// A particular meal.
    Food(FoodType),
    /// A particular kind of play.
    Play(PlayType),
    /// Settling in to sleep.
    SleepSettling,
}

/// An activity and how it went, used to pick a reaction clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaCue {
    /// The activity performed.
    pub activity: Activity,
    /// Whether it succeeded.
    pub outcome: Outcome,
}

impl MediaCue {
    /// Build a cue from an activity and its success.
    pub const fn new(activity: Activity, success: bool) -> Self {
        let outcome = if success {
            Outcome::Success
        } else {
            Outcome::Failure
        };
        Self { activity, outcome }
    }

    /// The variant clip set this cue prefers, if any.
    pub const fn variant(&self) -> Option<MediaVariant> {
        if !matches!(self.outcome, Outcome::Success) {
            return None;
        }
        match self.activity {
            Activity::Feed(food) => Some(MediaVariant::Food(food)),
            Activity::Play(play) => Some(MediaVariant::Play(play)),
            Activity::SleepAssist => Some(MediaVariant::SleepSettling),
            _ => None,
        }
    }
}

/// Clip identifiers grouped by what they illustrate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaCatalog {
    /// Idle loops per mood.
    pub idle: BTreeMap<Mood, Vec<String>>,
    /// Clips shown while a status flag holds.
    pub status: BTreeMap<StatusFlag, Vec<String>>,
    /// Reaction clips per activity and outcome.
    pub activities: BTreeMap<(ActivityKind, Outcome), Vec<String>>,
    /// Parameter-specific reaction clips.
    pub variants: BTreeMap<MediaVariant, Vec<String>>,
    /// Pool of clips that can be unlocked as rare rewards.
    pub rare: Vec<String>,
}

fn clips(names: &[&str]) -> Vec<String> {
    names
        .iter()
        .map(|name| format!("/videos/{name}.mp4"))
        .collect()
}

impl Default for MediaCatalog {
    fn default() -> Self {
        let idle = BTreeMap::from([
            (Mood::Happy, clips(&["alexa_neutral_1", "alexa_neutral_2"])),
            (Mood::Neutral, clips(&["pearl_idle_1", "alexa_neutral_3"])),
            (Mood::Low, clips(&["pearl_sad_1", "alexa_neutral_4"])),
            (Mood::Distressed, clips(&["pearl_sad_1", "pearl_neglected_1"])),
            (Mood::Playful, clips(&["alexa_neutral_1", "alexa_neutral_2"])),
        ]);

        let status = BTreeMap::from([
            (StatusFlag::Sick, clips(&["pearl_sick_idle_1", "sick_1"])),
            (
                StatusFlag::LeavingWarning,
                clips(&["pearl_neglected_1", "pearl_sad_1"]),
            ),
            (StatusFlag::Withdrawn, clips(&["pearl_sad_1", "alexa_neutral_4"])),
        ]);

        let activities = BTreeMap::from([
            ((ActivityKind::Feed, Outcome::Success), clips(&["eat_accept_1"])),
            ((ActivityKind::Feed, Outcome::Failure), clips(&["pearl_sad_1"])),
            (
                (ActivityKind::Talk, Outcome::Success),
                clips(&["alexa_neutral_1", "alexa_neutral_3"]),
            ),
            ((ActivityKind::Talk, Outcome::Failure), clips(&["alexa_neutral_4"])),
            (
                (ActivityKind::Play, Outcome::Success),
                clips(&["play_start_1", "alexa_neutral_1", "alexa_neutral_2"]),
            ),
            ((ActivityKind::Play, Outcome::Failure), clips(&["alexa_neutral_3"])),
            (
                (ActivityKind::Wash, Outcome::Success),
                clips(&["wash_start_1", "alexa_neutral_1"]),
            ),
            (
                (ActivityKind::Sleep, Outcome::Success),
                clips(&["sleep_settling_1", "alexa_neutral_2"]),
            ),
            (
                (ActivityKind::Tidy, Outcome::Success),
                clips(&["alexa_neutral_1", "alexa_neutral_2"]),
            ),
            ((ActivityKind::Tidy, Outcome::Failure), clips(&["alexa_neutral_3"])),
            (
                (ActivityKind::Comfort, Outcome::Success),
                clips(&["alexa_neutral_1", "alexa_neutral_2"]),
            ),
            ((ActivityKind::Comfort, Outcome::Failure), clips(&["alexa_neutral_4"])),
            (
                (ActivityKind::Confide, Outcome::Success),
                clips(&["alexa_neutral_1", "alexa_neutral_3"]),
            ),
            ((ActivityKind::Gift, Outcome::Success), clips(&["alexa_neutral_1"])),
            ((ActivityKind::Gift, Outcome::Failure), clips(&["alexa_neutral_2"])),
        ]);

        let variants = BTreeMap::from([
            (MediaVariant::Food(FoodType::Healthy), clips(&["healthy_meal_1"])),
            (MediaVariant::Food(FoodType::Quick), clips(&["quick_snack_1"])),
            (MediaVariant::Food(FoodType::Junk), clips(&["comfort_food_1"])),
            (
                MediaVariant::Play(PlayType::Game),
                clips(&["play_start_1", "alexa_neutral_1"]),
            ),
            (
                MediaVariant::Play(PlayType::Friend),
                clips(&["play_with_friend_1", "alexa_neutral_2"]),
            ),
            (
                MediaVariant::SleepSettling,
                clips(&["sleep_settling_1", "alexa_neutral_2"]),
            ),
        ]);

        let rare = clips(&[
            "alexa_neutral_1",
            "alexa_neutral_2",
            "alexa_neutral_3",
            "alexa_neutral_4",
        ]);

        Self {
            idle,
            status,
            activities,
            variants,
            rare,
        }
    }
}

fn non_empty(set: Option<&Vec<String>>) -> Option<&[String]> {
    set.map(Vec::as_slice).filter(|s| !s.is_empty())
}

/// The clip set that wins the priority walk. Empty only if the catalog has
/// no usable set at all.
pub fn resolve_media_sequence<'a>(
    catalog: &'a MediaCatalog,
    mood: Mood,
    flags: &BTreeSet<StatusFlag>,
    cue: Option<MediaCue>,
) -> &'a [String] {
    for flag in STATUS_PRIORITY {
        if flags.contains(&flag)
            && let Some(set) = non_empty(catalog.status.get(&flag))
        {
            return set;
        }
    }

    if let Some(cue) = cue {
        if let Some(set) = cue
            .variant()
            .and_then(|variant| non_empty(catalog.variants.get(&variant)))
        {
            return set;
        }
        let key = (cue.activity.kind(), cue.outcome);
        if let Some(set) = non_empty(catalog.activities.get(&key)) {
            return set;
        }
    }

    if flags.contains(&StatusFlag::Playful)
        && let Some(set) = non_empty(catalog.idle.get(&Mood::Playful))
    {
        return set;
    }

    non_empty(catalog.idle.get(&mood))
        .or_else(|| non_empty(catalog.idle.get(&Mood::Neutral)))
        .unwrap_or_default()
}

/// Pick one clip uniformly from the winning set.
pub fn resolve_media(
    catalog: &MediaCatalog,
    mood: Mood,
    flags: &BTreeSet<StatusFlag>,
    cue: Option<MediaCue>,
    rng: &mut dyn RandomSource,
) -> Option<String> {
    let set = resolve_media_sequence(catalog, mood, flags, cue);
    set.get(rng.pick(set.len())).cloned()
}
