//! Core entity structs: the companion state aggregate and notifications.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ActivityKind, Mood, NotificationKind, StatusFlag};
use crate::ids::CompanionId;

// ---------------------------------------------------------------------------
// CompanionState
// ---------------------------------------------------------------------------

/// The single mutable aggregate describing one companion.
///
/// Owned exclusively by the engine; readers get a shared reference. The
/// serialized form is a flat `camelCase` record of these fields and is what the
/// persistence collaborator stores between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct CompanionState {
    /// Identity of this companion.
    pub companion_id: CompanionId,

    // --- Primary meters (0--100, higher is better) ---
    /// Fullness. 100 means fully fed.
    pub hunger: f64,
    /// Rest. 100 means fully rested.
    pub energy: f64,
    /// Cleanliness. 100 means freshly washed.
    pub hygiene: f64,

    // --- Derived ---
    /// Weighted wellbeing score (0--100). Recomputed, never set directly.
    pub happiness: f64,
    /// Mood derived from flags and happiness.
    pub mood: Mood,
    /// Transient happiness bonus from play or tidying. Cleared on decay.
    pub happiness_bonus: f64,

    // --- Hidden progression ---
    /// Raw affection waiting to be converted into bond progress.
    pub affection: u32,
    /// Hidden trust (0--100).
    pub trust: f64,
    /// Hidden comfort (0--100).
    pub comfort: f64,

    // --- Bond ---
    /// Relationship tier (0--6). Never decreases.
    pub bond_level: u8,
    /// Progress within the current tier, in `[0, 100)`.
    pub bond_progress: f64,

    // --- Status ---
    /// Flags holding at the last evaluation.
    pub status_flags: BTreeSet<StatusFlag>,

    // --- Timing ---
    /// When decay was last applied.
    pub last_updated: DateTime<Utc>,
    /// When the player last interacted in a way that counts as attention.
    pub last_interaction: DateTime<Utc>,
    /// The local calendar day the daily counters belong to.
    pub current_day: NaiveDate,
    /// Affection gained during `current_day`.
    pub daily_affection_gained: u32,
    /// No rare unlock may happen before this instant.
    pub rare_cooldown_until: DateTime<Utc>,

    // --- Engagement ---
    /// Distinct activity kinds performed successfully today.
    pub engagement_count: u32,
    /// The activity kinds behind `engagement_count`.
    pub today_activities: BTreeSet<ActivityKind>,

    // --- Economy / meta ---
    /// Gem balance.
    pub currency: u32,
    /// Rare clip ids unlocked so far.
    pub unlocked_clips: BTreeSet<String>,
    /// No gift may be given before this instant.
    pub gift_cooldown_until: DateTime<Utc>,
    /// Consecutive days with a session start.
    pub streak_days: u32,
    /// When the last session start was rewarded.
    pub last_login: DateTime<Utc>,
    /// Lifetime count of successful activities per kind.
    pub activity_counts: BTreeMap<ActivityKind, u32>,
    /// Lifetime affection gained from activities.
    pub lifetime_affection: u32,
    /// Names of unlocked achievements.
    pub achievements: BTreeSet<String>,
}

impl CompanionState {
    /// Whether the given flag held at the last evaluation.
    pub fn has_flag(&self, flag: StatusFlag) -> bool {
        self.status_flags.contains(&flag)
    }
}

// ---------------------------------------------------------------------------
// Notification
// ---------------------------------------------------------------------------

/// A named event the engine emits for the notification collaborator.
///
/// Delivery (push, local notification, in-app toast) is entirely external.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Notification {
    /// Category of the event.
    pub kind: NotificationKind,
    /// Short title.
    pub title: String,
    /// Body text.
    pub body: String,
}

impl Notification {
    /// Build a notification from its parts.
    pub fn new(kind: NotificationKind, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            body: body.into(),
        }
    }
}
