//! Level-triggered status flags.
//!
//! Flags are recomputed from scratch on every evaluation; nothing is
//! remembered between evaluations except the previous set, which is only used
//! to report transitions. All comparisons are strict except `playful`.

use std::collections::BTreeSet;

use chrono::{DateTime, TimeDelta, Utc};
use pearl_types::{CompanionState, StatusFlag};

use crate::config::CompanionConfig;

/// Time since the last interaction. Negative spans (clock skew) count as zero.
pub fn since_interaction(state: &CompanionState, now: DateTime<Utc>) -> TimeDelta {
    now.signed_duration_since(state.last_interaction)
        .max(TimeDelta::zero())
}

/// Evaluate which flags hold for `state` at `now`.
pub fn evaluate_flags(
    state: &CompanionState,
    config: &CompanionConfig,
    now: DateTime<Utc>,
) -> BTreeSet<StatusFlag> {
    let idle = since_interaction(state, now);
    let meters = [state.hunger, state.energy, state.hygiene];
    let mut flags = BTreeSet::new();

    if state.hygiene < config.sick_hygiene_below && idle > config.sick_window() {
        flags.insert(StatusFlag::Sick);
    }
    if idle > config.withdrawn_window()
        && state.engagement_count < config.withdrawn_engagement_below
    {
        flags.insert(StatusFlag::Withdrawn);
    }
    if meters.iter().all(|m| *m >= config.playful_meters_at_least) {
        flags.insert(StatusFlag::Playful);
    }
    if idle > config.leaving_window() && meters.iter().all(|m| *m < config.leaving_meters_below) {
        flags.insert(StatusFlag::LeavingWarning);
    }
    flags
}

/// Flags that appeared and disappeared between two evaluations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagTransition {
    /// Flags present now but not before.
    pub raised: Vec<StatusFlag>,
    /// Flags present before but not now.
    pub cleared: Vec<StatusFlag>,
}

impl FlagTransition {
    /// Diff two flag sets.
    pub fn between(previous: &BTreeSet<StatusFlag>, next: &BTreeSet<StatusFlag>) -> Self {
        Self {
            raised: next.difference(previous).copied().collect(),
            cleared: previous.difference(next).copied().collect(),
        }
    }

    /// Whether nothing changed.
    pub const fn is_empty(&self) -> bool {
        self.raised.is_empty() && self.cleared.is_empty()
    }
}
