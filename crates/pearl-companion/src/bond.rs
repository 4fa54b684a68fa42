//! Conversion of raw affection into bond progress.
//!
//! Affection accumulates from activities and is converted in one step after
//! each activity. The conversion rate grows with trust and comfort, and a
//! single conversion is capped, so a large affection balance spreads over
//! several activities. Unconsumed affection carries over.

use pearl_types::CompanionState;
use tracing::info;

use crate::config::CompanionConfig;

/// Highest bond level.
pub const MAX_BOND_LEVEL: u8 = 6;
/// Progress needed to advance one level.
pub const PROGRESS_PER_LEVEL: f64 = 100.0;
/// Where progress saturates once the top level is reached.
pub const MAX_LEVEL_PROGRESS: f64 = 99.9;

/// Display title for each bond level, indexed by level.
pub const BOND_TITLES: [&str; 7] = [
    "Acquainted",
    "Familiar",
    "Comfortable",
    "Trusted",
    "Close",
    "Attached",
    "Cherished",
];

/// Display title for `level`. Levels past the top share its title.
pub fn title(level: u8) -> &'static str {
    BOND_TITLES
        .get(usize::from(level.min(MAX_BOND_LEVEL)))
        .copied()
        .unwrap_or_default()
}

/// What one conversion did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BondUpdate {
    /// Progress added.
    pub converted: f64,
    /// Affection removed from the accumulator.
    pub consumed: u32,
    /// The new level, if at least one level was gained.
    pub level_up: Option<u8>,
}

/// Affection-to-progress multiplier for the current trust and comfort.
pub const fn conversion_multiplier(state: &CompanionState, config: &CompanionConfig) -> f64 {
    config.bond_base_multiplier
        + state.trust / config.bond_trust_divisor
        + state.comfort / config.bond_comfort_divisor
}

/// Convert pending affection into bond progress, leveling up as needed.
///
/// Returns `None` when there is no affection to convert. Bond level never
/// decreases and progress always stays in `[0, 100)`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn update_bond_progress(
    state: &mut CompanionState,
    config: &CompanionConfig,
) -> Option<BondUpdate> {
    if state.affection == 0 {
        return None;
    }

    let multiplier = conversion_multiplier(state, config);
    let raw = f64::from(state.affection) * multiplier;
    let capped = raw > config.bond_conversion_cap;
    let converted = raw.min(config.bond_conversion_cap);
    let consumed = if capped {
        // Floor of a positive finite value bounded by the cap fits in u32.
        let affordable = (config.bond_conversion_cap / multiplier).floor().max(0.0) as u32;
        affordable.min(state.affection)
    } else {
        state.affection
    };

    let start_level = state.bond_level;
    state.bond_progress += converted;
    while state.bond_progress >= PROGRESS_PER_LEVEL && state.bond_level < MAX_BOND_LEVEL {
        state.bond_progress -= PROGRESS_PER_LEVEL;
        state.bond_level = state.bond_level.saturating_add(1);
    }
    if state.bond_level >= MAX_BOND_LEVEL {
        state.bond_progress = state.bond_progress.min(MAX_LEVEL_PROGRESS);
    }
    state.affection = state.affection.saturating_sub(consumed);

    let level_up = (state.bond_level > start_level).then_some(state.bond_level);
    if let Some(level) = level_up {
        info!(
            companion_id = %state.companion_id,
            bond_level = level,
            title = title(level),
            "bond level up"
        );
    }

    Some(BondUpdate {
        converted,
        consumed,
        level_up,
    })
}
