//! Tunable parameters for companion mechanics.
//!
//! [`CompanionConfig`] bundles every rate, threshold, and window used by
//! decay, status flags, bond conversion, rare unlocks, and the daily economy,
//! so callers (the engine, tests) can override defaults. It deserializes from
//! the `companion` section of `pearl-config.yaml`; any missing key keeps its
//! default.
//!
//! Mood thresholds and happiness weights are not here: they are fixed
//! constants in [`crate::derived`].

use chrono::TimeDelta;
use serde::Deserialize;

/// Configuration for companion mechanics.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CompanionConfig {
    // --- Decay ---
    /// Ticks closer together than this many seconds apply no decay (default: 60).
    pub min_tick_seconds: u32,
    /// Hunger lost per elapsed minute (default: 3.0).
    pub hunger_decay_per_minute: f64,
    /// Energy lost per elapsed minute (default: 2.0).
    pub energy_decay_per_minute: f64,
    /// Hygiene lost per elapsed minute (default: 2.0).
    pub hygiene_decay_per_minute: f64,
    /// Extra hunger lost per minute while sick (default: 1.5).
    pub sick_hunger_surcharge: f64,
    /// Extra energy lost per minute while sick (default: 1.0).
    pub sick_energy_surcharge: f64,

    // --- Status flags ---
    /// Hygiene strictly below this can trigger `sick` (default: 40).
    pub sick_hygiene_below: f64,
    /// Hours without interaction, strictly exceeded, for `sick` (default: 48).
    pub sick_neglect_hours: u32,
    /// Hours without interaction, strictly exceeded, for `withdrawn` (default: 24).
    pub withdrawn_neglect_hours: u32,
    /// Engagement strictly below this can trigger `withdrawn` (default: 2).
    pub withdrawn_engagement_below: u32,
    /// All meters at or above this raise `playful` (default: 60).
    pub playful_meters_at_least: f64,
    /// Hours without interaction, strictly exceeded, for `leavingWarning` (default: 48).
    pub leaving_neglect_hours: u32,
    /// All meters strictly below this can trigger `leavingWarning` (default: 30).
    pub leaving_meters_below: f64,

    // --- Bond ---
    /// Baseline affection-to-progress multiplier (default: 2.0).
    pub bond_base_multiplier: f64,
    /// Trust is divided by this and added to the multiplier (default: 200).
    pub bond_trust_divisor: f64,
    /// Comfort is divided by this and added to the multiplier (default: 300).
    pub bond_comfort_divisor: f64,
    /// Most bond progress a single conversion may add (default: 50).
    pub bond_conversion_cap: f64,

    // --- Rare unlocks ---
    /// Engagement needed before rare unlocks can roll (default: 3).
    pub rare_min_engagement: u32,
    /// Probability of a rare unlock per eligible activity (default: 0.15).
    pub rare_chance: f64,
    /// Hours between rare unlocks (default: 6).
    pub rare_cooldown_hours: u32,

    // --- Gifts ---
    /// Hours between gifts (default: 24).
    pub gift_cooldown_hours: u32,

    // --- Economy ---
    /// Gems per streak day in the daily reward (default: 10).
    pub daily_reward_per_streak_day: u32,
    /// Streak length beyond which the daily reward stops growing (default: 7).
    pub daily_reward_streak_cap: u32,
    /// A meter strictly below this is critical (default: 30).
    pub critical_meter_below: f64,
    /// Lifetime affection that unlocks the "First Kiss" achievement (default: 100).
    pub first_kiss_affection: u32,

    // --- Starting values ---
    /// Hunger of a new companion (default: 70).
    pub starting_hunger: f64,
    /// Energy of a new companion (default: 65).
    pub starting_energy: f64,
    /// Hygiene of a new companion (default: 80).
    pub starting_hygiene: f64,
    /// Trust of a new companion (default: 50).
    pub starting_trust: f64,
    /// Comfort of a new companion (default: 40).
    pub starting_comfort: f64,
    /// Gem balance of a new companion (default: 300).
    pub starting_currency: u32,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            min_tick_seconds: 60,
            hunger_decay_per_minute: 3.0,
            energy_decay_per_minute: 2.0,
            hygiene_decay_per_minute: 2.0,
            sick_hunger_surcharge: 1.5,
            sick_energy_surcharge: 1.0,
            sick_hygiene_below: 40.0,
            sick_neglect_hours: 48,
            withdrawn_neglect_hours: 24,
            withdrawn_engagement_below: 2,
            playful_meters_at_least: 60.0,
            leaving_neglect_hours: 48,
            leaving_meters_below: 30.0,
            bond_base_multiplier: 2.0,
            bond_trust_divisor: 200.0,
            bond_comfort_divisor: 300.0,
            bond_conversion_cap: 50.0,
            rare_min_engagement: 3,
            rare_chance: 0.15,
            rare_cooldown_hours: 6,
            gift_cooldown_hours: 24,
            daily_reward_per_streak_day: 10,
            daily_reward_streak_cap: 7,
            critical_meter_below: 30.0,
            first_kiss_affection: 100,
            starting_hunger: 70.0,
            starting_energy: 65.0,
            starting_hygiene: 80.0,
            starting_trust: 50.0,
            starting_comfort: 40.0,
            starting_currency: 300,
        }
    }
}

impl CompanionConfig {
    /// Minimum spacing between decay applications.
    pub fn min_tick(&self) -> TimeDelta {
        TimeDelta::seconds(i64::from(self.min_tick_seconds))
    }

    /// Neglect window for `sick`.
    pub fn sick_window(&self) -> TimeDelta {
        TimeDelta::hours(i64::from(self.sick_neglect_hours))
    }

    /// Neglect window for `withdrawn`.
    pub fn withdrawn_window(&self) -> TimeDelta {
        TimeDelta::hours(i64::from(self.withdrawn_neglect_hours))
    }

    /// Neglect window for `leavingWarning`.
    pub fn leaving_window(&self) -> TimeDelta {
        TimeDelta::hours(i64::from(self.leaving_neglect_hours))
    }

    /// Cooldown after a rare unlock.
    pub fn rare_cooldown(&self) -> TimeDelta {
        TimeDelta::hours(i64::from(self.rare_cooldown_hours))
    }

    /// Cooldown after a gift.
    pub fn gift_cooldown(&self) -> TimeDelta {
        TimeDelta::hours(i64::from(self.gift_cooldown_hours))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = CompanionConfig::default();
        assert_eq!(cfg.min_tick_seconds, 60);
        assert_eq!(cfg.sick_neglect_hours, 48);
        assert_eq!(cfg.withdrawn_neglect_hours, 24);
        assert_eq!(cfg.rare_cooldown_hours, 6);
        assert_eq!(cfg.gift_cooldown_hours, 24);
        assert_eq!(cfg.starting_currency, 300);
    }

    #[test]
    fn windows_convert_hours() {
        let cfg = CompanionConfig::default();
        assert_eq!(cfg.sick_window(), TimeDelta::hours(48));
        assert_eq!(cfg.min_tick(), TimeDelta::seconds(60));
        assert_eq!(cfg.gift_cooldown(), TimeDelta::hours(24));
    }
}
