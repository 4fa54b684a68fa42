//! Time-driven meter decay and daily bookkeeping.
//!
//! [`apply_tick`] is the "world wake" step of the simulation:
//!
//! 1. Roll the daily counters over if the local calendar day changed
//! 2. Skip decay if less than the tick floor elapsed since `last_updated`
//! 3. Decay hunger, energy, and hygiene by elapsed minutes (faster when sick)
//! 4. Clear the transient happiness bonus
//! 5. Recompute happiness, flags, and mood
//!
//! Meters are clamped to `[0, 100]` after every change.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use pearl_types::{CompanionState, Notification, Stat, StatDeltas, StatusFlag};
use tracing::debug;

use crate::alerts;
use crate::config::CompanionConfig;
use crate::derived;
use crate::flags::FlagTransition;

/// Upper bound of every 0--100 meter.
pub const METER_MAX: f64 = 100.0;

/// Clamp a meter value into `[0, 100]`. NaN collapses to 0.
pub const fn clamp_meter(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, METER_MAX)
}

/// The local calendar day of `now` at the given UTC offset.
pub fn local_day(now: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    now.with_timezone(&offset).date_naive()
}

/// Reset the daily counters if `now` falls on a later local day.
///
/// Returns whether a rollover happened.
pub fn roll_over_day(state: &mut CompanionState, now: DateTime<Utc>, offset: FixedOffset) -> bool {
    let today = local_day(now, offset);
    if today <= state.current_day {
        return false;
    }
    debug!(
        from = %state.current_day,
        to = %today,
        engagement = state.engagement_count,
        "daily counters rolled over"
    );
    state.current_day = today;
    state.engagement_count = 0;
    state.today_activities.clear();
    state.daily_affection_gained = 0;
    true
}

/// Values of every delta-tracked stat at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatSnapshot {
    /// Hunger meter.
    pub hunger: f64,
    /// Energy meter.
    pub energy: f64,
    /// Hygiene meter.
    pub hygiene: f64,
    /// Derived happiness.
    pub happiness: f64,
    /// Unconverted affection.
    pub affection: u32,
    /// Hidden trust.
    pub trust: f64,
    /// Hidden comfort.
    pub comfort: f64,
    /// Gem balance.
    pub currency: u32,
}

impl StatSnapshot {
    /// Capture the current values from a state.
    pub const fn capture(state: &CompanionState) -> Self {
        Self {
            hunger: state.hunger,
            energy: state.energy,
            hygiene: state.hygiene,
            happiness: state.happiness,
            affection: state.affection,
            trust: state.trust,
            comfort: state.comfort,
            currency: state.currency,
        }
    }

    /// The lowest of the three primary meters.
    pub const fn min_meter(&self) -> f64 {
        self.hunger.min(self.energy).min(self.hygiene)
    }

    /// Changes from `self` to `after`, keeping only stats that moved.
    pub fn deltas_to(&self, after: &Self) -> StatDeltas {
        let pairs = [
            (Stat::Hunger, after.hunger - self.hunger),
            (Stat::Energy, after.energy - self.energy),
            (Stat::Hygiene, after.hygiene - self.hygiene),
            (Stat::Happiness, after.happiness - self.happiness),
            (
                Stat::Affection,
                f64::from(after.affection) - f64::from(self.affection),
            ),
            (Stat::Trust, after.trust - self.trust),
            (Stat::Comfort, after.comfort - self.comfort),
            (
                Stat::Currency,
                f64::from(after.currency) - f64::from(self.currency),
            ),
        ];
        pairs
            .into_iter()
            .filter(|(_, delta)| delta.abs() > f64::EPSILON)
            .collect()
    }
}

/// What one call to [`apply_tick`] did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Whether decay was applied (enough time had elapsed).
    pub applied: bool,
    /// Minutes of decay applied. Zero when `applied` is false.
    pub elapsed_minutes: f64,
    /// Whether the daily counters were reset.
    pub day_rolled_over: bool,
    /// Flags raised and cleared by this tick.
    pub flags: FlagTransition,
    /// Notifications produced by this tick.
    pub notifications: Vec<Notification>,
}

/// Advance the companion to `now`.
///
/// A call less than `min_tick_seconds` after the previous decay leaves the
/// meters untouched, although a day rollover still resets the daily
/// counters and refreshes derived values.
pub fn apply_tick(
    state: &mut CompanionState,
    config: &CompanionConfig,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> TickReport {
    let before = StatSnapshot::capture(state);
    let day_rolled_over = roll_over_day(state, now, offset);

    let elapsed = now.signed_duration_since(state.last_updated);
    if elapsed < config.min_tick() {
        if !day_rolled_over {
            return TickReport::default();
        }
        let flags = derived::refresh(state, config, now);
        let notifications = alerts::after_change(&before, state, &flags, config);
        return TickReport {
            day_rolled_over,
            flags,
            notifications,
            ..TickReport::default()
        };
    }

    // Milliseconds between two saves stay far below 2^52.
    #[allow(clippy::cast_precision_loss)]
    let minutes = elapsed.num_milliseconds() as f64 / 60_000.0;
    let sick = state.has_flag(StatusFlag::Sick);
    let (hunger_extra, energy_extra) = if sick {
        (config.sick_hunger_surcharge, config.sick_energy_surcharge)
    } else {
        (0.0, 0.0)
    };

    let hunger_rate = config.hunger_decay_per_minute + hunger_extra;
    let energy_rate = config.energy_decay_per_minute + energy_extra;
    state.hunger = clamp_meter(hunger_rate.mul_add(-minutes, state.hunger));
    state.energy = clamp_meter(energy_rate.mul_add(-minutes, state.energy));
    state.hygiene = clamp_meter(
        config
            .hygiene_decay_per_minute
            .mul_add(-minutes, state.hygiene),
    );
    state.happiness_bonus = 0.0;
    state.last_updated = now;

    let flags = derived::refresh(state, config, now);
    let notifications = alerts::after_change(&before, state, &flags, config);

    debug!(
        minutes,
        sick,
        hunger = state.hunger,
        energy = state.energy,
        hygiene = state.hygiene,
        mood = state.mood.as_str(),
        "decay applied"
    );

    TickReport {
        applied: true,
        elapsed_minutes: minutes,
        day_rolled_over,
        flags,
        notifications,
    }
}
