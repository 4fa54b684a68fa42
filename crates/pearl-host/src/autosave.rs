//! Tick callback that saves the companion periodically.

use std::sync::Arc;

use pearl_companion::TickReport;
use pearl_core::CompanionEngine;
use pearl_core::persistence::StateStore;
use pearl_core::runner::TickCallback;
use tracing::{debug, warn};

/// Saves the state every `every` ticks and clears the notification queue.
///
/// Notifications have already reached the engine's sink by the time the
/// callback runs, so the queue is only drained to keep it short.
pub struct AutosaveCallback {
    store: Arc<dyn StateStore>,
    every: u32,
    ticks: u32,
    saves: u32,
}

impl AutosaveCallback {
    /// Save to `store` every `every` ticks. Zero disables periodic saves.
    pub const fn new(store: Arc<dyn StateStore>, every: u32) -> Self {
        Self {
            store,
            every,
            ticks: 0,
            saves: 0,
        }
    }

    /// Successful saves so far.
    pub const fn saves(&self) -> u32 {
        self.saves
    }
}

impl TickCallback for AutosaveCallback {
    fn on_tick(&mut self, report: &TickReport, engine: &mut CompanionEngine) {
        let drained = engine.drain_notifications().len();
        if drained > 0 {
            debug!(drained, "notifications cleared");
        }

        if self.every == 0 {
            return;
        }
        self.ticks = self.ticks.saturating_add(1);
        let due = self.ticks.checked_rem(self.every) == Some(0);
        if !due && !report.day_rolled_over {
            return;
        }
        if save_state(engine, self.store.as_ref()) {
            self.saves = self.saves.saturating_add(1);
        }
    }
}

/// Serialize the engine's state into `store`. Failures are logged; returns
/// whether the save succeeded.
pub fn save_state(engine: &CompanionEngine, store: &dyn StateStore) -> bool {
    let blob = match engine.serialize() {
        Ok(blob) => blob,
        Err(e) => {
            warn!(error = %e, "failed to serialize companion state");
            return false;
        }
    };
    match store.save(&blob) {
        Ok(()) => {
            debug!(bytes = blob.len(), "companion state saved");
            true
        }
        Err(e) => {
            warn!(error = %e, "failed to save companion state, continuing in memory");
            false
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pearl_companion::{CompanionConfig, ScriptedRolls};
    use pearl_core::clock::ManualClock;
    use pearl_core::persistence::{MemoryStore, StoreError};

    use super::*;

    fn engine() -> CompanionEngine {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 10, 5, 12, 0, 0).unwrap(),
        ));
        CompanionEngine::builder(CompanionConfig::default())
            .clock(clock)
            .rng(Box::new(ScriptedRolls::constant(0.5)))
            .build()
    }

    struct BrokenStore;

    impl StateStore for BrokenStore {
        fn load(&self) -> Result<Option<String>, StoreError> {
            Ok(None)
        }

        fn save(&self, _blob: &str) -> Result<(), StoreError> {
            Err(std::io::Error::other("disk full").into())
        }
    }

    #[test]
    fn saves_on_every_nth_tick() {
        let store = Arc::new(MemoryStore::new());
        let mut callback = AutosaveCallback::new(store.clone(), 3);
        let mut engine = engine();

        for _ in 0..7 {
            let report = engine.tick();
            callback.on_tick(&report, &mut engine);
        }

        assert_eq!(callback.saves(), 2);
        assert!(store.load().unwrap().is_some());
    }

    #[test]
    fn zero_interval_never_saves() {
        let store = Arc::new(MemoryStore::new());
        let mut callback = AutosaveCallback::new(store.clone(), 0);
        let mut engine = engine();

        let report = engine.tick();
        callback.on_tick(&report, &mut engine);

        assert_eq!(callback.saves(), 0);
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn failed_save_is_not_counted() {
        let mut callback = AutosaveCallback::new(Arc::new(BrokenStore), 1);
        let mut engine = engine();

        let report = engine.tick();
        callback.on_tick(&report, &mut engine);

        assert_eq!(callback.saves(), 0);
        assert!(!save_state(&engine, &BrokenStore));
    }
}
