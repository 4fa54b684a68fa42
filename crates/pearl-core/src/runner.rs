//! Session tick loop with pause, resume, and stop controls.
//!
//! [`run_ticker`] drives [`CompanionEngine::tick`] on a fixed interval for as
//! long as a session is open. [`SessionControl`] is shared between the loop
//! and whoever hosts it:
//!
//! - **Pause/resume**: the loop sleeps until resumed
//! - **Variable interval**: the tick interval can change at runtime
//! - **Stop**: wakes a sleeping loop immediately and ends it cleanly
//!
//! Each tick locks the engine only for the duration of the tick and the
//! callback.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use pearl_companion::TickReport;
use tokio::sync::{Mutex, Notify};
use tracing::info;

use crate::engine::CompanionEngine;

/// Shortest tick interval accepted at runtime.
pub const MIN_TICK_INTERVAL_MS: u64 = 100;

/// Why a session loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEndReason {
    /// A stop was requested.
    Stopped,
    /// The configured number of ticks ran.
    MaxTicksReached,
}

/// Summary of a finished session loop.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionResult {
    /// Why the loop ended.
    pub end_reason: SessionEndReason,
    /// Ticks executed.
    pub total_ticks: u64,
    /// Report of the last tick, if any ran.
    pub last_report: Option<TickReport>,
}

/// Shared control state for a running session loop.
#[derive(Debug)]
pub struct SessionControl {
    paused: AtomicBool,
    stop_requested: AtomicBool,
    tick_interval_ms: AtomicU64,
    wake: Notify,
}

impl SessionControl {
    /// Create control state with the given tick interval.
    pub fn new(tick_interval_ms: u64) -> Self {
        Self {
            paused: AtomicBool::new(false),
            stop_requested: AtomicBool::new(false),
            tick_interval_ms: AtomicU64::new(tick_interval_ms),
            wake: Notify::new(),
        }
    }

    /// Whether the loop is paused.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Pause the loop after the current tick.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    /// Resume a paused loop.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
        self.wake.notify_one();
    }

    /// Wait until the loop is resumed or a stop is requested.
    pub async fn wait_if_paused(&self) {
        while self.is_paused() && !self.is_stop_requested() {
            self.wake.notified().await;
        }
    }

    /// Ask the loop to stop, waking it if it is sleeping or paused.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        self.wake.notify_one();
    }

    /// Whether a stop was requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Current tick interval in milliseconds.
    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms.load(Ordering::Acquire)
    }

    /// Change the tick interval. Returns the previous interval, or `None` if
    /// `ms` is below [`MIN_TICK_INTERVAL_MS`].
    pub fn set_tick_interval_ms(&self, ms: u64) -> Option<u64> {
        if ms < MIN_TICK_INTERVAL_MS {
            return None;
        }
        Some(self.tick_interval_ms.swap(ms, Ordering::AcqRel))
    }
}

/// Called after every tick while the engine is still locked.
pub trait TickCallback: Send {
    /// Called with the tick's report and the engine.
    fn on_tick(&mut self, report: &TickReport, engine: &mut CompanionEngine);
}

/// A callback that does nothing.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _report: &TickReport, _engine: &mut CompanionEngine) {}
}

/// Tick the engine until a stop is requested or `max_ticks` ticks ran.
///
/// `max_ticks == 0` means unlimited.
pub async fn run_ticker(
    engine: &Arc<Mutex<CompanionEngine>>,
    control: &Arc<SessionControl>,
    max_ticks: u64,
    callback: &mut dyn TickCallback,
) -> SessionResult {
    let mut total_ticks: u64 = 0;
    let mut last_report: Option<TickReport> = None;

    info!(
        tick_interval_ms = control.tick_interval_ms(),
        max_ticks, "session ticker starting"
    );

    loop {
        if control.is_paused() {
            info!("session paused, waiting for resume");
            control.wait_if_paused().await;
            info!("session resumed");
        }

        if control.is_stop_requested() {
            info!(total_ticks, "session stop requested");
            return SessionResult {
                end_reason: SessionEndReason::Stopped,
                total_ticks,
                last_report,
            };
        }

        let report = {
            let mut guard = engine.lock().await;
            let report = guard.tick();
            callback.on_tick(&report, &mut guard);
            report
        };
        total_ticks = total_ticks.saturating_add(1);
        last_report = Some(report);

        if max_ticks > 0 && total_ticks >= max_ticks {
            info!(total_ticks, "session tick limit reached");
            return SessionResult {
                end_reason: SessionEndReason::MaxTicksReached,
                total_ticks,
                last_report,
            };
        }

        let interval = control.tick_interval_ms();
        if interval > 0 {
            tokio::select! {
                () = tokio::time::sleep(tokio::time::Duration::from_millis(interval)) => {}
                () = control.wake.notified() => {}
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use chrono::{FixedOffset, TimeDelta, TimeZone, Utc};
    use pearl_companion::{CompanionConfig, ScriptedRolls};

    use super::*;
    use crate::clock::ManualClock;

    struct CountingCallback {
        ticks: u32,
    }

    impl TickCallback for CountingCallback {
        fn on_tick(&mut self, _report: &TickReport, _engine: &mut CompanionEngine) {
            self.ticks += 1;
        }
    }

    /// Advances the manual clock by a minute on every tick.
    struct MinuteCallback {
        clock: Arc<ManualClock>,
    }

    impl TickCallback for MinuteCallback {
        fn on_tick(&mut self, _report: &TickReport, _engine: &mut CompanionEngine) {
            self.clock.advance(TimeDelta::minutes(1));
        }
    }

    fn shared_engine() -> (Arc<Mutex<CompanionEngine>>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 12, 1, 10, 0, 0).unwrap(),
        ));
        let engine = CompanionEngine::builder(CompanionConfig::default())
            .clock(clock.clone())
            .offset(FixedOffset::east_opt(0).unwrap())
            .rng(Box::new(ScriptedRolls::constant(0.5)))
            .build();
        (Arc::new(Mutex::new(engine)), clock)
    }

    #[tokio::test(start_paused = true)]
    async fn bounded_by_max_ticks() {
        let (engine, _) = shared_engine();
        let control = Arc::new(SessionControl::new(1_000));
        let mut cb = CountingCallback { ticks: 0 };

        let result = run_ticker(&engine, &control, 5, &mut cb).await;

        assert_eq!(result.end_reason, SessionEndReason::MaxTicksReached);
        assert_eq!(result.total_ticks, 5);
        assert_eq!(cb.ticks, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_before_first_tick() {
        let (engine, _) = shared_engine();
        let control = Arc::new(SessionControl::new(1_000));
        control.request_stop();

        let result = run_ticker(&engine, &control, 0, &mut NoOpCallback).await;

        assert_eq!(result.end_reason, SessionEndReason::Stopped);
        assert_eq!(result.total_ticks, 0);
        assert!(result.last_report.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_wakes_sleeping_loop() {
        let (engine, _) = shared_engine();
        let control = Arc::new(SessionControl::new(3_600_000));

        let task = {
            let engine = engine.clone();
            let control = control.clone();
            tokio::spawn(async move { run_ticker(&engine, &control, 0, &mut NoOpCallback).await })
        };
        tokio::task::yield_now().await;
        control.request_stop();

        let result = task.await.unwrap();
        assert_eq!(result.end_reason, SessionEndReason::Stopped);
        assert!(result.total_ticks <= 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_while_paused_ends_loop() {
        let (engine, _) = shared_engine();
        let control = Arc::new(SessionControl::new(1_000));
        control.pause();

        let task = {
            let engine = engine.clone();
            let control = control.clone();
            tokio::spawn(async move { run_ticker(&engine, &control, 0, &mut NoOpCallback).await })
        };
        tokio::task::yield_now().await;
        control.request_stop();

        let result = task.await.unwrap();
        assert_eq!(result.end_reason, SessionEndReason::Stopped);
        assert_eq!(result.total_ticks, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_decay_the_companion() {
        let (engine, clock) = shared_engine();
        let control = Arc::new(SessionControl::new(1_000));
        let mut cb = MinuteCallback { clock };

        let result = run_ticker(&engine, &control, 4, &mut cb).await;

        // The first tick sees no elapsed time; the next three each see a minute.
        assert!(result.last_report.as_ref().unwrap().applied);
        let hunger = engine.lock().await.state().hunger;
        assert!((hunger - 61.0).abs() < 1e-9);
    }

    #[test]
    fn interval_floor() {
        let control = SessionControl::new(1_000);
        assert_eq!(control.set_tick_interval_ms(50), None);
        assert_eq!(control.set_tick_interval_ms(500), Some(1_000));
        assert_eq!(control.tick_interval_ms(), 500);
    }
}
