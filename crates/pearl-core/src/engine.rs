//! The companion engine: one owned state plus the collaborators that drive it.
//!
//! [`CompanionEngine`] is the only writer of [`CompanionState`]. Every
//! operation reads the current instant from the injected [`Clock`], runs the
//! pure simulation from `pearl-companion`, and forwards any notifications to
//! the injected [`NotificationSink`]. Operations take `&mut self` and never
//! await, so a host sharing the engine only needs to wrap it in a mutex.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use pearl_companion::activities::{ActivityContext, perform_activity};
use pearl_companion::economy::{self, DailyReward};
use pearl_companion::{
    CompanionConfig, MediaCatalog, RandomSource, TickReport, alerts, apply_tick,
    create_companion, media, validate_state,
};
use pearl_types::{
    Activity, ActivityResult, CompanionState, FoodType, GiftType, Notification, PlayType,
    TalkTopic,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::notify::{NotificationSink, TracingSink};

/// Most notifications kept for [`CompanionEngine::drain_notifications`].
/// Older ones are dropped first.
pub const MAX_PENDING_NOTIFICATIONS: usize = 64;

/// Builder for [`CompanionEngine`].
pub struct EngineBuilder {
    config: CompanionConfig,
    catalog: MediaCatalog,
    offset: Option<FixedOffset>,
    clock: Arc<dyn Clock>,
    rng: Option<Box<dyn RandomSource + Send>>,
    sink: Box<dyn NotificationSink>,
    state: Option<CompanionState>,
}

impl EngineBuilder {
    /// Start from the given mechanics configuration and default collaborators.
    pub fn new(config: CompanionConfig) -> Self {
        Self {
            config,
            catalog: MediaCatalog::default(),
            offset: None,
            clock: Arc::new(SystemClock),
            rng: None,
            sink: Box::new(TracingSink),
            state: None,
        }
    }

    /// Start from a full engine configuration (mechanics, seed, offset).
    pub fn from_config(config: &EngineConfig) -> Self {
        let mut builder = Self::new(config.companion.clone()).offset(config.session.utc_offset());
        if let Some(seed) = config.session.seed {
            builder = builder.seed(seed);
        }
        builder
    }

    /// Use this clip catalog.
    #[must_use]
    pub fn catalog(mut self, catalog: MediaCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Define the local calendar day by this UTC offset.
    #[must_use]
    pub const fn offset(mut self, offset: FixedOffset) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Read time from this clock.
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Seed a deterministic random source.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.rng = Some(Box::new(StdRng::seed_from_u64(seed)));
        self
    }

    /// Use this random source.
    #[must_use]
    pub fn rng(mut self, rng: Box<dyn RandomSource + Send>) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Deliver notifications to this sink.
    #[must_use]
    pub fn sink(mut self, sink: Box<dyn NotificationSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Start from an existing state instead of a fresh companion.
    #[must_use]
    pub fn state(mut self, state: CompanionState) -> Self {
        self.state = Some(state);
        self
    }

    /// Build the engine. A fresh companion is created at the clock's current
    /// instant unless a state was supplied.
    pub fn build(self) -> CompanionEngine {
        let offset = self
            .offset
            .unwrap_or_else(|| crate::config::SessionConfig::default().utc_offset());
        let now = self.clock.now();
        let state = self
            .state
            .unwrap_or_else(|| create_companion(&self.config, now, offset));
        let rng = self
            .rng
            .unwrap_or_else(|| Box::new(StdRng::from_os_rng()));

        info!(
            companion_id = %state.companion_id,
            bond_level = state.bond_level,
            mood = state.mood.as_str(),
            "companion engine ready"
        );

        CompanionEngine {
            state,
            config: self.config,
            catalog: self.catalog,
            offset,
            clock: self.clock,
            rng,
            sink: self.sink,
            pending: VecDeque::new(),
        }
    }
}

/// Owns one companion and drives it through time and activities.
pub struct CompanionEngine {
    state: CompanionState,
    config: CompanionConfig,
    catalog: MediaCatalog,
    offset: FixedOffset,
    clock: Arc<dyn Clock>,
    rng: Box<dyn RandomSource + Send>,
    sink: Box<dyn NotificationSink>,
    pending: VecDeque<Notification>,
}

impl CompanionEngine {
    /// Start building an engine.
    pub fn builder(config: CompanionConfig) -> EngineBuilder {
        EngineBuilder::new(config)
    }

    /// An engine with default mechanics and collaborators.
    pub fn with_defaults() -> Self {
        EngineBuilder::new(CompanionConfig::default()).build()
    }

    /// Read-only view of the companion.
    pub const fn state(&self) -> &CompanionState {
        &self.state
    }

    /// The mechanics configuration.
    pub const fn config(&self) -> &CompanionConfig {
        &self.config
    }

    /// The clip catalog.
    pub const fn catalog(&self) -> &MediaCatalog {
        &self.catalog
    }

    /// The current instant according to the engine's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // -----------------------------------------------------------------------
    // Simulation
    // -----------------------------------------------------------------------

    /// Apply decay up to now and refresh derived state.
    pub fn tick(&mut self) -> TickReport {
        let now = self.clock.now();
        let report = apply_tick(&mut self.state, &self.config, now, self.offset);
        if report.applied {
            debug!(
                minutes = report.elapsed_minutes,
                raised = ?report.flags.raised,
                cleared = ?report.flags.cleared,
                "tick"
            );
        }
        for notification in &report.notifications {
            self.emit(notification.clone());
        }
        report
    }

    /// Perform an activity and return its result.
    pub fn perform(&mut self, activity: Activity) -> ActivityResult {
        let now = self.clock.now();
        let ctx = ActivityContext {
            config: &self.config,
            catalog: &self.catalog,
            offset: self.offset,
            rng: &mut *self.rng,
        };
        let report = perform_activity(&mut self.state, activity, now, ctx);
        info!(
            companion_id = %self.state.companion_id,
            activity = report.result.activity.as_str(),
            success = report.result.success,
            bond_level = self.state.bond_level,
            mood = self.state.mood.as_str(),
            "activity"
        );
        for notification in report.notifications {
            self.emit(notification);
        }
        report.result
    }

    /// Serve a meal.
    pub fn feed(&mut self, food: FoodType) -> ActivityResult {
        self.perform(Activity::Feed(food))
    }

    /// Have a conversation.
    pub fn talk(&mut self, topic: TalkTopic) -> ActivityResult {
        self.perform(Activity::Talk(topic))
    }

    /// Play together.
    pub fn play(&mut self, play: PlayType) -> ActivityResult {
        self.perform(Activity::Play(play))
    }

    /// Wash up.
    pub fn wash(&mut self) -> ActivityResult {
        self.perform(Activity::Wash)
    }

    /// Help her settle in to sleep.
    pub fn sleep_assist(&mut self) -> ActivityResult {
        self.perform(Activity::SleepAssist)
    }

    /// Tidy her space.
    pub fn tidy(&mut self) -> ActivityResult {
        self.perform(Activity::Tidy)
    }

    /// Comfort her.
    pub fn comfort(&mut self) -> ActivityResult {
        self.perform(Activity::Comfort)
    }

    /// Invite her to confide.
    pub fn confide(&mut self) -> ActivityResult {
        self.perform(Activity::Confide)
    }

    /// Give a gift.
    pub fn give_gift(&mut self, gift: GiftType) -> ActivityResult {
        self.perform(Activity::GiveGift(gift))
    }

    /// Report a finished mini-game.
    pub fn mini_game(&mut self, score: u32) -> ActivityResult {
        self.perform(Activity::MiniGame(score))
    }

    /// Begin a play session: grant the daily reward if due and warn if any
    /// meter is critical.
    pub fn start_session(&mut self) -> Option<DailyReward> {
        let now = self.clock.now();
        let reward = economy::start_session(&mut self.state, &self.config, now);
        if let Some(reward) = reward {
            self.emit(alerts::daily_reward(reward));
        }
        if alerts::is_critical(&self.state, &self.config) {
            self.emit(alerts::stats_critical());
        }
        reward
    }

    // -----------------------------------------------------------------------
    // Media
    // -----------------------------------------------------------------------

    /// Pick an idle clip for the current state.
    pub fn current_media(&mut self) -> Option<String> {
        media::resolve_media(
            &self.catalog,
            self.state.mood,
            &self.state.status_flags,
            None,
            &mut *self.rng,
        )
    }

    /// All idle clips that fit the current state.
    pub fn current_media_sequence(&self) -> &[String] {
        media::resolve_media_sequence(
            &self.catalog,
            self.state.mood,
            &self.state.status_flags,
            None,
        )
    }

    // -----------------------------------------------------------------------
    // Notifications
    // -----------------------------------------------------------------------

    fn emit(&mut self, notification: Notification) {
        self.sink.deliver(&notification);
        if self.pending.len() >= MAX_PENDING_NOTIFICATIONS {
            self.pending.pop_front();
        }
        self.pending.push_back(notification);
    }

    /// Take every notification produced since the last drain.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        Vec::from(std::mem::take(&mut self.pending))
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Encode the state as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Serialization`] if encoding fails.
    pub fn serialize(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string(&self.state)?)
    }

    /// Replace the state with a decoded and validated blob.
    ///
    /// On error the current state is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Serialization`] for a malformed blob and
    /// [`EngineError::InvalidState`] for a state that breaks an invariant.
    pub fn restore(&mut self, blob: &str) -> Result<(), EngineError> {
        let state: CompanionState = serde_json::from_str(blob)?;
        validate_state(&state)?;
        info!(
            companion_id = %state.companion_id,
            bond_level = state.bond_level,
            last_updated = %state.last_updated,
            "companion restored"
        );
        self.state = state;
        Ok(())
    }

    /// Restore from `blob` if present; a corrupt or invalid blob resets the
    /// companion to defaults. Returns whether a saved state was restored.
    pub fn restore_or_default(&mut self, blob: Option<&str>) -> bool {
        let Some(blob) = blob else {
            return false;
        };
        match self.restore(blob) {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "saved state unusable, starting a fresh companion");
                self.reset();
                false
            }
        }
    }

    /// Replace the companion with a fresh one.
    pub fn reset(&mut self) {
        self.state = create_companion(&self.config, self.clock.now(), self.offset);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use chrono::{TimeDelta, TimeZone};
    use pearl_companion::ScriptedRolls;
    use pearl_types::{NotificationKind, StatusFlag};

    use super::*;
    use crate::clock::ManualClock;
    use crate::notify::CollectingSink;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 2, 8, 0, 0).unwrap()
    }

    fn fixture() -> (CompanionEngine, Arc<ManualClock>, CollectingSink) {
        let clock = Arc::new(ManualClock::new(start()));
        let sink = CollectingSink::new();
        let engine = CompanionEngine::builder(CompanionConfig::default())
            .clock(clock.clone())
            .offset(FixedOffset::east_opt(0).unwrap())
            .rng(Box::new(ScriptedRolls::constant(0.0)))
            .sink(Box::new(sink.clone()))
            .build();
        (engine, clock, sink)
    }

    #[test]
    fn fresh_engine_uses_clock() {
        let (engine, _, _) = fixture();
        assert_eq!(engine.state().last_updated, start());
        assert_eq!(engine.state().currency, 300);
    }

    #[test]
    fn tick_follows_clock() {
        let (mut engine, clock, _) = fixture();
        clock.advance(TimeDelta::minutes(5));
        let report = engine.tick();
        assert!(report.applied);
        assert!((engine.state().hunger - 55.0).abs() < 1e-9);
    }

    #[test]
    fn notifications_reach_sink_and_queue() {
        let (mut engine, clock, sink) = fixture();
        clock.advance(TimeDelta::hours(60));
        engine.tick();

        let drained = engine.drain_notifications();
        assert!(drained.iter().any(|n| n.kind == NotificationKind::StatsCritical));
        assert!(drained.iter().any(|n| n.kind == NotificationKind::FlagRaised));
        assert_eq!(sink.delivered(), drained);
        assert!(engine.drain_notifications().is_empty());
    }

    #[test]
    fn start_session_grants_reward_once_per_day() {
        let (mut engine, clock, _) = fixture();
        let reward = engine.start_session().unwrap();
        assert_eq!(reward.streak, 1);
        assert_eq!(engine.state().currency, 310);
        assert!(engine.start_session().is_none());

        clock.advance(TimeDelta::hours(26));
        let reward = engine.start_session().unwrap();
        assert_eq!(reward.streak, 2);
        assert_eq!(engine.state().currency, 330);
    }

    #[test]
    fn serialize_restore_round_trip() {
        let (mut engine, clock, _) = fixture();
        engine.feed(FoodType::Quick);
        clock.advance(TimeDelta::minutes(30));
        engine.tick();
        engine.talk(TalkTopic::Supportive);

        let blob = engine.serialize().unwrap();
        let saved = engine.state().clone();

        let (mut other, _, _) = fixture();
        other.restore(&blob).unwrap();
        assert_eq!(other.state(), &saved);
    }

    #[test]
    fn invalid_blob_leaves_state_untouched() {
        let (mut engine, _, _) = fixture();
        let before = engine.state().clone();
        assert!(matches!(
            engine.restore("{not json"),
            Err(EngineError::Serialization { .. })
        ));
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn out_of_range_blob_is_rejected() {
        let (mut engine, _, _) = fixture();
        let mut value: serde_json::Value =
            serde_json::from_str(&engine.serialize().unwrap()).unwrap();
        value["bondLevel"] = serde_json::json!(9);
        let result = engine.restore(&value.to_string());
        assert!(matches!(result, Err(EngineError::InvalidState { .. })));
    }

    #[test]
    fn restore_or_default_resets_on_corruption() {
        let (mut engine, _, _) = fixture();
        engine.mini_game(40);
        assert_eq!(engine.state().currency, 340);

        assert!(!engine.restore_or_default(Some("garbage")));
        assert_eq!(engine.state().currency, 300);
        assert!(!engine.restore_or_default(None));
    }

    #[test]
    fn current_media_reflects_status() {
        let (mut engine, clock, _) = fixture();
        clock.advance(TimeDelta::hours(72));
        engine.tick();
        assert!(engine.state().has_flag(StatusFlag::Sick));
        let clip = engine.current_media().unwrap();
        assert!(engine.catalog().status[&StatusFlag::Sick].contains(&clip));
        assert_eq!(
            engine.current_media_sequence(),
            engine.catalog().status[&StatusFlag::Sick].as_slice()
        );
    }

    #[test]
    fn pending_queue_is_bounded() {
        let (mut engine, _, _) = fixture();
        for _ in 0..(MAX_PENDING_NOTIFICATIONS + 10) {
            engine.emit(alerts::stats_critical());
        }
        assert_eq!(engine.drain_notifications().len(), MAX_PENDING_NOTIFICATIONS);
    }
}
