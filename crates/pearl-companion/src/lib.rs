//! Companion simulation logic for the Pearl engine.
//!
//! Everything here is a pure function over [`pearl_types::CompanionState`]:
//! time comes in as a parameter, randomness through [`random::RandomSource`],
//! and notifications go out as return values. The engine in `pearl-core`
//! owns the state and wires these pieces together.
//!
//! # Modules
//!
//! - [`config`] -- Tunable rates, thresholds, windows, and starting values
//! - [`companion`] -- Creating a companion and validating restored state
//! - [`vitals`] -- Meter decay, clamping, and the daily rollover
//! - [`derived`] -- Happiness and mood
//! - [`flags`] -- Level-triggered status flags
//! - [`bond`] -- Affection-to-bond conversion
//! - [`activities`] -- Activity validation, handlers, and bookkeeping
//! - [`media`] -- Clip catalog and priority-based clip resolution
//! - [`rare`] -- Rare clip unlocks
//! - [`economy`] -- Daily streak reward and achievements
//! - [`alerts`] -- Notification content
//! - [`random`] -- Injectable randomness
//! - [`error`] -- Error types

pub mod activities;
pub mod alerts;
pub mod bond;
pub mod companion;
pub mod config;
pub mod derived;
pub mod economy;
pub mod error;
pub mod flags;
pub mod media;
pub mod random;
pub mod rare;
pub mod vitals;

pub use activities::{ActivityContext, ActivityReport, perform_activity};
pub use companion::{create_companion, validate_state};
pub use config::CompanionConfig;
pub use error::CompanionError;
pub use media::{MediaCatalog, MediaCue, resolve_media, resolve_media_sequence};
pub use random::{RandomSource, ScriptedRolls};
pub use vitals::{TickReport, apply_tick};
