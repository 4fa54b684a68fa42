//! Shared type definitions for the Pearl companion engine.
//!
//! This crate is the single source of truth for the data model shared by the
//! simulation logic, the engine, and the presentation layer. Types flow to
//! `TypeScript` via `ts-rs` so the UI can consume activity results directly.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrapper for companion identity
//! - [`enums`] -- Moods, status flags, activity kinds and parameters, stats
//! - [`structs`] -- The [`CompanionState`] aggregate and [`Notification`]
//! - [`actions`] -- Activity requests and structured results

pub mod actions;
pub mod enums;
pub mod ids;
pub mod structs;

pub use actions::{Activity, ActivityResult, StatDeltas};
pub use enums::{
    ActivityKind, FoodType, GiftType, Mood, NotificationKind, Outcome, PlayType, Stat,
    StatusFlag, TalkTopic,
};
pub use ids::CompanionId;
pub use structs::{CompanionState, Notification};
