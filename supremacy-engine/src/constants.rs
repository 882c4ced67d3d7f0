//! Centralized tuning constants for the Supremacy points engine.
//!
//! Projection horizons and reset times are fixed by the game's event rules;
//! keeping them together makes any change a reviewed code change rather than
//! a data edit.

// Calendar ------------------------------------------------------------------
/// Extrapolation horizon in days; end dates further out are clamped to this.
pub const MAX_PROJECTION_DAYS: u32 = 31;
/// Last day offset visited by the unlock simulator (inclusive).
pub const MAX_SIMULATION_DAY_OFFSET: u32 = 365;
/// Length of the countdown shown by the event timer progress bar.
pub const EVENT_TIMER_SPAN_DAYS: u32 = 30;
pub const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;
pub const MS_PER_HOUR: i64 = 60 * 60 * 1000;
pub const MS_PER_MINUTE: i64 = 60 * 1000;
/// Event end instants are pinned to this UTC time of day.
pub const EVENT_END_HOUR: u32 = 23;
pub const EVENT_END_MINUTE: u32 = 59;
pub const EVENT_END_SECOND: u32 = 59;

// Session defaults ------------------------------------------------------------
pub const DEFAULT_GUILD_SIZE: u32 = 20;
pub const MIN_GUILD_SIZE: u32 = 1;
pub const MAX_GUILD_SIZE: u32 = 100;

// Unlock progress -------------------------------------------------------------
pub const PROGRESS_MIN_PCT: f64 = 0.0;
pub const PROGRESS_MAX_PCT: f64 = 100.0;
