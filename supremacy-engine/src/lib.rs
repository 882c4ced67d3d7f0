//! Supremacy Points Engine
//!
//! Pure point arithmetic for the guild Supremacy event: per-mode ranking
//! totals, today's aggregate, extrapolation through the event end and a
//! day-by-day forecast of when each difficulty on the unlock ladder opens.
//! Persistence is injected through [`SnapshotStore`]; the engine itself
//! performs no I/O.

pub mod availability;
pub mod calendar;
pub mod config;
pub mod constants;
pub mod mode_points;
pub mod numbers;
pub mod projection;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod store;
pub mod summary;
pub mod unlock;

// Re-export commonly used types
pub use availability::Availability;
pub use calendar::{
    days_remaining, event_end_from_date, event_progress_pct, format_time_remaining,
    format_until_next_reset, next_daily_reset, next_weekly_reset, weeks_remaining,
};
pub use config::{
    Cadence, ConfigError, EventConfig, Mission, Mode, RewardTier, TierUnlockRequirement,
};
pub use mode_points::{
    ModeBreakdown, TierFn, TierLookup, compute_mode_points, max_mode_points, mode_breakdown,
};
pub use projection::{EventProjection, ModeProjection, ProjectionMode, compute_event_projection};
pub use session::CalculatorSession;
pub use snapshot::{MissionEntry, RankingEntry, Snapshot, SnapshotError};
pub use state::InputState;
pub use store::{MemoryStore, StoreError};
pub use summary::{DerivedSummary, MissionLookup, RankingLookup, compute_summary};
pub use unlock::{
    CycleRates, DailyRate, LadderRow, NextUnlock, UnlockReport, UnlockStatus,
    compute_unlock_date, compute_unlocked_difficulty, next_unlock, unlock_progress,
    unlock_report, unlock_status,
};

/// Trait for abstracting snapshot persistence.
/// Platform-specific implementations should provide this
pub trait SnapshotStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the saved snapshot text, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn load(&self) -> Result<Option<String>, Self::Error>;

    /// Replace the saved snapshot text.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    fn save(&self, snapshot: &str) -> Result<(), Self::Error>;

    /// Remove the saved snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be removed.
    fn clear(&self) -> Result<(), Self::Error>;
}
