use std::sync::Arc;

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::SnapshotStore;
use crate::calendar::event_end_from_date;
use crate::config::EventConfig;
use crate::projection::{EventProjection, ProjectionMode, compute_event_projection};
use crate::snapshot::{Snapshot, SnapshotError};
use crate::state::InputState;
use crate::summary::{DerivedSummary, compute_summary};
use crate::unlock::{CycleRates, UnlockReport, unlock_report};

/// Session wrapper binding an event configuration, the mutable inputs and a
/// snapshot store. Every mutation is persisted on a best-effort basis.
#[derive(Debug)]
pub struct CalculatorSession<S: SnapshotStore> {
    config: Arc<EventConfig>,
    state: InputState,
    store: S,
}

impl<S: SnapshotStore> CalculatorSession<S> {
    /// Fresh defaults; nothing is read from or written to the store.
    #[must_use]
    pub fn new(config: Arc<EventConfig>, store: S) -> Self {
        let state = InputState::new(&config);
        Self {
            config,
            state,
            store,
        }
    }

    /// Load the stored snapshot, falling back to defaults when it is missing
    /// or unreadable.
    #[must_use]
    pub fn restore(config: Arc<EventConfig>, store: S) -> Self {
        let state = match store.load() {
            Ok(Some(text)) => match Snapshot::from_json(&text) {
                Ok(snapshot) => InputState::from_snapshot(&config, &snapshot),
                Err(err) => {
                    log::warn!("discarding corrupt saved snapshot: {err}");
                    InputState::new(&config)
                }
            },
            Ok(None) => InputState::new(&config),
            Err(err) => {
                log::warn!("could not load saved snapshot: {err}");
                InputState::new(&config)
            }
        };
        Self {
            config,
            state,
            store,
        }
    }

    #[must_use]
    pub fn config(&self) -> &EventConfig {
        &self.config
    }

    #[must_use]
    pub const fn state(&self) -> &InputState {
        &self.state
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn into_state(self) -> InputState {
        self.state
    }

    pub fn set_guild_size(&mut self, value: i64) {
        self.state.set_guild_size(&self.config, value);
        self.persist();
    }

    pub fn set_ranking(&mut self, mode_id: &str, tier_index: usize, value: i64) -> bool {
        let stored = self
            .state
            .set_ranking(&self.config, mode_id, tier_index, value);
        if stored {
            self.persist();
        }
        stored
    }

    pub fn set_mission(&mut self, mission_id: &str, value: i64) -> bool {
        let stored = self.state.set_mission(&self.config, mission_id, value);
        if stored {
            self.persist();
        }
        stored
    }

    pub fn set_current_points(&mut self, value: i64) {
        self.state.set_current_points(value);
        self.persist();
    }

    pub fn set_event_end(&mut self, event_end: DateTime<Utc>) {
        self.state.set_event_end(event_end);
        self.persist();
    }

    /// Pick a calendar end date; the event closes at 23:59:59 UTC that day.
    pub fn set_event_end_date(&mut self, date: NaiveDate) {
        self.set_event_end(event_end_from_date(date));
    }

    /// Zero all counts and current points, keeping guild size and end date.
    pub fn reset(&mut self) {
        self.state.reset();
        self.persist();
    }

    /// Replace the inputs with an imported snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error when `json` is not JSON; the current inputs are kept.
    pub fn import_json(&mut self, json: &str) -> Result<(), SnapshotError> {
        let snapshot = Snapshot::from_json(json)?;
        self.state = InputState::from_snapshot(&self.config, &snapshot);
        self.persist();
        Ok(())
    }

    /// Pretty JSON export of the current inputs.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn export_json(&self) -> Result<String, SnapshotError> {
        self.snapshot().to_json()
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.state.to_snapshot(&self.config)
    }

    /// Write the current inputs to the store. Failures are logged, never raised.
    pub fn persist(&self) -> bool {
        let text = match self.snapshot().to_compact_json() {
            Ok(text) => text,
            Err(err) => {
                log::warn!("could not encode snapshot: {err}");
                return false;
            }
        };
        match self.store.save(&text) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("could not save snapshot: {err}");
                false
            }
        }
    }

    /// Drop the stored snapshot.
    ///
    /// # Errors
    ///
    /// Propagates the store's error.
    pub fn clear_saved(&self) -> Result<(), S::Error> {
        self.store.clear()
    }

    #[must_use]
    pub fn summary(&self, now: DateTime<Utc>) -> DerivedSummary {
        compute_summary(
            &self.config,
            &self.state,
            &self.state,
            now.date_naive().weekday(),
        )
    }

    #[must_use]
    pub fn projection(&self, now: DateTime<Utc>) -> EventProjection {
        compute_event_projection(
            &self.config,
            &self.state,
            &self.state,
            self.state.event_end,
            now,
        )
    }

    #[must_use]
    pub fn cycle_rates(&self) -> CycleRates {
        CycleRates::from_config(&self.config, &self.state, &self.state)
    }

    #[must_use]
    pub fn projected_points(&self, mode: ProjectionMode, now: DateTime<Utc>) -> u64 {
        mode.projected_points(self.state.current_points, &self.projection(now))
    }

    #[must_use]
    pub fn unlock_report(&self, mode: ProjectionMode, now: DateTime<Utc>) -> UnlockReport {
        unlock_report(
            &self.config.unlock_ladder,
            mode,
            self.state.current_points,
            self.projected_points(mode, now),
            &self.cycle_rates(),
            self.state.event_end,
            now,
        )
    }
}
