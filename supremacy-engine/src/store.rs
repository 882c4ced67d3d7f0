use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use thiserror::Error;

use crate::SnapshotStore;

/// Failures reported by snapshot stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read snapshot from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write snapshot to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to remove snapshot at {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("snapshot storage is unavailable")]
    Unavailable,
}

/// In-process store holding the last saved snapshot text.
///
/// Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Rc<RefCell<Option<String>>>,
    read_only: bool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-filled with `snapshot`.
    #[must_use]
    pub fn with_snapshot(snapshot: impl Into<String>) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Some(snapshot.into()))),
            read_only: false,
        }
    }

    /// A store whose writes always fail, as with a full or blocked cache.
    #[must_use]
    pub fn read_only() -> Self {
        Self {
            slot: Rc::default(),
            read_only: true,
        }
    }

    /// Current contents of the slot.
    #[must_use]
    pub fn contents(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl SnapshotStore for MemoryStore {
    type Error = StoreError;

    fn load(&self) -> Result<Option<String>, Self::Error> {
        Ok(self.slot.borrow().clone())
    }

    fn save(&self, snapshot: &str) -> Result<(), Self::Error> {
        if self.read_only {
            return Err(StoreError::Unavailable);
        }
        *self.slot.borrow_mut() = Some(snapshot.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), Self::Error> {
        if self.read_only {
            return Err(StoreError::Unavailable);
        }
        self.slot.borrow_mut().take();
        Ok(())
    }
}
