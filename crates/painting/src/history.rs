//! Snapshot history for undo/redo
//!
//! The host pushes a [`Snapshot`] of the raster target after every
//! completed stroke. The first snapshot is the baseline (usually the blank
//! canvas) and is never undone past.

use std::collections::VecDeque;

use sketch_config::HistoryConfig;
use tracing::{debug, info};

use crate::surface::Snapshot;

/// Bounded snapshot stack with a cursor
pub struct History {
    entries: VecDeque<Snapshot>,
    /// Index of the snapshot currently shown
    cursor: usize,
    max_entries: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(sketch_config::DEFAULT_HISTORY_ENTRIES)
    }
}

impl History {
    /// History keeping at most `max_entries` snapshots (at least 1)
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: 0,
            max_entries: max_entries.max(1),
        }
    }

    pub fn from_config(config: &HistoryConfig) -> Self {
        Self::new(config.max_entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Record a new state. Any redo branch is discarded and the oldest
    /// snapshot is evicted once the cap is exceeded.
    pub fn push(&mut self, snapshot: Snapshot) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push_back(snapshot);
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len() - 1;
        debug!("History::push: {} entries, cursor {}", self.entries.len(), self.cursor);
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Step back; returns the snapshot to restore
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if !self.can_undo() {
            debug!("History::undo: nothing to undo");
            return None;
        }
        self.cursor -= 1;
        debug!("History::undo: cursor {}", self.cursor);
        self.entries.get(self.cursor)
    }

    /// Step forward; returns the snapshot to restore
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if !self.can_redo() {
            debug!("History::redo: nothing to redo");
            return None;
        }
        self.cursor += 1;
        debug!("History::redo: cursor {}", self.cursor);
        self.entries.get(self.cursor)
    }

    /// Snapshot at the cursor
    pub fn current(&self) -> Option<&Snapshot> {
        self.entries.get(self.cursor)
    }

    /// Drop everything, including the baseline
    pub fn clear(&mut self) {
        info!("History::clear: dropping {} entries", self.entries.len());
        self.entries.clear();
        self.cursor = 0;
    }
}
