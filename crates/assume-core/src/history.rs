//! # History — Bounded Diagnostic Ring
//!
//! Records the lifecycle of every chain run: `start`, one `check` per
//! executed link, then `refuted` or `vindicated`. The ring is bounded by a
//! configurable limit (default 200) with FIFO eviction.
//!
//! ## Invariants
//!
//! - Entries keep their original relative order; eviction only ever removes
//!   the oldest entry.
//! - The engine writes history but never reads it to decide an outcome.
//!   It is a diagnostic aid, not a durability guarantee.
//!
//! ## Thread Safety
//!
//! The ring sits behind a `parking_lot::Mutex`. Concurrent chains may
//! interleave their entries; no chain reads another chain's entries.

use std::collections::VecDeque;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::tag::TypeTag;
use crate::temporal::Timestamp;

/// Default maximum number of retained entries.
pub const DEFAULT_HISTORY_LIMIT: usize = 200;

// ---------------------------------------------------------------------------
// AssumeEvent
// ---------------------------------------------------------------------------

/// One lifecycle event of a chain run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AssumeEvent {
    /// A chain started running.
    Start,
    /// A queued check is about to execute.
    Check {
        /// Tag recorded with the link.
        type_tag: TypeTag,
        /// Method that queued the link.
        op: String,
    },
    /// A check failed.
    Refuted {
        /// The failing check's description.
        message: String,
    },
    /// Every check passed.
    Vindicated,
}

impl AssumeEvent {
    /// Short label, stable across releases.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Check { .. } => "check",
            Self::Refuted { .. } => "refuted",
            Self::Vindicated => "vindicated",
        }
    }
}

/// An event plus the moment it was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// When the event was recorded.
    pub at: Timestamp,
    /// The recorded event.
    #[serde(flatten)]
    pub event: AssumeEvent,
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

struct Ring {
    entries: VecDeque<HistoryEntry>,
    limit: usize,
}

impl Ring {
    fn evict_overflow(&mut self) {
        while self.entries.len() > self.limit {
            if let Some(evicted) = self.entries.pop_front() {
                tracing::trace!(event = evicted.event.label(), "history entry evicted");
            }
        }
    }
}

/// Bounded ring buffer of [`AssumeEvent`]s.
pub struct History {
    ring: Mutex<Ring>,
}

impl History {
    /// Create an empty ring holding at most `limit` entries.
    pub fn new(limit: usize) -> Self {
        Self {
            ring: Mutex::new(Ring {
                entries: VecDeque::with_capacity(limit.min(1024)),
                limit,
            }),
        }
    }

    /// Append an event, evicting the oldest entries beyond the limit.
    pub fn push(&self, event: AssumeEvent) {
        let mut ring = self.ring.lock();
        ring.entries.push_back(HistoryEntry {
            at: Timestamp::now(),
            event,
        });
        ring.evict_overflow();
    }

    /// Snapshot of all retained entries, oldest first.
    pub fn snapshot(&self) -> Vec<HistoryEntry> {
        self.ring.lock().entries.iter().cloned().collect()
    }

    /// Snapshot of the retained events without timestamps, oldest first.
    pub fn events(&self) -> Vec<AssumeEvent> {
        self.ring
            .lock()
            .entries
            .iter()
            .map(|e| e.event.clone())
            .collect()
    }

    /// The last `n` entries (or all, if fewer are retained).
    pub fn last_n(&self, n: usize) -> Vec<HistoryEntry> {
        let ring = self.ring.lock();
        let start = ring.entries.len().saturating_sub(n);
        ring.entries.iter().skip(start).cloned().collect()
    }

    /// Entries whose event label equals `label`.
    pub fn events_by_kind(&self, label: &str) -> Vec<HistoryEntry> {
        self.ring
            .lock()
            .entries
            .iter()
            .filter(|e| e.event.label() == label)
            .cloned()
            .collect()
    }

    /// Drop every entry. The limit is unchanged.
    pub fn clear(&self) {
        self.ring.lock().entries.clear();
    }

    /// Change the limit, evicting immediately if the ring is over it.
    pub fn set_limit(&self, limit: usize) {
        let mut ring = self.ring.lock();
        ring.limit = limit;
        ring.evict_overflow();
    }

    /// Maximum number of retained entries.
    pub fn limit(&self) -> usize {
        self.ring.lock().limit
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.ring.lock().entries.len()
    }

    /// Whether no entries are retained.
    pub fn is_empty(&self) -> bool {
        self.ring.lock().entries.is_empty()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl std::fmt::Debug for History {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ring = self.ring.lock();
        f.debug_struct("History")
            .field("entries", &ring.entries.len())
            .field("limit", &ring.limit)
            .finish()
    }
}
