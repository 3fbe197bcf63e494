//! Summary request bookkeeping.
//!
//! A summary is wanted once per (snapshot, language) combination. The tracker
//! issues a ticket for each request, remembers which ticket is current and
//! drops any response whose ticket has been superseded.

use std::collections::HashMap;
use std::fmt;

use nimbus_core::Language;

/// Identity of an accepted snapshot. Increases with every successful search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SnapshotId(u64);

impl SnapshotId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The combination a summary is produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SummaryKey {
    pub snapshot: SnapshotId,
    pub language: Language,
}

impl SummaryKey {
    pub fn new(snapshot: SnapshotId, language: Language) -> Self {
        Self { snapshot, language }
    }
}

/// Handle for one issued summary request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    id: u64,
    key: SummaryKey,
}

impl Ticket {
    pub fn key(&self) -> SummaryKey {
        self.key
    }
}

/// Outcome of [`SummaryTracker::begin`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Begin {
    /// Issue a request and report back with this ticket.
    Request(Ticket),
    /// Already summarized for this snapshot; show the stored text.
    Cached(String),
    /// This exact combination is being requested right now.
    InFlight,
}

#[derive(Debug, Default)]
pub struct SummaryTracker {
    next_id: u64,
    pending: Option<Ticket>,
    snapshot: Option<SnapshotId>,
    cache: HashMap<Language, String>,
}

impl SummaryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide what to do for `key`.
    ///
    /// A snapshot other than the one last seen drops every cached summary.
    pub fn begin(&mut self, key: SummaryKey) -> Begin {
        if self.snapshot != Some(key.snapshot) {
            if !self.cache.is_empty() {
                tracing::debug!("Snapshot {} replaces cached summaries", key.snapshot);
            }
            self.cache.clear();
            self.snapshot = Some(key.snapshot);
        }

        if let Some(text) = self.cache.get(&key.language) {
            // Whatever was pending is for a combination no longer on screen.
            self.pending = None;
            return Begin::Cached(text.clone());
        }

        if self.pending.is_some_and(|t| t.key == key) {
            return Begin::InFlight;
        }

        self.next_id += 1;
        let ticket = Ticket {
            id: self.next_id,
            key,
        };
        self.pending = Some(ticket);
        Begin::Request(ticket)
    }

    /// Accept a response. Returns the text only if `ticket` is still current.
    pub fn complete(&mut self, ticket: Ticket, text: String) -> Option<String> {
        if self.pending != Some(ticket) {
            tracing::info!(
                "Discarding stale summary for snapshot {} ({})",
                ticket.key.snapshot,
                ticket.key.language
            );
            return None;
        }

        self.pending = None;
        if self.snapshot == Some(ticket.key.snapshot) {
            self.cache.insert(ticket.key.language, text.clone());
        }
        Some(text)
    }

    /// Forget the outstanding request, e.g. when a new search starts.
    pub fn cancel_pending(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
