//! Read-through cache of owner records with a bounded time-to-live.
//!
//! The cache is an ordinary value owned by whoever performs fetches; there is
//! no process-wide state. Writers must call [`RecordCache::invalidate`] after
//! every successful write so slots are never computed from stale bookings.
//!
//! A fetch that was in flight when an invalidation landed may have read the
//! store before the write. Readers therefore take a [`FetchTicket`] before
//! fetching and hand it back to [`RecordCache::insert`], which refuses to
//! store records older than the latest invalidation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::model::OwnerRecords;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

/// Invalidation generation observed before a store fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

#[derive(Debug)]
struct Entry {
    records: Arc<OwnerRecords>,
    fetched_at: Instant,
}

#[derive(Debug, Default)]
struct State {
    entries: HashMap<String, Entry>,
    /// Bumped by every invalidation or clear.
    generation: u64,
    /// Generation of the latest invalidation per owner.
    invalidated_at: HashMap<String, u64>,
    cleared_at: u64,
}

#[derive(Debug)]
pub struct RecordCache {
    ttl: Duration,
    state: Mutex<State>,
}

impl Default for RecordCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

impl RecordCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            state: Mutex::new(State::default()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh records for `owner`, evicting the entry if it has expired.
    pub fn get(&self, owner: &str) -> Option<Arc<OwnerRecords>> {
        let mut state = self.state.lock();
        let lookup = state
            .entries
            .get(owner)
            .map(|entry| (entry.fetched_at.elapsed() < self.ttl, Arc::clone(&entry.records)));
        match lookup {
            Some((true, records)) => {
                debug!(owner, "record cache hit");
                Some(records)
            }
            Some((false, _)) => {
                debug!(owner, "record cache entry expired");
                state.entries.remove(owner);
                None
            }
            None => {
                debug!(owner, "record cache miss");
                None
            }
        }
    }

    /// Take before reading the store; pass to [`Self::insert`] afterwards.
    pub fn ticket(&self) -> FetchTicket {
        FetchTicket(self.state.lock().generation)
    }

    /// Cache `records` fetched under `ticket`.
    ///
    /// Returns `false` without storing anything if `owner` was invalidated
    /// (or the cache cleared) after the ticket was taken.
    pub fn insert(&self, owner: &str, records: Arc<OwnerRecords>, ticket: FetchTicket) -> bool {
        let mut state = self.state.lock();
        let invalidated = state.invalidated_at.get(owner).copied().unwrap_or(0);
        if invalidated > ticket.0 || state.cleared_at > ticket.0 {
            debug!(owner, "dropping records fetched before the last invalidation");
            return false;
        }
        state.entries.insert(
            owner.to_string(),
            Entry {
                records,
                fetched_at: Instant::now(),
            },
        );
        true
    }

    pub fn invalidate(&self, owner: &str) {
        let mut state = self.state.lock();
        state.generation += 1;
        let generation = state.generation;
        state.invalidated_at.insert(owner.to_string(), generation);
        if state.entries.remove(owner).is_some() {
            debug!(owner, "record cache invalidated");
        }
    }

    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.generation += 1;
        state.cleared_at = state.generation;
        state.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
