//! Optimistic rating votes.
//!
//! A vote click changes the local state at once. The server only hears about
//! the selection that is still standing after the debounce window, and a
//! failed write puts the local state back to what the server last confirmed.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::client::CourseApi;
use crate::debounce::Debouncer;
use crate::models::{Rating, VoteType};

pub const VOTE_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoteState {
    /// What the user sees.
    pub selected: Option<VoteType>,
    /// What the server last accepted.
    pub confirmed: Option<VoteType>,
    pub upvotes: u32,
    pub downvotes: u32,
    pub pending: bool,
}

impl VoteState {
    pub fn from_rating(rating: &Rating) -> Self {
        Self {
            selected: rating.viewer_vote,
            confirmed: rating.viewer_vote,
            upvotes: rating.upvotes,
            downvotes: rating.downvotes,
            pending: false,
        }
    }

    fn counter(&mut self, vote: VoteType) -> &mut u32 {
        match vote {
            VoteType::Upvote => &mut self.upvotes,
            VoteType::Downvote => &mut self.downvotes,
        }
    }

    /// Moves the viewer's contribution to the counters from one selection to another.
    fn reselect(&mut self, next: Option<VoteType>) {
        if let Some(prev) = self.selected {
            let count = self.counter(prev);
            *count = count.saturating_sub(1);
        }
        if let Some(vote) = next {
            *self.counter(vote) += 1;
        }
        self.selected = next;
    }
}

pub struct VoteSync {
    rating_id: Uuid,
    api: Arc<dyn CourseApi>,
    slot: Arc<Mutex<Slot>>,
    debouncer: Debouncer,
}

/// Vote state plus the number of the latest `select`, so a finished write
/// can tell whether a newer click is queued behind it.
#[derive(Debug)]
struct Slot {
    state: VoteState,
    generation: u64,
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl VoteSync {
    pub fn new(rating_id: Uuid, initial: VoteState, api: Arc<dyn CourseApi>, delay: Duration) -> Self {
        Self {
            rating_id,
            api,
            slot: Arc::new(Mutex::new(Slot {
                state: initial,
                generation: 0,
            })),
            debouncer: Debouncer::new(delay),
        }
    }

    pub fn rating_id(&self) -> Uuid {
        self.rating_id
    }

    pub fn state(&self) -> VoteState {
        lock(&self.slot).state
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.slot).state.pending
    }

    /// Takes the server's view of the rating unless a local vote is still
    /// waiting to be written. Returns whether the state was replaced.
    pub fn reseed(&self, rating: &Rating) -> bool {
        let mut slot = lock(&self.slot);
        if slot.state.pending {
            return false;
        }
        slot.state = VoteState::from_rating(rating);
        true
    }

    /// Applies `vote` locally and schedules the server write.
    pub fn select(&self, vote: Option<VoteType>) -> (VoteState, JoinHandle<bool>) {
        let (snapshot, generation) = {
            let mut slot = lock(&self.slot);
            slot.state.reselect(vote);
            slot.state.pending = true;
            slot.generation += 1;
            (slot.state, slot.generation)
        };

        let api = self.api.clone();
        let slot = self.slot.clone();
        let rating_id = self.rating_id;
        let handle = self.debouncer.call(async move {
            let result = match vote {
                Some(v) => api.upsert_vote(rating_id, v).await,
                None => api.delete_vote(rating_id).await,
            };

            let mut slot = lock(&slot);
            // a newer click is already waiting for its own write
            let superseded = slot.generation != generation;
            let state = &mut slot.state;
            match result {
                Ok(()) => {
                    info!("vote on rating {} saved: {:?}", rating_id, vote);
                    state.confirmed = vote;
                }
                Err(e) => {
                    error!("failed to save vote on rating {}: {}", rating_id, e);
                    if !superseded {
                        let confirmed = state.confirmed;
                        state.reselect(confirmed);
                    }
                }
            }
            if !superseded {
                state.pending = false;
            }
        });

        (snapshot, handle)
    }
}

pub const MAX_TRACKED_RATINGS: usize = 4096;

struct Tracked {
    sync: Arc<VoteSync>,
    last_seen: u64,
}

#[derive(Default)]
struct Entries {
    map: HashMap<Uuid, Tracked>,
    clock: u64,
}

/// One [`VoteSync`] per rating, created on first use.
///
/// Past `capacity` entries, the least recently seen idle ratings are
/// dropped; ratings with a pending write are always kept.
pub struct VoteRegistry {
    api: Arc<dyn CourseApi>,
    delay: Duration,
    capacity: usize,
    entries: Mutex<Entries>,
}

impl VoteRegistry {
    pub fn new(api: Arc<dyn CourseApi>, delay: Duration) -> Self {
        Self::with_capacity(api, delay, MAX_TRACKED_RATINGS)
    }

    pub fn with_capacity(api: Arc<dyn CourseApi>, delay: Duration, capacity: usize) -> Self {
        Self {
            api,
            delay,
            capacity: capacity.max(1),
            entries: Mutex::new(Entries::default()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn len(&self) -> usize {
        self.entries().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registers a freshly fetched rating. An existing sync is reseeded from
    /// the server's counts unless it has a write pending.
    pub fn track(&self, rating: &Rating) -> Arc<VoteSync> {
        let mut created = false;
        let sync = self.get_or_insert(rating.id, || {
            created = true;
            VoteState::from_rating(rating)
        });
        if !created {
            sync.reseed(rating);
        }
        sync
    }

    pub fn get(&self, rating_id: Uuid) -> Option<Arc<VoteSync>> {
        let mut entries = self.entries();
        entries.clock += 1;
        let now = entries.clock;
        entries.map.get_mut(&rating_id).map(|tracked| {
            tracked.last_seen = now;
            tracked.sync.clone()
        })
    }

    pub fn get_or_insert(&self, rating_id: Uuid, initial: impl FnOnce() -> VoteState) -> Arc<VoteSync> {
        let mut entries = self.entries();
        entries.clock += 1;
        let now = entries.clock;

        if let Some(tracked) = entries.map.get_mut(&rating_id) {
            tracked.last_seen = now;
            return tracked.sync.clone();
        }

        let len = entries.map.len();
        if len >= self.capacity {
            evict_idle(&mut entries.map, len + 1 - self.capacity);
        }
        let sync = Arc::new(VoteSync::new(rating_id, initial(), self.api.clone(), self.delay));
        entries.map.insert(
            rating_id,
            Tracked {
                sync: sync.clone(),
                last_seen: now,
            },
        );
        sync
    }
}

fn evict_idle(map: &mut HashMap<Uuid, Tracked>, count: usize) {
    let mut idle: Vec<(u64, Uuid)> = map
        .iter()
        .filter(|(_, tracked)| !tracked.sync.is_pending())
        .map(|(id, tracked)| (tracked.last_seen, *id))
        .collect();
    idle.sort_unstable();
    for (_, id) in idle.into_iter().take(count) {
        map.remove(&id);
    }
    debug!("vote registry trimmed to {} ratings", map.len());
}
