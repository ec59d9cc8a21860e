//! Debounced filter commits for long-lived clients.
//!
//! The HTTP routes are stateless and read the committed state straight from
//! the query string, so they do not go through this module. A client that
//! keeps list state across edits (a TUI, a websocket session) owns one
//! [`FilterCommitter`] and re-queries whenever its `watch` receiver changes.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use super::{FilterState, ListParams};
use crate::debounce::Debouncer;
use crate::models::FieldErrors;

/// Batches filter edits and publishes the committed list state.
///
/// Edits are held for the debounce window; only the last one in a burst is
/// committed, and every commit starts over from page 1. Page changes are
/// published immediately.
pub struct FilterCommitter {
    debouncer: Debouncer,
    draft: Arc<Mutex<FilterState>>,
    committed: Arc<watch::Sender<ListParams>>,
}

impl FilterCommitter {
    pub fn new(initial: ListParams, delay: Duration) -> Self {
        let (committed, _) = watch::channel(initial.clone());
        Self {
            debouncer: Debouncer::new(delay),
            draft: Arc::new(Mutex::new(initial.filters)),
            committed: Arc::new(committed),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ListParams> {
        self.committed.subscribe()
    }

    pub fn current(&self) -> ListParams {
        self.committed.borrow().clone()
    }

    /// Filters as currently edited, committed or not.
    pub fn draft(&self) -> FilterState {
        self.draft
            .lock()
            .map(|d| d.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Records an edit. Invalid filter states are rejected and leave any
    /// pending commit untouched.
    pub fn edit(&self, filters: FilterState) -> Result<JoinHandle<bool>, FieldErrors> {
        filters.validate()?;
        if let Ok(mut draft) = self.draft.lock() {
            *draft = filters.clone();
        }

        let committed = self.committed.clone();
        Ok(self.debouncer.call(async move {
            committed.send_modify(|params| {
                *params = params.with_filters(filters);
            });
            debug!("filters committed");
        }))
    }

    pub fn set_page(&self, page: u32) {
        self.committed.send_modify(|params| params.pagination.page = page.max(1));
    }

    /// Clears every filter at once, bypassing the debounce window.
    pub fn reset(&self) {
        self.debouncer.cancel();
        if let Ok(mut draft) = self.draft.lock() {
            *draft = FilterState::default();
        }
        self.committed
            .send_modify(|params| *params = params.with_filters(FilterState::default()));
    }
}
