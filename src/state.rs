use std::sync::Arc;
use std::time::Duration;

use crate::client::{ConnectionMonitor, CourseApi};
use crate::votes::VoteRegistry;

#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn CourseApi>,
    pub connection: Arc<ConnectionMonitor>,
    pub votes: Arc<VoteRegistry>,
}

impl AppState {
    pub fn new(api: Arc<dyn CourseApi>, vote_debounce: Duration) -> Self {
        Self {
            votes: Arc::new(VoteRegistry::new(api.clone(), vote_debounce)),
            connection: Arc::new(ConnectionMonitor::new()),
            api,
        }
    }
}
