use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

/// Trailing-edge debouncer.
///
/// Every `call` supersedes the previous one. A scheduled task only runs if no
/// newer call (or `cancel`) happened during its quiet period, so the last
/// write wins. A task that already started is never interrupted.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedules `task` after the quiet period. The handle resolves to `true`
    /// when the task actually ran.
    pub fn call<F>(&self, task: F) -> JoinHandle<bool>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let generation = self.generation.clone();
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if generation.load(Ordering::SeqCst) != token {
                debug!("debounced task {} superseded", token);
                return false;
            }
            task.await;
            true
        })
    }

    /// Drops whatever is pending.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}
