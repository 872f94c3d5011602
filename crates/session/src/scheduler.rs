//! Single-slot delayed route switch.
//!
//! Only one switch can be outstanding. Scheduling replaces the previous one,
//! and once `cancel` returns the cancelled switch can no longer reach the
//! router.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use proxcall_signals::AudioRoute;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use crate::error::SessionError;
use crate::platform::AudioRouter;

#[derive(Default)]
struct Slot {
    /// Bumped on every schedule and cancel; a timer only fires for its own generation.
    generation: u64,
    token: Option<CancellationToken>,
}

pub struct RouteSwitchScheduler {
    router: Arc<dyn AudioRouter>,
    runtime: Handle,
    slot: Arc<Mutex<Slot>>,
}

impl RouteSwitchScheduler {
    /// Create a scheduler on the current tokio runtime.
    pub fn new(router: Arc<dyn AudioRouter>) -> Result<Self, SessionError> {
        let runtime = Handle::try_current().map_err(SessionError::NoRuntime)?;
        Ok(Self::with_handle(router, runtime))
    }

    pub fn with_handle(router: Arc<dyn AudioRouter>, runtime: Handle) -> Self {
        Self {
            router,
            runtime,
            slot: Arc::new(Mutex::new(Slot::default())),
        }
    }

    /// Switch to `target` after `delay`, replacing any pending switch.
    pub fn schedule(&self, target: AudioRoute, delay: Duration) {
        let mut slot = lock(&self.slot);

        if let Some(previous) = slot.token.take() {
            previous.cancel();
        }
        slot.generation += 1;
        let generation = slot.generation;
        let token = CancellationToken::new();
        slot.token = Some(token.clone());

        let slot_ref = Arc::clone(&self.slot);
        let router = Arc::clone(&self.router);
        let deadline = tokio::time::Instant::now() + delay;

        tracing::debug!(route = %target, delay_ms = delay.as_millis() as u64, generation, "route switch scheduled");

        self.runtime.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::trace!(generation, "route switch timer cancelled");
                }
                _ = tokio::time::sleep_until(deadline) => {
                    // Fire under the lock so a concurrent cancel either wins or waits.
                    let mut slot = lock(&slot_ref);
                    if slot.generation != generation {
                        tracing::trace!(generation, "stale route switch dropped");
                        return;
                    }
                    slot.token = None;
                    tracing::info!(route = %target, "running scheduled route switch");
                    router.set_route(target);
                }
            }
        });
    }

    /// Cancel the pending switch. Returns `true` if one was waiting.
    pub fn cancel(&self) -> bool {
        let mut slot = lock(&self.slot);
        slot.generation += 1;

        match slot.token.take() {
            Some(token) => {
                token.cancel();
                tracing::debug!("scheduled route switch cancelled");
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.slot).token.is_some()
    }
}

impl Drop for RouteSwitchScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}
