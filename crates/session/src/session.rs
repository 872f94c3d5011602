//! Thread-safe session around the decision engine.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use proxcall_events::{CommandBusRef, Event};
use proxcall_policy::{ProximityEngine, SettingsProvider};
use proxcall_signals::SignalSnapshot;

use crate::error::SessionError;
use crate::executor::CommandExecutor;
use crate::platform::Platform;

/// Shared settings provider reference.
pub type SettingsRef = Arc<dyn SettingsProvider>;

/// One in-call UI session.
///
/// Events may arrive from any thread. Applying an event, recomputing both
/// policies and dispatching the resulting commands happen under one lock, so
/// a sensor callback can never interleave with a call-state callback.
pub struct ProximitySession {
    engine: Mutex<ProximityEngine>,
    settings: SettingsRef,
    bus: CommandBusRef,
}

impl ProximitySession {
    pub fn new(settings: SettingsRef, bus: CommandBusRef) -> Self {
        tracing::info!("proximity session started");
        Self {
            engine: Mutex::new(ProximityEngine::new()),
            settings,
            bus,
        }
    }

    /// Session that drives `platform` directly. Must be called inside a tokio runtime.
    pub fn with_platform(platform: Platform, settings: SettingsRef) -> Result<Self, SessionError> {
        let executor = CommandExecutor::new(platform)?;
        Ok(Self::new(settings, Arc::new(executor)))
    }

    pub fn apply(&self, event: Event) {
        let settings = self.settings.settings();
        let mut engine = self.lock();

        let commands = engine.handle(event, &settings, now());
        for command in commands {
            tracing::debug!(topic = command.topic(), "dispatching command");
            self.bus.dispatch(command);
        }
    }

    pub fn apply_all(&self, events: impl IntoIterator<Item = Event>) {
        for event in events {
            self.apply(event);
        }
    }

    /// Stop sensing, cancel the pending switch and turn the screen back on.
    /// Safe to call more than once; later events are ignored.
    pub fn teardown(&self) {
        let mut engine = self.lock();
        for command in engine.teardown(now()) {
            self.bus.dispatch(command);
        }
    }

    pub fn snapshot(&self) -> SignalSnapshot {
        self.lock().snapshot()
    }

    pub fn is_blank_armed(&self) -> bool {
        self.lock().is_blank_armed()
    }

    pub fn has_pending_switch(&self) -> bool {
        self.lock().pending_switch(now()).is_some()
    }

    fn lock(&self) -> MutexGuard<'_, ProximityEngine> {
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for ProximitySession {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Engine clock; follows tokio's clock so paused-time tests stay consistent.
fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proxcall_events::{command_names, Command, InMemoryCommandBus};
    use proxcall_policy::StaticSettings;
    use proxcall_signals::CallPhase;

    fn session() -> (ProximitySession, Arc<InMemoryCommandBus>) {
        let bus = Arc::new(InMemoryCommandBus::new());
        let session = ProximitySession::new(Arc::new(StaticSettings::default()), bus.clone());
        (session, bus)
    }

    #[test]
    fn test_apply_dispatches_in_order() {
        let (session, bus) = session();
        session.apply(Event::CallPhaseChanged {
            phase: CallPhase::ActiveOffHook,
        });

        assert_eq!(
            bus.commands(),
            vec![
                Command::StartProximitySensing,
                Command::StartOrientationSensing,
                Command::AcquireBlankTrigger,
            ]
        );
        assert!(session.is_blank_armed());
    }

    #[test]
    fn test_drop_tears_down() {
        let (session, bus) = session();
        session.apply(Event::CallPhaseChanged {
            phase: CallPhase::Incoming,
        });
        bus.clear();

        drop(session);
        assert_eq!(
            bus.commands(),
            vec![Command::ReleaseBlankTrigger { immediate: true }]
        );
    }

    #[test]
    fn test_events_after_teardown_ignored() {
        let (session, bus) = session();
        session.teardown();
        session.apply(Event::CallPhaseChanged {
            phase: CallPhase::ActiveOffHook,
        });
        assert!(bus.is_empty());
    }

    #[test]
    fn test_concurrent_events_keep_single_decision() {
        let (session, bus) = session();
        let session = Arc::new(session);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let session = Arc::clone(&session);
                std::thread::spawn(move || {
                    let phase = if i % 2 == 0 {
                        CallPhase::ActiveOffHook
                    } else {
                        CallPhase::Incoming
                    };
                    session.apply(Event::CallPhaseChanged { phase });
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // Both phases arm, so the trigger is acquired exactly once.
        assert_eq!(bus.commands_for(command_names::ACQUIRE_BLANK).len(), 1);
        assert!(bus.commands_for(command_names::RELEASE_BLANK).is_empty());
    }
}
