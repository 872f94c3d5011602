//! Command bus abstraction for decoupled command delivery.
//!
//! Keeps the engine free of platform calls: the session hands every emitted
//! command to a bus, and the host decides what to do with it.

use crate::Command;
use std::sync::{Arc, Mutex, PoisonError};

/// Trait for delivering engine commands to the host.
///
/// Implementations must tolerate repeats; the engine only promises
/// at-most-once per decision transition.
pub trait CommandBus: Send + Sync {
    fn dispatch(&self, command: Command);
}

/// Type alias for shared command bus reference.
pub type CommandBusRef = Arc<dyn CommandBus>;

/// In-memory command bus for testing.
///
/// Captures all dispatched commands for later inspection.
#[derive(Default)]
pub struct InMemoryCommandBus {
    commands: Mutex<Vec<Command>>,
}

impl InMemoryCommandBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all captured commands.
    pub fn commands(&self) -> Vec<Command> {
        self.lock().clone()
    }

    /// Get commands for a specific topic.
    pub fn commands_for(&self, topic: &str) -> Vec<Command> {
        self.lock()
            .iter()
            .filter(|c| c.topic() == topic)
            .copied()
            .collect()
    }

    /// Remove and return everything captured so far.
    pub fn drain(&self) -> Vec<Command> {
        std::mem::take(&mut *self.lock())
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Command>> {
        self.commands.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CommandBus for InMemoryCommandBus {
    fn dispatch(&self, command: Command) {
        tracing::trace!(topic = command.topic(), "captured command");
        self.lock().push(command);
    }
}

/// No-op command bus that discards all commands.
pub struct NullCommandBus;

impl CommandBus for NullCommandBus {
    fn dispatch(&self, _command: Command) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_names;
    use proxcall_signals::AudioRoute;

    #[test]
    fn test_in_memory_command_bus() {
        let bus = InMemoryCommandBus::new();

        bus.dispatch(Command::AcquireBlankTrigger);
        bus.dispatch(Command::SetRoute {
            target: AudioRoute::Earpiece,
        });
        bus.dispatch(Command::ReleaseBlankTrigger { immediate: true });

        assert_eq!(bus.len(), 3);
        assert_eq!(bus.commands_for(command_names::ACQUIRE_BLANK).len(), 1);
        assert_eq!(bus.commands_for(command_names::RELEASE_BLANK).len(), 1);
        assert_eq!(bus.commands_for(command_names::CANCEL_ROUTE).len(), 0);
    }

    #[test]
    fn test_in_memory_command_bus_drain() {
        let bus = InMemoryCommandBus::new();

        bus.dispatch(Command::StartOrientationSensing);
        assert_eq!(bus.drain(), vec![Command::StartOrientationSensing]);
        assert!(bus.is_empty());
    }

    #[test]
    fn test_null_command_bus() {
        let bus = NullCommandBus;
        bus.dispatch(Command::CancelScheduledRouteSwitch);
    }
}
