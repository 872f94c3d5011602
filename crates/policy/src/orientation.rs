//! Gate for orientation and proximity sensing.

use proxcall_events::Command;
use proxcall_signals::SignalSnapshot;

/// What changed after a gate update.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GateUpdate {
    /// The call entered or left the connected state.
    pub call_active_changed: bool,
    pub commands: Vec<Command>,
}

/// Derives sensing enablement from the call phase and display power.
///
/// The proximity sensor listens while the call is connected. Orientation
/// additionally needs the display on, since it only matters for screen
/// decisions.
#[derive(Debug, Default)]
pub struct OrientationGate {
    call_active: bool,
    orientation_sensing: bool,
}

impl OrientationGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_active(&self) -> bool {
        self.call_active
    }

    pub fn orientation_sensing(&self) -> bool {
        self.orientation_sensing
    }

    pub fn update(&mut self, snapshot: &SignalSnapshot) -> GateUpdate {
        let mut update = GateUpdate::default();

        let call_active = snapshot.is_off_hook();
        if call_active != self.call_active {
            self.call_active = call_active;
            update.call_active_changed = true;

            tracing::info!(call_active, "proximity sensing toggled");
            update.commands.push(if call_active {
                Command::StartProximitySensing
            } else {
                Command::StopProximitySensing
            });
        }

        let sensing = call_active && snapshot.display_on;
        if sensing != self.orientation_sensing {
            self.orientation_sensing = sensing;

            tracing::info!(sensing, "orientation sensing toggled");
            update.commands.push(if sensing {
                Command::StartOrientationSensing
            } else {
                Command::StopOrientationSensing
            });
        }

        update
    }

    /// Close the gate for good (session teardown).
    pub fn shutdown(&mut self) -> Vec<Command> {
        let mut commands = Vec::new();
        if std::mem::take(&mut self.orientation_sensing) {
            commands.push(Command::StopOrientationSensing);
        }
        if std::mem::take(&mut self.call_active) {
            commands.push(Command::StopProximitySensing);
        }
        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proxcall_signals::CallPhase;

    fn snapshot(phase: CallPhase, display_on: bool) -> SignalSnapshot {
        SignalSnapshot {
            phase,
            display_on,
            ..Default::default()
        }
    }

    #[test]
    fn test_call_start_enables_sensing() {
        let mut gate = OrientationGate::new();
        let update = gate.update(&snapshot(CallPhase::ActiveOffHook, true));

        assert!(update.call_active_changed);
        assert_eq!(
            update.commands,
            vec![
                Command::StartProximitySensing,
                Command::StartOrientationSensing
            ]
        );
        assert!(gate.orientation_sensing());
    }

    #[test]
    fn test_only_offhook_enables() {
        let mut gate = OrientationGate::new();
        for phase in [CallPhase::Idle, CallPhase::Incoming, CallPhase::Outgoing] {
            let update = gate.update(&snapshot(phase, true));
            assert!(update.commands.is_empty());
            assert!(!gate.call_active());
        }
    }

    #[test]
    fn test_no_repeat_commands() {
        let mut gate = OrientationGate::new();
        gate.update(&snapshot(CallPhase::ActiveOffHook, true));
        assert_eq!(
            gate.update(&snapshot(CallPhase::ActiveOffHook, true)),
            GateUpdate::default()
        );
    }

    #[test]
    fn test_display_off_pauses_orientation_only() {
        let mut gate = OrientationGate::new();
        gate.update(&snapshot(CallPhase::ActiveOffHook, true));

        let update = gate.update(&snapshot(CallPhase::ActiveOffHook, false));
        assert!(!update.call_active_changed);
        assert_eq!(update.commands, vec![Command::StopOrientationSensing]);

        let update = gate.update(&snapshot(CallPhase::ActiveOffHook, true));
        assert_eq!(update.commands, vec![Command::StartOrientationSensing]);
    }

    #[test]
    fn test_call_end_stops_everything() {
        let mut gate = OrientationGate::new();
        gate.update(&snapshot(CallPhase::ActiveOffHook, true));

        let update = gate.update(&snapshot(CallPhase::Idle, true));
        assert!(update.call_active_changed);
        assert_eq!(
            update.commands,
            vec![Command::StopProximitySensing, Command::StopOrientationSensing]
        );
    }

    #[test]
    fn test_shutdown() {
        let mut gate = OrientationGate::new();
        assert!(gate.shutdown().is_empty());

        gate.update(&snapshot(CallPhase::ActiveOffHook, true));
        assert_eq!(
            gate.shutdown(),
            vec![Command::StopOrientationSensing, Command::StopProximitySensing]
        );
        assert!(gate.shutdown().is_empty());
    }
}
