//! Proximity screen-blank decision.
//!
//! Pure domain logic - the trigger itself lives with the host.

use proxcall_events::Command;
use proxcall_signals::{CallPhase, SignalSnapshot};

/// Result of evaluating a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlankDecision {
    /// Something in the snapshot says the user wants the screen on.
    pub screen_on_immediately: bool,
    /// The proximity trigger should be armed.
    pub arm: bool,
}

/// Decide whether the proximity screen-off trigger should be armed.
///
/// The screen is kept on when:
/// - audio goes to a wired headset, bluetooth or the speaker
/// - a video call is active or being negotiated
/// - the device lies flat while another app is in front
/// - the device lies flat with the dialpad open
///
/// Otherwise the trigger is armed while ringing or connected.
pub fn evaluate(snapshot: &SignalSnapshot) -> BlankDecision {
    let mut screen_on_immediately = snapshot.route.keeps_screen_on() || snapshot.video.any();

    let horizontal = snapshot.is_horizontal();

    // Flat and not looking at the call UI at all: don't keep the screen off.
    screen_on_immediately |= !snapshot.ui_showing() && horizontal;

    // Flat with the dialpad up: the user is typing, not holding it to the ear.
    screen_on_immediately |= snapshot.dialpad_visible && horizontal;

    let in_call = matches!(
        snapshot.phase,
        CallPhase::ActiveOffHook | CallPhase::Incoming
    );

    BlankDecision {
        screen_on_immediately,
        arm: in_call && !screen_on_immediately,
    }
}

/// Tracks the last emitted blank decision so commands only go out on change.
#[derive(Debug, Default)]
pub struct ScreenBlankPolicy {
    armed: bool,
}

impl ScreenBlankPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Re-evaluate and return a command if the decision flipped.
    pub fn update(&mut self, snapshot: &SignalSnapshot) -> Option<Command> {
        let decision = evaluate(snapshot);

        tracing::debug!(
            screen_on_immediately = decision.screen_on_immediately,
            dialpad_visible = snapshot.dialpad_visible,
            phase = %snapshot.phase,
            horizontal = snapshot.is_horizontal(),
            ui_showing = snapshot.ui_showing(),
            route = %snapshot.route,
            "blank policy evaluated"
        );

        if decision.arm == self.armed {
            return None;
        }
        self.armed = decision.arm;

        if decision.arm {
            tracing::info!("arming proximity blank trigger");
            Some(Command::AcquireBlankTrigger)
        } else {
            tracing::info!(
                immediate = decision.screen_on_immediately,
                "releasing proximity blank trigger"
            );
            Some(Command::ReleaseBlankTrigger {
                immediate: decision.screen_on_immediately,
            })
        }
    }

    /// Release right away regardless of the snapshot (session teardown).
    pub fn release_now(&mut self) -> Option<Command> {
        if !std::mem::take(&mut self.armed) {
            return None;
        }
        tracing::info!("releasing proximity blank trigger on teardown");
        Some(Command::ReleaseBlankTrigger { immediate: true })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proxcall_signals::{AudioRoute, Orientation, UiVisibility, VideoCallState};

    fn offhook() -> SignalSnapshot {
        SignalSnapshot {
            phase: CallPhase::ActiveOffHook,
            ..Default::default()
        }
    }

    #[test]
    fn test_offhook_earpiece_arms() {
        assert!(evaluate(&offhook()).arm);
    }

    #[test]
    fn test_incoming_arms() {
        let snap = SignalSnapshot {
            phase: CallPhase::Incoming,
            ..Default::default()
        };
        assert!(evaluate(&snap).arm);
    }

    #[test]
    fn test_idle_and_outgoing_never_arm() {
        for phase in [CallPhase::Idle, CallPhase::Outgoing] {
            let snap = SignalSnapshot {
                phase,
                ..Default::default()
            };
            assert!(!evaluate(&snap).arm, "{phase} must not arm");
        }
    }

    #[test]
    fn test_external_routes_keep_screen_on() {
        for route in [
            AudioRoute::Speaker,
            AudioRoute::Bluetooth,
            AudioRoute::WiredHeadset,
        ] {
            let snap = SignalSnapshot {
                route,
                ..offhook()
            };
            let decision = evaluate(&snap);
            assert!(decision.screen_on_immediately);
            assert!(!decision.arm);
        }
    }

    #[test]
    fn test_video_flags_keep_screen_on() {
        let snap = SignalSnapshot {
            video: VideoCallState::new(true, false),
            ..offhook()
        };
        assert!(!evaluate(&snap).arm);

        let snap = SignalSnapshot {
            video: VideoCallState::new(false, true),
            ..offhook()
        };
        assert!(!evaluate(&snap).arm);
    }

    #[test]
    fn test_flat_and_backgrounded_keeps_screen_on() {
        let snap = SignalSnapshot {
            orientation: Orientation::Horizontal,
            ui: UiVisibility::Backgrounded,
            ..offhook()
        };
        assert!(!evaluate(&snap).arm);

        // Backgrounded but held upright still arms.
        let snap = SignalSnapshot {
            orientation: Orientation::Other,
            ui: UiVisibility::Backgrounded,
            ..offhook()
        };
        assert!(evaluate(&snap).arm);
    }

    #[test]
    fn test_flat_with_dialpad_keeps_screen_on() {
        let snap = SignalSnapshot {
            orientation: Orientation::Horizontal,
            dialpad_visible: true,
            ..offhook()
        };
        assert!(!evaluate(&snap).arm);

        // Flat alone, UI showing and no dialpad: still armed.
        let snap = SignalSnapshot {
            orientation: Orientation::Horizontal,
            ..offhook()
        };
        assert!(evaluate(&snap).arm);
    }

    #[test]
    fn test_update_emits_only_on_change() {
        let mut policy = ScreenBlankPolicy::new();
        let snap = offhook();

        assert_eq!(policy.update(&snap), Some(Command::AcquireBlankTrigger));
        assert_eq!(policy.update(&snap), None);
        assert!(policy.is_armed());
    }

    #[test]
    fn test_release_immediate_when_screen_forced_on() {
        let mut policy = ScreenBlankPolicy::new();
        policy.update(&offhook());

        let snap = SignalSnapshot {
            route: AudioRoute::WiredHeadset,
            ..offhook()
        };
        assert_eq!(
            policy.update(&snap),
            Some(Command::ReleaseBlankTrigger { immediate: true })
        );
    }

    #[test]
    fn test_release_pending_when_call_ends() {
        let mut policy = ScreenBlankPolicy::new();
        policy.update(&offhook());

        let snap = SignalSnapshot::default();
        assert_eq!(
            policy.update(&snap),
            Some(Command::ReleaseBlankTrigger { immediate: false })
        );
    }

    #[test]
    fn test_initial_release_not_emitted() {
        let mut policy = ScreenBlankPolicy::new();
        assert_eq!(policy.update(&SignalSnapshot::default()), None);
    }

    #[test]
    fn test_release_now() {
        let mut policy = ScreenBlankPolicy::new();
        assert_eq!(policy.release_now(), None);

        policy.update(&offhook());
        assert_eq!(
            policy.release_now(),
            Some(Command::ReleaseBlankTrigger { immediate: true })
        );
        assert!(!policy.is_armed());
    }
}
