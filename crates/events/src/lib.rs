//! Event and command contracts for the proximity engine.
//!
//! Events flow from the host platform into the engine; commands flow back
//! out. Both are plain tagged enums so hosts can exchange them as JSON
//! without sharing any trait objects.
//!
//! Also provides the `CommandBus` trait for decoupled command delivery.

mod bus;

pub use bus::{CommandBus, CommandBusRef, InMemoryCommandBus, NullCommandBus};

use proxcall_signals::{AudioRoute, CallPhase, Orientation};
use serde::{Deserialize, Serialize};

/// Normalized input from the host platform.
///
/// Producers: telephony, audio, sensor and UI adapters
/// Consumers: `ProximityEngine`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    CallPhaseChanged {
        phase: CallPhase,
    },
    AudioRouteChanged {
        route: AudioRoute,
    },
    /// Only applied while orientation sensing is enabled.
    OrientationChanged {
        orientation: Orientation,
    },
    /// Raw proximity sample, classified against the sensor's maximum range.
    ProximityRawSample {
        distance: f32,
        max_range: f32,
    },
    /// Display power; gates orientation sensing only.
    DisplayStateChanged {
        is_on: bool,
    },
    UiVisibilityChanged {
        showing: bool,
    },
    DialpadVisibilityChanged {
        visible: bool,
    },
    VideoCallFlagsChanged {
        #[serde(default)]
        attempting: bool,
        #[serde(default)]
        is_video: bool,
    },
}

impl Event {
    pub fn topic(&self) -> &'static str {
        match self {
            Event::CallPhaseChanged { .. } => event_names::CALL_PHASE_CHANGED,
            Event::AudioRouteChanged { .. } => event_names::AUDIO_ROUTE_CHANGED,
            Event::OrientationChanged { .. } => event_names::ORIENTATION_CHANGED,
            Event::ProximityRawSample { .. } => event_names::PROXIMITY_SAMPLE,
            Event::DisplayStateChanged { .. } => event_names::DISPLAY_STATE_CHANGED,
            Event::UiVisibilityChanged { .. } => event_names::UI_VISIBILITY_CHANGED,
            Event::DialpadVisibilityChanged { .. } => event_names::DIALPAD_VISIBILITY_CHANGED,
            Event::VideoCallFlagsChanged { .. } => event_names::VIDEO_FLAGS_CHANGED,
        }
    }
}

/// Normalized output to the host platform.
///
/// Emitted at most once per transition; hosts must treat repeats as no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Arm the proximity screen-off trigger.
    AcquireBlankTrigger,
    /// Disarm the trigger. With `immediate = false` the screen stays off until
    /// the sensor itself reports far.
    ReleaseBlankTrigger { immediate: bool },
    StartOrientationSensing,
    StopOrientationSensing,
    StartProximitySensing,
    StopProximitySensing,
    /// Switch the audio route after `delay_ms`, replacing any pending switch.
    ScheduleRouteSwitch { target: AudioRoute, delay_ms: u64 },
    CancelScheduledRouteSwitch,
    /// Switch the audio route now.
    SetRoute { target: AudioRoute },
}

impl Command {
    pub fn topic(&self) -> &'static str {
        match self {
            Command::AcquireBlankTrigger => command_names::ACQUIRE_BLANK,
            Command::ReleaseBlankTrigger { .. } => command_names::RELEASE_BLANK,
            Command::StartOrientationSensing => command_names::START_ORIENTATION,
            Command::StopOrientationSensing => command_names::STOP_ORIENTATION,
            Command::StartProximitySensing => command_names::START_PROXIMITY,
            Command::StopProximitySensing => command_names::STOP_PROXIMITY,
            Command::ScheduleRouteSwitch { .. } => command_names::SCHEDULE_ROUTE,
            Command::CancelScheduledRouteSwitch => command_names::CANCEL_ROUTE,
            Command::SetRoute { .. } => command_names::SET_ROUTE,
        }
    }
}

/// Event names as constants to prevent typos.
pub mod event_names {
    pub const CALL_PHASE_CHANGED: &str = "call:phase_changed";
    pub const AUDIO_ROUTE_CHANGED: &str = "audio:route_changed";
    pub const ORIENTATION_CHANGED: &str = "sensor:orientation_changed";
    pub const PROXIMITY_SAMPLE: &str = "sensor:proximity_sample";
    pub const DISPLAY_STATE_CHANGED: &str = "display:state_changed";
    pub const UI_VISIBILITY_CHANGED: &str = "ui:visibility_changed";
    pub const DIALPAD_VISIBILITY_CHANGED: &str = "ui:dialpad_changed";
    pub const VIDEO_FLAGS_CHANGED: &str = "call:video_flags_changed";
}

/// Command names as constants to prevent typos.
pub mod command_names {
    pub const ACQUIRE_BLANK: &str = "blank:acquire";
    pub const RELEASE_BLANK: &str = "blank:release";
    pub const START_ORIENTATION: &str = "orientation:start";
    pub const STOP_ORIENTATION: &str = "orientation:stop";
    pub const START_PROXIMITY: &str = "proximity:start";
    pub const STOP_PROXIMITY: &str = "proximity:stop";
    pub const SCHEDULE_ROUTE: &str = "route:schedule";
    pub const CANCEL_ROUTE: &str = "route:cancel";
    pub const SET_ROUTE: &str = "route:set";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_deserialize() {
        let json = r#"{"type": "proximity_raw_sample", "distance": 0.0, "max_range": 5.0}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(
            event,
            Event::ProximityRawSample {
                distance: 0.0,
                max_range: 5.0
            }
        );
        assert_eq!(event.topic(), event_names::PROXIMITY_SAMPLE);
    }

    #[test]
    fn test_phase_event_deserialize() {
        let json = r#"{"type": "call_phase_changed", "phase": "active_off_hook"}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(
            event,
            Event::CallPhaseChanged {
                phase: CallPhase::ActiveOffHook
            }
        );
    }

    #[test]
    fn test_video_flags_deserialize_minimal() {
        let json = r#"{"type": "video_call_flags_changed", "is_video": true}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(
            event,
            Event::VideoCallFlagsChanged {
                attempting: false,
                is_video: true
            }
        );
    }

    #[test]
    fn test_command_serialize() {
        let cmd = Command::ScheduleRouteSwitch {
            target: AudioRoute::Speaker,
            delay_ms: 3000,
        };
        let value = serde_json::to_value(cmd).unwrap();
        assert_eq!(value["type"], "schedule_route_switch");
        assert_eq!(value["target"], "speaker");
        assert_eq!(value["delay_ms"], 3000);

        let value = serde_json::to_value(Command::AcquireBlankTrigger).unwrap();
        assert_eq!(value, serde_json::json!({"type": "acquire_blank_trigger"}));
    }

    #[test]
    fn test_unknown_event_type_rejected() {
        let json = r#"{"type": "battery_low"}"#;
        assert!(serde_json::from_str::<Event>(json).is_err());
    }
}
