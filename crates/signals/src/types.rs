//! Signal value types.
//!
//! Pure domain values - no I/O, no platform dependencies. Every type has a
//! default so the engine can be evaluated before the first real event.

use serde::{Deserialize, Serialize};

/// Phase of the call the in-call UI is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CallPhase {
    /// No call.
    #[default]
    Idle,

    /// Ringing, not answered yet.
    Incoming,

    /// Dialing or waiting for the remote side to pick up.
    Outgoing,

    /// Connected call.
    ActiveOffHook,
}

impl CallPhase {
    /// Returns a human-readable label for the phase.
    pub fn label(&self) -> &'static str {
        match self {
            CallPhase::Idle => "idle",
            CallPhase::Incoming => "incoming",
            CallPhase::Outgoing => "outgoing",
            CallPhase::ActiveOffHook => "offhook",
        }
    }
}

impl std::fmt::Display for CallPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Current audio output device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AudioRoute {
    #[default]
    Earpiece,
    Speaker,
    Bluetooth,
    WiredHeadset,
}

impl AudioRoute {
    pub fn label(&self) -> &'static str {
        match self {
            AudioRoute::Earpiece => "earpiece",
            AudioRoute::Speaker => "speaker",
            AudioRoute::Bluetooth => "bluetooth",
            AudioRoute::WiredHeadset => "wired_headset",
        }
    }

    /// Routes that keep the phone away from the user's face.
    pub fn keeps_screen_on(&self) -> bool {
        matches!(
            self,
            AudioRoute::Speaker | AudioRoute::Bluetooth | AudioRoute::WiredHeadset
        )
    }

    /// Routes the user picked on purpose; never switched away from automatically.
    pub fn is_external_device(&self) -> bool {
        matches!(self, AudioRoute::Bluetooth | AudioRoute::WiredHeadset)
    }
}

impl std::fmt::Display for AudioRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Coarse device orientation from the accelerometer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Unknown,
    /// Lying flat.
    Horizontal,
    Other,
}

impl Orientation {
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Orientation::Horizontal)
    }
}

/// Classified proximity sensor sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProximityReading {
    Near,
    #[default]
    Far,
}

impl ProximityReading {
    /// Classify a raw distance against the sensor's maximum range.
    ///
    /// Anything strictly below the maximum is `Near`. A sample at (or beyond)
    /// the maximum, or one that does not compare (NaN), is `Far`.
    pub fn classify(distance: f32, max_range: f32) -> Self {
        if distance < max_range {
            ProximityReading::Near
        } else {
            ProximityReading::Far
        }
    }

    pub fn is_near(&self) -> bool {
        matches!(self, ProximityReading::Near)
    }
}

/// Whether the in-call UI is in the foreground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UiVisibility {
    #[default]
    Showing,
    /// Another app took the foreground. Screen-off alone never leads here.
    Backgrounded,
}

/// Video call flags; either one keeps the screen on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct VideoCallState {
    /// The user requested, or received a request for, a video upgrade.
    #[serde(default)]
    pub attempting_video: bool,
    #[serde(default)]
    pub is_video_call: bool,
}

impl VideoCallState {
    pub fn new(attempting_video: bool, is_video_call: bool) -> Self {
        Self {
            attempting_video,
            is_video_call,
        }
    }

    pub fn any(&self) -> bool {
        self.attempting_video || self.is_video_call
    }
}
