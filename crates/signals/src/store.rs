//! Latest-value storage for every engine input.

use crate::types::{
    AudioRoute, CallPhase, Orientation, ProximityReading, UiVisibility, VideoCallState,
};
use serde::{Deserialize, Serialize};

/// A single input update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal {
    Phase(CallPhase),
    Route(AudioRoute),
    Orientation(Orientation),
    Proximity(ProximityReading),
    UiVisibility(UiVisibility),
    DialpadVisible(bool),
    Video(VideoCallState),
    DisplayOn(bool),
}

/// Immutable view of all signals, handed to the policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalSnapshot {
    pub phase: CallPhase,
    /// The current call was placed by the user (entered through `Outgoing`).
    pub outgoing_call: bool,
    pub route: AudioRoute,
    pub orientation: Orientation,
    pub proximity: ProximityReading,
    pub ui: UiVisibility,
    pub dialpad_visible: bool,
    pub video: VideoCallState,
    pub display_on: bool,
}

impl Default for SignalSnapshot {
    fn default() -> Self {
        Self {
            phase: CallPhase::Idle,
            outgoing_call: false,
            route: AudioRoute::Earpiece,
            orientation: Orientation::Unknown,
            proximity: ProximityReading::Far,
            ui: UiVisibility::Showing,
            dialpad_visible: false,
            video: VideoCallState::default(),
            display_on: true,
        }
    }
}

impl SignalSnapshot {
    pub fn is_off_hook(&self) -> bool {
        self.phase == CallPhase::ActiveOffHook
    }

    pub fn is_horizontal(&self) -> bool {
        self.orientation.is_horizontal()
    }

    pub fn ui_showing(&self) -> bool {
        self.ui == UiVisibility::Showing
    }
}

/// Holds the latest value of each signal.
///
/// Any combination of values is legal; the store only records and reports
/// whether an update changed anything.
#[derive(Debug, Clone, Default)]
pub struct SignalStore {
    current: SignalSnapshot,
}

impl SignalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> SignalSnapshot {
        self.current
    }

    /// Apply a signal. Returns `true` if the stored state changed.
    pub fn set(&mut self, signal: Signal) -> bool {
        let before = self.current;
        let s = &mut self.current;

        match signal {
            Signal::Phase(phase) => {
                match phase {
                    CallPhase::Outgoing => s.outgoing_call = true,
                    CallPhase::Idle | CallPhase::Incoming => s.outgoing_call = false,
                    CallPhase::ActiveOffHook => {}
                }
                s.phase = phase;
            }
            Signal::Route(route) => s.route = route,
            Signal::Orientation(orientation) => s.orientation = orientation,
            Signal::Proximity(reading) => s.proximity = reading,
            Signal::UiVisibility(UiVisibility::Showing) => s.ui = UiVisibility::Showing,
            Signal::UiVisibility(UiVisibility::Backgrounded) => {
                // Leaving the foreground because the screen went dark still counts as showing.
                if s.display_on {
                    s.ui = UiVisibility::Backgrounded;
                } else {
                    tracing::trace!("ignoring ui hide while display is off");
                }
            }
            Signal::DialpadVisible(visible) => s.dialpad_visible = visible,
            Signal::Video(video) => s.video = video,
            Signal::DisplayOn(on) => s.display_on = on,
        }

        self.current != before
    }
}
