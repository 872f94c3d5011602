//! Synchronous event dispatch across the store and the policies.

use std::time::Instant;

use proxcall_events::{Command, Event};
use proxcall_signals::{
    CallPhase, Orientation, ProximityReading, Signal, SignalSnapshot, SignalStore, UiVisibility,
    VideoCallState,
};

use crate::blank::ScreenBlankPolicy;
use crate::orientation::OrientationGate;
use crate::settings::ProximitySettings;
use crate::speaker::{ScheduledSwitch, SpeakerRoutingPolicy};

/// Decision engine for one call-UI session.
///
/// Every event is merged into the store first; the policies then run
/// against an immutable snapshot and return the commands to issue, in order.
#[derive(Debug, Default)]
pub struct ProximityEngine {
    store: SignalStore,
    blank: ScreenBlankPolicy,
    speaker: SpeakerRoutingPolicy,
    gate: OrientationGate,
    torn_down: bool,
}

impl ProximityEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> SignalSnapshot {
        self.store.snapshot()
    }

    pub fn is_blank_armed(&self) -> bool {
        self.blank.is_armed()
    }

    pub fn is_orientation_sensing(&self) -> bool {
        self.gate.orientation_sensing()
    }

    pub fn pending_switch(&self, now: Instant) -> Option<&ScheduledSwitch> {
        self.speaker.pending(now)
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Apply one event and return the resulting commands.
    pub fn handle(
        &mut self,
        event: Event,
        settings: &ProximitySettings,
        now: Instant,
    ) -> Vec<Command> {
        if self.torn_down {
            tracing::debug!(topic = event.topic(), "session torn down, ignoring event");
            return Vec::new();
        }

        let mut commands = Vec::new();

        match event {
            Event::CallPhaseChanged { phase } => {
                let previous = self.store.snapshot().phase;
                self.store.set(Signal::Phase(phase));
                tracing::debug!(from = %previous, to = %phase, "call phase changed");

                self.update_gate(false, &mut commands);
                self.update_blank(&mut commands);

                // Re-apply the last reading once the dialed call connects.
                if previous == CallPhase::Outgoing && phase == CallPhase::ActiveOffHook {
                    let snapshot = self.store.snapshot();
                    commands.extend(self.speaker.on_reading(
                        snapshot.proximity,
                        &snapshot,
                        settings,
                        now,
                    ));
                }
            }
            Event::AudioRouteChanged { route } => {
                self.store.set(Signal::Route(route));
                self.update_blank(&mut commands);
            }
            Event::OrientationChanged { orientation } => {
                if self.gate.orientation_sensing() {
                    self.store.set(Signal::Orientation(orientation));
                } else {
                    tracing::trace!(?orientation, "orientation sensing off, ignoring sample");
                }
                self.update_blank(&mut commands);
            }
            Event::ProximityRawSample {
                distance,
                max_range,
            } => {
                let reading = ProximityReading::classify(distance, max_range);
                self.store.set(Signal::Proximity(reading));
                tracing::debug!(distance, max_range, ?reading, "proximity sample");

                let snapshot = self.store.snapshot();
                commands.extend(self.speaker.on_reading(reading, &snapshot, settings, now));
                self.update_blank(&mut commands);
            }
            Event::DisplayStateChanged { is_on } => {
                tracing::info!(is_on, "display state changed");
                self.store.set(Signal::DisplayOn(is_on));
                self.update_gate(false, &mut commands);
                self.update_blank(&mut commands);
            }
            Event::UiVisibilityChanged { showing } => {
                let ui = if showing {
                    UiVisibility::Showing
                } else {
                    UiVisibility::Backgrounded
                };
                self.store.set(Signal::UiVisibility(ui));
                self.update_blank(&mut commands);
            }
            Event::DialpadVisibilityChanged { visible } => {
                self.store.set(Signal::DialpadVisible(visible));
                self.update_blank(&mut commands);
            }
            Event::VideoCallFlagsChanged {
                attempting,
                is_video,
            } => {
                tracing::info!(attempting, is_video, "video call flags changed");
                let was_video = self.store.snapshot().video.is_video_call;
                self.store
                    .set(Signal::Video(VideoCallState::new(attempting, is_video)));
                self.update_gate(was_video != is_video, &mut commands);
                self.update_blank(&mut commands);
            }
        }

        commands
    }

    /// End the session: cancel the pending switch, stop sensing and release
    /// the trigger with the screen on. Later events are ignored.
    pub fn teardown(&mut self, now: Instant) -> Vec<Command> {
        if std::mem::replace(&mut self.torn_down, true) {
            return Vec::new();
        }

        let mut commands = Vec::new();
        commands.extend(self.speaker.cancel(now));
        commands.extend(self.gate.shutdown());
        commands.extend(self.blank.release_now());

        tracing::info!(commands = commands.len(), "proximity session torn down");
        commands
    }

    /// Gate sensors and drop stale orientation before the blank policy runs.
    fn update_gate(&mut self, force_orientation_reset: bool, commands: &mut Vec<Command>) {
        let snapshot = self.store.snapshot();
        let update = self.gate.update(&snapshot);

        if update.call_active_changed || force_orientation_reset {
            self.store.set(Signal::Orientation(Orientation::Unknown));
        }
        commands.extend(update.commands);
    }

    fn update_blank(&mut self, commands: &mut Vec<Command>) {
        let snapshot = self.store.snapshot();
        commands.extend(self.blank.update(&snapshot));
    }
}
