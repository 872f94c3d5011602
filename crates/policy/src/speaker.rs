//! Proximity-driven speaker routing.
//!
//! Near for long enough moves audio to the speaker; far brings it back to
//! the earpiece right away. At most one delayed switch is outstanding.

use std::time::{Duration, Instant};

use proxcall_events::Command;
use proxcall_signals::{AudioRoute, ProximityReading, SignalSnapshot};

use crate::settings::ProximitySettings;

/// A delayed route switch the host has been asked to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledSwitch {
    pub target: AudioRoute,
    pub delay: Duration,
    pub deadline: Instant,
}

impl ScheduledSwitch {
    /// Still waiting to fire at `now`.
    pub fn is_live(&self, now: Instant) -> bool {
        now < self.deadline
    }
}

#[derive(Debug, Default)]
pub struct SpeakerRoutingPolicy {
    pending: Option<ScheduledSwitch>,
}

impl SpeakerRoutingPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// The outstanding switch, if it has not fired yet.
    pub fn pending(&self, now: Instant) -> Option<&ScheduledSwitch> {
        self.pending.as_ref().filter(|p| p.is_live(now))
    }

    /// Drop the pending switch and return a cancel command for it.
    ///
    /// The cancel is sent even past the deadline: the host timer may not have
    /// run yet, and cancelling one that already fired is a no-op.
    pub fn cancel(&mut self, now: Instant) -> Option<Command> {
        let pending = self.pending.take()?;
        tracing::debug!(
            target_route = %pending.target,
            overdue = !pending.is_live(now),
            "cancelling scheduled route switch"
        );
        Some(Command::CancelScheduledRouteSwitch)
    }

    /// React to a proximity reading.
    ///
    /// Eligibility is checked here only; a switch scheduled now fires even if
    /// the call has ended by its deadline.
    pub fn on_reading(
        &mut self,
        reading: ProximityReading,
        snapshot: &SignalSnapshot,
        settings: &ProximitySettings,
        now: Instant,
    ) -> Vec<Command> {
        let mut commands = Vec::with_capacity(2);

        if let Some(cancel) = self.cancel(now) {
            commands.push(cancel);
        }

        if !snapshot.is_off_hook() || !settings.auto_speaker_enabled {
            return commands;
        }

        let route = snapshot.route;
        if route.is_external_device() {
            tracing::debug!(%route, "external audio device, not auto-switching");
            return commands;
        }

        match reading {
            ProximityReading::Near if route != AudioRoute::Speaker => {
                if !settings.in_call_only || !snapshot.outgoing_call {
                    let delay = settings.switch_delay();
                    self.pending = Some(ScheduledSwitch {
                        target: AudioRoute::Speaker,
                        delay,
                        deadline: now + delay,
                    });
                    tracing::debug!(delay_ms = settings.switch_delay_ms, "scheduling speaker switch");
                    commands.push(Command::ScheduleRouteSwitch {
                        target: AudioRoute::Speaker,
                        delay_ms: settings.switch_delay_ms,
                    });
                } else {
                    tracing::debug!("in-call-only restriction blocks speaker switch");
                }
            }
            ProximityReading::Near => {}
            ProximityReading::Far => {
                // Unconditional: the in-call-only restriction only guards the near branch.
                tracing::debug!("proximity far, routing to earpiece");
                commands.push(Command::SetRoute {
                    target: AudioRoute::Earpiece,
                });
            }
        }

        commands
    }
}
