//! Turns engine commands into platform calls.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use proxcall_events::{Command, CommandBus};

use crate::error::SessionError;
use crate::platform::Platform;
use crate::scheduler::RouteSwitchScheduler;

/// `CommandBus` that drives a [`Platform`].
///
/// The blank trigger's held state is tracked here so a repeated acquire or
/// release never reaches the hardware twice.
pub struct CommandExecutor {
    platform: Platform,
    scheduler: RouteSwitchScheduler,
    blank_held: AtomicBool,
}

impl CommandExecutor {
    /// Create an executor whose route switch timer runs on the current tokio runtime.
    pub fn new(platform: Platform) -> Result<Self, SessionError> {
        let scheduler = RouteSwitchScheduler::new(platform.router.clone())?;
        Ok(Self::with_scheduler(platform, scheduler))
    }

    pub fn with_scheduler(platform: Platform, scheduler: RouteSwitchScheduler) -> Self {
        Self {
            platform,
            scheduler,
            blank_held: AtomicBool::new(false),
        }
    }

    pub fn is_blank_held(&self) -> bool {
        self.blank_held.load(Ordering::SeqCst)
    }

    pub fn is_switch_pending(&self) -> bool {
        self.scheduler.is_pending()
    }
}

impl CommandBus for CommandExecutor {
    fn dispatch(&self, command: Command) {
        match command {
            Command::AcquireBlankTrigger => {
                if self.blank_held.swap(true, Ordering::SeqCst) {
                    tracing::info!("blank trigger already acquired");
                } else {
                    tracing::info!("acquiring blank trigger");
                    self.platform.blank.acquire();
                }
            }
            Command::ReleaseBlankTrigger { immediate } => {
                if self.blank_held.swap(false, Ordering::SeqCst) {
                    tracing::info!(immediate, "releasing blank trigger");
                    self.platform.blank.release(immediate);
                } else {
                    tracing::info!("blank trigger already released");
                }
            }
            Command::StartOrientationSensing => self.platform.orientation.set_enabled(true),
            Command::StopOrientationSensing => self.platform.orientation.set_enabled(false),
            Command::StartProximitySensing => self.platform.proximity.set_enabled(true),
            Command::StopProximitySensing => self.platform.proximity.set_enabled(false),
            Command::ScheduleRouteSwitch { target, delay_ms } => {
                self.scheduler
                    .schedule(target, Duration::from_millis(delay_ms));
            }
            Command::CancelScheduledRouteSwitch => {
                self.scheduler.cancel();
            }
            Command::SetRoute { target } => {
                tracing::info!(route = %target, "setting audio route");
                self.platform.router.set_route(target);
            }
        }
    }
}
