//! Proximity decisions for the in-call screen and audio route.
//!
//! Two independent decisions are made from the current `SignalSnapshot`:
//! - whether the proximity screen-off trigger is armed
//! - whether audio follows the proximity sensor between speaker and earpiece
//!
//! `ProximityEngine` ties them together: it merges each `Event` into the
//! signal store and returns the `Command`s the host has to carry out.
//!
//! # Example
//!
//! ```
//! use std::time::Instant;
//! use proxcall_events::{Command, Event};
//! use proxcall_policy::{ProximityEngine, ProximitySettings};
//! use proxcall_signals::CallPhase;
//!
//! let mut engine = ProximityEngine::new();
//! let commands = engine.handle(
//!     Event::CallPhaseChanged { phase: CallPhase::ActiveOffHook },
//!     &ProximitySettings::default(),
//!     Instant::now(),
//! );
//! assert!(commands.contains(&Command::AcquireBlankTrigger));
//! ```

mod blank;
mod engine;
mod error;
mod orientation;
mod settings;
mod speaker;

pub use blank::{evaluate as evaluate_blank, BlankDecision, ScreenBlankPolicy};
pub use engine::ProximityEngine;
pub use error::SettingsError;
pub use orientation::{GateUpdate, OrientationGate};
pub use settings::{
    default_settings_path, load_default_settings, load_settings_file, ProximitySettings,
    SettingsProvider, SharedSettings, StaticSettings, DEFAULT_SWITCH_DELAY_MS,
    SETTINGS_FILE_NAME,
};
pub use speaker::{ScheduledSwitch, SpeakerRoutingPolicy};
