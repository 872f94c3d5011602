//! Host-facing session for the proxcall engine.
//!
//! Wraps `ProximityEngine` in a single lock, reads settings on every event,
//! and hands the resulting commands to a `CommandBus`. `CommandExecutor` is
//! the bus that talks to real platform capabilities, including the one
//! cancellable timer behind delayed speaker switches.
//!
//! # Example
//!
//! ```ignore
//! use proxcall_session::{Platform, ProximitySession};
//! use proxcall_policy::{load_default_settings, StaticSettings};
//! use std::sync::Arc;
//!
//! let settings = Arc::new(StaticSettings(load_default_settings()));
//! let session = ProximitySession::with_platform(Platform::null(), settings)?;
//!
//! session.apply(Event::CallPhaseChanged { phase: CallPhase::ActiveOffHook });
//! ```

mod error;
mod executor;
mod platform;
mod scheduler;
mod session;

pub use error::SessionError;
pub use executor::CommandExecutor;
pub use platform::{
    AudioRouter, BlankTrigger, NullPlatform, OrientationSensor, Platform, ProximitySensor,
};
pub use scheduler::RouteSwitchScheduler;
pub use session::{ProximitySession, SettingsRef};
