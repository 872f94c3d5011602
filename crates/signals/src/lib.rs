//! Signal model for in-call proximity handling.
//!
//! This crate holds every input the proximity decision engine looks at:
//! - Call phase (idle, ringing, dialing, connected)
//! - Audio route (earpiece, speaker, bluetooth, wired headset)
//! - Device orientation, display power and in-call UI visibility
//! - Dialpad and video call flags
//! - The last classified proximity reading
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Domain Layer                             │
//! │  types.rs - Signal value types and proximity classification │
//! │  store.rs - SignalStore, Signal, SignalSnapshot             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  proxcall-policy                             │
//! │  Pure policies evaluated against a SignalSnapshot           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use proxcall_signals::{CallPhase, Signal, SignalStore};
//!
//! let mut store = SignalStore::new();
//! assert!(store.set(Signal::Phase(CallPhase::ActiveOffHook)));
//! assert!(!store.set(Signal::Phase(CallPhase::ActiveOffHook)));
//! assert!(store.snapshot().is_off_hook());
//! ```

mod store;
mod types;

pub use store::{Signal, SignalSnapshot, SignalStore};
pub use types::{
    AudioRoute, CallPhase, Orientation, ProximityReading, UiVisibility, VideoCallState,
};
