//! Capability traits for the host platform.
//!
//! These abstract the hardware and telephony calls the engine's commands
//! turn into, so the session can run against real adapters or test doubles.
//!
//! Every capability is invoked while the session lock is held. Adapters that
//! report state changes back (e.g. the new audio route) must do so
//! asynchronously, never from inside the call.

use std::sync::Arc;

use proxcall_signals::AudioRoute;

/// The proximity screen-off mechanism (a wake lock on most platforms).
pub trait BlankTrigger: Send + Sync {
    fn acquire(&self);

    /// Release the trigger. With `immediate = false` the screen stays off
    /// until the sensor reports far.
    fn release(&self, immediate: bool);
}

/// Accelerometer-based orientation listener.
pub trait OrientationSensor: Send + Sync {
    fn set_enabled(&self, enabled: bool);
}

/// Proximity sensor listener registration.
pub trait ProximitySensor: Send + Sync {
    fn set_enabled(&self, enabled: bool);
}

/// Telephony audio routing.
///
/// Scheduled switches call `set_route` from a timer task while holding the
/// scheduler's slot lock, and commands call it while the session lock is
/// held. An adapter must not feed the resulting route change back through
/// `ProximitySession::apply` from inside `set_route`: that takes the two
/// locks in the opposite order and can deadlock. Post it instead, e.g. over
/// a channel drained by another task.
pub trait AudioRouter: Send + Sync {
    fn set_route(&self, route: AudioRoute);
}

/// All capabilities a session needs.
#[derive(Clone)]
pub struct Platform {
    pub blank: Arc<dyn BlankTrigger>,
    pub orientation: Arc<dyn OrientationSensor>,
    pub proximity: Arc<dyn ProximitySensor>,
    pub router: Arc<dyn AudioRouter>,
}

impl Platform {
    /// Use one object for every capability.
    pub fn from_shared<P>(platform: Arc<P>) -> Self
    where
        P: BlankTrigger + OrientationSensor + ProximitySensor + AudioRouter + 'static,
    {
        Self {
            blank: platform.clone(),
            orientation: platform.clone(),
            proximity: platform.clone(),
            router: platform,
        }
    }

    /// A platform where every call is a no-op.
    pub fn null() -> Self {
        Self::from_shared(Arc::new(NullPlatform))
    }
}

/// Null implementation for testing or devices without a proximity sensor.
pub struct NullPlatform;

impl BlankTrigger for NullPlatform {
    fn acquire(&self) {}

    fn release(&self, _immediate: bool) {}
}

impl OrientationSensor for NullPlatform {
    fn set_enabled(&self, _enabled: bool) {}
}

impl ProximitySensor for NullPlatform {
    fn set_enabled(&self, _enabled: bool) {}
}

impl AudioRouter for NullPlatform {
    fn set_route(&self, _route: AudioRoute) {}
}
