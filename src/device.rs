//! Device-side interface boundary
//!
//! The render loop never talks to hardware directly; it observes a
//! [`DeviceRegistry`] that exposes the currently claimed primary device and
//! per-category lists of secondary providers. Vendor bindings live behind
//! these traits in the surrounding application.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::canvas::Canvas;
use crate::error::RenderError;

/// Sleep between polls in the default [`DeviceRegistry::wait_switch_complete`].
const SWITCH_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Device category a canvas is composited for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceCategory {
    Primary,
    Mouse,
    Headset,
    Generic,
    Mousemat,
}

impl DeviceCategory {
    /// The non-primary categories, in flush order.
    pub const SECONDARY: [DeviceCategory; 4] = [
        DeviceCategory::Mouse,
        DeviceCategory::Headset,
        DeviceCategory::Generic,
        DeviceCategory::Mousemat,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DeviceCategory::Primary => "primary",
            DeviceCategory::Mouse => "mouse",
            DeviceCategory::Headset => "headset",
            DeviceCategory::Generic => "generic",
            DeviceCategory::Mousemat => "mousemat",
        }
    }
}

/// The main addressable device (keyboard-class) currently claimed for
/// rendering.
///
/// Held behind a mutex so a render pass can take exclusive access for its
/// whole update-paint-flush sequence; the same lock excludes out-of-band
/// mutation by the registry while a pass is in flight.
pub trait PrimaryDevice: Send {
    fn name(&self) -> &str;

    /// Native pixel layout of the device (columns, rows). The frame scales
    /// this up when sizing the primary canvas.
    fn native_size(&self) -> (usize, usize);

    /// Push the primary canvas to the hardware.
    fn draw(&mut self, canvas: &Canvas) -> Result<(), RenderError>;
}

/// Shared handle to the claimed primary device.
pub type SharedPrimary = Arc<Mutex<dyn PrimaryDevice>>;

/// A secondary device provider (mouse, headset, generic, mousemat).
pub trait SecondaryProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Whether the device is currently usable (present and enabled).
    fn can_use(&self) -> bool;

    /// Push this category's canvas to the hardware.
    fn update_device(&self, canvas: &Canvas) -> Result<(), RenderError>;
}

/// Shared handle to a secondary provider.
pub type SharedProvider = Arc<dyn SecondaryProvider>;

/// The device registry collaborator.
///
/// The loop re-queries the primary device every tick and never caches it
/// across ticks; the device may be hot-swapped between passes.
pub trait DeviceRegistry: Send + Sync {
    /// The currently claimed primary device, if any.
    fn primary(&self) -> Option<SharedPrimary>;

    /// True while a device switch is underway.
    fn switch_in_progress(&self) -> bool;

    /// Re-claim the last known primary device, if the registry remembers one.
    fn enable_last_primary(&self);

    /// Release the primary device claim.
    fn release_primary(&self);

    /// Providers for one secondary category, in registration order.
    /// `DeviceCategory::Primary` yields an empty list.
    fn providers(&self, category: DeviceCategory) -> Vec<SharedProvider>;

    /// Block until no device switch is in progress, up to `timeout`.
    ///
    /// Returns true once no switch is pending, false on timeout. The default
    /// is bounded polling with a short sleep; registries that track switches
    /// internally should override this with a condvar wait.
    fn wait_switch_complete(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.switch_in_progress() {
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(SWITCH_POLL_INTERVAL);
        }
        true
    }
}
