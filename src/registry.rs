//! In-memory device and effect registries
//!
//! Concrete `DeviceRegistry` / `EffectRegistry` implementations for hosts
//! that assemble the pipeline directly (and for tests). Both use interior
//! mutability so the host can hot-swap devices and effects while the loop is
//! observing them.

use std::time::Duration;

use parking_lot::{Condvar, Mutex};

use crate::device::{DeviceCategory, DeviceRegistry, SharedPrimary, SharedProvider};
use crate::effect::{EffectRegistry, SharedEffect, SharedOverlay};

#[derive(Default)]
struct DeviceState {
    active: Option<SharedPrimary>,
    last: Option<SharedPrimary>,
    providers: Vec<(DeviceCategory, SharedProvider)>,
}

/// In-memory device registry with hot-swap support.
///
/// A switch is bracketed by [`begin_switch`](Self::begin_switch) /
/// [`finish_switch`](Self::finish_switch); waiters block on a condvar instead
/// of polling.
#[derive(Default)]
pub struct StaticDeviceRegistry {
    state: Mutex<DeviceState>,
    switching: Mutex<bool>,
    switch_done: Condvar,
}

impl StaticDeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `device` as the active primary; it also becomes the last-known
    /// device for later re-enable.
    pub fn set_primary(&self, device: SharedPrimary) {
        let mut state = self.state.lock();
        state.last = Some(device.clone());
        state.active = Some(device);
    }

    /// Drop the active claim and forget the last-known device.
    pub fn clear_primary(&self) {
        let mut state = self.state.lock();
        state.active = None;
        state.last = None;
    }

    /// Register a secondary provider for `category`.
    pub fn add_provider(&self, category: DeviceCategory, provider: SharedProvider) {
        self.state.lock().providers.push((category, provider));
    }

    /// Mark a device switch as in progress. Render passes skip and `start`
    /// blocks until [`finish_switch`](Self::finish_switch).
    pub fn begin_switch(&self) {
        *self.switching.lock() = true;
    }

    /// Complete a device switch, optionally installing a new primary device,
    /// and wake everyone blocked in `wait_switch_complete`.
    pub fn finish_switch(&self, new_primary: Option<SharedPrimary>) {
        if let Some(device) = new_primary {
            self.set_primary(device);
        }
        *self.switching.lock() = false;
        self.switch_done.notify_all();
    }
}

impl DeviceRegistry for StaticDeviceRegistry {
    fn primary(&self) -> Option<SharedPrimary> {
        self.state.lock().active.clone()
    }

    fn switch_in_progress(&self) -> bool {
        *self.switching.lock()
    }

    fn enable_last_primary(&self) {
        let mut state = self.state.lock();
        if state.active.is_none() {
            state.active = state.last.clone();
        }
    }

    fn release_primary(&self) {
        // The last-known device is retained so a later start() can re-claim it.
        self.state.lock().active = None;
    }

    fn providers(&self, category: DeviceCategory) -> Vec<SharedProvider> {
        self.state
            .lock()
            .providers
            .iter()
            .filter(|(c, _)| *c == category)
            .map(|(_, p)| p.clone())
            .collect()
    }

    fn wait_switch_complete(&self, timeout: Duration) -> bool {
        let mut switching = self.switching.lock();
        if *switching {
            self.switch_done
                .wait_while_for(&mut switching, |s| *s, timeout);
        }
        !*switching
    }
}

#[derive(Default)]
struct EffectState {
    active: Option<SharedEffect>,
    last: Option<SharedEffect>,
    overlays: Vec<SharedOverlay>,
}

/// In-memory effect registry with last-used tracking.
#[derive(Default)]
pub struct StaticEffectRegistry {
    state: Mutex<EffectState>,
}

impl StaticEffectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deactivate the current effect; the last-used effect is retained so the
    /// loop's resume path can bring it back.
    pub fn clear_active(&self) {
        self.state.lock().active = None;
    }

    /// Enable an overlay. Overlays paint in registration order.
    pub fn add_overlay(&self, overlay: SharedOverlay) {
        self.state.lock().overlays.push(overlay);
    }
}

impl EffectRegistry for StaticEffectRegistry {
    fn active_effect(&self) -> Option<SharedEffect> {
        self.state.lock().active.clone()
    }

    fn set_active_effect(&self, effect: SharedEffect) {
        let mut state = self.state.lock();
        state.last = Some(effect.clone());
        state.active = Some(effect);
    }

    fn last_effect(&self) -> Option<SharedEffect> {
        self.state.lock().last.clone()
    }

    fn enabled_overlays(&self) -> Vec<SharedOverlay> {
        self.state.lock().overlays.clone()
    }
}
