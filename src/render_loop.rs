//! The render loop — scheduler, state machine, and failure boundary
//!
//! One timer thread drives a render pass every tick: query the registries,
//! allocate a [`Frame`], let the active effect and the enabled overlays
//! paint, fan the canvases out to every usable device, emit a completion
//! notification. The first failure anywhere in a pass is fatal: the timer is
//! halted permanently and the error is handed to the host's
//! [`FatalHandler`] exactly once.
//!
//! ```text
//! [RenderLoop timer thread]
//!        | every tick
//! [render pass] ── query ──> [DeviceRegistry] / [EffectRegistry]
//!        |
//! [Frame: effect paints, overlays paint on top]
//!        |
//! [primary draw + secondary provider flushes] ──> RenderCompleted
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::{Condvar, Mutex};
use tracing::{debug, error, info};

use crate::device::{DeviceCategory, DeviceRegistry, SharedProvider};
use crate::effect::EffectRegistry;
use crate::error::RenderError;
use crate::frame::Frame;

/// Default tick interval (25 Hz).
pub const TICK_INTERVAL: Duration = Duration::from_millis(40);

/// How long `start()` waits for an in-progress device switch to settle.
const SWITCH_WAIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Loop state. Transitions only through `start()` / `stop()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
}

/// Emitted once per pass that finished without failing, including no-op
/// passes (effect still initializing). Not emitted while the loop is stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderCompleted;

/// Receives the one fatal error a loop instance can raise.
///
/// Called at most once per loop; the host decides how to present the failure
/// and whether to build a fresh loop afterwards. Rendering is never retried
/// automatically.
pub trait FatalHandler: Send + Sync {
    fn render_failed(&self, error: RenderError);
}

/// Drives rendering at a fixed cadence.
///
/// The timer thread is spawned on construction and ticks regardless of loop
/// state; a tick while `Stopped` is a silent no-op. `start`, `stop`,
/// `running` and `subscribe_completed` are safe to call from any thread
/// while a tick is in flight.
pub struct RenderLoop {
    inner: Arc<LoopInner>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

struct LoopInner {
    devices: Arc<dyn DeviceRegistry>,
    effects: Arc<dyn EffectRegistry>,
    fatal: Arc<dyn FatalHandler>,
    interval: Duration,
    /// Guards state transitions and serializes render passes: a tick that
    /// collides with an in-flight pass or a start/stop transition is skipped.
    state: Mutex<LoopState>,
    halted: Mutex<bool>,
    halt_signal: Condvar,
    /// One-shot latch: only the first render failure reaches the handler.
    can_report_fatal: AtomicBool,
    completions: Mutex<Vec<Sender<RenderCompleted>>>,
}

impl RenderLoop {
    /// Build a loop ticking at [`TICK_INTERVAL`] and arm its timer.
    pub fn new(
        devices: Arc<dyn DeviceRegistry>,
        effects: Arc<dyn EffectRegistry>,
        fatal: Arc<dyn FatalHandler>,
    ) -> Self {
        Self::with_interval(devices, effects, fatal, TICK_INTERVAL)
    }

    /// Build a loop with a custom tick interval.
    pub fn with_interval(
        devices: Arc<dyn DeviceRegistry>,
        effects: Arc<dyn EffectRegistry>,
        fatal: Arc<dyn FatalHandler>,
        interval: Duration,
    ) -> Self {
        let inner = Arc::new(LoopInner {
            devices,
            effects,
            fatal,
            interval,
            state: Mutex::new(LoopState::Stopped),
            halted: Mutex::new(false),
            halt_signal: Condvar::new(),
            can_report_fatal: AtomicBool::new(true),
            completions: Mutex::new(Vec::new()),
        });

        let timer = {
            let inner = Arc::clone(&inner);
            thread::spawn(move || LoopInner::timer_main(inner))
        };
        info!(interval_ms = interval.as_millis() as u64, "render loop timer armed");

        Self {
            inner,
            timer: Mutex::new(Some(timer)),
        }
    }

    /// Begin rendering. Idempotent while running.
    ///
    /// Blocks while a device switch is in progress (bounded). Aborts
    /// silently when no primary device or effect can be resolved — expected
    /// when no hardware is present, not an error. Once the timer has been
    /// halted (fatal failure or [`shutdown`](Self::shutdown)) start refuses;
    /// recovery takes a fresh loop instance.
    pub fn start(&self) {
        self.inner.start();
    }

    /// Stop rendering and release the primary device claim. Idempotent while
    /// stopped. Does not cancel a pass already underway.
    pub fn stop(&self) {
        self.inner.stop();
    }

    /// Whether the loop is currently running.
    pub fn running(&self) -> bool {
        *self.inner.state.lock() == LoopState::Running
    }

    /// Subscribe to completion notifications, one per non-failing pass.
    pub fn subscribe_completed(&self) -> Receiver<RenderCompleted> {
        let (tx, rx) = unbounded();
        self.inner.completions.lock().push(tx);
        rx
    }

    /// Halt the timer and join its thread. Also run by `Drop`.
    pub fn shutdown(&self) {
        self.inner.halt();
        if let Some(handle) = self.timer.lock().take() {
            let _ = handle.join();
        }
    }
}

impl Drop for RenderLoop {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl LoopInner {
    fn timer_main(inner: Arc<LoopInner>) {
        let mut halted = inner.halted.lock();
        loop {
            if *halted {
                return;
            }
            // The wait is re-armed only after the previous pass returned, so
            // a slow pass delays the next tick instead of overlapping it.
            let wait = inner.halt_signal.wait_for(&mut halted, inner.interval);
            if *halted {
                return;
            }
            if !wait.timed_out() {
                continue;
            }
            drop(halted);
            inner.tick();
            halted = inner.halted.lock();
        }
    }

    fn tick(&self) {
        if let Err(err) = self.render_pass() {
            // First failure wins; a storm of follow-up failures stays quiet.
            if self.can_report_fatal.swap(false, Ordering::SeqCst) {
                error!(error = %err, "render pass failed, halting render loop");
                self.halt();
                *self.state.lock() = LoopState::Stopped;
                self.devices.release_primary();
                self.fatal.render_failed(err);
            }
        }
    }

    fn start(&self) {
        let mut state = self.state.lock();
        if *state == LoopState::Running {
            return;
        }
        // A halted timer never ticks again; claiming to run would be a lie.
        // Hosts recover from a fatal failure by building a fresh loop.
        if *self.halted.lock() {
            debug!("canceling start, timer halted");
            return;
        }
        debug!("starting render loop");

        if self.devices.primary().is_none() {
            self.devices.enable_last_primary();
        }
        if !self.devices.wait_switch_complete(SWITCH_WAIT_TIMEOUT) {
            debug!("canceling start, device switch still in progress");
            return;
        }
        if self.devices.primary().is_none() {
            debug!("canceling start, no primary device");
            return;
        }

        if self.effects.active_effect().is_none() {
            match self.effects.last_effect() {
                Some(last) => self.effects.set_active_effect(last),
                None => {
                    debug!("canceling start, no effect");
                    return;
                }
            }
        }

        *state = LoopState::Running;
        debug!("render loop running");
    }

    fn stop(&self) {
        let mut state = self.state.lock();
        if *state == LoopState::Stopped {
            return;
        }
        debug!("stopping render loop");
        self.stop_locked(&mut state);
    }

    fn stop_locked(&self, state: &mut LoopState) {
        *state = LoopState::Stopped;
        self.devices.release_primary();
    }

    /// One full query-paint-flush sequence. Every expected-non-readiness
    /// condition returns `Ok`; only genuine failures propagate to the tick
    /// boundary.
    fn render_pass(&self) -> Result<(), RenderError> {
        let Some(mut state) = self.state.try_lock() else {
            // A pass or a control transition is still in flight.
            return Ok(());
        };
        if *state != LoopState::Running || self.devices.switch_in_progress() {
            return Ok(());
        }

        let Some(active) = self.effects.active_effect() else {
            debug!("no active effect, stopping");
            self.stop_locked(&mut state);
            return Ok(());
        };
        let Some(primary) = self.devices.primary() else {
            debug!("no primary device, stopping");
            self.stop_locked(&mut state);
            return Ok(());
        };

        // Exclusive access to the primary device for the remainder of the
        // pass: serializes against racing passes and against out-of-band
        // mutation of the device.
        let mut device = primary.lock();
        let mut effect = active.lock();

        // Still initializing: skip the tick, not an error.
        if !effect.initialized() {
            drop(effect);
            drop(device);
            self.emit_completed();
            return Ok(());
        }

        effect.update()?;

        let mut flush_targets: Vec<(DeviceCategory, Vec<SharedProvider>)> = Vec::with_capacity(4);
        for category in DeviceCategory::SECONDARY {
            let usable: Vec<SharedProvider> = self
                .devices
                .providers(category)
                .into_iter()
                .filter(|p| p.can_use())
                .collect();
            flush_targets.push((category, usable));
        }
        let primary_only = flush_targets.iter().all(|(_, providers)| providers.is_empty());

        let mut frame = Frame::for_device(&*device)?;
        effect.paint(&mut frame.primary, primary_only)?;

        // Overlays sit visually above the base effect: registration order,
        // strictly after the effect painted.
        for overlay in self.effects.enabled_overlays() {
            let mut overlay = overlay.lock();
            overlay.update()?;
            overlay.paint_overlay(&mut frame, primary_only)?;
        }

        device.draw(&frame.primary)?;
        for (category, providers) in &flush_targets {
            let canvas = frame.canvas(*category);
            for provider in providers {
                provider.update_device(canvas)?;
            }
        }

        drop(frame);
        self.emit_completed();
        Ok(())
    }

    fn emit_completed(&self) {
        let mut senders = self.completions.lock();
        senders.retain(|tx| tx.send(RenderCompleted).is_ok());
    }

    fn halt(&self) {
        *self.halted.lock() = true;
        self.halt_signal.notify_all();
    }
}
