//! Render loop and frame compositor for addressable RGB peripherals
//!
//! On a fixed cadence the [`RenderLoop`] asks the active [`Effect`] (and any
//! enabled [`Overlay`]s) to paint into the per-device-category canvases of a
//! [`Frame`], then fans the result out to every usable device provider.
//! Devices and effects are supplied by the host through the
//! [`DeviceRegistry`] and [`EffectRegistry`] traits; vendor bindings, plugin
//! loading, persistence, and UI all live on the far side of those seams.
//!
//! The loop is deliberately fail-stop: the first failure inside a render
//! pass halts rendering permanently and is surfaced to the host's
//! [`FatalHandler`] exactly once. Missing hardware or a still-initializing
//! effect is expected non-readiness and only ever skips a tick.

pub mod canvas;
pub mod color;
pub mod device;
pub mod effect;
pub mod error;
pub mod frame;
pub mod registry;
pub mod render_loop;

pub use canvas::Canvas;
pub use color::Rgb;
pub use device::{
    DeviceCategory, DeviceRegistry, PrimaryDevice, SecondaryProvider, SharedPrimary,
    SharedProvider,
};
pub use effect::{Effect, EffectRegistry, Overlay, SharedEffect, SharedOverlay};
pub use error::RenderError;
pub use frame::{Frame, PRIMARY_SCALE, SECONDARY_SIZE};
pub use registry::{StaticDeviceRegistry, StaticEffectRegistry};
pub use render_loop::{
    FatalHandler, LoopState, RenderCompleted, RenderLoop, TICK_INTERVAL,
};
