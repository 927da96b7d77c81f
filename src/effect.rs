//! Effect-side interface boundary
//!
//! Effects and overlays are plugin-provided painters. The loop only cares
//! about a small capability surface: readiness, per-tick update, and paint.
//! What an effect actually renders is out of scope here.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::canvas::Canvas;
use crate::error::RenderError;
use crate::frame::Frame;

/// The base painter for a render pass.
///
/// `update` and `paint` are only invoked once `initialized` returns true;
/// until then ticks are skipped without error. Both are called with the
/// primary device lock held, so an effect never observes its own
/// intermediate state from a racing pass.
pub trait Effect: Send {
    fn name(&self) -> &str;

    /// Whether the effect has finished initializing and may be painted.
    fn initialized(&self) -> bool;

    /// Advance internal state for this tick.
    fn update(&mut self) -> Result<(), RenderError>;

    /// Paint the base layer onto the primary canvas. `primary_only` is true
    /// when no usable secondary device exists; effects may render differently
    /// when the primary device is the only output.
    fn paint(&mut self, canvas: &mut Canvas, primary_only: bool) -> Result<(), RenderError>;
}

/// Shared handle to an effect. The mutex makes in-place `update` mutation
/// safe to share between the loop and the host.
pub type SharedEffect = Arc<Mutex<dyn Effect>>;

/// A renderer composited on top of the base effect within the same pass.
///
/// Overlays are updated and painted after the base effect, in registration
/// order, and may draw onto any canvas of the frame.
pub trait Overlay: Send {
    fn name(&self) -> &str;

    /// Advance internal state for this tick.
    fn update(&mut self) -> Result<(), RenderError>;

    /// Paint on top of the base effect's output.
    fn paint_overlay(&mut self, frame: &mut Frame, primary_only: bool) -> Result<(), RenderError>;
}

/// Shared handle to an overlay.
pub type SharedOverlay = Arc<Mutex<dyn Overlay>>;

/// The effect registry collaborator.
pub trait EffectRegistry: Send + Sync {
    /// The currently active effect, if any.
    fn active_effect(&self) -> Option<SharedEffect>;

    /// Make `effect` the active effect (and the new last-used effect).
    fn set_active_effect(&self, effect: SharedEffect);

    /// The last-used effect, for the loop's resume path.
    fn last_effect(&self) -> Option<SharedEffect>;

    /// Currently enabled overlays, in registration order. The order must be
    /// stable between ticks while the enabled set is unchanged.
    fn enabled_overlays(&self) -> Vec<SharedOverlay>;
}
