//! Per-pass compositing frame
//!
//! A `Frame` bundles the five canvases one render pass paints into and
//! flushes from. It is constructed fresh at the start of a pass and dropped
//! at the end; canvases are never reused across ticks. Release is `Drop`,
//! so it happens on every exit path, including an `Err` mid-paint.

use crate::canvas::Canvas;
use crate::device::{DeviceCategory, PrimaryDevice};
use crate::error::RenderError;

/// Magnification applied to the primary device's native layout when sizing
/// its canvas.
pub const PRIMARY_SCALE: usize = 4;

/// Edge length of the fixed-size secondary canvases.
pub const SECONDARY_SIZE: usize = 40;

/// An owned bundle of drawing surfaces, one per device category.
///
/// Every canvas is cleared to [`Canvas::BACKGROUND`] on allocation; no canvas
/// is ever handed to a painter uncleared.
#[derive(Debug)]
pub struct Frame {
    pub primary: Canvas,
    pub mouse: Canvas,
    pub headset: Canvas,
    pub generic: Canvas,
    pub mousemat: Canvas,
}

impl Frame {
    /// Build a frame for the given primary device, or the null-object frame
    /// when no device is claimed.
    ///
    /// Fails if the device reports a zero-area native layout.
    pub fn new(primary: Option<&dyn PrimaryDevice>) -> Result<Self, RenderError> {
        match primary {
            Some(device) => Self::for_device(device),
            None => Ok(Self::empty()),
        }
    }

    /// Build a frame sized for `device`: the primary canvas is the native
    /// layout scaled by [`PRIMARY_SCALE`], secondaries are the fixed
    /// [`SECONDARY_SIZE`] square.
    pub fn for_device(device: &dyn PrimaryDevice) -> Result<Self, RenderError> {
        let (width, height) = device.native_size();
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidLayout { width, height });
        }
        Ok(Self {
            primary: Canvas::new(width * PRIMARY_SCALE, height * PRIMARY_SCALE),
            mouse: Canvas::new(SECONDARY_SIZE, SECONDARY_SIZE),
            headset: Canvas::new(SECONDARY_SIZE, SECONDARY_SIZE),
            generic: Canvas::new(SECONDARY_SIZE, SECONDARY_SIZE),
            mousemat: Canvas::new(SECONDARY_SIZE, SECONDARY_SIZE),
        })
    }

    /// The null-object frame: no device, all canvases empty.
    pub fn empty() -> Self {
        Self {
            primary: Canvas::empty(),
            mouse: Canvas::empty(),
            headset: Canvas::empty(),
            generic: Canvas::empty(),
            mousemat: Canvas::empty(),
        }
    }

    /// True when this is the null-object frame.
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty()
    }

    /// The canvas for one category.
    pub fn canvas(&self, category: DeviceCategory) -> &Canvas {
        match category {
            DeviceCategory::Primary => &self.primary,
            DeviceCategory::Mouse => &self.mouse,
            DeviceCategory::Headset => &self.headset,
            DeviceCategory::Generic => &self.generic,
            DeviceCategory::Mousemat => &self.mousemat,
        }
    }

    /// Mutable canvas for one category; overlays may paint any of them.
    pub fn canvas_mut(&mut self, category: DeviceCategory) -> &mut Canvas {
        match category {
            DeviceCategory::Primary => &mut self.primary,
            DeviceCategory::Mouse => &mut self.mouse,
            DeviceCategory::Headset => &mut self.headset,
            DeviceCategory::Generic => &mut self.generic,
            DeviceCategory::Mousemat => &mut self.mousemat,
        }
    }
}
