//! Drawable pixel surface for one device category
//!
//! A `Canvas` is a fixed-size RGB buffer that painters (effects and overlays)
//! write into and device providers read out of. Canvases are always handed to
//! painters pre-cleared to [`Canvas::BACKGROUND`].

use crate::color::Rgb;

/// A single drawable surface for one device category within a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl Canvas {
    /// Background color every canvas is cleared to on allocation.
    pub const BACKGROUND: Rgb = Rgb::BLACK;

    /// Allocate a canvas cleared to [`Canvas::BACKGROUND`].
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Self::BACKGROUND; width * height],
        }
    }

    /// The zero-sized canvas used by the null-object frame.
    pub fn empty() -> Self {
        Self::new(0, 0)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Set every pixel to `color`.
    pub fn clear(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    /// Set a single pixel. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, color: Rgb) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    /// Read a single pixel. Returns `None` out of bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Fill a rectangle, clipped to the canvas bounds.
    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: Rgb) {
        let x_end = (x + w).min(self.width);
        let y_end = (y + h).min(self.height);
        for row in y..y_end {
            for col in x..x_end {
                self.pixels[row * self.width + col] = color;
            }
        }
    }

    /// Row-major pixel data (index = y * width + x).
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }
}
