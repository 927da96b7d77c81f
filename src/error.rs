//! Render pipeline error types

use thiserror::Error;

/// Errors that can surface from a render pass.
///
/// Any of these reaching the tick boundary is fatal for the loop: rendering
/// halts and the error is handed to the host's fatal handler exactly once.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The active effect failed during update or paint
    #[error("Effect '{name}' failed: {message}")]
    Effect { name: String, message: String },

    /// An overlay failed during update or paint
    #[error("Overlay '{name}' failed: {message}")]
    Overlay { name: String, message: String },

    /// Pushing a canvas to a device failed
    #[error("Device write failed: {0}")]
    DeviceWrite(String),

    /// The primary device reported a layout no canvas can be allocated for
    #[error("Invalid device layout: {width}x{height}")]
    InvalidLayout { width: usize, height: usize },

    /// Generic internal failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RenderError {
    /// Wrap a failure raised inside an effect.
    pub fn effect(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Effect {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Wrap a failure raised inside an overlay.
    pub fn overlay(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Overlay {
            name: name.into(),
            message: message.into(),
        }
    }
}
