//! Paint model shared between the UI and renderers.
//!
//! Widgets only carry per-instance colors and borders; there is no theme layer.

mod color;

pub use color::Color;

/// Stroke drawn along the inner edge of a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Border {
    pub width: f32,
    pub color: Color,
}

impl Border {
    #[inline]
    pub fn new(width: f32, color: Color) -> Self {
        Self { width, color }
    }
}
