use crate::coords::{Rect, Vec2};
use crate::paint::{Border, Color};

/// Filled (optionally rounded, optionally bordered) rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadCmd {
    pub rect: Rect,
    pub color: Color,
    pub corner_radius: f32,
    pub border: Option<Border>,
}

/// A single run of text.
///
/// Font selection and glyph layout belong to the renderer; the UI only
/// decides size, color and placement.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCmd {
    pub text: String,
    /// Font size in logical pixels.
    pub size: f32,
    pub color: Color,
    /// Top-left of the text block in logical pixels.
    pub origin: Vec2,
    /// Clipping width in logical pixels. `None` = unbounded.
    pub max_width: Option<f32>,
}

/// Renderer-agnostic draw command stream.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Quad(QuadCmd),
    Text(TextCmd),
}
