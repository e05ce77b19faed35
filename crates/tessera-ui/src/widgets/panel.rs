use tessera_engine::coords::Rect;
use tessera_engine::paint::{Border, Color};

use crate::painter::Painter;
use crate::widget::Widget;

/// A pure container: groups and anchors children, optionally drawing a
/// background behind them.
///
/// All properties are optional. An empty `Panel` paints nothing.
///
/// # Example
/// ```rust,ignore
/// let panel = tree.insert_root(
///     "sidebar", Vec2::new(0.0, 0.0), Vec2::new(240.0, 600.0),
///     Panel::new().background(Color::from_hex(0x1E2230)).corner_radius(6.0),
/// )?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Panel {
    background: Option<Color>,
    border: Option<Border>,
    corner_radius: f32,
}

impl Panel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn border(mut self, border: Border) -> Self {
        self.border = Some(border);
        self
    }

    pub fn corner_radius(mut self, r: f32) -> Self {
        self.corner_radius = r;
        self
    }
}

impl Widget for Panel {
    fn paint(&self, painter: &mut Painter, rect: Rect) {
        match (self.background, self.border) {
            (None, None) => {}
            (bg, border) => {
                let color = bg.unwrap_or(Color::transparent());
                painter.fill_rounded_rect(rect, self.corner_radius, color, border);
            }
        }
    }
}
