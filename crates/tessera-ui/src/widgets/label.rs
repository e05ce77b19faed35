use tessera_engine::coords::Rect;
use tessera_engine::paint::Color;

use crate::painter::{Painter, approx_text_width};
use crate::widget::Widget;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
}

/// A single run of text, vertically centered in its rect.
pub struct Label {
    text: String,
    size: f32,
    color: Color,
    align: TextAlign,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            size: 14.0,
            color: Color::from_straight(0.9, 0.92, 0.95, 1.0),
            align: TextAlign::Left,
        }
    }

    pub fn size(mut self, v: f32) -> Self {
        self.size = v;
        self
    }

    pub fn color(mut self, v: Color) -> Self {
        self.color = v;
        self
    }

    pub fn align(mut self, v: TextAlign) -> Self {
        self.align = v;
        self
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Estimated width of the current text.
    pub fn text_width(&self) -> f32 {
        approx_text_width(&self.text, self.size)
    }
}

impl Widget for Label {
    fn paint(&self, painter: &mut Painter, rect: Rect) {
        if self.text.is_empty() {
            return;
        }
        match self.align {
            TextAlign::Left => painter.text_in(self.text.as_str(), self.size, self.color, rect, 0.0),
            TextAlign::Center => painter.text_centered(&self.text, self.size, self.color, rect),
        }
    }
}
