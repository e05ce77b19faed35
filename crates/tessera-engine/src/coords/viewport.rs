use super::{Rect, Vec2};

/// Viewport size in logical pixels.
///
/// The UI layer uses it to center popups and to decide whether an expanded
/// dropdown list fits below its control.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    #[inline]
    pub fn size(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// The full screen rect with its origin at the top-left corner.
    #[inline]
    pub fn rect(self) -> Rect {
        Rect::from_origin_size(Vec2::zero(), self.size())
    }
}
