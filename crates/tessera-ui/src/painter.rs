use tessera_engine::coords::{Rect, Vec2, Viewport};
use tessera_engine::paint::{Border, Color};
use tessera_engine::scene::{DrawList, ZIndex};

/// Average glyph advance as a fraction of the font size.
///
/// Glyph layout belongs to the renderer; widgets only need a stable estimate
/// for caret placement and centering.
const APPROX_ADVANCE: f32 = 0.55;

/// Estimated width of `text` at `size` logical pixels.
#[inline]
pub fn approx_text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * APPROX_ADVANCE
}

/// Drawing surface passed to [`Widget::paint`](crate::widget::Widget::paint).
///
/// Wraps the engine's `DrawList` and exposes per-frame pointer state so
/// widgets can express hover / pressed visuals directly while painting.
pub struct Painter<'a> {
    draw_list: &'a mut DrawList,
    viewport: Viewport,
    z: i32,
    /// Current mouse position in logical pixels.
    pub mouse_pos: Vec2,
    /// True while the primary button is held down.
    pub mouse_pressed: bool,
}

impl<'a> Painter<'a> {
    pub fn new(draw_list: &'a mut DrawList, viewport: Viewport, mouse_pos: Vec2, mouse_pressed: bool) -> Self {
        Self { draw_list, viewport, z: 0, mouse_pos, mouse_pressed }
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    // ── input queries ─────────────────────────────────────────────────────

    #[inline]
    pub fn is_hovered(&self, rect: Rect) -> bool {
        rect.contains(self.mouse_pos)
    }

    #[inline]
    pub fn is_pressed(&self, rect: Rect) -> bool {
        self.mouse_pressed && rect.contains(self.mouse_pos)
    }

    // ── drawing ───────────────────────────────────────────────────────────

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let z = self.next_z();
        self.draw_list.push_quad(z, rect, color, 0.0, None);
    }

    /// Pass `radius = 0.0` for sharp corners and `border = None` for no stroke.
    pub fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color, border: Option<Border>) {
        let z = self.next_z();
        self.draw_list.push_quad(z, rect, color, radius, border);
    }

    /// Text at `origin` (top-left), clipped to `max_width`.
    pub fn text(
        &mut self,
        text: impl Into<String>,
        size: f32,
        color: Color,
        origin: Vec2,
        max_width: Option<f32>,
    ) {
        let z = self.next_z();
        self.draw_list.push_text(z, text, size, color, origin, max_width);
    }

    /// Single line of text vertically centered in `rect`, starting `pad` from the left.
    pub fn text_in(&mut self, text: impl Into<String>, size: f32, color: Color, rect: Rect, pad: f32) {
        let origin = Vec2::new(rect.origin.x + pad, rect.origin.y + (rect.size.y - size) * 0.5);
        let max_w = (rect.size.x - pad * 2.0).max(0.0);
        self.text(text, size, color, origin, Some(max_w));
    }

    /// Single line of text centered on both axes of `rect`.
    pub fn text_centered(&mut self, text: &str, size: f32, color: Color, rect: Rect) {
        let w = approx_text_width(text, size).min(rect.size.x);
        let origin = Vec2::new(
            rect.origin.x + (rect.size.x - w) * 0.5,
            rect.origin.y + (rect.size.y - size) * 0.5,
        );
        self.text(text, size, color, origin, Some(rect.size.x));
    }

    // ── clipping ──────────────────────────────────────────────────────────

    pub fn push_clip(&mut self, rect: Rect) {
        self.draw_list.push_clip(rect);
    }

    pub fn pop_clip(&mut self) {
        self.draw_list.pop_clip();
    }

    #[inline]
    fn next_z(&mut self) -> ZIndex {
        let z = ZIndex(self.z);
        self.z += 1;
        z
    }
}
