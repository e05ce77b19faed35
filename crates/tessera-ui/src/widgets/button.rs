use tessera_engine::coords::Rect;
use tessera_engine::paint::{Border, Color};

use crate::event::{EventCtx, EventResult, UiEvent};
use crate::painter::Painter;
use crate::signal::Signal;
use crate::widget::Widget;

/// A clickable text button.
///
/// Visual state (hover, press) is read from `Painter` during `paint`, so the
/// button keeps no pointer state of its own.
///
/// # Example
/// ```rust,ignore
/// Button::new("OK")
///     .background(Color::from_hex(0x2D6CDF))
///     .hover_background(Color::from_hex(0x3B7BEF))
///     .on_click(move || confirm.set(true))
/// ```
pub struct Button {
    label: String,
    font_size: f32,
    text_color: Color,
    background: Color,
    hover_background: Color,
    press_background: Color,
    border: Option<Border>,
    corner_radius: f32,
    enabled: bool,
    /// Raised once per click on an enabled button.
    pub clicked: Signal<()>,
}

impl Button {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            font_size: 14.0,
            text_color: Color::white(),
            background: Color::from_straight(0.18, 0.22, 0.3, 1.0),
            hover_background: Color::from_straight(0.24, 0.3, 0.4, 1.0),
            press_background: Color::from_straight(0.12, 0.16, 0.22, 1.0),
            border: None,
            corner_radius: 4.0,
            enabled: true,
            clicked: Signal::new(),
        }
    }

    /// Connects `f` to [`clicked`](Self::clicked).
    pub fn on_click(mut self, mut f: impl FnMut() + 'static) -> Self {
        self.clicked.connect(move |_| f());
        self
    }

    pub fn font_size(mut self, v: f32) -> Self {
        self.font_size = v;
        self
    }

    pub fn text_color(mut self, v: Color) -> Self {
        self.text_color = v;
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Background color when the cursor is over the button.
    pub fn hover_background(mut self, color: Color) -> Self {
        self.hover_background = color;
        self
    }

    /// Background color while the primary button is held.
    pub fn press_background(mut self, color: Color) -> Self {
        self.press_background = color;
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

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabled buttons draw dimmed and swallow clicks without raising `clicked`.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

impl Widget for Button {
    fn paint(&self, painter: &mut Painter, rect: Rect) {
        let bg = if !self.enabled {
            self.background.with_alpha(0.4)
        } else if painter.is_pressed(rect) {
            self.press_background
        } else if painter.is_hovered(rect) {
            self.hover_background
        } else {
            self.background
        };
        let fg = if self.enabled { self.text_color } else { self.text_color.with_alpha(0.4) };

        painter.fill_rounded_rect(rect, self.corner_radius, bg, self.border);
        painter.text_centered(&self.label, self.font_size, fg, rect);
    }

    fn on_event(&mut self, event: &UiEvent, rect: Rect, _ctx: &mut EventCtx<'_>) -> EventResult {
        if let UiEvent::Click { pos } = event {
            if rect.contains(*pos) {
                if self.enabled {
                    self.clicked.emit(&());
                }
                return EventResult::Consumed;
            }
        }
        EventResult::Ignored
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use tessera_engine::coords::{Vec2, Viewport};

    use super::*;
    use crate::event::UiInput;
    use crate::tree::WidgetTree;

    fn tree_with_button(button: Button) -> WidgetTree {
        let mut tree = WidgetTree::new();
        tree.insert_root("ok", Vec2::new(10.0, 10.0), Vec2::new(80.0, 30.0), button).unwrap();
        tree
    }

    #[test]
    fn click_inside_raises_once() {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let mut tree = tree_with_button(Button::new("OK").on_click(move || c.set(c.get() + 1)));
        let vp = Viewport::new(200.0, 200.0);

        tree.handle_input(&UiInput::click(Vec2::new(20.0, 20.0)), vp);
        assert_eq!(count.get(), 1);

        let left = tree.handle_input(&UiInput::click(Vec2::new(150.0, 150.0)), vp);
        assert_eq!(count.get(), 1);
        assert_eq!(left.len(), 1);
    }

    #[test]
    fn disabled_button_swallows_click() {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let mut tree = tree_with_button(Button::new("OK").on_click(move || c.set(c.get() + 1)));
        let id = tree.find_path("ok").unwrap();
        tree.widget_mut::<Button>(id).unwrap().set_enabled(false);

        let left = tree.handle_input(&UiInput::click(Vec2::new(20.0, 20.0)), Viewport::new(200.0, 200.0));
        assert!(left.is_empty());
        assert_eq!(count.get(), 0);
    }
}
