use tessera_engine::coords::{Rect, Vec2};
use tessera_engine::input::Key;
use tessera_engine::paint::{Border, Color};
use tessera_engine::time::FrameTime;

use crate::event::{EventCtx, EventResult, UiEvent};
use crate::painter::{Painter, approx_text_width};
use crate::signal::Signal;
use crate::widget::Widget;

/// Caret blink half-period in seconds.
const BLINK: f64 = 0.5;

/// A single-line text input field.
///
/// Click to focus, then type to edit. Backspace deletes the last character,
/// Enter raises [`submitted`](Self::submitted).
///
/// # Example
/// ```rust,ignore
/// InputField::new()
///     .text("Ash")
///     .placeholder("Trainer name")
///     .max_len(12)
///     .on_submit(move |v| done.set(Some(v.to_owned())))
/// ```
pub struct InputField {
    text: String,
    placeholder: String,
    max_len: Option<usize>,
    focused: bool,
    caret_on: bool,
    font_size: f32,
    padding: f32,
    text_color: Color,
    placeholder_color: Color,
    bg: Color,
    focused_bg: Color,
    border_color: Color,
    focused_border_color: Color,
    corner_radius: f32,
    /// Raised with the new text after every edit that changes it.
    pub changed: Signal<String>,
    /// Raised with the current text when Enter is pressed while focused.
    pub submitted: Signal<String>,
}

impl InputField {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            placeholder: String::new(),
            max_len: None,
            focused: false,
            caret_on: true,
            font_size: 14.0,
            padding: 8.0,
            text_color: Color::from_straight(0.9, 0.92, 0.95, 1.0),
            placeholder_color: Color::from_straight(0.35, 0.45, 0.55, 1.0),
            bg: Color::from_straight(0.06, 0.1, 0.16, 1.0),
            focused_bg: Color::from_straight(0.07, 0.14, 0.22, 1.0),
            border_color: Color::from_straight(0.18, 0.28, 0.42, 1.0),
            focused_border_color: Color::from_straight(0.0, 0.67, 1.0, 1.0),
            corner_radius: 4.0,
            changed: Signal::new(),
            submitted: Signal::new(),
        }
    }

    pub fn text(mut self, v: impl Into<String>) -> Self {
        self.set_text(v);
        self
    }

    pub fn placeholder(mut self, v: impl Into<String>) -> Self {
        self.placeholder = v.into();
        self
    }

    /// Maximum length in characters; extra input is dropped.
    pub fn max_len(mut self, v: usize) -> Self {
        self.max_len = Some(v);
        self.text = truncate_chars(&self.text, v);
        self
    }

    pub fn font_size(mut self, v: f32) -> Self {
        self.font_size = v;
        self
    }

    pub fn padding(mut self, v: f32) -> Self {
        self.padding = v;
        self
    }

    pub fn text_color(mut self, v: Color) -> Self {
        self.text_color = v;
        self
    }

    pub fn bg(mut self, v: Color) -> Self {
        self.bg = v;
        self
    }

    pub fn focused_border_color(mut self, v: Color) -> Self {
        self.focused_border_color = v;
        self
    }

    pub fn on_change(mut self, mut f: impl FnMut(&str) + 'static) -> Self {
        self.changed.connect(move |v: &String| f(v.as_str()));
        self
    }

    pub fn on_submit(mut self, mut f: impl FnMut(&str) + 'static) -> Self {
        self.submitted.connect(move |v: &String| f(v.as_str()));
        self
    }

    #[inline]
    pub fn value(&self) -> &str {
        &self.text
    }

    /// Replaces the text without raising `changed`.
    pub fn set_text(&mut self, v: impl Into<String>) {
        let v = v.into();
        self.text = match self.max_len {
            Some(n) => truncate_chars(&v, n),
            None => v,
        };
    }

    #[inline]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    fn insert(&mut self, input: &str) -> bool {
        let before = self.text.len();
        for ch in input.chars().filter(|c| !c.is_control()) {
            if self.max_len.is_some_and(|n| self.text.chars().count() >= n) {
                break;
            }
            self.text.push(ch);
        }
        self.text.len() != before
    }
}

impl Default for InputField {
    fn default() -> Self {
        Self::new()
    }
}

fn truncate_chars(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

impl Widget for InputField {
    fn paint(&self, painter: &mut Painter, rect: Rect) {
        let bg = if self.focused { self.focused_bg } else { self.bg };
        let border_color = if self.focused { self.focused_border_color } else { self.border_color };
        let border_width = if self.focused { 2.0 } else { 1.0 };
        painter.fill_rounded_rect(rect, self.corner_radius, bg, Some(Border::new(border_width, border_color)));

        if self.text.is_empty() && !self.placeholder.is_empty() {
            painter.text_in(self.placeholder.as_str(), self.font_size, self.placeholder_color, rect, self.padding);
        } else {
            painter.text_in(self.text.as_str(), self.font_size, self.text_color, rect, self.padding);
        }

        // Caret: a thin bar after the last character.
        if self.focused && self.caret_on {
            let inner_right = rect.origin.x + rect.size.x - self.padding;
            let x = (rect.origin.x + self.padding + approx_text_width(&self.text, self.font_size) + 1.0)
                .min(inner_right - 2.0);
            let caret = Rect::from_origin_size(
                Vec2::new(x, rect.origin.y + self.padding * 0.5),
                Vec2::new(2.0, (rect.size.y - self.padding).max(0.0)),
            );
            painter.fill_rounded_rect(caret, 1.0, self.focused_border_color, None);
        }
    }

    fn on_event(&mut self, event: &UiEvent, rect: Rect, ctx: &mut EventCtx<'_>) -> EventResult {
        match event {
            UiEvent::Click { pos } if rect.contains(*pos) => {
                ctx.request_focus();
                EventResult::Consumed
            }
            UiEvent::TextInput { text } if self.focused => {
                if self.insert(text) {
                    self.changed.emit(&self.text);
                }
                EventResult::Consumed
            }
            UiEvent::KeyPress { key } if self.focused => match key {
                Key::Backspace => {
                    if self.text.pop().is_some() {
                        self.changed.emit(&self.text);
                    }
                    EventResult::Consumed
                }
                Key::Enter => {
                    self.submitted.emit(&self.text);
                    EventResult::Consumed
                }
                _ => EventResult::Ignored,
            },
            _ => EventResult::Ignored,
        }
    }

    fn update(&mut self, time: &FrameTime) {
        self.caret_on = (time.elapsed / BLINK) as u64 % 2 == 0;
    }

    fn focusable(&self) -> bool {
        true
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}
