use tessera_engine::coords::{Vec2, Viewport};
use tessera_engine::input::{ButtonState, InputEvent, InputFrame, InputState, Key, MouseButton};

use crate::focus::FocusManager;
use crate::tree::WidgetId;

/// Input events routed through the widget tree.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Primary mouse button released at `pos` (the click edge).
    Click { pos: Vec2 },
    /// Committed text input (one or more characters).
    TextInput { text: String },
    /// Named key pressed (Backspace, Enter, arrow keys, …).
    KeyPress { key: Key },
    /// Mouse wheel; `delta` > 0 scrolls down.
    ScrollWheel { delta: f32 },
}

impl UiEvent {
    /// Pointer events are hit-tested; keyboard events follow focus.
    #[inline]
    pub fn is_pointer(&self) -> bool {
        matches!(self, UiEvent::Click { .. } | UiEvent::ScrollWheel { .. })
    }
}

/// Result returned by [`Widget::on_event`](crate::widget::Widget::on_event).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Event was handled; stop routing.
    Consumed,
    /// Event was not handled; keep routing.
    Ignored,
}

impl EventResult {
    #[inline]
    pub fn is_consumed(self) -> bool {
        self == EventResult::Consumed
    }
}

/// Per-dispatch context handed to a widget's `on_event`.
pub struct EventCtx<'a> {
    pub viewport: Viewport,
    /// Pointer position this frame, for widgets that react to keys only while hovered.
    pub pointer: Vec2,
    pub(crate) target: WidgetId,
    pub(crate) focus: &'a mut FocusManager,
}

impl EventCtx<'_> {
    /// Ask for keyboard focus; applied once the current event finishes routing.
    #[inline]
    pub fn request_focus(&mut self) {
        self.focus.request(self.target);
    }

    #[inline]
    pub fn is_focused(&self) -> bool {
        self.focus.is_focused(self.target)
    }
}

// ── UiInput ───────────────────────────────────────────────────────────────

/// One frame of input as seen by the UI layer.
///
/// Hosts with their own platform layer fill this directly; hosts built on the
/// engine's input types use [`UiInput::from_frame`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiInput {
    pub mouse_pos: Vec2,
    /// Primary button currently held.
    pub mouse_pressed: bool,
    /// Primary button released this frame.
    pub mouse_clicked: bool,
    /// Text committed this frame.
    pub text_input: String,
    /// Key presses this frame, in arrival order.
    pub keys_pressed: Vec<Key>,
    /// Accumulated wheel delta; > 0 scrolls down.
    pub scroll_delta: f32,
}

impl UiInput {
    pub fn from_frame(state: &InputState, frame: &InputFrame) -> Self {
        let mouse_pos = match state.pointer_pos {
            Some((x, y)) => Vec2::new(x, y),
            // Off-window pointer hits nothing.
            None => Vec2::splat(f32::NEG_INFINITY),
        };
        let keys_pressed = frame
            .events
            .iter()
            .filter_map(|ev| match ev {
                InputEvent::Key { key, state: ButtonState::Pressed } => Some(*key),
                _ => None,
            })
            .collect();

        Self {
            mouse_pos,
            mouse_pressed: state.button_down(MouseButton::Left),
            mouse_clicked: frame.buttons_released.contains(&MouseButton::Left),
            text_input: frame.text.concat(),
            keys_pressed,
            scroll_delta: frame.scroll_delta,
        }
    }

    /// No pointer activity, keys or text; the pointer parked at `pos`.
    pub fn idle(pos: Vec2) -> Self {
        Self { mouse_pos: pos, ..Self::default() }
    }

    pub fn click(pos: Vec2) -> Self {
        Self { mouse_pos: pos, mouse_clicked: true, ..Self::default() }
    }

    pub fn key(key: Key) -> Self {
        Self { keys_pressed: vec![key], ..Self::default() }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self { text_input: text.into(), ..Self::default() }
    }

    /// Discrete events in dispatch order: click, text, key presses, wheel.
    pub fn events(&self) -> Vec<UiEvent> {
        let mut out = Vec::with_capacity(self.keys_pressed.len() + 3);
        if self.mouse_clicked {
            out.push(UiEvent::Click { pos: self.mouse_pos });
        }
        if !self.text_input.is_empty() {
            out.push(UiEvent::TextInput { text: self.text_input.clone() });
        }
        out.extend(self.keys_pressed.iter().map(|&key| UiEvent::KeyPress { key }));
        if self.scroll_delta != 0.0 {
            out.push(UiEvent::ScrollWheel { delta: self.scroll_delta });
        }
        out
    }
}
