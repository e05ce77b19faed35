use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{ButtonState, InputEvent, Key, Modifiers, MouseButton};

/// Current input state for the window.
///
/// Holds "is down" information and the pointer position; per-frame
/// transitions go to the [`InputFrame`] passed to [`apply_event`](Self::apply_event).
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,
    pub focused: bool,
    /// Pointer position in logical pixels, `None` when outside the window.
    pub pointer_pos: Option<(f32, f32)>,
    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::ModifiersChanged(m) => self.modifiers = *m,

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Avoid stuck keys/buttons when focus changes mid-press.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved { x, y } => self.pointer_pos = Some((*x, *y)),
            InputEvent::PointerLeft => self.pointer_pos = None,

            InputEvent::Key { key, state } => match state {
                ButtonState::Pressed => {
                    // Key repeat re-sends Pressed; only the first one is an edge.
                    if self.keys_down.insert(*key) {
                        frame.keys_pressed.insert(*key);
                    }
                }
                ButtonState::Released => {
                    if self.keys_down.remove(key) {
                        frame.keys_released.insert(*key);
                    }
                }
            },

            InputEvent::PointerButton { button, state } => match state {
                ButtonState::Pressed => {
                    if self.buttons_down.insert(*button) {
                        frame.buttons_pressed.insert(*button);
                    }
                }
                ButtonState::Released => {
                    if self.buttons_down.remove(button) {
                        frame.buttons_released.insert(*button);
                    }
                }
            },

            InputEvent::Wheel { delta } => frame.scroll_delta += *delta,
            InputEvent::Text(text) => frame.text.push(text.clone()),
        }

        frame.events.push(ev);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_edge_only_after_press() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, InputEvent::PointerButton {
            button: MouseButton::Left,
            state: ButtonState::Released,
        });
        assert!(frame.buttons_released.is_empty());

        state.apply_event(&mut frame, InputEvent::PointerButton {
            button: MouseButton::Left,
            state: ButtonState::Pressed,
        });
        state.apply_event(&mut frame, InputEvent::PointerButton {
            button: MouseButton::Left,
            state: ButtonState::Released,
        });
        assert!(frame.buttons_pressed.contains(&MouseButton::Left));
        assert!(frame.buttons_released.contains(&MouseButton::Left));
        assert!(!state.button_down(MouseButton::Left));
    }

    #[test]
    fn key_repeat_is_not_a_new_edge() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        let press = InputEvent::Key { key: Key::Enter, state: ButtonState::Pressed };

        state.apply_event(&mut frame, press.clone());
        frame.clear();
        state.apply_event(&mut frame, press);
        assert!(frame.keys_pressed.is_empty());
        assert!(state.key_down(Key::Enter));
    }

    #[test]
    fn focus_loss_clears_held_state() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, InputEvent::Key { key: Key::Tab, state: ButtonState::Pressed });
        state.apply_event(&mut frame, InputEvent::Focused(false));
        assert!(!state.key_down(Key::Tab));
    }

    #[test]
    fn wheel_and_text_accumulate() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, InputEvent::Wheel { delta: 1.0 });
        state.apply_event(&mut frame, InputEvent::Wheel { delta: 0.5 });
        state.apply_event(&mut frame, InputEvent::Text("A".into()));
        state.apply_event(&mut frame, InputEvent::Text("sh".into()));
        assert_eq!(frame.scroll_delta, 1.5);
        assert_eq!(frame.text, ["A", "sh"]);
        assert_eq!(frame.events.len(), 4);
    }
}
