//! Input boundary.
//!
//! Raw polling lives in the host's platform layer. It translates window-system
//! events into [`InputEvent`]s and feeds them to [`InputState::apply_event`],
//! which tracks held state and records per-frame edges into an [`InputFrame`].

mod frame;
mod state;
mod types;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{
    ButtonState,
    InputEvent,
    Key,
    Modifiers,
    MouseButton,
};
