//! Scene (draw stream) types.
//!
//! Responsibilities:
//! - store renderer-agnostic draw commands
//! - provide deterministic ordering (z-index + insertion order)
//! - carry scissor rects so renderers can clip scrolled/overlay content

mod cmd;
mod list;

pub use cmd::{DrawCmd, QuadCmd, TextCmd};
pub use list::{DrawItem, DrawList, SortKey, ZIndex};
