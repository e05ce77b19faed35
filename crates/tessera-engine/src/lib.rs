//! Tessera engine crate.
//!
//! Renderer- and platform-independent primitives shared by `tessera-ui` and
//! the host that drives it: geometry, paint, the draw stream a renderer
//! consumes, the input boundary, frame timing and logger setup.

pub mod coords;
pub mod input;
pub mod logging;
pub mod paint;
pub mod scene;
pub mod time;
