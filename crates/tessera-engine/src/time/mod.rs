//! Frame timing.
//!
//! One [`FrameClock`] per host loop; call `tick()` once per frame and pass the
//! resulting [`FrameTime`] to the UI's update pass.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
