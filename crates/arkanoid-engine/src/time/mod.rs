//! Time subsystem.
//!
//! One `FrameClock` per render loop; call `tick()` once per frame to read the
//! elapsed time and rebase the clock.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
