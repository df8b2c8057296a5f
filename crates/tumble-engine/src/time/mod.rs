//! Time subsystem.
//!
//! Provides stable, testable timing utilities without coupling to the runtime.
//! Intended usage:
//! - one `FrameClock` per render loop
//! - call `tick()` once per presented frame to obtain `FrameTime`
//! - feed `FrameTime::now` into the resize throttle and error banner polls

mod frame_clock;
mod throttle;

pub use frame_clock::{FrameClock, FrameTime};
pub use throttle::{ResizeThrottle, RESIZE_THROTTLE_DELAY};
