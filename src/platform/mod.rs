//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (frame deltas and the monotonic clock)
//! - Keyboard input

pub mod input;
pub mod time;

pub use input::KeyboardState;
pub use time::{Clock, ManualClock};

#[cfg(target_arch = "wasm32")]
pub use time::BrowserClock;
