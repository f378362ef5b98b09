//! Deterministic Scheduling
//!
//! The player runs on one thread and never blocks. Two kinds of deferred
//! work interleave on it:
//!
//! - **frame requests**: one tick per rendered frame, re-requested by the
//!   tick itself while playback is live
//! - **single-shot timers**: inter-sign pauses and clip completion
//!
//! Both are plain data in a [`Scheduler`] and fire only when the owner polls
//! it against a [`Clock`]. Tests inject a [`VirtualClock`] and step time by
//! hand; applications use [`MonotonicClock`].

mod clock;
mod scheduler;

pub use clock::{Clock, MonotonicClock, VirtualClock};
pub use scheduler::{FrameHandle, Scheduler, TimerHandle};
