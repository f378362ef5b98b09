//! Playback Controller
//!
//! [`SignPlayer`] is what an embedding UI talks to. It accepts either a list
//! of [`AnimationUnit`](crate::animation::AnimationUnit)s or raw text
//! ([`PlayerInput`]), exposes the transport operations (play, pause, resume,
//! restart, skip, next, stop, reset) and reports back through a completion
//! callback and a stream of [`DebugEvent`]s.
//!
//! Failures never stop playback: an unknown word is skipped, a clip that
//! fails to load counts as a zero-length unit, a missing bone drops only its
//! own target, and anything arriving for a scene that is being torn down is
//! ignored.

mod controller;
pub mod debug;
pub mod state;

pub use controller::SignPlayer;
pub use debug::{DEBUG_LOG_CAPACITY, DebugEvent, DebugLevel, DebugLog};
pub use state::{PlaybackState, PlaybackStatus, PlayerInput};
