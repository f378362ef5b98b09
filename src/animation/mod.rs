//! Animation
//!
//! Two ways of moving the avatar, both fed from one [`AnimationQueue`]:
//!
//! - **Bone units** are stepped by the [`PoseDriver`]: every target of the
//!   active [`BoneSequence`](crate::lexicon::BoneSequence) moves a fixed amount
//!   per frame until it reaches its limit.
//! - **Clip units** are handled by the [`ClipDriver`]: a model with a baked
//!   [`AnimationClip`] replaces the displayed one and a [`ClipAction`] plays it
//!   back in real time.

pub mod action;
pub mod clip;
pub mod clip_driver;
pub mod pose;
pub mod queue;
pub mod tracks;
pub mod unit;
mod values;

pub use action::{ClipAction, PropertyBinding};
pub use clip::{AnimationClip, TargetPath, Track, TrackData, TrackMeta};
pub use clip_driver::{ClipDriver, ClipPhase};
pub use pose::{PoseDriver, PoseOrigin, PosePhase, PoseTarget, StepOutcome, snap_sequence};
pub use queue::AnimationQueue;
pub use tracks::{InterpolationMode, KeyframeTrack};
pub use unit::AnimationUnit;
pub use values::Interpolatable;
