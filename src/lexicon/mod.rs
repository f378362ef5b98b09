//! Sign Lexicon
//!
//! Static data mapping text tokens to animation:
//!
//! - [`BoneLexicon`]: letter/word → ordered [`BoneSequence`]s for incremental
//!   bone animation
//! - [`ClipRepository`]: phrase → path of a pre-baked animated model
//! - [`SequenceRecorder`]: adapter that turns legacy "push onto the queue"
//!   entries into plain sequence data
//!
//! Lookups are side-effect free; a miss is `None`.

pub mod bone;
pub mod builtin;
pub mod clips;
pub mod table;

pub use bone::{Axis, BoneSequence, BoneTarget, Channel, Direction, LIMIT_EPSILON, RawBoneTarget};
pub use builtin::{builtin_clips, builtin_lexicon, rest_pose};
pub use clips::{ClipRepository, normalize_phrase};
pub use table::{BoneLexicon, SequenceRecorder};
