//! Text Translation
//!
//! Turns free-form text into a list of [`AnimationUnit`](crate::animation::AnimationUnit)s.
//! Two modes are offered by [`Translator`]:
//!
//! - word mode: lexicon words, falling back to fingerspelling
//! - phrase mode: simplified text matched against pre-baked clips
//!
//! Unknown tokens are skipped. An input that matches nothing yields an empty
//! list, which is not an error.

pub mod simplify;
pub mod tokenizer;

pub use simplify::{RuleSimplifier, TextSimplifier};
pub use tokenizer::{MAX_PHRASE_WINDOW, Translation, Translator};
