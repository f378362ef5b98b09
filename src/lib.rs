#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

//! # SignVerse Player
//!
//! Indian Sign Language avatar playback. Text becomes a queue of animation
//! units; each unit either steps named bones of the avatar toward target
//! angles frame by frame, or plays a pre-baked clip model in real time.
//!
//! ```rust,ignore
//! use signverse::{HeadlessRenderer, MonotonicClock, PlayerConfig, SignPlayer, GltfLoader};
//!
//! let mut player = SignPlayer::new(
//!     PlayerConfig::default(),
//!     GltfLoader::new("public"),
//!     HeadlessRenderer::new(),
//!     MonotonicClock::new(),
//! );
//! player.play_text("hello");
//! ```

pub mod animation;
pub mod assets;
pub mod config;
pub mod errors;
pub mod lexicon;
pub mod player;
pub mod render;
pub mod scene;
pub mod schedule;
pub mod translate;

pub use animation::{AnimationQueue, AnimationUnit, ClipDriver, PoseDriver};
pub use assets::{AssetLoader, GltfLoader, LoadEvent, LoadTicket, MemoryLoader, Prefab};
pub use config::PlayerConfig;
pub use errors::{AssetError, Error, Result};
pub use lexicon::{BoneLexicon, BoneSequence, BoneTarget, ClipRepository};
pub use player::{DebugEvent, DebugLevel, PlaybackState, PlaybackStatus, PlayerInput, SignPlayer};
pub use render::{HeadlessRenderer, RenderBackend, RenderStats};
pub use scene::{Camera, Light, Node, Scene, Stage};
pub use schedule::{Clock, MonotonicClock, Scheduler, VirtualClock};
pub use translate::{RuleSimplifier, TextSimplifier, Translator};
