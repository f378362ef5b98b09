use std::time::Duration;

use crate::animation::AnimationUnit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackStatus {
    /// Nothing left to play.
    Idle,
    Playing,
    /// Paused by the caller; progress is kept.
    Paused,
    /// Waiting out the delay between two signs.
    AwaitingPause,
}

/// Snapshot of playback, owned and updated by the player.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub status: PlaybackStatus,
    /// Index of the current unit; equals the request length once finished.
    pub index: usize,
    /// Bone units moved per tick.
    pub speed: f32,
    /// Delay between signs.
    pub pause_duration: Duration,
}

impl PlaybackState {
    #[must_use]
    pub fn new(speed: f32, pause_duration_ms: u64) -> Self {
        Self {
            status: PlaybackStatus::Idle,
            index: 0,
            speed,
            pause_duration: Duration::from_millis(pause_duration_ms),
        }
    }

    #[must_use]
    pub fn pause_duration_ms(&self) -> u64 {
        u64::try_from(self.pause_duration.as_millis()).unwrap_or(u64::MAX)
    }
}

/// What the player is asked to show. The two modes are exclusive.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerInput {
    Units(Vec<AnimationUnit>),
    /// Raw text, translated in word mode.
    Text(String),
}

impl From<Vec<AnimationUnit>> for PlayerInput {
    fn from(units: Vec<AnimationUnit>) -> Self {
        PlayerInput::Units(units)
    }
}

impl From<&str> for PlayerInput {
    fn from(text: &str) -> Self {
        PlayerInput::Text(text.to_string())
    }
}

impl From<String> for PlayerInput {
    fn from(text: String) -> Self {
        PlayerInput::Text(text)
    }
}
