//! Player Configuration
//!
//! [`PlayerConfig`] carries the options the embedding UI passes to a player.
//! Every field has a default, so a partial JSON document is enough:
//!
//! ```rust,ignore
//! use signverse::config::PlayerConfig;
//!
//! let config = PlayerConfig::from_json_str(r#"{ "speed": 0.2, "autoPlay": false }"#)?;
//! assert_eq!(config.pause_duration_ms, 800);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Drawing surface size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerConfig {
    /// Start playing as soon as a request is set.
    pub auto_play: bool,
    /// Avatar model path, resolved by the asset loader.
    pub avatar_model: String,
    /// Whether the embedding UI shows playback controls. The player itself
    /// only carries the flag.
    pub show_controls: bool,
    /// Bone units (radians or scene units) moved per tick.
    pub speed: f32,
    /// Delay between signs.
    #[serde(rename = "pauseDuration")]
    pub pause_duration_ms: u64,
    pub viewport: Viewport,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            auto_play: true,
            avatar_model: "/models/ybot.glb".to_string(),
            show_controls: true,
            speed: 0.1,
            pause_duration_ms: 800,
            viewport: Viewport::default(),
        }
    }
}

impl PlayerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(Error::Config(format!(
                "speed must be a positive number, got {}",
                self.speed
            )));
        }
        if self.avatar_model.trim().is_empty() {
            return Err(Error::Config("avatarModel must not be empty".to_string()));
        }
        Ok(())
    }

    #[must_use]
    pub fn with_auto_play(mut self, auto_play: bool) -> Self {
        self.auto_play = auto_play;
        self
    }

    #[must_use]
    pub fn with_avatar_model(mut self, path: impl Into<String>) -> Self {
        self.avatar_model = path.into();
        self
    }

    #[must_use]
    pub fn with_show_controls(mut self, show: bool) -> Self {
        self.show_controls = show;
        self
    }

    #[must_use]
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    #[must_use]
    pub fn with_pause_duration_ms(mut self, ms: u64) -> Self {
        self.pause_duration_ms = ms;
        self
    }

    #[must_use]
    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport = Viewport { width, height };
        self
    }
}
