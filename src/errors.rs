//! Error Types
//!
//! This module defines the error types used throughout the player.
//!
//! # Overview
//!
//! The main error type [`Error`] covers the fallible entry points:
//! - Asset loading and decoding (avatars and sign clips)
//! - Lexicon and clip repository data files
//! - Player configuration files
//!
//! Playback itself never returns errors. Lookup misses, failed loads, missing
//! bones and stale callbacks are logged and skipped so a multi-sign request
//! keeps going; see [`crate::player`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use signverse::errors::Result;
//! use signverse::lexicon::BoneLexicon;
//!
//! fn load_lexicon(json: &str) -> Result<BoneLexicon> {
//!     BoneLexicon::from_json_str(json)
//! }
//! ```

use thiserror::Error;

/// Failure while fetching or decoding a model asset.
///
/// Cloneable so it can travel inside [`crate::assets::LoadEvent`]s.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// Nothing exists at the requested path.
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Reading the asset failed.
    #[error("IO error while loading {path}: {message}")]
    Io {
        /// Path that was being read
        path: String,
        /// Underlying error message
        message: String,
    },

    /// The glTF/GLB container could not be parsed.
    #[error("glTF error: {0}")]
    Gltf(String),

    /// The container parsed but its content is unusable.
    #[error("Invalid asset data: {0}")]
    InvalidData(String),

    /// The request was cancelled before it completed.
    #[error("Asset load cancelled: {0}")]
    Cancelled(String),
}

/// The main error type for the player.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Asset Loading Errors
    // ========================================================================
    /// Loading an avatar or clip failed.
    #[error(transparent)]
    Asset(#[from] AssetError),

    // ========================================================================
    // Data Errors
    // ========================================================================
    /// Lexicon or repository data is malformed.
    #[error("Invalid lexicon data: {0}")]
    Lexicon(String),

    /// Player configuration is invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<gltf::Error> for AssetError {
    fn from(err: gltf::Error) -> Self {
        AssetError::Gltf(err.to_string())
    }
}

/// Alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
