use serde::{Deserialize, Serialize};

use crate::lexicon::BoneSequence;

/// One entry of a playback request.
///
/// Serialised with a `kind` tag:
/// `{"kind":"bones","sequences":[...]}` or
/// `{"kind":"clip","path":"/glb/hello.glb","durationSeconds":2.5}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AnimationUnit {
    /// Incremental bone animation, one sequence after another.
    Bones {
        sequences: Vec<BoneSequence>,
        /// Token this unit was translated from, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    /// A pre-baked animated model played by a time-based player.
    Clip {
        path: String,
        /// Overrides the clip's own authored length.
        #[serde(
            default,
            rename = "durationSeconds",
            skip_serializing_if = "Option::is_none"
        )]
        duration_seconds: Option<f32>,
    },
}

impl AnimationUnit {
    #[must_use]
    pub fn bones(sequences: Vec<BoneSequence>) -> Self {
        AnimationUnit::Bones {
            sequences,
            label: None,
        }
    }

    #[must_use]
    pub fn labelled_bones(label: impl Into<String>, sequences: Vec<BoneSequence>) -> Self {
        AnimationUnit::Bones {
            sequences,
            label: Some(label.into()),
        }
    }

    #[must_use]
    pub fn clip(path: impl Into<String>) -> Self {
        AnimationUnit::Clip {
            path: path.into(),
            duration_seconds: None,
        }
    }

    #[must_use]
    pub fn clip_with_duration(path: impl Into<String>, seconds: f32) -> Self {
        AnimationUnit::Clip {
            path: path.into(),
            duration_seconds: Some(seconds),
        }
    }

    #[must_use]
    pub fn is_clip(&self) -> bool {
        matches!(self, AnimationUnit::Clip { .. })
    }

    /// Human-readable name: the source token for bone units, the file stem
    /// with underscores as spaces for clips (`how_are_you.glb` → `how are you`).
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            AnimationUnit::Bones { label, .. } => label.clone().unwrap_or_default(),
            AnimationUnit::Clip { path, .. } => {
                let file = path.rsplit(|c| c == '/' || c == '\\').next().unwrap_or(path);
                let stem = file
                    .strip_suffix(".glb")
                    .or_else(|| file.strip_suffix(".gltf"))
                    .unwrap_or(file);
                stem.replace('_', " ")
            }
        }
    }
}
