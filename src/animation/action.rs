use std::sync::Arc;

use crate::animation::clip::{AnimationClip, TargetPath, TrackData};
use crate::scene::{NodeKey, Scene};

/// Maps track `track_index` of a clip to a node in the scene.
#[derive(Debug, Clone, Copy)]
pub struct PropertyBinding {
    pub track_index: usize,
    pub node: NodeKey,
    pub target: TargetPath,
}

/// Time-driven player for one clip bound to one model instance. Plays once
/// and holds the last frame.
#[derive(Debug, Clone)]
pub struct ClipAction {
    clip: Arc<AnimationClip>,

    pub time: f32,
    pub time_scale: f32,
    pub paused: bool,

    bindings: Vec<PropertyBinding>,
}

impl ClipAction {
    /// Resolves every track of `clip` against node names under `root`.
    /// Tracks whose node is missing are left unbound.
    #[must_use]
    pub fn bind(clip: Arc<AnimationClip>, scene: &Scene, root: NodeKey) -> Self {
        let bindings = clip
            .tracks
            .iter()
            .enumerate()
            .filter_map(|(track_index, track)| {
                scene
                    .find_by_name(root, &track.meta.node_name)
                    .map(|node| PropertyBinding {
                        track_index,
                        node,
                        target: track.meta.target,
                    })
            })
            .collect();

        Self {
            clip,
            time: 0.0,
            time_scale: 1.0,
            paused: true,
            bindings,
        }
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    #[must_use]
    pub fn bindings(&self) -> &[PropertyBinding] {
        &self.bindings
    }

    pub fn play(&mut self) {
        self.paused = false;
    }

    /// Stops and rewinds.
    pub fn stop(&mut self) {
        self.paused = true;
        self.time = 0.0;
    }

    /// Jumps to the last frame.
    pub fn finish(&mut self) {
        self.time = self.clip.duration;
        self.paused = true;
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.time >= self.clip.duration
    }

    /// Advances time by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        if self.paused {
            return;
        }
        let duration = self.clip.duration;
        if duration <= 0.0 {
            return;
        }

        self.time += dt * self.time_scale;

        if self.time >= duration {
            self.time = duration;
            self.paused = true;
        } else if self.time < 0.0 {
            self.time = 0.0;
            self.paused = true;
        }
    }

    /// Writes the sampled values into the bound nodes.
    pub fn apply(&self, scene: &mut Scene) {
        for binding in &self.bindings {
            let Some(track) = self.clip.tracks.get(binding.track_index) else {
                continue;
            };
            let Some(node) = scene.get_node_mut(binding.node) else {
                continue;
            };

            match (&track.data, binding.target) {
                (TrackData::Vector3(t), TargetPath::Translation) => {
                    if let Some(v) = t.sample(self.time) {
                        node.transform.position = v;
                    }
                }
                (TrackData::Vector3(t), TargetPath::Scale) => {
                    if let Some(v) = t.sample(self.time) {
                        node.transform.scale = v;
                    }
                }
                (TrackData::Quaternion(t), TargetPath::Rotation) => {
                    if let Some(q) = t.sample(self.time) {
                        node.transform.set_rotation_quat(q);
                    }
                }
                _ => {}
            }
        }
    }
}
