use std::path::{Path, PathBuf};
use std::thread;

use flume::{Receiver, Sender};
use glam::{Quat, Vec3};
use rustc_hash::FxHashSet;

use crate::animation::clip::{AnimationClip, TargetPath, Track, TrackData, TrackMeta};
use crate::animation::tracks::{InterpolationMode, KeyframeTrack};
use crate::assets::{AssetLoader, LoadEvent, LoadTicket, Prefab, PrefabNode};
use crate::errors::AssetError;
use crate::scene::{Mesh, Transform};

/// Loads `.glb`/`.gltf` files from disk, one worker thread per request.
///
/// Request paths are resolved against `root`; a leading `/` is treated as
/// relative to it, so web-style paths such as `/glb/hello.glb` work as-is.
/// Results travel back over a channel and are only handed out by
/// [`poll`](AssetLoader::poll).
pub struct GltfLoader {
    root: PathBuf,
    sender: Sender<LoadEvent>,
    receiver: Receiver<LoadEvent>,
    cancelled: FxHashSet<LoadTicket>,
    next_ticket: u64,
}

impl GltfLoader {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let (sender, receiver) = flume::unbounded();
        Self {
            root: root.into(),
            sender,
            receiver,
            cancelled: FxHashSet::default(),
            next_ticket: 0,
        }
    }

    #[must_use]
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }

    /// Reads and decodes a model synchronously.
    pub fn load_blocking(path: &Path) -> Result<Prefab, AssetError> {
        let (document, buffers, _images) = gltf::import(path).map_err(|err| match err {
            gltf::Error::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
                AssetError::NotFound(path.display().to_string())
            }
            gltf::Error::Io(io) => AssetError::Io {
                path: path.display().to_string(),
                message: io.to_string(),
            },
            other => other.into(),
        })?;

        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("model");
        prefab_from_document(name, &document, &buffers)
    }
}

impl AssetLoader for GltfLoader {
    fn request(&mut self, path: &str) -> LoadTicket {
        let ticket = LoadTicket(self.next_ticket);
        self.next_ticket += 1;

        let file = self.resolve(path);
        let sender = self.sender.clone();
        let spawned = thread::Builder::new()
            .name(format!("gltf-load-{}", ticket.0))
            .spawn(move || load_file(ticket, &file, &sender));

        if let Err(err) = spawned {
            log::error!("Failed to spawn loader thread for {path}: {err}");
            // The receiver lives in `self`, so this cannot fail.
            let _ = self.sender.send(LoadEvent::Failed {
                ticket,
                error: AssetError::Io {
                    path: path.to_string(),
                    message: err.to_string(),
                },
            });
        }
        ticket
    }

    fn cancel(&mut self, ticket: LoadTicket) {
        self.cancelled.insert(ticket);
    }

    fn poll(&mut self) -> Vec<LoadEvent> {
        let mut events = Vec::new();
        for event in self.receiver.try_iter() {
            let ticket = event.ticket();
            if self.cancelled.contains(&ticket) {
                if !matches!(event, LoadEvent::Progress { .. }) {
                    self.cancelled.remove(&ticket);
                }
                continue;
            }
            events.push(event);
        }
        events
    }
}

fn load_file(ticket: LoadTicket, path: &Path, sender: &Sender<LoadEvent>) {
    let total = std::fs::metadata(path).map_or(0, |meta| meta.len());
    // A closed channel means the loader was dropped; nobody is listening.
    let _ = sender.send(LoadEvent::Progress {
        ticket,
        loaded: 0,
        total,
    });

    let event = match GltfLoader::load_blocking(path) {
        Ok(prefab) => {
            let _ = sender.send(LoadEvent::Progress {
                ticket,
                loaded: total,
                total,
            });
            LoadEvent::Loaded {
                ticket,
                prefab: Box::new(prefab),
            }
        }
        Err(error) => LoadEvent::Failed { ticket, error },
    };
    let _ = sender.send(event);
}

fn node_name(node: &gltf::Node) -> String {
    node.name()
        .map_or_else(|| format!("Node_{}", node.index()), str::to_string)
}

/// Converts a parsed glTF document into a [`Prefab`]: node hierarchy with
/// TRS transforms, mesh presence (skinned or not) and every animation.
pub fn prefab_from_document(
    name: &str,
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
) -> Result<Prefab, AssetError> {
    let mut prefab = Prefab::new(name);

    for node in document.nodes() {
        let (t, r, s) = node.transform().decomposed();
        let mut prefab_node = PrefabNode::named(node_name(&node));
        prefab_node.transform =
            Transform::from_trs(Vec3::from_array(t), Quat::from_array(r), Vec3::from_array(s));
        prefab_node.children_indices = node.children().map(|child| child.index()).collect();

        if let Some(mesh) = node.mesh() {
            let primitives = mesh.primitives().len();
            let mut engine_mesh = if node.skin().is_some() {
                Mesh::skinned(primitives)
            } else {
                Mesh::new(primitives)
            };
            engine_mesh.name = mesh.name().map(str::to_string);
            prefab_node.mesh = Some(engine_mesh);
        }

        prefab.nodes.push(prefab_node);
    }

    prefab.root_indices = match document.default_scene().or_else(|| document.scenes().next()) {
        Some(scene) => scene.nodes().map(|node| node.index()).collect(),
        None => {
            let children: FxHashSet<usize> = prefab
                .nodes
                .iter()
                .flat_map(|node| node.children_indices.iter().copied())
                .collect();
            (0..prefab.nodes.len())
                .filter(|index| !children.contains(index))
                .collect()
        }
    };

    prefab.animations = read_animations(document, buffers)?;
    Ok(prefab)
}

fn read_animations(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
) -> Result<Vec<AnimationClip>, AssetError> {
    use gltf::animation::Interpolation;
    use gltf::animation::util::ReadOutputs;

    let mut animations = Vec::new();

    for anim in document.animations() {
        let mut tracks = Vec::new();

        for channel in anim.channels() {
            let reader = channel.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));
            let target = channel.target();
            let node_name = node_name(&target.node());

            let times: Vec<f32> = reader
                .read_inputs()
                .ok_or_else(|| AssetError::InvalidData(format!("animation channel for {node_name} has no inputs")))?
                .collect();

            // Cubic spline keys carry in/out tangents around each value; only
            // the value is kept and sampled linearly.
            let (interpolation, cubic) = match channel.sampler().interpolation() {
                Interpolation::Linear => (InterpolationMode::Linear, false),
                Interpolation::Step => (InterpolationMode::Step, false),
                Interpolation::CubicSpline => (InterpolationMode::Linear, true),
            };

            let outputs = reader
                .read_outputs()
                .ok_or_else(|| AssetError::InvalidData(format!("animation channel for {node_name} has no outputs")))?;

            let track = match outputs {
                ReadOutputs::Translations(iter) => Track {
                    meta: TrackMeta {
                        node_name,
                        target: TargetPath::Translation,
                    },
                    data: TrackData::Vector3(KeyframeTrack::new(
                        times,
                        keyframe_values(iter.map(Vec3::from_array), cubic),
                        interpolation,
                    )),
                },
                ReadOutputs::Rotations(iter) => Track {
                    meta: TrackMeta {
                        node_name,
                        target: TargetPath::Rotation,
                    },
                    data: TrackData::Quaternion(KeyframeTrack::new(
                        times,
                        keyframe_values(iter.into_f32().map(Quat::from_array), cubic),
                        interpolation,
                    )),
                },
                ReadOutputs::Scales(iter) => Track {
                    meta: TrackMeta {
                        node_name,
                        target: TargetPath::Scale,
                    },
                    data: TrackData::Vector3(KeyframeTrack::new(
                        times,
                        keyframe_values(iter.map(Vec3::from_array), cubic),
                        interpolation,
                    )),
                },
                ReadOutputs::MorphTargetWeights(_) => {
                    log::debug!("Skipping morph target animation on {node_name}");
                    continue;
                }
            };
            tracks.push(track);
        }

        animations.push(AnimationClip::new(anim.name().unwrap_or("anim"), tracks));
    }

    Ok(animations)
}

fn keyframe_values<T: Copy>(values: impl Iterator<Item = T>, cubic: bool) -> Vec<T> {
    let values: Vec<T> = values.collect();
    if cubic {
        values.chunks_exact(3).map(|key| key[1]).collect()
    } else {
        values
    }
}
