use glam::Vec3;

use crate::animation::clip::AnimationClip;
use crate::scene::{Mesh, Transform};

/// Prefab node: plain data, children referenced by index.
#[derive(Debug, Clone)]
pub struct PrefabNode {
    pub name: Option<String>,
    pub transform: Transform,
    /// Indices of the children in `Prefab::nodes`.
    pub children_indices: Vec<usize>,
    pub mesh: Option<Mesh>,
}

impl PrefabNode {
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: None,
            transform: Transform::new(),
            children_indices: Vec::new(),
            mesh: None,
        }
    }

    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new()
        }
    }

    #[must_use]
    pub fn at(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    #[must_use]
    pub fn with_mesh(mut self, mesh: Mesh) -> Self {
        self.mesh = Some(mesh);
        self
    }
}

impl Default for PrefabNode {
    fn default() -> Self {
        Self::new()
    }
}

/// Loaded model data: what an avatar or clip file decodes to.
///
/// Holds no scene handles and is `Send`, so loaders can build it off the
/// main thread; [`crate::scene::Scene::instantiate`] turns it into nodes.
#[derive(Debug, Clone)]
pub struct Prefab {
    pub name: String,
    /// All nodes, flattened.
    pub nodes: Vec<PrefabNode>,
    /// Indices of the top-level nodes in `nodes`.
    pub root_indices: Vec<usize>,
    /// Baked animation clips, first one is played.
    pub animations: Vec<AnimationClip>,
}

impl Prefab {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::new(),
            root_indices: Vec::new(),
            animations: Vec::new(),
        }
    }

    /// Adds a top-level node and returns its index.
    pub fn add_root(&mut self, node: PrefabNode) -> usize {
        let index = self.nodes.len();
        self.nodes.push(node);
        self.root_indices.push(index);
        index
    }

    /// Adds `node` under `parent` and returns its index.
    pub fn add_child(&mut self, parent: usize, node: PrefabNode) -> usize {
        let index = self.nodes.len();
        self.nodes.push(node);
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children_indices.push(index);
        } else {
            self.root_indices.push(index);
        }
        index
    }

    #[must_use]
    pub fn with_animation(mut self, clip: AnimationClip) -> Self {
        self.animations.push(clip);
        self
    }

    #[must_use]
    pub fn find_node(&self, name: &str) -> Option<usize> {
        self.nodes
            .iter()
            .position(|node| node.name.as_deref() == Some(name))
    }

    #[must_use]
    pub fn mesh_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.mesh.is_some()).count()
    }

    /// A mixamo-named humanoid skeleton with one skinned body mesh.
    ///
    /// Bone names match the ones used by the built-in lexicon, so it can stand
    /// in for `ybot.glb` when no asset files are available.
    #[must_use]
    pub fn mixamo_rig(name: impl Into<String>) -> Self {
        let mut prefab = Self::new(name);
        prefab.add_root(PrefabNode::named("Beta_Surface").with_mesh(Mesh::skinned(1)));

        let hips = prefab.add_root(PrefabNode::named("mixamorigHips").at(Vec3::new(0.0, 1.0, 0.0)));
        let spine = prefab.add_child(hips, PrefabNode::named("mixamorigSpine").at(Vec3::new(0.0, 0.1, 0.0)));
        let spine1 = prefab.add_child(spine, PrefabNode::named("mixamorigSpine1").at(Vec3::new(0.0, 0.12, 0.0)));
        let spine2 = prefab.add_child(spine1, PrefabNode::named("mixamorigSpine2").at(Vec3::new(0.0, 0.14, 0.0)));
        let neck = prefab.add_child(spine2, PrefabNode::named("mixamorigNeck").at(Vec3::new(0.0, 0.15, 0.0)));
        prefab.add_child(neck, PrefabNode::named("mixamorigHead").at(Vec3::new(0.0, 0.1, 0.0)));

        for (side, sign) in [("Left", 1.0_f32), ("Right", -1.0_f32)] {
            let shoulder = prefab.add_child(
                spine2,
                PrefabNode::named(format!("mixamorig{side}Shoulder")).at(Vec3::new(sign * 0.06, 0.1, 0.0)),
            );
            let arm = prefab.add_child(
                shoulder,
                PrefabNode::named(format!("mixamorig{side}Arm")).at(Vec3::new(sign * 0.12, 0.0, 0.0)),
            );
            let fore_arm = prefab.add_child(
                arm,
                PrefabNode::named(format!("mixamorig{side}ForeArm")).at(Vec3::new(sign * 0.27, 0.0, 0.0)),
            );
            let hand = prefab.add_child(
                fore_arm,
                PrefabNode::named(format!("mixamorig{side}Hand")).at(Vec3::new(sign * 0.27, 0.0, 0.0)),
            );
            for (finger_index, finger) in ["Thumb", "Index", "Middle", "Ring", "Pinky"].iter().enumerate() {
                let offset = Vec3::new(sign * 0.08, 0.0, 0.03 - 0.015 * finger_index as f32);
                let mut parent = hand;
                for joint in 1..=3 {
                    let position = if joint == 1 { offset } else { Vec3::new(sign * 0.03, 0.0, 0.0) };
                    parent = prefab.add_child(
                        parent,
                        PrefabNode::named(format!("mixamorig{side}Hand{finger}{joint}")).at(position),
                    );
                }
            }
            let up_leg = prefab.add_child(
                hips,
                PrefabNode::named(format!("mixamorig{side}UpLeg")).at(Vec3::new(sign * 0.09, -0.05, 0.0)),
            );
            let leg = prefab.add_child(
                up_leg,
                PrefabNode::named(format!("mixamorig{side}Leg")).at(Vec3::new(0.0, -0.42, 0.0)),
            );
            prefab.add_child(leg, PrefabNode::named(format!("mixamorig{side}Foot")).at(Vec3::new(0.0, -0.42, 0.0)));
        }

        prefab
    }
}
