use glam::{Affine3A, Vec3};
use slotmap::SlotMap;

use crate::assets::Prefab;
use crate::scene::light::Light;
use crate::scene::mesh::Mesh;
use crate::scene::node::Node;
use crate::scene::{LightKey, MeshKey, NodeKey};

/// Scene graph: a node arena plus component pools.
///
/// Pure data; GPU-side resources referenced by meshes are released by the
/// owner of the renderer (see [`crate::scene::Stage`]), which is why removal
/// hands the detached meshes back instead of dropping them.
pub struct Scene {
    pub nodes: SlotMap<NodeKey, Node>,
    pub root_nodes: Vec<NodeKey>,

    pub meshes: SlotMap<MeshKey, Mesh>,
    pub lights: SlotMap<LightKey, Light>,

    /// Linear RGB clear colour.
    pub background: Vec3,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),
            meshes: SlotMap::with_key(),
            lights: SlotMap::with_key(),
            background: Vec3::splat(0.94),
        }
    }

    /// Adds a node at the root of the scene.
    pub fn add_node(&mut self, node: Node) -> NodeKey {
        let key = self.nodes.insert(node);
        self.root_nodes.push(key);
        key
    }

    pub fn add_to_parent(&mut self, mut child: Node, parent: NodeKey) -> NodeKey {
        if !self.nodes.contains_key(parent) {
            log::warn!("add_to_parent: parent node missing, adding at root");
            return self.add_node(child);
        }
        child.parent = Some(parent);
        let key = self.nodes.insert(child);
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(key);
        }
        key
    }

    /// Adds a light on its own root node at `position`.
    pub fn add_light(&mut self, name: &str, light: Light, position: Vec3) -> NodeKey {
        let light_key = self.lights.insert(light);
        let mut node = Node::with_name(name);
        node.transform.position = position;
        node.light = Some(light_key);
        self.add_node(node)
    }

    /// Re-parents `child` under `parent`.
    pub fn attach(&mut self, child: NodeKey, parent: NodeKey) {
        if child == parent {
            log::warn!("Cannot attach node to itself!");
            return;
        }
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            log::error!("attach: node not found");
            return;
        }

        self.detach_from_parent(child);
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
            c.transform.mark_dirty();
        }
    }

    fn detach_from_parent(&mut self, key: NodeKey) {
        match self.nodes.get(key).and_then(|n| n.parent) {
            Some(parent) => {
                if let Some(p) = self.nodes.get_mut(parent) {
                    p.children.retain(|&c| c != key);
                }
            }
            None => self.root_nodes.retain(|&r| r != key),
        }
    }

    /// Removes `key` and its whole subtree, returning the detached meshes so
    /// their GPU resources can be released.
    pub fn remove_node(&mut self, key: NodeKey) -> Vec<Mesh> {
        if !self.nodes.contains_key(key) {
            return Vec::new();
        }
        self.detach_from_parent(key);

        let mut removed = Vec::new();
        for node_key in self.collect_subtree(key) {
            if let Some(node) = self.nodes.remove(node_key) {
                if let Some(mesh) = node.mesh.and_then(|m| self.meshes.remove(m)) {
                    removed.push(mesh);
                }
                if let Some(light) = node.light {
                    self.lights.remove(light);
                }
            }
        }
        removed
    }

    /// Empties the scene, returning every mesh for disposal.
    pub fn clear(&mut self) -> Vec<Mesh> {
        self.nodes.clear();
        self.root_nodes.clear();
        self.lights.clear();
        self.meshes.drain().map(|(_, mesh)| mesh).collect()
    }

    #[must_use]
    pub fn get_node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    pub fn get_node_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        self.nodes.get_mut(key)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// `root` followed by all of its descendants, depth first.
    #[must_use]
    pub fn collect_subtree(&self, root: NodeKey) -> Vec<NodeKey> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(key) = stack.pop() {
            if let Some(node) = self.nodes.get(key) {
                out.push(key);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// First node named `name` in the subtree under `root`.
    #[must_use]
    pub fn find_by_name(&self, root: NodeKey, name: &str) -> Option<NodeKey> {
        self.collect_subtree(root)
            .into_iter()
            .find(|&key| self.nodes.get(key).and_then(Node::name) == Some(name))
    }

    /// First node named `name` anywhere in the scene.
    #[must_use]
    pub fn find_first_by_name(&self, name: &str) -> Option<NodeKey> {
        self.root_nodes
            .iter()
            .find_map(|&root| self.find_by_name(root, name))
    }

    /// Instantiates `prefab` under a new root node named after it.
    pub fn instantiate(&mut self, prefab: &Prefab) -> NodeKey {
        let root = self.add_node(Node::with_name(prefab.name.clone()));

        let mut keys = Vec::with_capacity(prefab.nodes.len());
        for prefab_node in &prefab.nodes {
            let mut node = Node::new();
            node.name.clone_from(&prefab_node.name);
            node.transform = prefab_node.transform.clone();
            node.transform.mark_dirty();
            if let Some(mesh) = &prefab_node.mesh {
                if mesh.skinned {
                    node.frustum_culled = false;
                }
                node.mesh = Some(self.meshes.insert(Mesh {
                    gpu: None,
                    ..mesh.clone()
                }));
            }
            keys.push(self.nodes.insert(node));
        }

        for (index, prefab_node) in prefab.nodes.iter().enumerate() {
            for &child_index in &prefab_node.children_indices {
                if let Some(&child) = keys.get(child_index) {
                    if let Some(c) = self.nodes.get_mut(child) {
                        c.parent = Some(keys[index]);
                    }
                    if let Some(p) = self.nodes.get_mut(keys[index]) {
                        p.children.push(child);
                    }
                }
            }
        }

        for &root_index in &prefab.root_indices {
            if let Some(&key) = keys.get(root_index) {
                if let Some(n) = self.nodes.get_mut(key) {
                    n.parent = Some(root);
                }
                if let Some(r) = self.nodes.get_mut(root) {
                    r.children.push(key);
                }
            }
        }

        root
    }

    /// Recomputes local and world matrices for the whole hierarchy.
    pub fn update_world_matrices(&mut self) {
        let roots = self.root_nodes.clone();
        for root in roots {
            self.update_recursive(root, Affine3A::IDENTITY, false);
        }
    }

    fn update_recursive(&mut self, key: NodeKey, parent_world: Affine3A, parent_changed: bool) {
        let Some(node) = self.nodes.get_mut(key) else {
            return;
        };
        let local_changed = node.transform.update_local_matrix();
        let changed = local_changed || parent_changed;
        if changed {
            node.transform.world_matrix = parent_world * node.transform.local_matrix;
        }
        let world = node.transform.world_matrix;
        let children = node.children.clone();
        for child in children {
            self.update_recursive(child, world, changed);
        }
    }
}
