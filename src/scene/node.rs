use crate::scene::transform::Transform;
use crate::scene::{LightKey, MeshKey, NodeKey};

/// A scene node: hierarchy, transform and optional components.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: Option<String>,

    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,

    pub transform: Transform,

    pub mesh: Option<MeshKey>,
    pub light: Option<LightKey>,

    pub visible: bool,
    /// Skinned meshes are drawn even when their bind-pose bounds leave the
    /// frustum, so loaders switch this off for them.
    pub frustum_culled: bool,
}

impl Node {
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: None,
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            mesh: None,
            light: None,
            visible: true,
            frustum_culled: true,
        }
    }

    #[must_use]
    pub fn with_name(name: impl Into<String>) -> Self {
        let mut node = Self::new();
        node.name = Some(name.into());
        node
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}
