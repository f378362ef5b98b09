use crate::render::GpuMesh;

/// Drawable attached to a node.
///
/// `gpu` holds the renderer-side geometry/material pair once uploaded; it
/// must be handed back to the renderer before the mesh is dropped.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub name: Option<String>,
    pub primitive_count: usize,
    pub skinned: bool,
    pub(crate) gpu: Option<GpuMesh>,
}

impl Mesh {
    #[must_use]
    pub fn new(primitive_count: usize) -> Self {
        Self {
            name: None,
            primitive_count,
            skinned: false,
            gpu: None,
        }
    }

    #[must_use]
    pub fn skinned(primitive_count: usize) -> Self {
        Self {
            skinned: true,
            ..Self::new(primitive_count)
        }
    }

    #[must_use]
    pub fn is_uploaded(&self) -> bool {
        self.gpu.is_some()
    }
}
