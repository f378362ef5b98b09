use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashSet;

use crate::render::{GpuMesh, RenderBackend, SurfaceHandle};
use crate::scene::{Camera, Mesh, Scene};

/// Counters kept by [`HeadlessRenderer`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub surfaces_created: usize,
    pub surfaces_destroyed: usize,
    pub live_surfaces: usize,
    pub live_geometries: usize,
    pub live_materials: usize,
    pub frames_rendered: u64,
    /// Visible mesh nodes drawn in the last frame.
    pub last_draw_calls: usize,
    pub surface_size: (u32, u32),
}

#[derive(Debug, Default)]
struct Inner {
    stats: RenderStats,
    next_id: u64,
    surfaces: FxHashSet<u64>,
    geometries: FxHashSet<u64>,
    materials: FxHashSet<u64>,
}

/// Renderer without a device: it allocates ids and counts what would be drawn.
///
/// Clones share the same bookkeeping, so a caller can keep one clone to
/// inspect the stats of the instance handed to the player.
#[derive(Debug, Clone, Default)]
pub struct HeadlessRenderer {
    inner: Arc<Mutex<Inner>>,
}

impl HeadlessRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn stats(&self) -> RenderStats {
        self.inner.lock().stats.clone()
    }
}

impl Inner {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn sync_counts(&mut self) {
        self.stats.live_surfaces = self.surfaces.len();
        self.stats.live_geometries = self.geometries.len();
        self.stats.live_materials = self.materials.len();
    }
}

impl RenderBackend for HeadlessRenderer {
    fn create_surface(&mut self, width: u32, height: u32) -> SurfaceHandle {
        let mut inner = self.inner.lock();
        let id = inner.next_id();
        inner.surfaces.insert(id);
        inner.stats.surfaces_created += 1;
        inner.stats.surface_size = (width, height);
        inner.sync_counts();
        SurfaceHandle(id)
    }

    fn resize_surface(&mut self, surface: SurfaceHandle, width: u32, height: u32) {
        let mut inner = self.inner.lock();
        if inner.surfaces.contains(&surface.0) {
            inner.stats.surface_size = (width, height);
        } else {
            log::warn!("resize of unknown surface {surface:?}");
        }
    }

    fn destroy_surface(&mut self, surface: SurfaceHandle) {
        let mut inner = self.inner.lock();
        if inner.surfaces.remove(&surface.0) {
            inner.stats.surfaces_destroyed += 1;
        }
        inner.sync_counts();
    }

    fn upload_mesh(&mut self, _mesh: &Mesh) -> GpuMesh {
        let mut inner = self.inner.lock();
        let geometry = inner.next_id();
        let material = inner.next_id();
        inner.geometries.insert(geometry);
        inner.materials.insert(material);
        inner.sync_counts();
        GpuMesh { geometry, material }
    }

    fn release_mesh(&mut self, mesh: GpuMesh) {
        let mut inner = self.inner.lock();
        inner.geometries.remove(&mesh.geometry);
        inner.materials.remove(&mesh.material);
        inner.sync_counts();
    }

    fn render(&mut self, surface: SurfaceHandle, scene: &Scene, _camera: &Camera) {
        let mut inner = self.inner.lock();
        if !inner.surfaces.contains(&surface.0) {
            log::error!("render into disposed surface {surface:?}");
            return;
        }
        inner.stats.frames_rendered += 1;
        inner.stats.last_draw_calls = scene
            .nodes
            .values()
            .filter(|node| node.visible && node.mesh.is_some())
            .count();
    }
}
