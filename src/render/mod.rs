//! Rendering Backend
//!
//! The player does not draw anything itself. It drives a [`RenderBackend`]
//! that owns the device-side resources:
//!
//! - drawing surfaces (one per mounted scene, sized to the viewport)
//! - geometry/material pairs uploaded for each mesh
//!
//! Every resource handed out must be given back; the scene lifecycle code in
//! [`crate::scene::Stage`] does so on clip swap and full teardown.
//! [`HeadlessRenderer`] is a bookkeeping-only backend for servers and tests.

mod headless;

pub use headless::{HeadlessRenderer, RenderStats};

use crate::scene::{Camera, Mesh, Scene};

/// Identifies one drawing surface created by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(pub u64);

/// Backend-side geometry and material of one uploaded mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GpuMesh {
    pub geometry: u64,
    pub material: u64,
}

pub trait RenderBackend {
    fn create_surface(&mut self, width: u32, height: u32) -> SurfaceHandle;

    fn resize_surface(&mut self, surface: SurfaceHandle, width: u32, height: u32);

    /// Detaches and disposes a surface.
    fn destroy_surface(&mut self, surface: SurfaceHandle);

    fn upload_mesh(&mut self, mesh: &Mesh) -> GpuMesh;

    fn release_mesh(&mut self, mesh: GpuMesh);

    fn render(&mut self, surface: SurfaceHandle, scene: &Scene, camera: &Camera);
}
