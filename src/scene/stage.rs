use glam::Vec3;
use rustc_hash::FxHashMap;

use crate::animation::{AnimationClip, ClipAction, PoseTarget, snap_sequence};
use crate::assets::Prefab;
use crate::lexicon::{BoneSequence, Channel};
use crate::render::{RenderBackend, SurfaceHandle};
use crate::scene::{Camera, Light, Mesh, NodeKey, Scene};

const CAMERA_FOV_DEGREES: f32 = 45.0;
const CAMERA_NEAR: f32 = 0.1;
const CAMERA_FAR: f32 = 1000.0;
const CAMERA_POSITION: Vec3 = Vec3::new(0.0, 1.5, 3.0);
const CAMERA_TARGET: Vec3 = Vec3::new(0.0, 1.0, 0.0);

/// `#f0f0f0`
const BACKGROUND: Vec3 = Vec3::splat(240.0 / 255.0);

/// The model currently on screen, either the avatar or a clip's model.
#[derive(Debug)]
pub struct DisplayedModel {
    pub root: NodeKey,
    /// Path the model was loaded from.
    pub source: String,
    bones: FxHashMap<String, NodeKey>,
}

impl DisplayedModel {
    #[must_use]
    pub fn bone(&self, name: &str) -> Option<NodeKey> {
        self.bones.get(name).copied()
    }

    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }
}

/// Everything owned by one mounted avatar: scene, camera, surface, lighting
/// and the displayed model with its optional clip player.
pub struct SceneState {
    pub scene: Scene,
    pub camera: Camera,
    surface: SurfaceHandle,
    avatar_path: String,
    /// Kept so the avatar can be shown again after a clip replaced it.
    avatar: Option<Box<Prefab>>,
    displayed: Option<DisplayedModel>,
    action: Option<ClipAction>,
}

impl SceneState {
    #[must_use]
    pub fn surface(&self) -> SurfaceHandle {
        self.surface
    }

    #[must_use]
    pub fn avatar_path(&self) -> &str {
        &self.avatar_path
    }

    #[must_use]
    pub fn displayed(&self) -> Option<&DisplayedModel> {
        self.displayed.as_ref()
    }

    #[must_use]
    pub fn action(&self) -> Option<&ClipAction> {
        self.action.as_ref()
    }
}

/// Scene lifecycle manager.
///
/// A full [`mount`](Self::mount) happens only when the avatar path changes;
/// it first tears the previous state down completely. Swapping the displayed
/// model (a new clip) only disposes that model's meshes. Every mount bumps
/// [`generation`](Self::generation) so owners can recognise work that was
/// started for an earlier avatar.
pub struct Stage {
    renderer: Box<dyn RenderBackend>,
    state: Option<SceneState>,
    generation: u64,
    tearing_down: bool,
    viewport: (u32, u32),
}

impl Stage {
    #[must_use]
    pub fn new(renderer: Box<dyn RenderBackend>, viewport: (u32, u32)) -> Self {
        Self {
            renderer,
            state: None,
            generation: 0,
            tearing_down: false,
            viewport,
        }
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.state.is_some()
    }

    #[must_use]
    pub fn is_tearing_down(&self) -> bool {
        self.tearing_down
    }

    #[must_use]
    pub fn state(&self) -> Option<&SceneState> {
        self.state.as_ref()
    }

    pub fn state_mut(&mut self) -> Option<&mut SceneState> {
        self.state.as_mut()
    }

    #[must_use]
    pub fn avatar_path(&self) -> Option<&str> {
        self.state.as_ref().map(SceneState::avatar_path)
    }

    #[must_use]
    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Builds a fresh scene for `avatar_path`.
    ///
    /// Returns `false` if that avatar is already mounted, in which case
    /// nothing changes.
    pub fn mount(&mut self, avatar_path: &str) -> bool {
        if self.avatar_path() == Some(avatar_path) {
            return false;
        }
        if self.state.is_some() {
            self.teardown();
        }

        let (width, height) = self.viewport;
        let mut scene = Scene::new();
        scene.background = BACKGROUND;
        scene.add_light("AmbientLight", Light::new_ambient(Vec3::ONE, 0.5), Vec3::ZERO);
        scene.add_light(
            "DirectionalLight",
            Light::new_directional(Vec3::ONE, 1.0).with_shadows(),
            Vec3::new(5.0, 10.0, 7.5),
        );

        let aspect = if height == 0 { 1.0 } else { width as f32 / height as f32 };
        let mut camera = Camera::new_perspective(CAMERA_FOV_DEGREES, aspect, CAMERA_NEAR, CAMERA_FAR);
        camera.look_at(CAMERA_POSITION, CAMERA_TARGET);

        let surface = self.renderer.create_surface(width, height);

        self.state = Some(SceneState {
            scene,
            camera,
            surface,
            avatar_path: avatar_path.to_string(),
            avatar: None,
            displayed: None,
            action: None,
        });
        self.generation += 1;
        self.tearing_down = false;
        log::debug!("Stage mounted for {avatar_path} (generation {})", self.generation);
        true
    }

    /// Stops the clip player, releases every mesh and the surface, and drops
    /// the scene. The stage stays in the tearing-down state until the next
    /// [`mount`](Self::mount).
    pub fn teardown(&mut self) {
        self.tearing_down = true;
        let Some(mut state) = self.state.take() else {
            return;
        };

        if let Some(action) = state.action.as_mut() {
            action.stop();
        }
        state.action = None;
        state.displayed = None;

        let meshes = state.scene.clear();
        let released = meshes.len();
        self.release_meshes(meshes);
        self.renderer.destroy_surface(state.surface);
        log::debug!(
            "Stage torn down: released {released} meshes of {}",
            state.avatar_path
        );
    }

    fn release_meshes(&mut self, meshes: Vec<Mesh>) {
        for mesh in meshes {
            if let Some(gpu) = mesh.gpu {
                self.renderer.release_mesh(gpu);
            }
        }
    }

    // ========================================================================
    // Displayed model
    // ========================================================================

    /// Displays the avatar and keeps it for [`show_avatar`](Self::show_avatar).
    pub fn attach_avatar(&mut self, prefab: Box<Prefab>) -> Option<NodeKey> {
        let path = self.avatar_path()?.to_string();
        let root = self.replace_displayed(&prefab, &path);
        if let Some(state) = self.state.as_mut() {
            state.avatar = Some(prefab);
        }
        root
    }

    /// Puts the avatar back on screen if something else is displayed.
    /// Returns whether the avatar is displayed afterwards.
    pub fn show_avatar(&mut self) -> bool {
        let Some(state) = self.state.as_mut() else {
            return false;
        };
        if state
            .displayed
            .as_ref()
            .is_some_and(|model| model.source == state.avatar_path)
        {
            return true;
        }
        let Some(prefab) = state.avatar.take() else {
            return false;
        };
        let path = state.avatar_path.clone();
        let root = self.replace_displayed(&prefab, &path);
        if let Some(state) = self.state.as_mut() {
            state.avatar = Some(prefab);
        }
        root.is_some()
    }

    /// Removes the displayed model (disposing its meshes and stopping its
    /// clip player) and instantiates `prefab` in its place.
    pub fn replace_displayed(&mut self, prefab: &Prefab, source: &str) -> Option<NodeKey> {
        if self.tearing_down {
            return None;
        }
        let state = self.state.as_mut()?;

        if let Some(mut action) = state.action.take() {
            action.stop();
        }
        let removed = match state.displayed.take() {
            Some(previous) => state.scene.remove_node(previous.root),
            None => Vec::new(),
        };

        let root = state.scene.instantiate(prefab);
        let subtree = state.scene.collect_subtree(root);

        let mut bones = FxHashMap::default();
        for &key in &subtree {
            let Some(node) = state.scene.get_node(key) else {
                continue;
            };
            if let Some(name) = node.name() {
                bones.entry(name.to_string()).or_insert(key);
            }
            let mesh_key = node.mesh;
            if let Some(mesh) = mesh_key.and_then(|m| state.scene.meshes.get_mut(m)) {
                let gpu = self.renderer.upload_mesh(mesh);
                mesh.gpu = Some(gpu);
            }
        }
        state.scene.update_world_matrices();
        state.displayed = Some(DisplayedModel {
            root,
            source: source.to_string(),
            bones,
        });

        self.release_meshes(removed);
        Some(root)
    }

    #[must_use]
    pub fn displayed_source(&self) -> Option<&str> {
        self.state
            .as_ref()
            .and_then(|state| state.displayed.as_ref())
            .map(|model| model.source.as_str())
    }

    // ========================================================================
    // Clip player
    // ========================================================================

    /// Binds `clip` to the displayed model and starts it.
    pub fn play_clip(&mut self, clip: AnimationClip) -> bool {
        let Some(state) = self.state.as_mut() else {
            return false;
        };
        let Some(root) = state.displayed.as_ref().map(|model| model.root) else {
            return false;
        };
        let mut action = ClipAction::bind(clip.into(), &state.scene, root);
        action.play();
        state.action = Some(action);
        true
    }

    pub fn set_clip_paused(&mut self, paused: bool) {
        if let Some(action) = self.state.as_mut().and_then(|s| s.action.as_mut()) {
            if !action.is_finished() {
                action.paused = paused;
            }
        }
    }

    /// Jumps the clip player to its last frame and applies it.
    pub fn finish_clip(&mut self) {
        if let Some(state) = self.state.as_mut() {
            if let Some(action) = state.action.as_mut() {
                action.finish();
                action.apply(&mut state.scene);
            }
        }
    }

    /// Stops and drops the clip player, leaving the model as it is.
    pub fn stop_clip(&mut self) {
        if let Some(state) = self.state.as_mut() {
            if let Some(mut action) = state.action.take() {
                action.stop();
            }
        }
    }

    // ========================================================================
    // Frame
    // ========================================================================

    /// Updates the camera and surface for a new viewport size. Zero sizes are
    /// ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.viewport = (width, height);
        if let Some(state) = self.state.as_mut() {
            state.camera.set_viewport(width, height);
            self.renderer.resize_surface(state.surface, width, height);
        }
    }

    /// Steps the clip player by `dt` seconds and draws.
    pub fn render_frame(&mut self, dt: f32) {
        if self.tearing_down {
            return;
        }
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if let Some(action) = state.action.as_mut() {
            action.update(dt);
            action.apply(&mut state.scene);
        }
        state.scene.update_world_matrices();
        self.renderer.render(state.surface, &state.scene, &state.camera);
    }

    /// Puts every bone of `sequence` at its limit at once.
    pub fn snap(&mut self, sequence: &BoneSequence) {
        snap_sequence(sequence, self);
    }
}

impl PoseTarget for Stage {
    fn channel_mut(&mut self, bone: &str, channel: Channel) -> Option<&mut Vec3> {
        if self.tearing_down {
            return None;
        }
        let state = self.state.as_mut()?;
        let key = state.displayed.as_ref()?.bone(bone)?;
        state
            .scene
            .get_node_mut(key)
            .map(|node| node.transform.channel_mut(channel))
    }
}

impl Drop for Stage {
    fn drop(&mut self) {
        self.teardown();
    }
}
