//! Scene Integration Tests
//!
//! Tests for:
//! - Scene: node hierarchy, removal returning meshes, name queries
//! - Transform: Euler channels, matrix caching
//! - Stage: mount / teardown lifecycle, displayed model swaps, GPU bookkeeping
//! - Clip playback: keyframe sampling, ClipAction binding and timing

use glam::{Quat, Vec3};

use signverse::animation::{
    AnimationClip, ClipAction, InterpolationMode, KeyframeTrack, PoseTarget, TargetPath,
    Track, TrackData, TrackMeta,
};
use signverse::assets::Prefab;
use signverse::lexicon::{Channel, rest_pose};
use signverse::render::HeadlessRenderer;
use signverse::scene::{LightKind, Mesh, Node, Scene, Stage, Transform};

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn stage() -> (Stage, HeadlessRenderer) {
    let renderer = HeadlessRenderer::new();
    (Stage::new(Box::new(renderer.clone()), (800, 600)), renderer)
}

fn lift_clip(node: &str, seconds: f32) -> AnimationClip {
    AnimationClip::new(
        "lift",
        vec![Track {
            meta: TrackMeta {
                node_name: node.to_string(),
                target: TargetPath::Translation,
            },
            data: TrackData::Vector3(KeyframeTrack::new(
                vec![0.0, seconds],
                vec![Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0)],
                InterpolationMode::Linear,
            )),
        }],
    )
}

// ============================================================================
// Scene graph
// ============================================================================

#[test]
fn remove_node_returns_subtree_meshes() {
    let mut scene = Scene::new();
    let parent = scene.add_node(Node::with_name("parent"));
    let mut child = Node::with_name("child");
    child.mesh = Some(scene.meshes.insert(Mesh::new(2)));
    let child = scene.add_to_parent(child, parent);

    assert_eq!(scene.collect_subtree(parent), vec![parent, child]);

    let removed = scene.remove_node(parent);
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].primitive_count, 2);
    assert_eq!(scene.node_count(), 0);
    assert!(scene.root_nodes.is_empty());
}

#[test]
fn attach_moves_a_root_under_a_parent() {
    let mut scene = Scene::new();
    let a = scene.add_node(Node::with_name("a"));
    let b = scene.add_node(Node::with_name("b"));

    scene.attach(b, a);
    assert_eq!(scene.root_nodes, vec![a]);
    assert_eq!(scene.get_node(b).and_then(Node::parent), Some(a));
    assert_eq!(scene.find_by_name(a, "b"), Some(b));

    scene.attach(a, a);
    assert_eq!(scene.root_nodes, vec![a]);
}

#[test]
fn world_matrices_follow_the_hierarchy() {
    let mut scene = Scene::new();
    let root = scene.instantiate(&Prefab::mixamo_rig("ybot"));
    scene.update_world_matrices();

    let neck = scene.find_by_name(root, "mixamorigNeck").expect("neck");
    let world = scene.get_node(neck).expect("node").transform.world_matrix().translation;
    // Hips 1.0 + spine 0.1 + 0.12 + 0.14 + neck 0.15
    assert!(approx(world.y, 1.51));
}

// ============================================================================
// Transform
// ============================================================================

#[test]
fn euler_channels_round_trip_through_quaternions() {
    let mut transform = Transform::new();
    transform.set_rotation_quat(Quat::from_rotation_y(0.5));
    assert!(approx(transform.rotation.y, 0.5));
    assert!(transform.quaternion().abs_diff_eq(Quat::from_rotation_y(0.5), EPSILON));

    transform.channel_mut(Channel::Rotation).x = 0.25;
    assert!(approx(transform.channel(Channel::Rotation).x, 0.25));
    assert_eq!(transform.channel(Channel::Position), Vec3::ZERO);
}

#[test]
fn local_matrix_only_recomputes_on_change() {
    let mut transform = Transform::new();
    assert!(transform.update_local_matrix());
    assert!(!transform.update_local_matrix());

    transform.position.x = 1.0;
    assert!(transform.update_local_matrix());
    assert!(!transform.update_local_matrix());
}

// ============================================================================
// Stage lifecycle
// ============================================================================

#[test]
fn mount_builds_lights_camera_and_surface() {
    let (mut stage, renderer) = stage();
    assert!(!stage.is_mounted());
    assert!(stage.mount("/models/ybot.glb"));

    let state = stage.state().expect("mounted");
    assert_eq!(state.avatar_path(), "/models/ybot.glb");
    assert_eq!(state.scene.lights.len(), 2);
    assert!(
        state
            .scene
            .lights
            .values()
            .any(|light| light.kind == LightKind::Directional && light.cast_shadows)
    );
    assert!(approx(state.scene.background.x, 240.0 / 255.0));
    assert_eq!(state.camera.position, Vec3::new(0.0, 1.5, 3.0));
    assert!(approx(state.camera.aspect, 800.0 / 600.0));

    let stats = renderer.stats();
    assert_eq!(stats.surfaces_created, 1);
    assert_eq!(stats.surface_size, (800, 600));
    assert_eq!(stage.generation(), 1);
}

#[test]
fn remounting_the_same_avatar_changes_nothing() {
    let (mut stage, renderer) = stage();
    stage.mount("/models/ybot.glb");
    assert!(!stage.mount("/models/ybot.glb"));
    assert_eq!(stage.generation(), 1);
    assert_eq!(renderer.stats().surfaces_created, 1);
}

#[test]
fn mounting_another_avatar_tears_down_first() {
    let (mut stage, renderer) = stage();
    stage.mount("/models/ybot.glb");
    stage.attach_avatar(Box::new(Prefab::mixamo_rig("ybot")));
    assert_eq!(renderer.stats().live_geometries, 1);

    assert!(stage.mount("/models/xbot.glb"));
    let stats = renderer.stats();
    assert_eq!(stats.live_geometries, 0);
    assert_eq!(stats.surfaces_destroyed, 1);
    assert_eq!(stats.live_surfaces, 1);
    assert_eq!(stage.generation(), 2);
    assert!(stage.displayed_source().is_none());
}

#[test]
fn teardown_disposes_everything_and_blocks_writes() {
    let (mut stage, renderer) = stage();
    stage.mount("/models/ybot.glb");
    stage.attach_avatar(Box::new(Prefab::mixamo_rig("ybot")));
    stage.render_frame(0.016);
    let frames = renderer.stats().frames_rendered;

    stage.teardown();
    assert!(stage.is_tearing_down());
    assert!(!stage.is_mounted());

    let stats = renderer.stats();
    assert_eq!(stats.live_geometries, 0);
    assert_eq!(stats.live_materials, 0);
    assert_eq!(stats.live_surfaces, 0);

    stage.render_frame(0.016);
    assert_eq!(renderer.stats().frames_rendered, frames);
    assert!(stage.channel_mut("mixamorigNeck", Channel::Rotation).is_none());
    assert!(stage.replace_displayed(&Prefab::mixamo_rig("clip"), "/glb/x.glb").is_none());
}

#[test]
fn dropping_the_stage_releases_resources() {
    let (mut stage, renderer) = stage();
    stage.mount("/models/ybot.glb");
    stage.attach_avatar(Box::new(Prefab::mixamo_rig("ybot")));
    drop(stage);
    assert_eq!(renderer.stats().live_surfaces, 0);
    assert_eq!(renderer.stats().live_geometries, 0);
}

// ============================================================================
// Displayed model
// ============================================================================

#[test]
fn clip_model_replaces_the_avatar_and_back() {
    let (mut stage, renderer) = stage();
    stage.mount("/models/ybot.glb");
    stage.attach_avatar(Box::new(Prefab::mixamo_rig("ybot")));

    let root = stage
        .replace_displayed(&Prefab::mixamo_rig("hello"), "/glb/hello.glb")
        .expect("displayed");
    assert_eq!(stage.displayed_source(), Some("/glb/hello.glb"));
    assert_eq!(renderer.stats().live_geometries, 1);

    let state = stage.state().expect("mounted");
    assert_eq!(state.scene.root_nodes.len(), 3);
    let displayed = state.displayed().expect("displayed");
    assert_eq!(displayed.root, root);
    assert!(displayed.bone("mixamorigRightHandPinky3").is_some());

    assert!(stage.show_avatar());
    assert_eq!(stage.displayed_source(), Some("/models/ybot.glb"));
    assert_eq!(renderer.stats().live_geometries, 1);
}

#[test]
fn stage_exposes_bones_of_the_displayed_model() {
    let (mut stage, _renderer) = stage();
    stage.mount("/models/ybot.glb");
    assert!(stage.channel_mut("mixamorigNeck", Channel::Rotation).is_none());

    stage.attach_avatar(Box::new(Prefab::mixamo_rig("ybot")));
    stage.snap(&rest_pose());
    let neck = stage
        .channel_mut("mixamorigNeck", Channel::Rotation)
        .expect("neck bone");
    assert_eq!(neck.x, std::f32::consts::PI / 12.0);
    assert!(stage.channel_mut("mixamorigTail", Channel::Rotation).is_none());
}

#[test]
fn skinned_meshes_are_never_culled() {
    let mut scene = Scene::new();
    let root = scene.instantiate(&Prefab::mixamo_rig("ybot"));
    let body = scene.find_by_name(root, "Beta_Surface").expect("body");
    assert!(!scene.get_node(body).expect("node").frustum_culled);
}

#[test]
fn resize_ignores_zero_sizes() {
    let (mut stage, renderer) = stage();
    stage.mount("/models/ybot.glb");
    stage.resize(1280, 720);
    stage.resize(0, 720);
    assert_eq!(stage.viewport(), (1280, 720));
    assert_eq!(renderer.stats().surface_size, (1280, 720));
}

// ============================================================================
// Clip playback
// ============================================================================

#[test]
fn keyframe_track_interpolation_modes() {
    let linear = KeyframeTrack::new(vec![0.0, 1.0], vec![0.0_f32, 10.0], InterpolationMode::Linear);
    assert!(approx(linear.sample(0.25).expect("sample"), 2.5));
    assert!(approx(linear.sample(-1.0).expect("sample"), 0.0));
    assert!(approx(linear.sample(5.0).expect("sample"), 10.0));

    let step = KeyframeTrack::new(vec![0.0, 1.0], vec![0.0_f32, 10.0], InterpolationMode::Step);
    assert!(approx(step.sample(0.99).expect("sample"), 0.0));

    let empty: KeyframeTrack<f32> = KeyframeTrack::new(vec![], vec![], InterpolationMode::Linear);
    assert!(empty.sample(0.0).is_none());
}

#[test]
fn clip_duration_is_the_last_keyframe() {
    assert!(approx(lift_clip("mixamorigHips", 1.5).duration, 1.5));
    assert!(approx(AnimationClip::new("empty", vec![]).duration, 0.0));
}

#[test]
fn clip_action_plays_once_and_stops_at_the_end() {
    let mut scene = Scene::new();
    let root = scene.instantiate(&Prefab::mixamo_rig("hello"));
    let mut action = ClipAction::bind(lift_clip("mixamorigHips", 1.0).into(), &scene, root);
    assert_eq!(action.bindings().len(), 1);

    action.update(0.5);
    assert!(approx(action.time, 0.0), "bound actions start paused");

    action.play();
    action.update(0.5);
    action.apply(&mut scene);
    let hips = scene.find_by_name(root, "mixamorigHips").expect("hips");
    assert!(approx(scene.get_node(hips).expect("node").transform.position.y, 1.0));

    action.update(2.0);
    assert!(action.is_finished());
    assert!(action.paused);
    assert!(approx(action.time, 1.0));

    action.update(0.5);
    assert!(approx(action.time, 1.0), "finished actions hold the last frame");
}

#[test]
fn unbound_tracks_are_skipped() {
    let mut scene = Scene::new();
    let root = scene.instantiate(&Prefab::mixamo_rig("hello"));
    let action = ClipAction::bind(lift_clip("NoSuchBone", 1.0).into(), &scene, root);
    assert!(action.bindings().is_empty());
    action.apply(&mut scene);
}

#[test]
fn finishing_a_clip_on_stage_applies_the_last_frame() {
    let (mut stage, _renderer) = stage();
    stage.mount("/models/ybot.glb");
    stage.replace_displayed(&Prefab::mixamo_rig("hello"), "/glb/hello.glb");
    assert!(stage.play_clip(lift_clip("mixamorigHips", 2.0)));

    stage.render_frame(0.5);
    let action = stage.state().and_then(|s| s.action()).expect("action");
    assert!(approx(action.time, 0.5));

    stage.finish_clip();
    let hips = stage
        .channel_mut("mixamorigHips", Channel::Position)
        .expect("hips");
    assert!(approx(hips.y, 2.0));

    stage.stop_clip();
    assert!(stage.state().and_then(|s| s.action()).is_none());
}
