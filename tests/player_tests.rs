//! Player Tests
//!
//! Tests for:
//! - Queue progression and the completion callback
//! - Fingerspelled letters following each other
//! - Pause / resume, inter-sign delay, restart, skip, next, stop, reset
//! - Clip units: load, timing, pause, failures, model swaps
//! - Avatar swaps and unmounting while work is in flight
//! - Debug events and viewport changes
//!
//! Every test drives the player with a virtual clock and an in-memory loader,
//! one `update()` per simulated 16 ms frame.

use std::cell::{Cell, RefCell};
use std::f32::consts::PI;
use std::rc::Rc;
use std::time::Duration;

use glam::{Quat, Vec3};

use signverse::animation::{
    AnimationClip, AnimationUnit, ClipPhase, InterpolationMode, KeyframeTrack, PosePhase,
    TargetPath, Track, TrackData, TrackMeta,
};
use signverse::assets::{AssetLoader, LoadEvent, LoadTicket, MemoryLoader, Prefab};
use signverse::config::PlayerConfig;
use signverse::errors::AssetError;
use signverse::lexicon::{Axis, BoneLexicon, BoneSequence, BoneTarget, ClipRepository, Direction};
use signverse::player::{DebugEvent, DebugLevel, PlaybackStatus, SignPlayer};
use signverse::render::HeadlessRenderer;
use signverse::schedule::{Clock, VirtualClock};
use signverse::translate::Translator;

const AVATAR: &str = "/models/ybot.glb";
const OTHER_AVATAR: &str = "/models/xbot.glb";
const HELLO: &str = "/glb/hello.glb";
const FRAME_MS: u64 = 16;

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

// ============================================================================
// Harness
// ============================================================================

struct Harness {
    player: SignPlayer,
    clock: VirtualClock,
    loader: MemoryLoader,
    renderer: HeadlessRenderer,
    completions: Rc<Cell<usize>>,
}

impl Harness {
    fn new(config: PlayerConfig) -> Self {
        let loader = MemoryLoader::new().with(AVATAR, Prefab::mixamo_rig("ybot"));
        Self::with_loader(config, loader.clone(), loader)
    }

    fn with_loader(config: PlayerConfig, loader: MemoryLoader, handed: impl AssetLoader + 'static) -> Self {
        let clock = VirtualClock::new();
        let renderer = HeadlessRenderer::new();
        let mut player = SignPlayer::new(config, handed, renderer.clone(), clock.clone());

        let completions = Rc::new(Cell::new(0));
        let counter = Rc::clone(&completions);
        player.on_complete(move || counter.set(counter.get() + 1));

        Self {
            player,
            clock,
            loader,
            renderer,
            completions,
        }
    }

    /// A player whose avatar has loaded and eased into its rest pose.
    fn ready() -> Self {
        let mut harness = Self::new(PlayerConfig::default());
        harness.settle();
        harness
    }

    fn frame(&mut self) {
        self.clock.advance_ms(FRAME_MS);
        self.player.update();
    }

    fn frames(&mut self, count: usize) {
        for _ in 0..count {
            self.frame();
        }
    }

    fn wait(&mut self, ms: u64) {
        self.clock.advance_ms(ms);
        self.player.update();
    }

    fn settle(&mut self) {
        let reached = self.run_until(1000, |player| {
            player.is_avatar_ready()
                && player.pose_phase() == PosePhase::Idle
                && has_message(player, "Rest pose reached")
        });
        assert!(reached, "avatar never reached its rest pose");
    }

    fn run_until(&mut self, max_frames: usize, done: impl Fn(&SignPlayer) -> bool) -> bool {
        for _ in 0..max_frames {
            self.frame();
            if done(&self.player) {
                return true;
            }
        }
        false
    }

    fn completions(&self) -> usize {
        self.completions.get()
    }

    fn rotation(&self, bone: &str) -> Vec3 {
        let scene = &self.player.stage().state().expect("stage mounted").scene;
        let key = scene.find_first_by_name(bone).expect("bone exists");
        scene.get_node(key).expect("node exists").transform.rotation
    }
}

fn has_message(player: &SignPlayer, needle: &str) -> bool {
    player
        .debug_events()
        .iter()
        .any(|event| event.message.contains(needle))
}

fn count_messages(player: &SignPlayer, needle: &str) -> usize {
    player
        .debug_events()
        .iter()
        .filter(|event| event.message == needle)
        .count()
}

fn rotate(bone: &str, axis: Axis, limit: f32, direction: Direction) -> BoneSequence {
    BoneSequence::new(vec![BoneTarget::rotation(bone, axis, limit, direction)])
}

fn head(limit: f32, direction: Direction) -> BoneSequence {
    rotate("mixamorigHead", Axis::X, limit, direction)
}

fn wave_clip(seconds: f32) -> AnimationClip {
    let track = KeyframeTrack::new(
        vec![0.0, seconds],
        vec![Quat::IDENTITY, Quat::from_rotation_z(1.0)],
        InterpolationMode::Linear,
    );
    AnimationClip::new(
        "wave",
        vec![Track {
            meta: TrackMeta {
                node_name: "mixamorigRightArm".to_string(),
                target: TargetPath::Rotation,
            },
            data: TrackData::Quaternion(track),
        }],
    )
}

fn clip_model(name: &str, seconds: f32) -> Prefab {
    Prefab::mixamo_rig(name).with_animation(wave_clip(seconds))
}

/// Loader that keeps delivering cancelled requests.
struct IgnoresCancel(MemoryLoader);

impl AssetLoader for IgnoresCancel {
    fn request(&mut self, path: &str) -> LoadTicket {
        self.0.request(path)
    }

    fn poll(&mut self) -> Vec<LoadEvent> {
        self.0.poll()
    }
}

// ============================================================================
// Startup
// ============================================================================

#[test]
fn avatar_loads_and_eases_into_rest_pose() {
    let harness = Harness::ready();
    let player = &harness.player;

    assert_eq!(player.status(), PlaybackStatus::Idle);
    assert_eq!(player.stage().displayed_source(), Some(AVATAR));
    assert!(has_message(player, "Loading avatar /models/ybot.glb"));
    assert!(has_message(player, "/models/ybot.glb: 100.00% loaded"));
    assert!(has_message(player, "Avatar /models/ybot.glb loaded"));

    assert_eq!(harness.rotation("mixamorigNeck").x, PI / 12.0);
    assert_eq!(harness.rotation("mixamorigLeftArm").z, -PI / 3.0);
    assert_eq!(harness.rotation("mixamorigRightForeArm").y, PI / 1.5);
}

#[test]
fn units_wait_for_the_avatar() {
    let mut harness = Harness::new(PlayerConfig::default());
    harness.loader.hold(AVATAR);
    harness.player.play(vec![AnimationUnit::bones(vec![head(0.3, Direction::Increase)])], true);

    harness.frames(20);
    assert!(!harness.player.is_avatar_ready());
    assert_eq!(harness.player.pose_phase(), PosePhase::Idle);
    assert_eq!(harness.player.queue_index(), 0);

    harness.loader.release(AVATAR);
    assert!(harness.run_until(200, |player| player.queue_index() == 1));
    assert_eq!(harness.completions(), 1);
}

#[test]
fn avatar_failure_does_not_block_the_queue() {
    let loader = MemoryLoader::new();
    let mut harness = Harness::with_loader(PlayerConfig::default(), loader.clone(), loader);
    harness.frame();

    assert!(harness.player.is_avatar_ready());
    let errors: Vec<DebugEvent> = harness
        .player
        .debug_events()
        .into_iter()
        .filter(|event| event.level == DebugLevel::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("Failed to load avatar"));

    harness.player.play(vec![AnimationUnit::bones(vec![head(0.3, Direction::Increase)])], true);
    harness.frame();
    assert_eq!(harness.completions(), 1);
}

// ============================================================================
// Queue progression
// ============================================================================

#[test]
fn index_moves_forward_and_completion_fires_once() {
    let mut harness = Harness::ready();
    harness.player.play(
        vec![
            AnimationUnit::bones(vec![head(0.3, Direction::Increase)]),
            AnimationUnit::bones(vec![head(0.0, Direction::Decrease)]),
            AnimationUnit::bones(vec![head(0.3, Direction::Increase)]),
        ],
        true,
    );
    assert_eq!(harness.player.status(), PlaybackStatus::Playing);

    let mut last = harness.player.queue_index();
    for _ in 0..600 {
        harness.frame();
        let index = harness.player.queue_index();
        assert!(index >= last, "index went back from {last} to {index}");
        assert!(index <= 3);
        last = index;
    }

    assert_eq!(last, 3);
    assert_eq!(harness.completions(), 1);
    assert_eq!(harness.player.status(), PlaybackStatus::Idle);
    assert_eq!(harness.player.state().index, 3);
    assert_eq!(count_messages(&harness.player, "All animations complete"), 1);
}

#[test]
fn sequences_of_a_unit_play_in_order() {
    let mut harness = Harness::ready();
    harness.player.play(
        vec![AnimationUnit::bones(vec![
            head(0.3, Direction::Increase),
            head(-0.2, Direction::Decrease),
        ])],
        true,
    );

    assert!(harness.run_until(100, |player| player.status() == PlaybackStatus::AwaitingPause));
    assert!(approx(harness.rotation("mixamorigHead").x, 0.3));
    assert_eq!(harness.player.queue_index(), 0);

    assert!(harness.run_until(200, |player| player.queue_index() == 1));
    assert_eq!(harness.rotation("mixamorigHead").x, -0.2);
    assert_eq!(harness.completions(), 1);
}

#[test]
fn inter_sign_delay_is_waited_out() {
    let mut harness = Harness::ready();
    harness.player.play(
        vec![
            AnimationUnit::bones(vec![head(0.3, Direction::Increase)]),
            AnimationUnit::bones(vec![head(0.0, Direction::Decrease)]),
        ],
        true,
    );

    assert!(harness.run_until(100, |player| player.queue_index() == 1));
    assert_eq!(harness.player.status(), PlaybackStatus::AwaitingPause);
    assert_eq!(harness.player.pose_phase(), PosePhase::Pausing);

    harness.wait(400);
    assert_eq!(harness.player.status(), PlaybackStatus::AwaitingPause);

    harness.wait(450);
    assert_eq!(harness.player.status(), PlaybackStatus::Playing);
    assert_eq!(harness.player.pose_phase(), PosePhase::Advancing);
}

#[test]
fn changed_pause_duration_applies_to_the_next_delay() {
    let mut harness = Harness::ready();
    harness.player.set_pause_duration(100);
    assert_eq!(harness.player.pause_duration(), Duration::from_millis(100));
    assert_eq!(harness.player.config().pause_duration_ms, 100);

    harness.player.play(
        vec![
            AnimationUnit::bones(vec![head(0.3, Direction::Increase)]),
            AnimationUnit::bones(vec![head(0.0, Direction::Decrease)]),
        ],
        true,
    );
    assert!(harness.run_until(100, |player| player.queue_index() == 1));
    harness.wait(120);
    assert_eq!(harness.player.pose_phase(), PosePhase::Advancing);
}

#[test]
fn untranslatable_text_plays_nothing() {
    let mut harness = Harness::ready();
    *harness.player.translator_mut() = Translator::new(BoneLexicon::new(), ClipRepository::new());

    harness.player.play_text("XQ");
    assert_eq!(harness.player.queue_len(), 0);
    assert_eq!(harness.player.status(), PlaybackStatus::Idle);
    assert!(has_message(&harness.player, "Nothing to play"));

    harness.frames(100);
    assert_eq!(harness.completions(), 0);
}

#[test]
fn text_is_translated_into_the_queue() {
    let mut lexicon = BoneLexicon::new();
    lexicon.insert_letter('H', vec![head(0.2, Direction::Increase)]);
    lexicon.insert_letter('I', vec![head(0.0, Direction::Decrease)]);

    let mut harness = Harness::ready();
    harness.player.translator_mut().lexicon_mut().merge(lexicon);
    harness.player.play_text("hi");

    assert_eq!(harness.player.queue_len(), 2);
    assert_eq!(harness.player.current_unit_label().as_deref(), Some("H"));
    assert!(has_message(&harness.player, "Signing H"));
}

#[test]
fn consecutive_letters_each_show_their_own_handshape() {
    let mut harness = Harness::ready();
    harness.player.play_text("AC");
    assert_eq!(harness.player.queue_len(), 2);
    assert!(harness.run_until(3000, |player| player.queue_index() == 2));
    assert_eq!(harness.completions(), 1);

    // C curls every finger less than A, and twists the wrist.
    for joint in 1..=3 {
        let index = harness.rotation(&format!("mixamorigRightHandIndex{joint}"));
        assert!(approx(index.z, 0.6), "index joint {joint} at {}", index.z);
        let pinky = harness.rotation(&format!("mixamorigRightHandPinky{joint}"));
        assert!(approx(pinky.z, 0.6));
    }
    assert!(approx(harness.rotation("mixamorigRightHandThumb1").z, 0.4));
    assert!(approx(harness.rotation("mixamorigRightHand").y, PI / 2.0));
}

#[test]
fn letters_reopen_fingers_curled_by_the_previous_letter() {
    let mut harness = Harness::ready();
    harness.player.play_text("BA");
    assert!(harness.run_until(3000, |player| player.queue_index() == 2));

    // B folds the thumb, A leaves it extended.
    assert!(approx(harness.rotation("mixamorigRightHandThumb2").z, 0.0));
    assert!(approx(harness.rotation("mixamorigRightHandMiddle2").z, 1.4));
    assert!(approx(harness.rotation("mixamorigRightHand").y, 0.0));
}

#[test]
fn set_input_accepts_units_and_text() {
    let mut harness = Harness::ready();
    harness
        .player
        .set_input(vec![AnimationUnit::bones(vec![head(0.3, Direction::Increase)])]);
    assert_eq!(harness.player.queue_len(), 1);

    harness.player.set_input("home");
    assert_eq!(harness.player.queue_len(), 1);
    assert_eq!(harness.player.current_unit_label().as_deref(), Some("HOME"));
}

// ============================================================================
// Transport
// ============================================================================

#[test]
fn pause_and_resume_are_idempotent() {
    let mut harness = Harness::ready();
    harness
        .player
        .play(vec![AnimationUnit::bones(vec![head(1.0, Direction::Increase)])], true);
    harness.frames(3);

    harness.player.pause();
    let state = harness.player.state().clone();
    let events = harness.player.debug_events().len();
    let value = harness.rotation("mixamorigHead").x;

    harness.player.pause();
    assert_eq!(harness.player.state(), &state);
    assert_eq!(harness.player.debug_events().len(), events);
    assert_eq!(harness.player.status(), PlaybackStatus::Paused);

    harness.frames(10);
    assert_eq!(harness.rotation("mixamorigHead").x, value);

    harness.player.resume();
    harness.player.resume();
    assert_eq!(count_messages(&harness.player, "Resumed"), 1);
    assert_eq!(count_messages(&harness.player, "Paused"), 1);
    assert_eq!(harness.player.status(), PlaybackStatus::Playing);

    assert!(harness.run_until(50, |player| player.queue_index() == 1));
    assert_eq!(harness.rotation("mixamorigHead").x, 1.0);
}

#[test]
fn play_without_auto_play_waits_paused() {
    let mut harness = Harness::ready();
    harness
        .player
        .play(vec![AnimationUnit::bones(vec![head(0.3, Direction::Increase)])], false);
    assert_eq!(harness.player.status(), PlaybackStatus::Paused);

    harness.frames(20);
    assert_eq!(harness.rotation("mixamorigHead").x, 0.0);

    harness.player.resume();
    assert!(harness.run_until(20, |player| player.queue_index() == 1));
}

#[test]
fn skip_to_end_snaps_the_active_sequence() {
    let sequence = BoneSequence::new(vec![
        BoneTarget::rotation("mixamorigRightArm", Axis::Z, -1.3, Direction::Decrease),
        BoneTarget::rotation("mixamorigRightForeArm", Axis::Y, 0.7, Direction::Decrease),
        BoneTarget::rotation("mixamorigHead", Axis::Y, 0.25, Direction::Increase),
    ]);

    let mut harness = Harness::ready();
    harness
        .player
        .play(vec![AnimationUnit::bones(vec![sequence])], true);
    harness.frame();

    harness.player.skip_to_end();
    assert_eq!(harness.rotation("mixamorigRightArm").z, -1.3);
    assert_eq!(harness.rotation("mixamorigRightForeArm").y, 0.7);
    assert_eq!(harness.rotation("mixamorigHead").y, 0.25);
    assert_eq!(harness.player.queue_index(), 1);
    assert_eq!(harness.completions(), 1);
}

#[test]
fn restart_replays_the_current_unit() {
    let mut harness = Harness::ready();
    harness.player.play(
        vec![AnimationUnit::labelled_bones(
            "NOD",
            vec![head(0.3, Direction::Increase), head(0.6, Direction::Increase)],
        )],
        true,
    );
    assert!(harness.run_until(100, |player| player.status() == PlaybackStatus::AwaitingPause));

    harness.player.restart();
    assert!(has_message(&harness.player, "Restarting NOD"));
    assert_eq!(harness.player.status(), PlaybackStatus::Playing);
    assert_eq!(harness.player.pose_phase(), PosePhase::Advancing);

    assert!(harness.run_until(200, |player| player.queue_index() == 1));
    assert_eq!(harness.rotation("mixamorigHead").x, 0.6);
    assert_eq!(harness.completions(), 1);
}

#[test]
fn next_abandons_the_current_unit() {
    let mut harness = Harness::ready();
    harness.player.play(
        vec![
            AnimationUnit::bones(vec![head(1.0, Direction::Increase)]),
            AnimationUnit::bones(vec![rotate("mixamorigLeftHand", Axis::X, 0.2, Direction::Increase)]),
        ],
        true,
    );
    harness.frames(2);

    harness.player.next();
    assert_eq!(harness.player.queue_index(), 1);
    assert_eq!(harness.player.pose_phase(), PosePhase::Advancing);
    assert!(harness.rotation("mixamorigHead").x < 1.0);

    harness.player.next();
    assert_eq!(harness.player.queue_index(), 2);
    assert_eq!(harness.completions(), 1);

    harness.player.next();
    assert_eq!(harness.completions(), 1);
}

#[test]
fn stop_clears_the_request_and_returns_to_rest() {
    let mut harness = Harness::ready();
    harness.player.play(
        vec![AnimationUnit::bones(vec![rotate(
            "mixamorigNeck",
            Axis::X,
            0.8,
            Direction::Increase,
        )])],
        true,
    );
    harness.frames(3);
    assert!(harness.rotation("mixamorigNeck").x > PI / 12.0);

    harness.player.stop();
    assert_eq!(harness.player.status(), PlaybackStatus::Idle);
    assert_eq!(harness.player.queue_len(), 0);
    assert_eq!(harness.player.pose_phase(), PosePhase::Idle);
    assert_eq!(harness.rotation("mixamorigNeck").x, PI / 12.0);

    harness.frames(100);
    assert_eq!(harness.completions(), 0);
}

#[test]
fn reset_rewinds_paused_at_rest() {
    let mut harness = Harness::ready();
    harness.player.play(
        vec![
            AnimationUnit::bones(vec![rotate("mixamorigNeck", Axis::X, 0.5, Direction::Increase)]),
            AnimationUnit::bones(vec![head(0.3, Direction::Increase)]),
        ],
        true,
    );
    assert!(harness.run_until(100, |player| player.queue_index() == 1));

    harness.player.reset();
    assert_eq!(harness.player.queue_index(), 0);
    assert_eq!(harness.player.queue_len(), 2);
    assert_eq!(harness.player.status(), PlaybackStatus::Paused);
    assert!(harness.player.is_paused());
    assert_eq!(harness.rotation("mixamorigNeck").x, PI / 12.0);

    harness.player.resume();
    assert!(harness.run_until(400, |player| player.queue_index() == 2));
    assert_eq!(harness.completions(), 1);
}

#[test]
fn invalid_speeds_are_rejected() {
    let mut harness = Harness::ready();
    assert!(!harness.player.set_speed(0.0));
    assert!(!harness.player.set_speed(-0.1));
    assert!(!harness.player.set_speed(f32::NAN));
    assert!(approx(harness.player.speed(), 0.1));

    assert!(harness.player.set_speed(0.3));
    assert!(approx(harness.player.speed(), 0.3));
    assert!(approx(harness.player.config().speed, 0.3));
}

#[test]
fn faster_speed_finishes_sooner() {
    let mut harness = Harness::ready();
    harness
        .player
        .play(vec![AnimationUnit::bones(vec![head(1.0, Direction::Increase)])], true);
    harness.frames(2);
    harness.player.set_speed(0.2);

    // 0.8 left at 0.2 per tick.
    harness.frames(3);
    assert_eq!(harness.player.queue_index(), 0);
    harness.frame();
    assert_eq!(harness.player.queue_index(), 1);
}

// ============================================================================
// Clips
// ============================================================================

#[test]
fn clip_plays_for_its_authored_length() {
    let mut harness = Harness::ready();
    harness.loader.insert(HELLO, clip_model("hello", 1.0));
    harness.player.play(vec![AnimationUnit::clip(HELLO)], true);
    assert_eq!(harness.player.clip_phase(), ClipPhase::Loading);

    harness.frame();
    let loaded_at = harness.clock.now();
    assert_eq!(harness.player.clip_phase(), ClipPhase::Running);
    assert_eq!(harness.player.stage().displayed_source(), Some(HELLO));
    assert!(has_message(&harness.player, "Clip /glb/hello.glb loaded (1.00s)"));

    assert!(harness.run_until(200, |player| player.queue_index() == 1));
    let elapsed = harness.clock.now() - loaded_at;
    assert!(elapsed >= Duration::from_secs(1));
    assert!(elapsed < Duration::from_millis(1000 + FRAME_MS));
    assert_eq!(harness.completions(), 1);
    assert_eq!(harness.player.clip_phase(), ClipPhase::Idle);
}

#[test]
fn clip_drives_the_displayed_model() {
    let mut harness = Harness::ready();
    harness.loader.insert(HELLO, clip_model("hello", 1.0));
    harness.player.play(vec![AnimationUnit::clip(HELLO)], true);
    harness.frames(30);

    let z = harness.rotation("mixamorigRightArm").z;
    assert!(z > 0.1 && z < 1.0, "right arm at {z}");
}

#[test]
fn duration_override_wins_over_the_clip() {
    let mut harness = Harness::ready();
    harness.loader.insert(HELLO, clip_model("hello", 1.0));
    harness
        .player
        .play(vec![AnimationUnit::clip_with_duration(HELLO, 0.25)], true);

    harness.frame();
    harness.wait(240);
    assert_eq!(harness.completions(), 0);
    harness.wait(20);
    assert_eq!(harness.completions(), 1);
}

#[test]
fn failed_clip_counts_as_zero_length() {
    let mut harness = Harness::ready();
    harness
        .loader
        .fail("/glb/broken.glb", AssetError::Gltf("bad header".to_string()));
    harness.player.play(
        vec![
            AnimationUnit::clip("/glb/broken.glb"),
            AnimationUnit::clip("/glb/missing.glb"),
        ],
        true,
    );

    harness.frame();
    harness.frame();
    assert_eq!(harness.player.queue_index(), 2);
    assert_eq!(harness.completions(), 1);

    let errors: Vec<String> = harness
        .player
        .debug_events()
        .into_iter()
        .filter(|event| event.level == DebugLevel::Error)
        .map(|event| event.message)
        .collect();
    assert_eq!(errors.len(), 2);
    assert!(errors[0].contains("/glb/broken.glb"));
    assert!(errors[1].contains("Asset not found"));
}

#[test]
fn paused_clip_keeps_its_remaining_time() {
    let mut harness = Harness::ready();
    harness.loader.insert(HELLO, clip_model("hello", 1.0));
    harness.player.play(vec![AnimationUnit::clip(HELLO)], true);
    harness.frame();

    harness.wait(500);
    harness.player.pause();
    assert_eq!(harness.player.clip_phase(), ClipPhase::Suspended);
    let action = harness
        .player
        .stage()
        .state()
        .and_then(|state| state.action())
        .expect("clip playing");
    assert!(action.paused);

    harness.wait(5000);
    assert_eq!(harness.completions(), 0);

    harness.player.resume();
    assert_eq!(harness.player.clip_phase(), ClipPhase::Running);
    harness.wait(400);
    assert_eq!(harness.completions(), 0);
    harness.wait(200);
    assert_eq!(harness.completions(), 1);
}

#[test]
fn skip_to_end_finishes_a_clip() {
    let mut harness = Harness::ready();
    harness.loader.insert(HELLO, clip_model("hello", 1.0));
    harness.player.play(vec![AnimationUnit::clip(HELLO)], true);
    harness.frame();

    harness.player.skip_to_end();
    assert_eq!(harness.completions(), 1);
    assert_eq!(harness.player.clip_phase(), ClipPhase::Idle);
    assert!(approx(harness.rotation("mixamorigRightArm").z, 1.0));
}

#[test]
fn oversized_clip_duration_waits_without_failing() {
    let mut harness = Harness::ready();
    harness.loader.insert(HELLO, clip_model("hello", 1.0));
    harness
        .player
        .play(vec![AnimationUnit::clip_with_duration(HELLO, 1.0e20)], true);

    harness.frames(3);
    assert_eq!(harness.player.clip_phase(), ClipPhase::Running);

    harness.player.pause();
    harness.wait(1000);
    harness.player.resume();
    harness.wait(60_000);
    assert_eq!(harness.completions(), 0);

    harness.player.skip_to_end();
    assert_eq!(harness.completions(), 1);
}

#[test]
fn swapping_clips_disposes_the_previous_model() {
    let mut harness = Harness::ready();
    harness.loader.insert("/glb/yes.glb", clip_model("yes", 0.1));
    harness.loader.insert("/glb/no.glb", clip_model("no", 0.1));
    harness.player.play(
        vec![AnimationUnit::clip("/glb/yes.glb"), AnimationUnit::clip("/glb/no.glb")],
        true,
    );

    assert!(harness.run_until(100, |player| {
        player.stage().displayed_source() == Some("/glb/no.glb")
    }));
    let stats = harness.renderer.stats();
    assert_eq!(stats.live_geometries, 1);
    assert_eq!(stats.live_materials, 1);
    assert_eq!(stats.surfaces_created, 1);

    let state = harness.player.stage().state().expect("mounted");
    // Two lights plus the displayed model.
    assert_eq!(state.scene.root_nodes.len(), 3);
}

#[test]
fn avatar_returns_at_rest_after_a_clip() {
    let mut harness = Harness::ready();
    harness.loader.insert(HELLO, clip_model("hello", 0.1));
    harness.player.play(
        vec![
            AnimationUnit::clip(HELLO),
            AnimationUnit::bones(vec![head(0.3, Direction::Increase)]),
        ],
        true,
    );

    assert!(harness.run_until(100, |player| player.queue_index() == 1));
    assert_eq!(harness.player.stage().displayed_source(), Some(AVATAR));
    assert_eq!(harness.rotation("mixamorigNeck").x, PI / 12.0);

    assert!(harness.run_until(100, |player| player.queue_index() == 2));
    assert_eq!(harness.completions(), 1);
}

// ============================================================================
// Scene lifecycle
// ============================================================================

#[test]
fn avatar_swap_during_clip_load_never_attaches_the_stale_clip() {
    let mut harness = Harness::ready();
    harness.loader.insert(HELLO, clip_model("hello", 1.0));
    harness.loader.insert(OTHER_AVATAR, Prefab::mixamo_rig("xbot"));
    harness.loader.hold(HELLO);

    harness.player.play(vec![AnimationUnit::clip(HELLO)], true);
    harness.frame();
    assert_eq!(harness.player.clip_phase(), ClipPhase::Loading);

    harness.player.set_avatar(OTHER_AVATAR);
    harness.loader.release(HELLO);
    harness.frame();

    let stage = harness.player.stage();
    assert_eq!(stage.avatar_path(), Some(OTHER_AVATAR));
    assert_eq!(stage.displayed_source(), Some(OTHER_AVATAR));
    assert_eq!(stage.generation(), 2);
    let state = stage.state().expect("mounted");
    assert_eq!(state.scene.root_nodes.len(), 3);
    assert!(state.scene.find_first_by_name("xbot").is_some());
    assert!(state.scene.find_first_by_name("hello").is_none());

    let stats = harness.renderer.stats();
    assert_eq!(stats.surfaces_created, 2);
    assert_eq!(stats.surfaces_destroyed, 1);
    assert_eq!(stats.live_surfaces, 1);
    assert_eq!(stats.live_geometries, 1);

    // The clip unit starts over once the new avatar is at rest.
    assert!(harness.run_until(200, |player| player.queue_index() == 1));
    assert_eq!(
        harness.loader.requests(),
        vec![AVATAR, HELLO, OTHER_AVATAR, HELLO]
    );
    assert_eq!(harness.completions(), 1);
}

#[test]
fn stale_clip_from_a_careless_loader_is_ignored() {
    let loader = MemoryLoader::new()
        .with(AVATAR, Prefab::mixamo_rig("ybot"))
        .with(OTHER_AVATAR, Prefab::mixamo_rig("xbot"))
        .with(HELLO, clip_model("hello", 1.0));
    let mut harness =
        Harness::with_loader(PlayerConfig::default(), loader.clone(), IgnoresCancel(loader));
    harness.settle();

    harness.loader.hold(HELLO);
    harness.player.play(vec![AnimationUnit::clip(HELLO)], true);
    harness.frame();

    harness.player.set_avatar(OTHER_AVATAR);
    harness.loader.release(HELLO);
    harness.frame();

    let stage = harness.player.stage();
    assert_eq!(stage.displayed_source(), Some(OTHER_AVATAR));
    let state = stage.state().expect("mounted");
    assert_eq!(state.scene.root_nodes.len(), 3);
    assert!(state.scene.find_first_by_name("hello").is_none());
    assert_eq!(harness.renderer.stats().live_geometries, 1);
}

#[test]
fn setting_the_same_avatar_is_a_noop() {
    let mut harness = Harness::ready();
    harness.player.set_avatar(AVATAR);
    assert_eq!(harness.player.stage().generation(), 1);
    assert_eq!(harness.renderer.stats().surfaces_created, 1);
    assert_eq!(harness.loader.requests(), vec![AVATAR]);
}

#[test]
fn unmount_releases_everything() {
    let mut harness = Harness::ready();
    harness.loader.insert(HELLO, clip_model("hello", 1.0));
    harness.loader.hold(HELLO);
    harness.player.play(vec![AnimationUnit::clip(HELLO)], true);

    let before = harness.renderer.stats();
    assert_eq!(before.live_geometries, 1);
    assert!(before.frames_rendered > 0);

    harness.player.unmount();
    let after = harness.renderer.stats();
    assert_eq!(after.live_surfaces, 0);
    assert_eq!(after.live_geometries, 0);
    assert_eq!(after.live_materials, 0);
    assert_eq!(after.surfaces_destroyed, 1);
    assert!(!harness.player.stage().is_mounted());
    assert_eq!(harness.loader.pending(), 0);

    harness.loader.release(HELLO);
    harness.frames(20);
    assert_eq!(harness.renderer.stats().frames_rendered, after.frames_rendered);
    assert_eq!(harness.completions(), 0);
}

// ============================================================================
// Debug events and viewport
// ============================================================================

#[test]
fn debug_sink_receives_events() {
    let mut harness = Harness::new(PlayerConfig::default());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    harness
        .player
        .on_debug_event(move |event| sink.borrow_mut().push(event.clone()));

    harness.settle();
    let seen = seen.borrow();
    assert!(seen.iter().any(|e| e.message == "Avatar /models/ybot.glb loaded"));
    assert!(seen.iter().any(|e| e.message == "Rest pose reached"));
    assert!(seen.iter().all(|e| e.level == DebugLevel::Info));
}

#[test]
fn clearing_debug_events() {
    let mut harness = Harness::ready();
    assert!(!harness.player.debug_events().is_empty());
    harness.player.clear_debug_events();
    assert!(harness.player.debug_events().is_empty());
}

#[test]
fn resize_updates_surface_and_camera() {
    let mut harness = Harness::ready();
    harness.player.resize(1024, 768);
    assert_eq!(harness.renderer.stats().surface_size, (1024, 768));
    assert_eq!(harness.player.config().viewport.width, 1024);
    let camera = &harness.player.stage().state().expect("mounted").camera;
    assert!(approx(camera.aspect, 1024.0 / 768.0));

    harness.player.resize(0, 300);
    assert_eq!(harness.renderer.stats().surface_size, (1024, 768));
}
