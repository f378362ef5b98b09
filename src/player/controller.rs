use std::time::Duration;

use crate::animation::{
    AnimationQueue, AnimationUnit, ClipDriver, ClipPhase, PoseDriver, PoseOrigin, PosePhase,
    StepOutcome,
};
use crate::assets::{AssetLoader, LoadEvent, LoadTicket};
use crate::config::PlayerConfig;
use crate::lexicon::rest_pose;
use crate::player::debug::{DebugEvent, DebugLog};
use crate::player::state::{PlaybackState, PlaybackStatus, PlayerInput};
use crate::render::RenderBackend;
use crate::scene::Stage;
use crate::schedule::{Clock, FrameHandle, Scheduler, TimerHandle};
use crate::translate::Translator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlayerTimer {
    /// The delay after a completed sequence is over.
    PauseElapsed,
    /// The current clip has played for its duration.
    ClipFinished,
}

/// Playback controller: the public surface of one avatar player.
///
/// Owns one [`Stage`], the request queue and both drivers. It never blocks
/// and never spawns work of its own; the host calls [`update`](Self::update)
/// once per display frame and everything (asset completions, timers, the
/// per-frame tick) happens inside that call, in that order.
///
/// ```rust,ignore
/// let mut player = SignPlayer::new(config, GltfLoader::new("public"), renderer, MonotonicClock::new());
/// player.on_complete(|| println!("done"));
/// player.play_text("hello");
/// loop {
///     player.update();
/// }
/// ```
pub struct SignPlayer {
    config: PlayerConfig,
    translator: Translator,

    loader: Box<dyn AssetLoader>,
    clock: Box<dyn Clock>,
    stage: Stage,
    scheduler: Scheduler<PlayerTimer>,

    queue: AnimationQueue,
    pose: PoseDriver,
    clips: ClipDriver,
    state: PlaybackState,

    paused: bool,
    pause_timer: Option<TimerHandle>,
    frame: Option<FrameHandle>,
    last_frame: Option<Duration>,

    avatar_ticket: Option<LoadTicket>,
    avatar_ready: bool,
    rest_pending: bool,

    completed: bool,
    on_complete: Option<Box<dyn FnMut()>>,
    debug: DebugLog,
}

impl SignPlayer {
    /// Creates the player and mounts its stage; the avatar starts loading
    /// right away.
    pub fn new(
        config: PlayerConfig,
        loader: impl AssetLoader + 'static,
        renderer: impl RenderBackend + 'static,
        clock: impl Clock + 'static,
    ) -> Self {
        let viewport = (config.viewport.width, config.viewport.height);
        let state = PlaybackState::new(config.speed, config.pause_duration_ms);
        let paused = !config.auto_play;

        let mut player = Self {
            config,
            translator: Translator::default(),
            loader: Box::new(loader),
            clock: Box::new(clock),
            stage: Stage::new(Box::new(renderer), viewport),
            scheduler: Scheduler::new(),
            queue: AnimationQueue::new(),
            pose: PoseDriver::new(),
            clips: ClipDriver::new(),
            state,
            paused,
            pause_timer: None,
            frame: None,
            last_frame: None,
            avatar_ticket: None,
            avatar_ready: false,
            rest_pending: false,
            completed: false,
            on_complete: None,
            debug: DebugLog::new(),
        };
        player.mount_stage();
        player
    }

    #[must_use]
    pub fn with_translator(mut self, translator: Translator) -> Self {
        self.translator = translator;
        self
    }

    /// Called once when the last unit of a request completes.
    pub fn on_complete(&mut self, callback: impl FnMut() + 'static) {
        self.on_complete = Some(Box::new(callback));
    }

    /// Receives every debug event as it is produced.
    pub fn on_debug_event(&mut self, sink: impl FnMut(&DebugEvent) + 'static) {
        self.debug.set_sink(Box::new(sink));
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    #[must_use]
    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    pub fn translator_mut(&mut self) -> &mut Translator {
        &mut self.translator
    }

    #[must_use]
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    #[must_use]
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    #[must_use]
    pub fn status(&self) -> PlaybackStatus {
        self.state.status
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[must_use]
    pub fn queue_index(&self) -> usize {
        self.queue.index()
    }

    #[must_use]
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn speed(&self) -> f32 {
        self.state.speed
    }

    #[must_use]
    pub fn pause_duration(&self) -> Duration {
        self.state.pause_duration
    }

    #[must_use]
    pub fn is_avatar_ready(&self) -> bool {
        self.avatar_ready
    }

    #[must_use]
    pub fn pose_phase(&self) -> PosePhase {
        self.pose.phase()
    }

    #[must_use]
    pub fn clip_phase(&self) -> ClipPhase {
        self.clips.phase()
    }

    /// Name of the sign being shown, if any.
    #[must_use]
    pub fn current_unit_label(&self) -> Option<String> {
        self.queue.current().map(AnimationUnit::label)
    }

    /// The most recent debug events, oldest first.
    #[must_use]
    pub fn debug_events(&self) -> Vec<DebugEvent> {
        self.debug.iter().cloned().collect()
    }

    pub fn clear_debug_events(&mut self) {
        self.debug.clear();
    }

    // ========================================================================
    // Requests
    // ========================================================================

    pub fn set_input(&mut self, input: impl Into<PlayerInput>) {
        match input.into() {
            PlayerInput::Units(units) => self.play(units, self.config.auto_play),
            PlayerInput::Text(text) => self.play_text(&text),
        }
    }

    /// Replaces the request. With `auto_play` playback starts at once,
    /// otherwise the player waits paused.
    pub fn play(&mut self, units: Vec<AnimationUnit>, auto_play: bool) {
        self.abandon_current_unit();
        self.queue.replace(units);
        self.completed = false;
        self.paused = !auto_play;

        if self.queue.is_empty() {
            self.debug.warn("Nothing to play");
        } else {
            self.debug.info(format!("Queued {} animation units", self.queue.len()));
            self.pump();
            self.ensure_frame();
        }
        self.sync_state();
    }

    /// Translates `text` in word mode and plays the result.
    pub fn play_text(&mut self, text: &str) {
        let translation = self.translator.translate_text_detailed(text);
        if !translation.unmatched.is_empty() {
            self.debug
                .info(format!("No sign for: {}", translation.unmatched.join(", ")));
        }
        self.play(translation.units, self.config.auto_play);
    }

    /// Translates `text` in phrase mode and plays the matching clips.
    pub fn play_phrases(&mut self, text: &str) {
        let translation = self.translator.translate_phrases_detailed(text);
        if !translation.unmatched.is_empty() {
            self.debug
                .info(format!("No clip for: {}", translation.unmatched.join(", ")));
        }
        self.play(translation.units, self.config.auto_play);
    }

    // ========================================================================
    // Transport
    // ========================================================================

    pub fn pause(&mut self) {
        if self.paused {
            return;
        }
        self.paused = true;
        let now = self.clock.now();
        self.clips.suspend(&mut self.scheduler, now);
        self.stage.set_clip_paused(true);
        self.debug.info("Paused");
        self.sync_state();
    }

    pub fn resume(&mut self) {
        if !self.paused {
            return;
        }
        self.paused = false;
        self.stage.set_clip_paused(false);
        let now = self.clock.now();
        self.clips
            .arm(&mut self.scheduler, now, PlayerTimer::ClipFinished);
        self.pump();
        self.ensure_frame();
        self.debug.info("Resumed");
        self.sync_state();
    }

    /// Starts the current unit again from its first sequence. Later units
    /// keep their place.
    pub fn restart(&mut self) {
        let Some(label) = self.current_unit_label() else {
            return;
        };
        self.abandon_current_unit();
        self.queue.reenter_current();
        self.debug.info(format!("Restarting {label}"));
        self.pump();
        self.ensure_frame();
        self.sync_state();
    }

    /// Completes the active sequence (or clip) immediately.
    pub fn skip_to_end(&mut self) {
        if self.pose.skip_to_end(&mut self.stage) {
            self.debug.info("Skipped to end of sequence");
            self.on_sequence_complete();
        } else if self.queue.current().is_some_and(AnimationUnit::is_clip)
            && self.clips.phase() != ClipPhase::Idle
        {
            self.stage.finish_clip();
            self.clips.cancel(self.loader.as_mut(), &mut self.scheduler);
            self.debug.info("Skipped to end of clip");
            self.finish_unit();
            self.pump();
        }
        self.sync_state();
    }

    /// Abandons the current unit and moves on to the next one.
    pub fn next(&mut self) {
        if self.queue.is_finished() {
            return;
        }
        self.abandon_current_unit();
        self.finish_unit();
        self.pump();
        self.sync_state();
    }

    /// Clears the request and returns the avatar to its rest pose.
    pub fn stop(&mut self) {
        self.abandon_current_unit();
        self.pose.clear();
        self.rest_pending = false;
        self.queue.clear();
        self.completed = false;
        self.snap_rest_pose();
        self.debug.info("Stopped");
        self.sync_state();
    }

    /// Returns the avatar to its rest pose and rewinds the request to its
    /// first unit, paused.
    pub fn reset(&mut self) {
        self.abandon_current_unit();
        self.pose.clear();
        self.rest_pending = false;
        self.queue.rewind();
        self.completed = false;
        self.paused = true;
        self.snap_rest_pose();
        self.debug.info("Reset");
        self.sync_state();
    }

    /// Changes the stepping rate for every following tick. Non-positive or
    /// non-finite values are rejected.
    pub fn set_speed(&mut self, speed: f32) -> bool {
        if !speed.is_finite() || speed <= 0.0 {
            self.debug.warn(format!("Ignoring invalid speed {speed}"));
            return false;
        }
        self.state.speed = speed;
        self.config.speed = speed;
        true
    }

    /// Changes the delay between signs. A delay already running keeps its
    /// original deadline.
    pub fn set_pause_duration(&mut self, ms: u64) {
        self.state.pause_duration = Duration::from_millis(ms);
        self.config.pause_duration_ms = ms;
    }

    // ========================================================================
    // Scene lifecycle
    // ========================================================================

    /// Swaps the avatar. Everything tied to the old one is torn down first;
    /// the current unit restarts once the new avatar is ready.
    pub fn set_avatar(&mut self, path: &str) {
        if self.stage.avatar_path() == Some(path) {
            return;
        }
        self.debug.info(format!("Switching avatar to {path}"));
        self.cancel_pending_work();
        self.stage.stop_clip();
        self.pose.clear();
        self.rest_pending = false;
        self.avatar_ready = false;
        self.queue.reenter_current();
        self.config.avatar_model = path.to_string();
        self.mount_stage();
        self.sync_state();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.viewport.width = width;
        self.config.viewport.height = height;
        self.stage.resize(width, height);
    }

    /// Tears the stage down and cancels every timer, frame request and load.
    /// Later [`update`](Self::update) calls do nothing.
    pub fn unmount(&mut self) {
        self.cancel_pending_work();
        self.stage.teardown();
        self.pose.clear();
        self.avatar_ready = false;
        self.rest_pending = false;
        self.debug.info("Player unmounted");
        self.sync_state();
    }

    fn mount_stage(&mut self) {
        let path = self.config.avatar_model.clone();
        self.stage.mount(&path);
        self.debug.info(format!("Loading avatar {path}"));
        self.avatar_ticket = Some(self.loader.request(&path));
        self.last_frame = None;
        self.ensure_frame();
    }

    fn cancel_pending_work(&mut self) {
        self.scheduler.cancel_all();
        self.pause_timer = None;
        if let Some(frame) = self.frame.take() {
            self.scheduler.cancel_frame(frame);
        }
        if let Some(ticket) = self.avatar_ticket.take() {
            self.loader.cancel(ticket);
        }
        self.clips.cancel(self.loader.as_mut(), &mut self.scheduler);
    }

    // ========================================================================
    // Event loop
    // ========================================================================

    /// Delivers finished loads, fires due timers, then runs the frame tick
    /// if one was requested.
    pub fn update(&mut self) {
        if !self.stage.is_mounted() || self.stage.is_tearing_down() {
            return;
        }
        self.poll_loader();

        let now = self.clock.now();
        while let Some((handle, timer)) = self.scheduler.pop_due(now) {
            self.on_timer(handle, timer);
        }

        if let Some(frame) = self.scheduler.take_frame() {
            if self.frame == Some(frame) {
                self.frame = None;
                self.on_frame(now);
            }
        }
        self.sync_state();
    }

    fn ensure_frame(&mut self) {
        if self.stage.is_mounted() && self.frame.is_none() {
            self.frame = Some(self.scheduler.request_frame());
        }
    }

    fn poll_loader(&mut self) {
        for event in self.loader.poll() {
            if self.stage.is_tearing_down() {
                return;
            }
            match event {
                LoadEvent::Progress {
                    ticket,
                    loaded,
                    total,
                } => {
                    let path = if self.avatar_ticket == Some(ticket) {
                        Some(self.config.avatar_model.as_str())
                    } else if self.clips.ticket() == Some(ticket) {
                        self.clips.path()
                    } else {
                        None
                    };
                    if let (Some(path), true) = (path, total > 0) {
                        let percent = loaded as f64 / total as f64 * 100.0;
                        let message = format!("{path}: {percent:.2}% loaded");
                        self.debug.info(message);
                    }
                }
                LoadEvent::Loaded { ticket, prefab } => {
                    if self.avatar_ticket == Some(ticket) {
                        self.avatar_ticket = None;
                        self.stage.attach_avatar(prefab);
                        self.avatar_ready = true;
                        self.rest_pending = true;
                        self.debug
                            .info(format!("Avatar {} loaded", self.config.avatar_model));
                        self.ensure_frame();
                    } else if let Some(duration) = self.clips.on_loaded(ticket, &prefab, &mut self.stage) {
                        self.debug.info(format!(
                            "Clip {} loaded ({:.2}s)",
                            self.clips.path().unwrap_or_default(),
                            duration.as_secs_f32()
                        ));
                        if self.paused {
                            self.stage.set_clip_paused(true);
                        } else {
                            let now = self.clock.now();
                            self.clips
                                .arm(&mut self.scheduler, now, PlayerTimer::ClipFinished);
                        }
                    } else {
                        log::debug!("Ignoring stale load {ticket:?}");
                    }
                }
                LoadEvent::Failed { ticket, error } => {
                    if self.avatar_ticket == Some(ticket) {
                        self.avatar_ticket = None;
                        // Bone units have nothing to drive; clips still play.
                        self.avatar_ready = true;
                        self.debug.error(format!(
                            "Failed to load avatar {}: {error}",
                            self.config.avatar_model
                        ));
                        self.pump();
                    } else if self.clips.on_failed(ticket, &error) {
                        self.debug.error(format!(
                            "Failed to load clip {}: {error}",
                            self.clips.path().unwrap_or_default()
                        ));
                        if !self.paused {
                            let now = self.clock.now();
                            self.clips
                                .arm(&mut self.scheduler, now, PlayerTimer::ClipFinished);
                        }
                    } else {
                        log::debug!("Ignoring stale load failure {ticket:?}: {error}");
                    }
                }
            }
        }
    }

    fn on_timer(&mut self, handle: TimerHandle, timer: PlayerTimer) {
        if self.stage.is_tearing_down() {
            return;
        }
        match timer {
            PlayerTimer::PauseElapsed => {
                if self.pause_timer != Some(handle) {
                    return;
                }
                self.pause_timer = None;
                self.pose.end_pause();
                self.pump();
            }
            PlayerTimer::ClipFinished => {
                if !self.clips.on_timer(handle) {
                    return;
                }
                self.stage.stop_clip();
                self.finish_unit();
                self.pump();
            }
        }
    }

    fn on_frame(&mut self, now: Duration) {
        if self.stage.is_tearing_down() {
            return;
        }
        let dt = self
            .last_frame
            .map_or(Duration::ZERO, |last| now.saturating_sub(last));
        self.last_frame = Some(now);

        self.tick();
        self.stage.render_frame(dt.as_secs_f32());
        self.ensure_frame();
    }

    /// One pose step. The rest pose preamble keeps easing in while paused;
    /// queue units do not.
    fn tick(&mut self) {
        if self.rest_pending && self.pose.phase() == PosePhase::Idle {
            self.rest_pending = false;
            self.pose.begin(rest_pose(), PoseOrigin::RestPose);
        }

        let may_step = !self.paused || self.pose.origin() == PoseOrigin::RestPose;
        if self.pose.phase() == PosePhase::Advancing && may_step {
            if self.pose.step(&mut self.stage, self.state.speed) == StepOutcome::Completed {
                self.on_sequence_complete();
            }
        } else {
            self.pump();
        }
    }

    /// Starts whatever comes next, if nothing is in progress.
    fn pump(&mut self) {
        loop {
            if self.paused
                || !self.avatar_ready
                || self.rest_pending
                || self.pose.phase() != PosePhase::Idle
                || self.stage.is_tearing_down()
            {
                return;
            }

            if !self.queue.entered() {
                let Some(unit) = self.queue.enter_current() else {
                    return;
                };
                let label = unit.label();
                let clip = match unit {
                    AnimationUnit::Clip {
                        path,
                        duration_seconds,
                    } => Some((path.clone(), *duration_seconds)),
                    AnimationUnit::Bones { .. } => None,
                };
                match clip {
                    Some((path, duration)) => {
                        self.debug.info(format!("Playing clip {label}"));
                        self.clips.begin(&path, duration, self.loader.as_mut());
                        return;
                    }
                    None => {
                        // Coming back from a clip: the avatar reappears at rest.
                        let swapped = self.stage.displayed_source() != self.stage.avatar_path();
                        if self.stage.show_avatar() && swapped {
                            self.stage.snap(&rest_pose());
                        }
                        self.debug.info(format!("Signing {label}"));
                    }
                }
            }

            if self.queue.current().is_some_and(AnimationUnit::is_clip) {
                return;
            }
            match self.queue.front_sequence().cloned() {
                Some(sequence) => {
                    self.pose.begin(sequence, PoseOrigin::Unit);
                    return;
                }
                // A bone unit without sequences has nothing to show.
                None => {
                    if self.finish_unit() {
                        return;
                    }
                }
            }
        }
    }

    fn on_sequence_complete(&mut self) {
        if self.pose.origin() == PoseOrigin::RestPose {
            self.pose.clear();
            self.debug.info("Rest pose reached");
            self.pump();
            return;
        }

        self.queue.complete_sequence();
        self.pose.enter_pause();
        if let Some(previous) = self.pause_timer.take() {
            self.scheduler.cancel(previous);
        }
        let now = self.clock.now();
        self.pause_timer = Some(self.scheduler.schedule(
            now,
            self.state.pause_duration,
            PlayerTimer::PauseElapsed,
        ));

        if self.queue.remaining_sequences() == 0 {
            self.finish_unit();
        }
    }

    /// Moves past the current unit. Returns whether the request is finished.
    fn finish_unit(&mut self) -> bool {
        if self.queue.is_finished() {
            return true;
        }
        let finished = self.queue.advance();
        self.state.index = self.queue.index();
        if finished {
            self.complete();
        }
        finished
    }

    fn complete(&mut self) {
        if self.completed {
            return;
        }
        self.completed = true;
        self.debug.info("All animations complete");
        if let Some(callback) = self.on_complete.as_mut() {
            callback();
        }
    }

    /// Drops the in-progress work of the current unit without moving the
    /// queue. A rest pose preamble in progress is left alone.
    fn abandon_current_unit(&mut self) {
        self.clips.cancel(self.loader.as_mut(), &mut self.scheduler);
        self.stage.stop_clip();
        if let Some(timer) = self.pause_timer.take() {
            self.scheduler.cancel(timer);
        }
        if self.pose.origin() == PoseOrigin::Unit {
            self.pose.clear();
        }
    }

    fn snap_rest_pose(&mut self) {
        if self.stage.show_avatar() {
            self.stage.snap(&rest_pose());
        }
    }

    fn sync_state(&mut self) {
        self.state.index = self.queue.index();
        self.state.status = if self.queue.is_empty() || self.queue.is_finished() {
            PlaybackStatus::Idle
        } else if self.paused {
            PlaybackStatus::Paused
        } else if self.pause_timer.is_some() {
            PlaybackStatus::AwaitingPause
        } else {
            PlaybackStatus::Playing
        };
    }
}
