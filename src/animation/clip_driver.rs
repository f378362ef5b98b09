use std::time::Duration;

use crate::assets::{AssetLoader, LoadTicket, Prefab};
use crate::errors::AssetError;
use crate::scene::Stage;
use crate::schedule::{Scheduler, TimerHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipPhase {
    Idle,
    /// Waiting for the loader.
    Loading,
    /// Loaded; the finish timer is not running (not armed yet, or suspended).
    Suspended,
    /// The finish timer is running.
    Running,
}

/// Drives one clip unit: load, display, play, and time its completion.
///
/// The driver owns the bookkeeping only; the model and its clip player live
/// in the [`Stage`], the timer in the caller's [`Scheduler`].
#[derive(Debug, Default)]
pub struct ClipDriver {
    ticket: Option<LoadTicket>,
    path: Option<String>,
    duration_override: Option<f32>,
    timer: Option<TimerHandle>,
    /// Time left on the finish timer while it is not running.
    remaining: Option<Duration>,
}

impl ClipDriver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> ClipPhase {
        if self.ticket.is_some() {
            ClipPhase::Loading
        } else if self.timer.is_some() {
            ClipPhase::Running
        } else if self.remaining.is_some() {
            ClipPhase::Suspended
        } else {
            ClipPhase::Idle
        }
    }

    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    #[must_use]
    pub fn ticket(&self) -> Option<LoadTicket> {
        self.ticket
    }

    /// Requests `path` from `loader`.
    pub fn begin(
        &mut self,
        path: &str,
        duration_override: Option<f32>,
        loader: &mut dyn AssetLoader,
    ) -> LoadTicket {
        let ticket = loader.request(path);
        self.ticket = Some(ticket);
        self.path = Some(path.to_string());
        self.duration_override = duration_override;
        self.timer = None;
        self.remaining = None;
        ticket
    }

    /// Displays a loaded clip and starts its player.
    ///
    /// Returns the time until the unit completes, or `None` if `ticket` is
    /// not the load this driver is waiting for.
    pub fn on_loaded(&mut self, ticket: LoadTicket, prefab: &Prefab, stage: &mut Stage) -> Option<Duration> {
        if self.ticket != Some(ticket) {
            return None;
        }
        self.ticket = None;

        let path = self.path.clone().unwrap_or_default();
        stage.replace_displayed(prefab, &path);

        let clip = prefab.animations.first().cloned();
        let authored = clip.as_ref().map_or(0.0, |clip| clip.duration);
        let seconds = self.duration_override.unwrap_or(authored);
        let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        match clip {
            Some(clip) => {
                stage.play_clip(clip);
            }
            None => log::debug!("{path} has no baked animation"),
        }

        // Lengths past what a Duration can hold never finish on their own.
        let duration = Duration::try_from_secs_f32(seconds).unwrap_or(Duration::MAX);
        self.remaining = Some(duration);
        Some(duration)
    }

    /// Records a failed load as a zero-length unit so the queue moves on.
    /// Returns `false` for a ticket this driver is not waiting for.
    pub fn on_failed(&mut self, ticket: LoadTicket, error: &AssetError) -> bool {
        if self.ticket != Some(ticket) {
            return false;
        }
        self.ticket = None;
        log::trace!("clip load failed, completing as zero-length: {error}");
        self.remaining = Some(Duration::ZERO);
        true
    }

    /// Starts the finish timer if it is due to run and not running yet.
    pub fn arm<E>(&mut self, scheduler: &mut Scheduler<E>, now: Duration, event: E) -> bool {
        if self.timer.is_some() {
            return false;
        }
        let Some(remaining) = self.remaining.take() else {
            return false;
        };
        self.timer = Some(scheduler.schedule(now, remaining, event));
        true
    }

    /// Stops the finish timer, keeping the time it had left.
    pub fn suspend<E>(&mut self, scheduler: &mut Scheduler<E>, now: Duration) {
        if let Some(handle) = self.timer.take() {
            self.remaining = Some(scheduler.remaining(handle, now).unwrap_or_default());
            scheduler.cancel(handle);
        }
    }

    /// Whether `handle` is this driver's finish timer; if so the unit is done.
    pub fn on_timer(&mut self, handle: TimerHandle) -> bool {
        if self.timer != Some(handle) {
            return false;
        }
        self.timer = None;
        self.remaining = None;
        true
    }

    /// Abandons the unit: cancels the load and the finish timer.
    pub fn cancel<E>(&mut self, loader: &mut dyn AssetLoader, scheduler: &mut Scheduler<E>) {
        if let Some(ticket) = self.ticket.take() {
            loader.cancel(ticket);
        }
        if let Some(handle) = self.timer.take() {
            scheduler.cancel(handle);
        }
        self.path = None;
        self.duration_override = None;
        self.remaining = None;
    }
}
