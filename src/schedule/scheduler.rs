use std::time::Duration;

use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Cancelable handle of a single-shot timer.
    pub struct TimerHandle;
}

/// Handle of a pending frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

struct Timer<E> {
    deadline: Duration,
    /// Insertion order; breaks ties between equal deadlines.
    seq: u64,
    event: E,
}

/// Single-shot timers plus at most one outstanding frame request.
///
/// Nothing fires on its own: the owner asks for due timers with
/// [`pop_due`](Self::pop_due) and takes the frame request with
/// [`take_frame`](Self::take_frame), one at a time, so a handler may cancel
/// or schedule further work before the next one is looked at.
pub struct Scheduler<E> {
    timers: SlotMap<TimerHandle, Timer<E>>,
    next_seq: u64,

    frame: Option<FrameHandle>,
    next_frame_id: u64,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Scheduler<E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            next_seq: 0,
            frame: None,
            next_frame_id: 0,
        }
    }

    // ========================================================================
    // Timers
    // ========================================================================

    /// Arms a timer that becomes due `delay` after `now`. Deadlines saturate,
    /// so `Duration::MAX` never fires.
    pub fn schedule(&mut self, now: Duration, delay: Duration, event: E) -> TimerHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.insert(Timer {
            deadline: now.saturating_add(delay),
            seq,
            event,
        })
    }

    /// Disarms a timer. Returns its event if it was still pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> Option<E> {
        self.timers.remove(handle).map(|timer| timer.event)
    }

    #[must_use]
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.timers.contains_key(handle)
    }

    /// Time left until `handle` is due, zero if overdue.
    #[must_use]
    pub fn remaining(&self, handle: TimerHandle, now: Duration) -> Option<Duration> {
        self.timers
            .get(handle)
            .map(|timer| timer.deadline.saturating_sub(now))
    }

    /// Removes and returns the earliest timer due at `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<(TimerHandle, E)> {
        let handle = self
            .timers
            .iter()
            .filter(|(_, timer)| timer.deadline <= now)
            .min_by_key(|(_, timer)| (timer.deadline, timer.seq))
            .map(|(handle, _)| handle)?;
        self.timers.remove(handle).map(|timer| (handle, timer.event))
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.values().map(|timer| timer.deadline).min()
    }

    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    // ========================================================================
    // Frame requests
    // ========================================================================

    /// Requests one frame callback. Requests do not stack: asking again
    /// before the frame ran returns the outstanding handle.
    pub fn request_frame(&mut self) -> FrameHandle {
        if let Some(handle) = self.frame {
            return handle;
        }
        let handle = FrameHandle(self.next_frame_id);
        self.next_frame_id += 1;
        self.frame = Some(handle);
        handle
    }

    pub fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.frame == Some(handle) {
            self.frame = None;
        }
    }

    /// Consumes the outstanding frame request, if any.
    pub fn take_frame(&mut self) -> Option<FrameHandle> {
        self.frame.take()
    }

    #[must_use]
    pub fn frame_requested(&self) -> bool {
        self.frame.is_some()
    }
}
