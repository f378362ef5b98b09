use glam::Vec3;
use smallvec::SmallVec;

use crate::lexicon::{BoneSequence, BoneTarget, Channel};
use crate::scene::Scene;

/// Anything that can hand out a bone's transform channel by bone name.
pub trait PoseTarget {
    fn channel_mut(&mut self, bone: &str, channel: Channel) -> Option<&mut Vec3>;
}

impl PoseTarget for Scene {
    fn channel_mut(&mut self, bone: &str, channel: Channel) -> Option<&mut Vec3> {
        let key = self.find_first_by_name(bone)?;
        self.get_node_mut(key)
            .map(|node| node.transform.channel_mut(channel))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosePhase {
    /// No sequence active.
    Idle,
    /// Stepping the in-flight targets once per tick.
    Advancing,
    /// Every target of the active sequence is satisfied.
    SequenceComplete,
    /// Waiting out the inter-sign delay.
    Pausing,
}

/// Where the active sequence came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoseOrigin {
    /// A sequence of the current queue unit.
    Unit,
    /// The rest pose preamble eased in after an avatar loads.
    RestPose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Nothing to advance in the current phase.
    Idle,
    /// Targets moved; `remaining` are still in flight.
    Advanced { remaining: usize },
    /// The last in-flight target was satisfied on this tick.
    Completed,
}

/// Per-frame stepper for one [`BoneSequence`] at a time.
///
/// All targets of the active sequence advance together; each leaves the
/// in-flight set as soon as it reaches its limit. The driver never touches
/// the queue itself, the playback controller moves it between phases.
#[derive(Debug, Clone)]
pub struct PoseDriver {
    phase: PosePhase,
    origin: PoseOrigin,
    active: Option<BoneSequence>,
    in_flight: SmallVec<[BoneTarget; 8]>,
}

impl Default for PoseDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl PoseDriver {
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: PosePhase::Idle,
            origin: PoseOrigin::Unit,
            active: None,
            in_flight: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn phase(&self) -> PosePhase {
        self.phase
    }

    #[must_use]
    pub fn origin(&self) -> PoseOrigin {
        self.origin
    }

    #[must_use]
    pub fn active(&self) -> Option<&BoneSequence> {
        self.active.as_ref()
    }

    /// Targets of the active sequence that have not reached their limit yet.
    #[must_use]
    pub fn in_flight(&self) -> &[BoneTarget] {
        &self.in_flight
    }

    /// Makes `sequence` the active one and puts all of its targets in flight.
    pub fn begin(&mut self, sequence: BoneSequence, origin: PoseOrigin) {
        self.in_flight.clear();
        self.in_flight.extend(sequence.iter().cloned());
        self.active = Some(sequence);
        self.origin = origin;
        self.phase = PosePhase::Advancing;
        log::trace!("pose: began sequence of {} targets", self.in_flight.len());
    }

    /// Advances every in-flight target by `speed`.
    ///
    /// A target whose bone cannot be found is dropped with a warning so the
    /// rest of the sequence still completes.
    pub fn step(&mut self, pose: &mut impl PoseTarget, speed: f32) -> StepOutcome {
        if self.phase != PosePhase::Advancing {
            return StepOutcome::Idle;
        }

        self.in_flight.retain(|target| {
            let Some(vector) = pose.channel_mut(&target.bone, target.channel) else {
                log::warn!("pose: bone '{}' not found, skipping target", target.bone);
                return false;
            };
            let value = target.axis.component_mut(vector);
            let (next, reached) = target.advance(*value, speed);
            *value = next;
            !reached
        });

        if self.in_flight.is_empty() {
            self.phase = PosePhase::SequenceComplete;
            StepOutcome::Completed
        } else {
            StepOutcome::Advanced {
                remaining: self.in_flight.len(),
            }
        }
    }

    /// Forces every target of the active sequence onto its limit and marks
    /// the sequence complete. Returns `false` if nothing was active.
    pub fn skip_to_end(&mut self, pose: &mut impl PoseTarget) -> bool {
        if !matches!(
            self.phase,
            PosePhase::Advancing | PosePhase::SequenceComplete
        ) {
            return false;
        }
        let Some(sequence) = &self.active else {
            return false;
        };
        snap_sequence(sequence, pose);
        self.in_flight.clear();
        self.phase = PosePhase::SequenceComplete;
        true
    }

    /// Enters the inter-sign delay after a completed sequence.
    pub fn enter_pause(&mut self) {
        self.in_flight.clear();
        self.active = None;
        self.phase = PosePhase::Pausing;
    }

    /// Leaves the inter-sign delay; the driver is ready for the next sequence.
    pub fn end_pause(&mut self) {
        if self.phase == PosePhase::Pausing {
            self.phase = PosePhase::Idle;
        }
    }

    /// Drops the active sequence without touching the pose.
    pub fn clear(&mut self) {
        self.in_flight.clear();
        self.active = None;
        self.origin = PoseOrigin::Unit;
        self.phase = PosePhase::Idle;
    }
}

/// Sets every target's channel component to its limit in one go.
/// Targets naming missing bones are skipped.
pub fn snap_sequence(sequence: &BoneSequence, pose: &mut impl PoseTarget) {
    for target in sequence {
        match pose.channel_mut(&target.bone, target.channel) {
            Some(vector) => *target.axis.component_mut(vector) = target.limit,
            None => log::warn!("pose: bone '{}' not found, skipping target", target.bone),
        }
    }
}
