use std::collections::VecDeque;

use crate::animation::unit::AnimationUnit;
use crate::lexicon::BoneSequence;

/// Ordered playback request plus its cursor.
///
/// Units are consumed strictly front to back. For a bone unit, the
/// sequences that have not finished yet are held in `sequences`; the front
/// one is the sequence the pose driver is working on.
#[derive(Debug, Clone, Default)]
pub struct AnimationQueue {
    units: Vec<AnimationUnit>,
    index: usize,
    entered: bool,
    sequences: VecDeque<BoneSequence>,
}

impl AnimationQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the request wholesale and rewinds to the first unit.
    pub fn replace(&mut self, units: Vec<AnimationUnit>) {
        self.units = units;
        self.index = 0;
        self.entered = false;
        self.sequences.clear();
    }

    pub fn clear(&mut self) {
        self.replace(Vec::new());
    }

    /// Back to the first unit, keeping the request.
    pub fn rewind(&mut self) {
        self.index = 0;
        self.entered = false;
        self.sequences.clear();
    }

    #[must_use]
    pub fn units(&self) -> &[AnimationUnit] {
        &self.units
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Index of the current unit; equals [`len`](Self::len) once finished.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.index >= self.units.len()
    }

    #[must_use]
    pub fn current(&self) -> Option<&AnimationUnit> {
        self.units.get(self.index)
    }

    /// Whether the current unit has been started.
    #[must_use]
    pub fn entered(&self) -> bool {
        self.entered
    }

    /// Starts the current unit, loading its sequences for bone units.
    pub fn enter_current(&mut self) -> Option<&AnimationUnit> {
        let unit = self.units.get(self.index)?;
        self.sequences.clear();
        if let AnimationUnit::Bones { sequences, .. } = unit {
            self.sequences.extend(sequences.iter().cloned());
        }
        self.entered = true;
        Some(unit)
    }

    /// Forgets progress within the current unit so it starts again from the top.
    pub fn reenter_current(&mut self) {
        self.entered = false;
        self.sequences.clear();
    }

    #[must_use]
    pub fn front_sequence(&self) -> Option<&BoneSequence> {
        self.sequences.front()
    }

    #[must_use]
    pub fn remaining_sequences(&self) -> usize {
        self.sequences.len()
    }

    /// Drops the finished front sequence.
    pub fn complete_sequence(&mut self) -> Option<BoneSequence> {
        self.sequences.pop_front()
    }

    /// Moves past the current unit. Returns `true` when that was the last one.
    /// Never moves beyond the end.
    pub fn advance(&mut self) -> bool {
        if self.index < self.units.len() {
            self.index += 1;
        }
        self.entered = false;
        self.sequences.clear();
        self.is_finished()
    }
}
