use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Relative tolerance that absorbs float error accumulated while stepping
/// toward a limit. It is scaled by the limit's magnitude (at least 1).
pub const LIMIT_EPSILON: f32 = 4.0 * f32::EPSILON;

/// Transform channel a [`BoneTarget`] drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Euler rotation (radians, XYZ order).
    Rotation,
    /// Local translation.
    Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Borrows the component of `v` this axis names.
    #[inline]
    pub fn component_mut(self, v: &mut Vec3) -> &mut f32 {
        match self {
            Axis::X => &mut v.x,
            Axis::Y => &mut v.y,
            Axis::Z => &mut v.z,
        }
    }

    #[inline]
    #[must_use]
    pub fn component(self, v: Vec3) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }
}

/// Direction of travel toward the limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "+")]
    Increase,
    #[serde(rename = "-")]
    Decrease,
}

impl Direction {
    /// Whether `value` sits at or past `limit` when travelling this way,
    /// allowing for accumulated float error.
    #[inline]
    #[must_use]
    pub fn has_reached(self, value: f32, limit: f32) -> bool {
        let tolerance = LIMIT_EPSILON * limit.abs().max(1.0);
        match self {
            Direction::Increase => value >= limit - tolerance,
            Direction::Decrease => value <= limit + tolerance,
        }
    }

    /// Whether `value` is at `limit` or beyond it, seen from this direction.
    #[inline]
    #[must_use]
    pub fn is_past(self, value: f32, limit: f32) -> bool {
        match self {
            Direction::Increase => value >= limit,
            Direction::Decrease => value <= limit,
        }
    }
}

/// A single-channel, single-axis incremental pose goal for one named bone.
///
/// Serialises as the legacy tuple `[boneName, action, axis, limit, sign]`;
/// deserialises from either that tuple or the typed object form
/// `{ "boneName", "action", "axis", "limit", "sign" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "BoneTargetRepr", into = "RawBoneTarget")]
pub struct BoneTarget {
    pub bone: String,
    pub channel: Channel,
    pub axis: Axis,
    pub limit: f32,
    pub direction: Direction,
}

impl BoneTarget {
    #[must_use]
    pub fn new(
        bone: impl Into<String>,
        channel: Channel,
        axis: Axis,
        limit: f32,
        direction: Direction,
    ) -> Self {
        Self {
            bone: bone.into(),
            channel,
            axis,
            limit,
            direction,
        }
    }

    #[must_use]
    pub fn rotation(bone: impl Into<String>, axis: Axis, limit: f32, direction: Direction) -> Self {
        Self::new(bone, Channel::Rotation, axis, limit, direction)
    }

    #[must_use]
    pub fn position(bone: impl Into<String>, axis: Axis, limit: f32, direction: Direction) -> Self {
        Self::new(bone, Channel::Position, axis, limit, direction)
    }

    #[inline]
    #[must_use]
    pub fn is_reached(&self, value: f32) -> bool {
        self.direction.has_reached(value, self.limit)
    }

    /// Moves `value` one tick of `speed` toward the limit.
    ///
    /// Returns the new value and whether the target is now satisfied. A value
    /// at or past the limit is left untouched and reported satisfied, so
    /// authored data whose direction disagrees with the current pose is a
    /// no-op rather than an error. Any value short of the limit moves, and
    /// lands on the limit exactly once it gets there.
    #[must_use]
    pub fn advance(&self, value: f32, speed: f32) -> (f32, bool) {
        if self.direction.is_past(value, self.limit) {
            return (value, true);
        }

        let moved = match self.direction {
            Direction::Increase => (value + speed).min(self.limit),
            Direction::Decrease => (value - speed).max(self.limit),
        };

        if self.is_reached(moved) {
            (self.limit, true)
        } else {
            (moved, false)
        }
    }

    #[must_use]
    pub fn to_raw(&self) -> RawBoneTarget {
        RawBoneTarget(
            self.bone.clone(),
            self.channel,
            self.axis,
            self.limit,
            self.direction,
        )
    }
}

/// Legacy tuple form `[boneName, action, axis, limit, sign]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBoneTarget(pub String, pub Channel, pub Axis, pub f32, pub Direction);

impl From<RawBoneTarget> for BoneTarget {
    fn from(RawBoneTarget(bone, channel, axis, limit, direction): RawBoneTarget) -> Self {
        Self::new(bone, channel, axis, limit, direction)
    }
}

impl From<BoneTarget> for RawBoneTarget {
    fn from(target: BoneTarget) -> Self {
        RawBoneTarget(
            target.bone,
            target.channel,
            target.axis,
            target.limit,
            target.direction,
        )
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BoneTargetRepr {
    Raw(RawBoneTarget),
    Typed {
        #[serde(rename = "boneName")]
        bone_name: String,
        action: Channel,
        axis: Axis,
        limit: f32,
        sign: Direction,
    },
}

impl From<BoneTargetRepr> for BoneTarget {
    fn from(repr: BoneTargetRepr) -> Self {
        match repr {
            BoneTargetRepr::Raw(raw) => raw.into(),
            BoneTargetRepr::Typed {
                bone_name,
                action,
                axis,
                limit,
                sign,
            } => Self::new(bone_name, action, axis, limit, sign),
        }
    }
}

/// One sign's complete pose change: targets animated together as a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoneSequence {
    targets: Vec<BoneTarget>,
}

impl BoneSequence {
    #[must_use]
    pub fn new(targets: Vec<BoneTarget>) -> Self {
        Self { targets }
    }

    pub fn push(&mut self, target: BoneTarget) {
        self.targets.push(target);
    }

    #[must_use]
    pub fn targets(&self) -> &[BoneTarget] {
        &self.targets
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BoneTarget> {
        self.targets.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl FromIterator<BoneTarget> for BoneSequence {
    fn from_iter<I: IntoIterator<Item = BoneTarget>>(iter: I) -> Self {
        Self {
            targets: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a BoneSequence {
    type Item = &'a BoneTarget;
    type IntoIter = std::slice::Iter<'a, BoneTarget>;

    fn into_iter(self) -> Self::IntoIter {
        self.targets.iter()
    }
}
