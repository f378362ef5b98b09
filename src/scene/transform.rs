use glam::{Affine3A, EulerRot, Quat, Vec3};

use crate::lexicon::Channel;

/// TRS transform with matrix caches and a dirty check.
///
/// Rotation is kept as XYZ Euler angles because bone targets drive one
/// rotation axis at a time.
#[derive(Debug, Clone)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in radians, XYZ order.
    pub rotation: Vec3,
    pub scale: Vec3,

    pub(crate) local_matrix: Affine3A,
    pub(crate) world_matrix: Affine3A,

    last_position: Vec3,
    last_rotation: Vec3,
    last_scale: Vec3,
    force_update: bool,
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,

            local_matrix: Affine3A::IDENTITY,
            world_matrix: Affine3A::IDENTITY,

            last_position: Vec3::ZERO,
            last_rotation: Vec3::ZERO,
            last_scale: Vec3::ONE,
            force_update: true,
        }
    }

    #[must_use]
    pub fn from_trs(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        let mut transform = Self::new();
        transform.position = position;
        transform.set_rotation_quat(rotation);
        transform.scale = scale;
        transform
    }

    /// Recomputes the local matrix if any TRS value changed since the last call.
    /// Returns whether it changed.
    pub fn update_local_matrix(&mut self) -> bool {
        let changed = self.position != self.last_position
            || self.rotation != self.last_rotation
            || self.scale != self.last_scale
            || self.force_update;

        if changed {
            self.local_matrix =
                Affine3A::from_scale_rotation_translation(self.scale, self.quaternion(), self.position);

            self.last_position = self.position;
            self.last_rotation = self.rotation;
            self.last_scale = self.scale;
            self.force_update = false;
        }

        changed
    }

    #[must_use]
    pub fn quaternion(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    pub fn set_rotation_quat(&mut self, rotation: Quat) {
        let (x, y, z) = rotation.to_euler(EulerRot::XYZ);
        self.rotation = Vec3::new(x, y, z);
    }

    /// The vector a bone target of `channel` writes into.
    pub fn channel_mut(&mut self, channel: Channel) -> &mut Vec3 {
        match channel {
            Channel::Rotation => &mut self.rotation,
            Channel::Position => &mut self.position,
        }
    }

    #[must_use]
    pub fn channel(&self, channel: Channel) -> Vec3 {
        match channel {
            Channel::Rotation => self.rotation,
            Channel::Position => self.position,
        }
    }

    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.world_matrix
    }

    pub fn mark_dirty(&mut self) {
        self.force_update = true;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
