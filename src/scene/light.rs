use glam::Vec3;

#[derive(Debug, Clone, PartialEq)]
pub enum LightKind {
    Ambient,
    /// Shines from the owning node's position toward the origin.
    Directional,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub color: Vec3,
    pub intensity: f32,
    pub kind: LightKind,
    pub cast_shadows: bool,
}

impl Light {
    #[must_use]
    pub fn new_ambient(color: Vec3, intensity: f32) -> Self {
        Self {
            color,
            intensity,
            kind: LightKind::Ambient,
            cast_shadows: false,
        }
    }

    #[must_use]
    pub fn new_directional(color: Vec3, intensity: f32) -> Self {
        Self {
            color,
            intensity,
            kind: LightKind::Directional,
            cast_shadows: false,
        }
    }

    #[must_use]
    pub fn with_shadows(mut self) -> Self {
        self.cast_shadows = true;
        self
    }
}
