use glam::Vec3;

use crate::paint::Color;

/// Point light scene entity.
///
/// The flat-colored cube material is unlit, so lights do not feed the shader
/// yet; the entity keeps the scene describing the full intended setup, and a
/// lit material slots in without a data-model change.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Color,
    /// Linear brightness multiplier.
    pub intensity: f32,
    /// Distance beyond which the light contributes nothing.
    pub range: f32,
}

impl PointLight {
    /// White light with the brightness/range used by the demo scene.
    pub fn white(position: Vec3) -> Self {
        Self {
            position,
            color: Color::WHITE,
            intensity: 1.0,
            range: 100.0,
        }
    }
}
