use glam::DVec3;

use crate::Aabb;

/// What LOD selection needs from the viewer each frame.
pub trait ViewVolume {
    /// Whether a world-space box may be on screen.
    fn is_visible(&self, aabb: &Aabb) -> bool;

    /// Eye position in world space.
    fn position(&self) -> DVec3;

    /// Viewport width in pixels.
    fn viewport_width(&self) -> u32;

    fn distance_to(&self, point: DVec3) -> f64 {
        (point - self.position()).length()
    }
}
