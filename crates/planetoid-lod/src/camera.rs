//! Viewer model for LOD selection.

use glam::{DMat3, DMat4, DQuat, DVec3};

use crate::{Aabb, Frustum, ViewVolume};

/// A perspective camera with a pixel viewport.
#[derive(Debug, Clone)]
pub struct ViewCamera {
    pub position: DVec3,
    /// Rotation as a unit quaternion.
    pub rotation: DQuat,
    /// Vertical field of view in radians.
    pub fov_y: f64,
    /// Near clip distance (always positive).
    pub near: f64,
    /// Far clip distance (always positive, > near).
    pub far: f64,
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl ViewCamera {
    /// A camera at the origin looking down `-Z`.
    pub fn new(viewport_width: u32, viewport_height: u32, fov_y_degrees: f64, near: f64, far: f64) -> Self {
        assert!(near > 0.0 && far > near, "clip range {near}..{far} is invalid");
        Self {
            position: DVec3::ZERO,
            rotation: DQuat::IDENTITY,
            fov_y: fov_y_degrees.to_radians(),
            near,
            far,
            viewport_width,
            viewport_height,
        }
    }

    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.viewport_width) / f64::from(self.viewport_height.max(1))
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    /// Turns the camera to face `target`. `up` only needs to be roughly
    /// perpendicular to the view direction.
    pub fn look_at(&mut self, target: DVec3, up: DVec3) {
        let Some(forward) = (target - self.position).try_normalize() else {
            return;
        };
        let right = forward
            .cross(up)
            .try_normalize()
            .unwrap_or_else(|| forward.any_orthonormal_vector());
        let up = right.cross(forward);
        self.rotation = DQuat::from_mat3(&DMat3::from_cols(right, up, -forward));
    }

    /// Inverse of the camera's world transform.
    pub fn view_matrix(&self) -> DMat4 {
        DMat4::from_rotation_translation(self.rotation, self.position).inverse()
    }

    /// Reverse-Z perspective: near maps to depth 1, far to depth 0.
    pub fn projection_matrix(&self) -> DMat4 {
        DMat4::perspective_rh(self.fov_y, self.aspect_ratio(), self.far, self.near)
    }

    pub fn view_projection_matrix(&self) -> DMat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// The forward direction (`-Z` in camera space).
    pub fn forward(&self) -> DVec3 {
        self.rotation * DVec3::NEG_Z
    }

    pub fn up(&self) -> DVec3 {
        self.rotation * DVec3::Y
    }

    pub fn right(&self) -> DVec3 {
        self.rotation * DVec3::X
    }

    /// Snapshot of the camera for one frame of culling.
    pub fn view(&self) -> CameraView {
        CameraView {
            frustum: Frustum::from_view_projection(&self.view_projection_matrix()),
            position: self.position,
            viewport_width: self.viewport_width,
        }
    }
}

/// Frustum and eye position captured from a [`ViewCamera`].
#[derive(Debug, Clone)]
pub struct CameraView {
    frustum: Frustum,
    position: DVec3,
    viewport_width: u32,
}

impl ViewVolume for CameraView {
    fn is_visible(&self, aabb: &Aabb) -> bool {
        self.frustum.is_visible(aabb)
    }

    fn position(&self) -> DVec3 {
        self.position
    }

    fn viewport_width(&self) -> u32 {
        self.viewport_width
    }
}
