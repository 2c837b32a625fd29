//! View frustum culling of node bounding boxes.
//!
//! Planes are extracted from the camera's view-projection matrix and every
//! node's box is tested with the p-vertex method. All math is `f64` so a
//! planet several thousand units across culls without precision loss.

use glam::{DMat4, DVec3, DVec4};

/// Plane indices into the frustum planes array.
const LEFT: usize = 0;
const RIGHT: usize = 1;
const BOTTOM: usize = 2;
const TOP: usize = 3;
const NEAR: usize = 4;
const FAR: usize = 5;

/// An axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Smallest box holding every point. `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = DVec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::new(first, first), |acc, p| {
            Self::new(acc.min.min(p), acc.max.max(p))
        }))
    }

    #[must_use]
    pub fn union(&self, other: &Aabb) -> Self {
        Self::new(self.min.min(other.min), self.max.max(other.max))
    }

    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Half-size along each axis.
    pub fn extents(&self) -> DVec3 {
        (self.max - self.min) * 0.5
    }

    pub fn corners(&self) -> [DVec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            DVec3::new(lo.x, lo.y, lo.z),
            DVec3::new(hi.x, lo.y, lo.z),
            DVec3::new(lo.x, hi.y, lo.z),
            DVec3::new(hi.x, hi.y, lo.z),
            DVec3::new(lo.x, lo.y, hi.z),
            DVec3::new(hi.x, lo.y, hi.z),
            DVec3::new(lo.x, hi.y, hi.z),
            DVec3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// The box enclosing this one after an affine transform.
    #[must_use]
    pub fn transformed(&self, transform: &DMat4) -> Self {
        let corners = self.corners().map(|c| transform.transform_point3(c));
        let mut out = Self::new(corners[0], corners[0]);
        for c in &corners[1..] {
            out.min = out.min.min(*c);
            out.max = out.max.max(*c);
        }
        out
    }
}

/// A view frustum defined by six inward-pointing planes.
#[derive(Clone, Debug)]
pub struct Frustum {
    /// Left, right, bottom, top, near, far. `(a, b, c)` is the unit inward
    /// normal and `d` the signed distance term.
    planes: [DVec4; 6],
}

impl Frustum {
    /// Extracts the planes of a combined view-projection matrix using the
    /// Griggs-Hartmann method.
    ///
    /// Expects reverse-Z: near maps to depth 1, far to depth 0.
    pub fn from_view_projection(vp: &DMat4) -> Self {
        let rows = [vp.row(0), vp.row(1), vp.row(2), vp.row(3)];

        let mut planes = [DVec4::ZERO; 6];
        planes[LEFT] = rows[3] + rows[0];
        planes[RIGHT] = rows[3] - rows[0];
        planes[BOTTOM] = rows[3] + rows[1];
        planes[TOP] = rows[3] - rows[1];
        // Reverse-Z puts the far plane at clip depth 0.
        planes[NEAR] = rows[3] + rows[2];
        planes[FAR] = rows[2];

        for plane in &mut planes {
            let len = plane.truncate().length();
            if len > 0.0 {
                *plane /= len;
            }
        }

        Self { planes }
    }

    /// Whether an AABB is at least partially inside the frustum.
    ///
    /// Conservative: boxes near frustum corners may pass while fully
    /// outside, but a visible box never fails.
    pub fn is_visible(&self, aabb: &Aabb) -> bool {
        self.planes.iter().all(|plane| {
            let normal = plane.truncate();
            let p = DVec3::select(normal.cmpge(DVec3::ZERO), aabb.max, aabb.min);
            normal.dot(p) + plane.w >= 0.0
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_camera_vp() -> DMat4 {
        let view = DMat4::look_to_rh(DVec3::ZERO, DVec3::NEG_Z, DVec3::Y);
        let proj = DMat4::perspective_rh(
            std::f64::consts::FRAC_PI_4,
            16.0 / 9.0,
            1000.0, // far as the near parameter
            0.1,
        );
        proj * view
    }

    fn frustum() -> Frustum {
        Frustum::from_view_projection(&default_camera_vp())
    }

    #[test]
    fn test_box_in_front_visible() {
        let aabb = Aabb::new(DVec3::new(-1.0, -1.0, -5.0), DVec3::new(1.0, 1.0, -3.0));
        assert!(frustum().is_visible(&aabb));
    }

    #[test]
    fn test_box_behind_camera_not_visible() {
        let aabb = Aabb::new(DVec3::new(-1.0, -1.0, 5.0), DVec3::new(1.0, 1.0, 10.0));
        assert!(!frustum().is_visible(&aabb));
    }

    #[test]
    fn test_box_straddling_side_plane_is_visible() {
        let aabb = Aabb::new(DVec3::new(-100.0, -1.0, -10.0), DVec3::new(1.0, 1.0, -5.0));
        assert!(frustum().is_visible(&aabb));
    }

    #[test]
    fn test_all_side_and_far_planes_reject() {
        let f = frustum();
        let outside = [
            Aabb::new(DVec3::new(-1000.0, 0.0, -5.0), DVec3::new(-999.0, 1.0, -4.0)),
            Aabb::new(DVec3::new(999.0, 0.0, -5.0), DVec3::new(1000.0, 1.0, -4.0)),
            Aabb::new(DVec3::new(0.0, 999.0, -5.0), DVec3::new(1.0, 1000.0, -4.0)),
            Aabb::new(DVec3::new(0.0, -1000.0, -5.0), DVec3::new(1.0, -999.0, -4.0)),
            Aabb::new(DVec3::new(0.0, 0.0, -2000.0), DVec3::new(1.0, 1.0, -1500.0)),
        ];
        for aabb in outside {
            assert!(!f.is_visible(&aabb), "{aabb:?} should be culled");
        }
    }

    #[test]
    fn test_planes_are_normalized() {
        for plane in &frustum().planes {
            let len = plane.truncate().length();
            assert!((len - 1.0).abs() < 1e-9, "plane normal not normalized: {len}");
        }
    }

    #[test]
    fn test_from_points_and_union() {
        let a = Aabb::from_points([DVec3::new(1.0, -2.0, 3.0), DVec3::new(-1.0, 2.0, 0.0)])
            .expect("two points");
        assert_eq!(a.min, DVec3::new(-1.0, -2.0, 0.0));
        assert_eq!(a.max, DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(a.center(), DVec3::new(0.0, 0.0, 1.5));
        assert_eq!(a.extents(), DVec3::new(1.0, 2.0, 1.5));
        assert!(Aabb::from_points(std::iter::empty()).is_none());

        let b = Aabb::new(DVec3::splat(2.0), DVec3::splat(4.0));
        let u = a.union(&b);
        assert_eq!(u.min, DVec3::new(-1.0, -2.0, 0.0));
        assert_eq!(u.max, DVec3::splat(4.0));
    }

    #[test]
    fn test_transformed_box_encloses_rotated_corners() {
        let aabb = Aabb::new(DVec3::new(-1.0, -1.0, -1.0), DVec3::new(1.0, 1.0, 1.0));
        let rotate = DMat4::from_rotation_y(std::f64::consts::FRAC_PI_4);
        let moved = aabb.transformed(&(DMat4::from_translation(DVec3::X * 10.0) * rotate));
        let half = 2f64.sqrt();
        assert!((moved.max.x - (10.0 + half)).abs() < 1e-9);
        assert!((moved.min.x - (10.0 - half)).abs() < 1e-9);
        assert!((moved.max.y - 1.0).abs() < 1e-9, "rotation about y keeps y extent");
    }
}
