//! Corner geometry of a quad on one cube face.
//!
//! Corners are named the way the patch grid walks them:
//!
//! ```text
//! d ---- c
//! |      |
//! a ---- b
//! ```
//!
//! `d` is the grid origin, `c - d` runs along grid columns and `a - d` along
//! grid rows. Splits halve the stride, which stays exact in `f64` for any
//! power-of-two subdivision of an integral radius.

use glam::DVec3;

use crate::{CubeFace, QuadPosition, spherize};

/// Four coplanar corners of an axis-aligned square on a cube face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadBounds {
    /// Face the quad belongs to.
    pub face: CubeFace,
    /// Bottom-left.
    pub a: DVec3,
    /// Bottom-right.
    pub b: DVec3,
    /// Top-right.
    pub c: DVec3,
    /// Top-left, the grid origin.
    pub d: DVec3,
}

impl QuadBounds {
    /// The full-face bounds of a cube with half-extent `radius`.
    ///
    /// Each face has its own corner order so that every face winds the same
    /// way when viewed from outside.
    #[must_use]
    pub fn parent(radius: f64, face: CubeFace) -> Self {
        let r = radius;
        let v = DVec3::new;
        let [a, b, c, d] = match face {
            CubeFace::Front => [v(-r, -r, r), v(r, -r, r), v(r, r, r), v(-r, r, r)],
            CubeFace::Back => [v(-r, r, -r), v(r, r, -r), v(r, -r, -r), v(-r, -r, -r)],
            CubeFace::Left => [v(-r, -r, -r), v(-r, -r, r), v(-r, r, r), v(-r, r, -r)],
            CubeFace::Right => [v(r, -r, r), v(r, -r, -r), v(r, r, -r), v(r, r, r)],
            CubeFace::Up => [v(-r, r, r), v(r, r, r), v(r, r, -r), v(-r, r, -r)],
            CubeFace::Down => [v(-r, -r, -r), v(r, -r, -r), v(r, -r, r), v(-r, -r, r)],
        };
        Self { face, a, b, c, d }
    }

    /// Builds a quad of side `stride` whose grid origin is `d`.
    #[must_use]
    pub fn from_origin(face: CubeFace, d: DVec3, stride: f64) -> Self {
        let s = stride;
        let (width, height) = match face {
            CubeFace::Front => (DVec3::new(s, 0.0, 0.0), DVec3::new(0.0, -s, 0.0)),
            CubeFace::Back => (DVec3::new(s, 0.0, 0.0), DVec3::new(0.0, s, 0.0)),
            CubeFace::Left => (DVec3::new(0.0, 0.0, s), DVec3::new(0.0, -s, 0.0)),
            CubeFace::Right => (DVec3::new(0.0, 0.0, -s), DVec3::new(0.0, -s, 0.0)),
            CubeFace::Up => (DVec3::new(s, 0.0, 0.0), DVec3::new(0.0, 0.0, s)),
            CubeFace::Down => (DVec3::new(s, 0.0, 0.0), DVec3::new(0.0, 0.0, -s)),
        };
        let a = d + height;
        Self {
            face,
            a,
            b: a + width,
            c: d + width,
            d,
        }
    }

    /// Splits into four children of side `stride`, indexed by
    /// [`QuadPosition::index`].
    #[must_use]
    pub fn split(&self, stride: f64) -> [QuadBounds; 4] {
        let nw = Self::from_origin(self.face, self.d, stride);
        let sw = Self::from_origin(self.face, nw.a, stride);
        let se = Self::from_origin(self.face, nw.b, stride);
        let ne = Self::from_origin(self.face, nw.c, stride);
        let mut out = [nw; 4];
        out[QuadPosition::SouthWest.index()] = sw;
        out[QuadPosition::SouthEast.index()] = se;
        out[QuadPosition::NorthEast.index()] = ne;
        out
    }

    /// Corners in `[a, b, c, d]` order.
    #[must_use]
    pub fn corners(&self) -> [DVec3; 4] {
        [self.a, self.b, self.c, self.d]
    }

    #[must_use]
    pub fn center(&self) -> DVec3 {
        (self.a + self.b + self.c + self.d) * 0.25
    }

    #[must_use]
    pub fn min(&self) -> DVec3 {
        self.a.min(self.b).min(self.c).min(self.d)
    }

    #[must_use]
    pub fn max(&self) -> DVec3 {
        self.a.max(self.b).max(self.c).max(self.d)
    }

    /// Span from the grid origin across one row of columns.
    #[must_use]
    pub fn column_axis(&self) -> DVec3 {
        self.c - self.d
    }

    /// Span from the grid origin down one column of rows.
    #[must_use]
    pub fn row_axis(&self) -> DVec3 {
        self.a - self.d
    }

    /// Signed per-axis stride. The axis perpendicular to the face is zero.
    #[must_use]
    pub fn stride(&self) -> DVec3 {
        self.b - self.d
    }

    #[must_use]
    pub fn stride_x(&self) -> f64 {
        self.stride().x
    }

    #[must_use]
    pub fn stride_y(&self) -> f64 {
        self.stride().y
    }

    #[must_use]
    pub fn stride_z(&self) -> f64 {
        self.stride().z
    }

    /// Projects all four corners onto the sphere of `radius`.
    ///
    /// The result is no longer planar and must not be split again.
    #[must_use]
    pub fn spherized(&self, radius: f64) -> Self {
        Self {
            face: self.face,
            a: spherize(self.a, radius),
            b: spherize(self.b, radius),
            c: spherize(self.c, radius),
            d: spherize(self.d, radius),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FacePlane;

    const R: f64 = 512.0;

    fn perpendicular(face: CubeFace, p: DVec3) -> f64 {
        p.dot(face.normal())
    }

    #[test]
    fn test_parent_corners_lie_on_their_face() {
        for face in CubeFace::ALL {
            for corner in QuadBounds::parent(R, face).corners() {
                assert_eq!(
                    perpendicular(face, corner),
                    R,
                    "{face:?} corner {corner:?} is off the face plane"
                );
            }
        }
    }

    #[test]
    fn test_parent_matches_origin_construction() {
        for face in CubeFace::ALL {
            let parent = QuadBounds::parent(R, face);
            let rebuilt = QuadBounds::from_origin(face, parent.d, 2.0 * R);
            assert_eq!(parent, rebuilt, "{face:?} corner order drifted");
        }
    }

    #[test]
    fn test_stride_signs_follow_face_winding() {
        let s = |f| QuadBounds::parent(R, f).stride();
        let front = s(CubeFace::Front);
        assert!(front.x > 0.0 && front.y < 0.0 && front.z == 0.0);
        let back = s(CubeFace::Back);
        assert!(back.x > 0.0 && back.y > 0.0 && back.z == 0.0);
        let left = s(CubeFace::Left);
        assert!(left.x == 0.0 && left.y < 0.0 && left.z > 0.0);
        let right = s(CubeFace::Right);
        assert!(right.x == 0.0 && right.y < 0.0 && right.z < 0.0);
        let up = s(CubeFace::Up);
        assert!(up.x > 0.0 && up.y == 0.0 && up.z > 0.0);
        let down = s(CubeFace::Down);
        assert!(down.x > 0.0 && down.y == 0.0 && down.z < 0.0);
    }

    #[test]
    fn test_perpendicular_stride_is_zero() {
        for face in CubeFace::ALL {
            let b = QuadBounds::parent(R, face);
            let zero = match face.plane() {
                FacePlane::Xy => b.stride_z(),
                FacePlane::Yz => b.stride_x(),
                FacePlane::Xz => b.stride_y(),
            };
            assert_eq!(zero, 0.0, "{face:?} has stride along its normal");
        }
    }

    #[test]
    fn test_split_children_tile_parent() {
        for face in CubeFace::ALL {
            let parent = QuadBounds::parent(R, face);
            let children = parent.split(R);

            let area: f64 = children
                .iter()
                .map(|c| c.column_axis().length() * c.row_axis().length())
                .sum();
            let parent_area = parent.column_axis().length() * parent.row_axis().length();
            assert_eq!(area, parent_area, "{face:?} children do not cover parent");

            let mean = children.iter().map(QuadBounds::center).sum::<DVec3>() / 4.0;
            assert_eq!(mean, parent.center());

            let nw = children[QuadPosition::NorthWest.index()];
            let se = children[QuadPosition::SouthEast.index()];
            assert_eq!(nw.d, parent.d, "NW must share the grid origin");
            assert_eq!(se.b, parent.b, "SE must share the far corner");
            assert_eq!(nw.b, parent.center());
        }
    }

    #[test]
    fn test_repeated_split_stays_exact() {
        let mut bounds = QuadBounds::parent(R, CubeFace::Right);
        let mut stride = R;
        for _ in 0..8 {
            bounds = bounds.split(stride)[QuadPosition::SouthEast.index()];
            stride /= 2.0;
        }
        assert_eq!(bounds.b, QuadBounds::parent(R, CubeFace::Right).b);
        assert_eq!(bounds.column_axis().length(), 4.0);
    }

    #[test]
    fn test_spherized_corners_on_sphere() {
        for face in CubeFace::ALL {
            let sphere = QuadBounds::parent(R, face).spherized(R);
            for corner in sphere.corners() {
                assert!(
                    (corner.length() - R).abs() < 1e-9,
                    "{face:?} spherized corner at distance {}",
                    corner.length()
                );
            }
        }
    }

    #[test]
    fn test_min_max_enclose_corners() {
        let b = QuadBounds::parent(R, CubeFace::Back).split(R)[2];
        for c in b.corners() {
            assert!(c.cmpge(b.min()).all() && c.cmple(b.max()).all());
        }
    }
}
