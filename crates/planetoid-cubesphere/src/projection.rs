//! Cube-to-sphere projection.

use glam::DVec3;

/// Analytic cube-to-sphere using the Everitt/Mathworld mapping.
///
/// Given a point on the `[-1, 1]` cube surface (one coordinate is `±1`),
/// compute the corresponding unit sphere point:
///
/// ```text
/// sx = x * sqrt(1 - y²/2 - z²/2 + y²z²/3)
/// sy = y * sqrt(1 - x²/2 - z²/2 + x²z²/3)
/// sz = z * sqrt(1 - x²/2 - y²/2 + x²y²/3)
/// ```
///
/// Unlike normalizing the cube point, this keeps facets near cube edges and
/// corners close to the size of those at face centers.
#[inline]
#[must_use]
pub fn cube_to_sphere_everitt(cube_point: DVec3) -> DVec3 {
    let x2 = cube_point.x * cube_point.x;
    let y2 = cube_point.y * cube_point.y;
    let z2 = cube_point.z * cube_point.z;

    DVec3::new(
        cube_point.x * (1.0 - y2 / 2.0 - z2 / 2.0 + y2 * z2 / 3.0).sqrt(),
        cube_point.y * (1.0 - x2 / 2.0 - z2 / 2.0 + x2 * z2 / 3.0).sqrt(),
        cube_point.z * (1.0 - x2 / 2.0 - y2 / 2.0 + x2 * y2 / 3.0).sqrt(),
    )
}

/// Maps a point on the cube of half-extent `radius` onto the sphere of the
/// same radius.
#[inline]
#[must_use]
pub fn spherize(point: DVec3, radius: f64) -> DVec3 {
    assert!(radius != 0.0, "cannot spherize onto a zero radius sphere");
    cube_to_sphere_everitt(point / radius) * radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CubeFace, QuadBounds};

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_face_center_maps_to_normal() {
        for face in CubeFace::ALL {
            let p = spherize(face.normal() * 100.0, 100.0);
            assert!(
                (p - face.normal() * 100.0).length() < EPSILON,
                "Face center of {face:?} moved: {p:?}"
            );
        }
    }

    #[test]
    fn test_face_grid_lands_on_sphere() {
        let radius = 512.0;
        for face in CubeFace::ALL {
            let b = QuadBounds::parent(radius, face);
            for i in 0..=10 {
                for j in 0..=10 {
                    let p = b.d
                        + b.column_axis() * (i as f64 / 10.0)
                        + b.row_axis() * (j as f64 / 10.0);
                    let s = spherize(p, radius);
                    assert!(
                        (s.length() - radius).abs() < EPSILON,
                        "Point not on sphere for {face:?} at ({i}, {j}): length = {}",
                        s.length()
                    );
                }
            }
        }
    }

    #[test]
    fn test_corner_stays_on_diagonal() {
        let s = cube_to_sphere_everitt(DVec3::ONE);
        let expected = DVec3::ONE.normalize();
        assert!((s - expected).length() < EPSILON, "corner drifted: {s:?}");
    }

    #[test]
    fn test_edge_midpoint_differs_from_normalization() {
        // (1, 1, 0) maps to (1/√2, 1/√2, 0) either way; (1, 0.5, 0) does not.
        let p = DVec3::new(1.0, 0.5, 0.0);
        let everitt = cube_to_sphere_everitt(p);
        let normalized = p.normalize();
        assert!((everitt.length() - 1.0).abs() < EPSILON);
        assert!(
            (everitt - normalized).length() > 1e-3,
            "analytic mapping should not collapse to normalization"
        );
    }

    #[test]
    #[should_panic]
    fn test_zero_radius_panics() {
        let _ = spherize(DVec3::X, 0.0);
    }
}
