//! The six faces of the cube that is projected onto the planet sphere.

use glam::DVec3;

/// The six faces of the cube that forms the cube-sphere.
///
/// The Back face is mirrored both horizontally and vertically relative to
/// the others, so its corner order and texture coordinates run the other way.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum CubeFace {
    /// +Z face
    Front = 0,
    /// −Z face
    Back = 1,
    /// −X face
    Left = 2,
    /// +X face
    Right = 3,
    /// +Y face
    Up = 4,
    /// −Y face
    Down = 5,
}

/// The axis-aligned plane a cube face lies in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FacePlane {
    /// Front and Back.
    Xy,
    /// Left and Right.
    Yz,
    /// Up and Down.
    Xz,
}

impl CubeFace {
    /// All six faces in canonical order.
    pub const ALL: [CubeFace; 6] = [
        CubeFace::Front,
        CubeFace::Back,
        CubeFace::Left,
        CubeFace::Right,
        CubeFace::Up,
        CubeFace::Down,
    ];

    /// Position of this face in [`CubeFace::ALL`].
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The opposite face (e.g., `Front` → `Back`).
    #[must_use]
    pub fn opposite(self) -> CubeFace {
        match self {
            CubeFace::Front => CubeFace::Back,
            CubeFace::Back => CubeFace::Front,
            CubeFace::Left => CubeFace::Right,
            CubeFace::Right => CubeFace::Left,
            CubeFace::Up => CubeFace::Down,
            CubeFace::Down => CubeFace::Up,
        }
    }

    /// Outward-pointing unit normal for this face.
    #[must_use]
    pub fn normal(self) -> DVec3 {
        match self {
            CubeFace::Front => DVec3::Z,
            CubeFace::Back => DVec3::NEG_Z,
            CubeFace::Left => DVec3::NEG_X,
            CubeFace::Right => DVec3::X,
            CubeFace::Up => DVec3::Y,
            CubeFace::Down => DVec3::NEG_Y,
        }
    }

    #[must_use]
    pub fn plane(self) -> FacePlane {
        match self {
            CubeFace::Front | CubeFace::Back => FacePlane::Xy,
            CubeFace::Left | CubeFace::Right => FacePlane::Yz,
            CubeFace::Up | CubeFace::Down => FacePlane::Xz,
        }
    }

    /// Suffix appended to a base material name to get this face's material.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            CubeFace::Front => "_FR",
            CubeFace::Back => "_BK",
            CubeFace::Left => "_LF",
            CubeFace::Right => "_RT",
            CubeFace::Up => "_UP",
            CubeFace::Down => "_DN",
        }
    }

    /// Per-face material name, e.g. `"Planet_FR"` for base `"Planet"`.
    #[must_use]
    pub fn material_name(self, base: &str) -> String {
        format!("{base}{}", self.suffix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_canonical_order() {
        for (i, face) in CubeFace::ALL.iter().enumerate() {
            assert_eq!(face.index(), i, "{face:?} has the wrong index");
        }
    }

    #[test]
    fn test_normals_are_unit_length() {
        for face in CubeFace::ALL {
            let n = face.normal();
            assert!(
                (n.length() - 1.0).abs() < 1e-12,
                "Normal for {face:?} is not unit length: {}",
                n.length()
            );
        }
    }

    #[test]
    fn test_opposite_face_normals_are_antiparallel() {
        for face in CubeFace::ALL {
            let dot = face.normal().dot(face.opposite().normal());
            assert!(
                (dot + 1.0).abs() < 1e-12,
                "{face:?} and its opposite are not antiparallel"
            );
            assert_eq!(face.opposite().opposite(), face);
        }
    }

    #[test]
    fn test_normal_is_perpendicular_to_face_plane() {
        for face in CubeFace::ALL {
            let n = face.normal();
            let zero_axis = match face.plane() {
                FacePlane::Xy => n.x.abs() + n.y.abs(),
                FacePlane::Yz => n.y.abs() + n.z.abs(),
                FacePlane::Xz => n.x.abs() + n.z.abs(),
            };
            assert_eq!(zero_axis, 0.0, "{face:?} normal lies inside its plane");
        }
    }

    #[test]
    fn test_material_names_are_unique_per_face() {
        let names: Vec<String> = CubeFace::ALL
            .iter()
            .map(|f| f.material_name("Planet"))
            .collect();
        assert_eq!(names[0], "Planet_FR");
        assert_eq!(names[1], "Planet_BK");
        assert_eq!(names[5], "Planet_DN");
        for (i, a) in names.iter().enumerate() {
            for b in &names[i + 1..] {
                assert_ne!(a, b, "duplicate material name {a}");
            }
        }
    }
}
