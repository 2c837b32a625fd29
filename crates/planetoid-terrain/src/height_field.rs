//! Random plane perturbations that raise one side of the sphere and lower
//! the other.
//!
//! Each perturbation is a point strictly inside the unit sphere plus a
//! direction. A surface point on the far side of the plane through that
//! point (facing away from the origin) moves one step up for a raising
//! perturbation and one step down otherwise; points on the near side move
//! the opposite way. Summing many such steps produces continents.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Perturbation {
    /// Point inside the unit sphere. Also the plane normal.
    pub point: Vec3,
    /// Whether the outer side goes up.
    pub raise: bool,
}

impl Perturbation {
    /// `+1` or `-1` step for a surface position.
    pub fn offset(&self, position: Vec3) -> f32 {
        let sign = if self.raise { 1.0 } else { -1.0 };
        if (position - self.point).dot(self.point) > 0.0 {
            sign
        } else {
            -sign
        }
    }
}

/// The full perturbation set applied to every patch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeightField {
    perturbations: Vec<Perturbation>,
}

impl HeightField {
    /// Draws `iterations` perturbations from a seeded generator.
    pub fn generate(iterations: u32, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let perturbations = (0..iterations)
            .map(|_| Perturbation {
                point: random_in_unit_sphere(&mut rng),
                raise: rng.random_bool(0.5),
            })
            .collect();
        Self { perturbations }
    }

    pub fn from_perturbations(perturbations: Vec<Perturbation>) -> Self {
        Self { perturbations }
    }

    pub fn perturbations(&self) -> &[Perturbation] {
        &self.perturbations
    }

    pub fn len(&self) -> usize {
        self.perturbations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.perturbations.is_empty()
    }

    /// Net step count at a surface position.
    pub fn offset_at(&self, position: Vec3) -> f32 {
        self.perturbations.iter().map(|p| p.offset(position)).sum()
    }
}

/// Rejection-samples a non-zero point strictly inside the unit sphere.
fn random_in_unit_sphere<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    loop {
        let v = Vec3::new(
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        );
        let len2 = v.length_squared();
        if len2 > 0.0 && len2 < 1.0 {
            return v;
        }
    }
}
