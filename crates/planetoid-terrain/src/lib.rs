//! Procedural inputs for planet generation: smoothed value noise, the
//! height/slope blend lookup table, and the random height perturbation set.

mod blend_lookup;
mod height_field;
mod lookup_generator;
mod noise_field;

pub use blend_lookup::{BlendLookup, LookupError};
pub use height_field::{HeightField, Perturbation};
pub use lookup_generator::{BlendBands, BlendLookupGenerator};
pub use noise_field::{NoiseField, next_prime};
