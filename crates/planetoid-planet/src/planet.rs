//! Top-level planet: parameters, lifecycle and per-frame throttling.

use std::path::PathBuf;

use glam::DMat4;
use planetoid_lod::{LodParams, RenderStats, ViewVolume};
use planetoid_terrain::{BlendLookup, HeightField};
use thiserror::Error;
use tracing::{info, warn};

use crate::{FaceForest, PatchRenderer, SyncStats};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanetError {
    #[error("planet radius must be non-zero")]
    ZeroRadius,
    #[error("radius {radius} cannot be halved {depth} times")]
    RadiusNotDivisible { radius: u32, depth: u32 },
    #[error("segments per patch side must be a power of two >= 2, got {0}")]
    TriDivsNotPowerOfTwo(u32),
}

/// Everything needed to build and finalise a planet.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanetParams {
    /// Half-extent of the cube and radius of the sphere.
    pub radius: u32,
    /// Uniform quadtree depth per face. 0 is treated as 1.
    pub quad_divs: u32,
    /// Segments per patch side.
    pub tri_divs: u32,
    /// Number of height perturbations.
    pub iterations: u32,
    pub seed: u64,
    /// Height step is `radius / magnitude_divisor`.
    pub magnitude_divisor: f32,
    /// LOD is reselected once every `frames_per_update + 1` renders.
    pub frames_per_update: u32,
    pub pixel_divisor: f64,
    /// Blend lookup image.
    pub lookup_path: PathBuf,
}

impl Default for PlanetParams {
    fn default() -> Self {
        Self {
            radius: 512,
            quad_divs: 2,
            tri_divs: 16,
            iterations: 200,
            seed: 0,
            magnitude_divisor: 200.0,
            frames_per_update: 4,
            pixel_divisor: 10.0,
            lookup_path: PathBuf::from("lut.png"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlanetState {
    /// Parameters accepted, nothing built.
    PreBuild,
    /// Trees and flat patches exist.
    Built,
    /// Terrain applied, can render.
    Ready,
}

pub struct Planet {
    params: PlanetParams,
    state: PlanetState,
    forest: Option<FaceForest>,
    transform: DMat4,
    frame: u32,
    height_range: Option<(f32, f32)>,
}

impl Planet {
    pub fn new(mut params: PlanetParams) -> Result<Self, PlanetError> {
        if params.radius == 0 {
            return Err(PlanetError::ZeroRadius);
        }
        if params.quad_divs == 0 {
            params.quad_divs = 1;
        }
        if params.quad_divs >= 32 || params.radius % (1 << params.quad_divs) != 0 {
            return Err(PlanetError::RadiusNotDivisible {
                radius: params.radius,
                depth: params.quad_divs,
            });
        }
        if params.tri_divs < 2 || !params.tri_divs.is_power_of_two() {
            return Err(PlanetError::TriDivsNotPowerOfTwo(params.tri_divs));
        }
        info!(
            "Planet: radius {}, quad divs {}, tri divs {}",
            params.radius, params.quad_divs, params.tri_divs
        );
        Ok(Self {
            params,
            state: PlanetState::PreBuild,
            forest: None,
            transform: DMat4::IDENTITY,
            frame: 0,
            height_range: None,
        })
    }

    pub fn params(&self) -> &PlanetParams {
        &self.params
    }

    pub fn state(&self) -> PlanetState {
        self.state
    }

    pub fn forest(&self) -> Option<&FaceForest> {
        self.forest.as_ref()
    }

    /// Global `(min, max)` surface height once finalised.
    pub fn height_range(&self) -> Option<(f32, f32)> {
        self.height_range
    }

    pub fn transform(&self) -> &DMat4 {
        &self.transform
    }

    /// Places the planet in the world.
    pub fn set_transform(&mut self, transform: DMat4) {
        self.transform = transform;
    }

    fn radius(&self) -> f64 {
        f64::from(self.params.radius)
    }

    pub fn build(&mut self) {
        if self.state != PlanetState::PreBuild {
            warn!("Planet::build called in state {:?}, ignoring", self.state);
            return;
        }
        self.forest = Some(FaceForest::build(
            self.radius(),
            self.params.quad_divs,
            self.params.tri_divs,
        ));
        self.state = PlanetState::Built;
    }

    /// Generates terrain and colours it from the lookup image, falling back
    /// to a flat table if the image can't be loaded.
    pub fn finalise(&mut self) {
        if self.state != PlanetState::Built {
            warn!("Planet::finalise called in state {:?}, ignoring", self.state);
            return;
        }
        let lookup = match BlendLookup::load(&self.params.lookup_path) {
            Ok(lookup) => lookup,
            Err(e) => {
                warn!(
                    "Blend lookup {} unavailable ({}), using flat colouring",
                    self.params.lookup_path.display(),
                    e
                );
                BlendLookup::flat()
            }
        };
        self.finalise_with_lookup(&lookup);
    }

    pub fn finalise_with_lookup(&mut self, lookup: &BlendLookup) {
        if self.state != PlanetState::Built {
            warn!("Planet::finalise called in state {:?}, ignoring", self.state);
            return;
        }
        let field = HeightField::generate(self.params.iterations, self.params.seed);
        let magnitude = self.params.radius as f32 / self.params.magnitude_divisor;
        if let Some(forest) = &mut self.forest {
            self.height_range = Some(forest.finalise(&field, magnitude, lookup));
            self.state = PlanetState::Ready;
        }
    }

    /// Reselects LOD when the frame counter runs past `frames_per_update`.
    /// Returns `None` on skipped frames.
    pub fn render<V: ViewVolume + ?Sized>(&mut self, view: &V) -> Option<RenderStats> {
        if self.state != PlanetState::Ready {
            warn!("Planet::render called in state {:?}, ignoring", self.state);
            return None;
        }
        self.frame += 1;
        if self.frame <= self.params.frames_per_update {
            return None;
        }
        self.frame = 0;

        let params = LodParams {
            radius: self.radius(),
            pixel_divisor: self.params.pixel_divisor,
        };
        let transform = self.transform;
        self.forest
            .as_mut()
            .map(|forest| forest.render(view, &params, &transform))
    }

    pub fn sync<R: PatchRenderer + ?Sized>(&mut self, renderer: &mut R) -> SyncStats {
        self.forest
            .as_mut()
            .map(|forest| forest.sync(renderer))
            .unwrap_or_default()
    }

    pub fn set_material<R: PatchRenderer + ?Sized>(&self, base: &str, renderer: &mut R) {
        if self.state != PlanetState::Ready {
            warn!("Planet::set_material called in state {:?}, ignoring", self.state);
            return;
        }
        if let Some(forest) = &self.forest {
            forest.set_material(base, renderer);
        }
    }
}
