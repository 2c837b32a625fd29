//! A loaded blend table: (normalized height, slope) → material blend colour.

use std::path::Path;

use glam::Vec4;
use image::RgbaImage;
use thiserror::Error;
use tracing::{info, warn};

/// Errors while reading or writing a blend table image.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The image could not be opened or decoded.
    #[error("failed to load blend table: {0}")]
    ImageLoad(#[source] image::ImageError),

    /// The image could not be encoded or written.
    #[error("failed to save blend table: {0}")]
    ImageSave(#[source] image::ImageError),

    /// The image has no pixels.
    #[error("blend table image is empty")]
    Empty,
}

/// Read-only blend table sampled with nearest-cell lookup.
#[derive(Clone, Debug)]
pub struct BlendLookup {
    image: RgbaImage,
}

impl BlendLookup {
    /// Loads a blend table from an image file.
    ///
    /// Images without an alpha channel load with a warning; the missing
    /// channel reads as fully opaque.
    pub fn load(path: &Path) -> Result<Self, LookupError> {
        let decoded = image::open(path).map_err(LookupError::ImageLoad)?;
        if !decoded.color().has_alpha() {
            warn!(
                "blend table {} has no alpha channel, snow weights will be wrong",
                path.display()
            );
        }
        let lookup = Self::from_image(decoded.to_rgba8())?;
        info!(
            "Loaded blend table {} ({}x{})",
            path.display(),
            lookup.width(),
            lookup.height()
        );
        Ok(lookup)
    }

    pub fn from_image(image: RgbaImage) -> Result<Self, LookupError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(LookupError::Empty);
        }
        Ok(Self { image })
    }

    /// A single-cell table that maps everything to the base material.
    pub fn flat() -> Self {
        Self {
            image: RgbaImage::from_pixel(1, 1, image::Rgba([255, 0, 0, 0])),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Blend colour at normalized `(x, y)`, each in `[0, 1]`.
    pub fn lookup(&self, x: f32, y: f32) -> Vec4 {
        assert!((0.0..=1.0).contains(&x), "lookup x {x} outside 0..1");
        assert!((0.0..=1.0).contains(&y), "lookup y {y} outside 0..1");
        let px = ((self.width() - 1) as f32 * x) as u32;
        let py = ((self.height() - 1) as f32 * y) as u32;
        let [r, g, b, a] = self.image.get_pixel(px, py).0;
        Vec4::new(r.into(), g.into(), b.into(), a.into()) / 255.0
    }
}
