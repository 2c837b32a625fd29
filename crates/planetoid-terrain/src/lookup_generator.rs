//! Offline generator for the height/slope blend lookup table.
//!
//! The table's x axis is normalized height and its y axis is normalized
//! slope. Three cosine bands hand over between four materials, one pair of
//! colour channels per band (red/green, green/blue, blue/alpha):
//!
//! ```text
//! base          dirt           rock          snow
//! 0                                             1
//! |   trough.x   |   trough.y   |   trough.z   |
//! |      /\      |      /\      |      /\      |
//! |     /  \     |     /  \     |     /  \     |
//! |    /    \    |    /    \    |    /    \    |
//! 0          peak.x          peak.y            1
//! ```
//!
//! Moving down the slope axis drags each band's midpoint towards the band's
//! end (`steep`) or its start, so steep terrain switches material earlier or
//! later. Noise is blended into every band to break up straight edges.

use std::f32::consts::FRAC_PI_2;
use std::path::Path;

use glam::Vec4;
use image::{Rgba, RgbaImage};
use rand::Rng;

use crate::{LookupError, NoiseField};

/// Octave count and persistence of the band-breaking noise.
const NOISE_OCTAVES: u32 = 20;
const NOISE_PERSISTENCE: f64 = 0.5;

/// Colour written to every cell no band touched.
const BASE_COLOUR: Vec4 = Vec4::new(1.0, 0.0, 0.0, 0.0);

/// Band layout of a blend table.
///
/// Positions must be ordered `trough[0] < peak[0] < trough[1] < peak[1] < trough[2]`,
/// all within `[0, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct BlendBands {
    pub peak: [f32; 2],
    pub trough: [f32; 3],
    /// Base→dirt midpoint moves towards the band end as slope grows.
    pub base_steep: bool,
    /// Dirt→rock midpoint moves towards the band end as slope grows.
    pub dirt_steep: bool,
    /// Rock→snow midpoint moves towards the band end as slope grows.
    pub rock_steep: bool,
    /// Share of noise against the cosine rule, `0..=1`.
    pub noise_factor: f32,
}

impl Default for BlendBands {
    fn default() -> Self {
        Self {
            peak: [0.70, 0.90],
            trough: [0.65, 0.80, 0.95],
            base_steep: false,
            dirt_steep: true,
            rock_steep: true,
            noise_factor: 0.2,
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum ChannelPair {
    RedGreen,
    GreenBlue,
    BlueAlpha,
}

impl ChannelPair {
    fn colour(self, first: f32, second: f32) -> Vec4 {
        match self {
            ChannelPair::RedGreen => Vec4::new(first, second, 0.0, 0.0),
            ChannelPair::GreenBlue => Vec4::new(0.0, first, second, 0.0),
            ChannelPair::BlueAlpha => Vec4::new(0.0, 0.0, first, second),
        }
    }
}

/// Paints a square blend table of `size × size` cells.
pub struct BlendLookupGenerator {
    size: u32,
    noise_step: f64,
    cells: Vec<Vec4>,
    noise: NoiseField,
}

impl BlendLookupGenerator {
    /// `noise_scale` sets how often the noise repeats across the table:
    /// below 1 gives cloudy blends, above 1 grainy ones.
    pub fn new(size: u32, noise_scale: f64) -> Self {
        assert!(size > 0, "blend table must have at least one cell");
        assert!(noise_scale > 0.0, "noise scale must be positive");
        Self {
            size,
            noise_step: noise_scale,
            cells: vec![Vec4::ZERO; (size * size) as usize],
            noise: NoiseField::new(NOISE_OCTAVES, NOISE_PERSISTENCE),
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Colour of the cell at `(height, slope)`.
    pub fn cell(&self, x: u32, y: u32) -> Vec4 {
        self.cells[(x + y * self.size) as usize]
    }

    /// Repaints the whole table. The noise primes are re-drawn from `rng`.
    pub fn generate<R: Rng + ?Sized>(&mut self, bands: &BlendBands, rng: &mut R) {
        for v in bands.peak.iter().chain(&bands.trough) {
            assert!((0.0..=1.0).contains(v), "band position {v} outside 0..1");
        }
        assert!(
            (0.0..=1.0).contains(&bands.noise_factor),
            "noise factor outside 0..1"
        );

        self.cells.fill(Vec4::ZERO);
        self.noise.randomize(rng);

        let [p0, p1] = bands.peak;
        let [t0, t1, t2] = bands.trough;
        let nf = bands.noise_factor;
        self.pass([0.0, t0, p0], ChannelPair::RedGreen, bands.base_steep, nf);
        self.pass([p0, t1, p1], ChannelPair::GreenBlue, bands.dirt_steep, nf);
        self.pass([p1, t2, 1.0], ChannelPair::BlueAlpha, bands.rock_steep, nf);

        for cell in &mut self.cells {
            if *cell == Vec4::ZERO {
                *cell = BASE_COLOUR;
            }
        }
    }

    /// One band across every slope row, with the midpoint sliding per row.
    fn pass(&mut self, [start, mid, end]: [f32; 3], pair: ChannelPair, steep: bool, nf: f32) {
        let rows = self.size as f32;
        for y in 0..self.size {
            let row_mid = if steep {
                mid + (end - mid) / rows * y as f32
            } else {
                mid - (mid - start) / rows * y as f32
            };
            self.row([start, row_mid, end], pair, y, nf);
        }
    }

    fn row(&mut self, [start, mid, end]: [f32; 3], pair: ChannelPair, y: u32, nf: f32) {
        let size = self.size as f32;
        let start = (start * size) as u32;
        let mid = (mid * size) as u32;
        let end = ((end * size) as u32).min(self.size);

        // Rising half: first channel eases from 1 down to 0.5.
        let rise_step = 1.0 / mid.saturating_sub(start).max(1) as f32;
        for (i, x) in (start..mid).enumerate() {
            let angle = i as f32 * rise_step * FRAC_PI_2;
            self.blend(x, y, pair, (angle.cos() + 1.0) * 0.5, nf);
        }

        // Falling half: first channel eases from 0.5 down to 0.
        let fall_step = 1.0 / end.saturating_sub(mid).max(1) as f32;
        for (i, x) in (mid..end).enumerate() {
            let angle = i as f32 * fall_step * FRAC_PI_2 + FRAC_PI_2;
            self.blend(x, y, pair, (angle.cos() + 1.0) * 0.5, nf);
        }
    }

    fn blend(&mut self, x: u32, y: u32, pair: ChannelPair, rule: f32, nf: f32) {
        let noise = self.noise.sample_normalized(
            f64::from(x) * self.noise_step,
            f64::from(y) * self.noise_step,
        ) as f32;
        let first = (1.0 - nf) * rule + nf * noise;
        let second = (1.0 - nf) * (1.0 - rule) + nf * noise;
        let sum = first + second;
        let colour = pair.colour(first / sum, second / sum);

        let cell = &mut self.cells[(x + y * self.size) as usize];
        if *cell == Vec4::ZERO {
            *cell = colour;
        } else {
            *cell = (*cell + colour) * 0.5;
        }
    }

    /// The table as an 8-bit RGBA image, height along x and slope along y.
    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.size, self.size, |x, y| {
            let c = self.cell(x, y) * 255.0;
            Rgba([c.x as u8, c.y as u8, c.z as u8, c.w as u8])
        })
    }

    pub fn save_png(&self, path: &Path) -> Result<(), LookupError> {
        self.to_image()
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(LookupError::ImageSave)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn generated(size: u32, bands: &BlendBands) -> BlendLookupGenerator {
        let mut generator = BlendLookupGenerator::new(size, 0.05);
        generator.generate(bands, &mut ChaCha8Rng::seed_from_u64(3));
        generator
    }

    #[test]
    fn test_every_cell_is_painted() {
        let generator = generated(64, &BlendBands::default());
        for y in 0..64 {
            for x in 0..64 {
                assert_ne!(generator.cell(x, y), Vec4::ZERO, "cell ({x}, {y}) left empty");
            }
        }
    }

    #[test]
    fn test_channels_are_normalized() {
        let generator = generated(64, &BlendBands::default());
        for y in 0..64 {
            for x in 0..64 {
                let c = generator.cell(x, y);
                let sum = c.x + c.y + c.z + c.w;
                assert!(
                    (sum - 1.0).abs() < 1e-4,
                    "cell ({x}, {y}) weights sum to {sum}"
                );
            }
        }
    }

    #[test]
    fn test_low_and_high_ends_pick_base_and_snow() {
        let bands = BlendBands {
            noise_factor: 0.0,
            ..BlendBands::default()
        };
        let generator = generated(100, &bands);
        let low = generator.cell(0, 0);
        assert!(low.x > 0.99, "lowest cell should be base: {low:?}");
        let high = generator.cell(99, 0);
        assert!(high.w > 0.9, "highest cell should be snow: {high:?}");
    }

    #[test]
    fn test_steep_band_moves_midpoint_up_the_table() {
        let bands = BlendBands {
            noise_factor: 0.0,
            ..BlendBands::default()
        };
        let generator = generated(100, &bands);
        // Just past the dirt/rock trough the flat row has already crossed to
        // rock while the steepest row, whose midpoint slid up, has not.
        let x = 82;
        assert!(generator.cell(x, 0).z > generator.cell(x, 0).y);
        assert!(generator.cell(x, 99).y > generator.cell(x, 99).z);
    }

    #[test]
    fn test_same_seed_same_table() {
        let a = generated(32, &BlendBands::default());
        let b = generated(32, &BlendBands::default());
        assert_eq!(a.cells, b.cells);
    }

    #[test]
    fn test_image_matches_cells() {
        let generator = generated(16, &BlendBands::default());
        let image = generator.to_image();
        assert_eq!(image.dimensions(), (16, 16));
        let c = generator.cell(3, 5) * 255.0;
        assert_eq!(image.get_pixel(3, 5).0[0], c.x as u8);
        assert_eq!(image.get_pixel(3, 5).0[3], c.w as u8);
    }

    #[test]
    #[should_panic]
    fn test_band_outside_unit_range_panics() {
        let bands = BlendBands {
            peak: [0.5, 1.5],
            ..BlendBands::default()
        };
        let _ = generated(8, &bands);
    }
}
