//! Patch vertex data: the working vertex kept on the CPU and its packed
//! GPU form.

use glam::{Vec2, Vec3, Vec4};

/// One grid vertex of a patch.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PatchVertex {
    /// Displaced surface position.
    pub position: Vec3,
    /// Undisplaced sphere position, the "water level".
    pub water: Vec3,
    /// Material blend weights, one per channel.
    pub colour: Vec4,
    pub uv: Vec2,
    /// Distance from the planet center, filled by slope/height analysis.
    pub height: f32,
    /// Mean distance to the 8 grid neighbours relative to height.
    pub slope: f32,
}

/// Vertex layout uploaded to the renderer.
///
/// | Offset | Field    |
/// |--------|----------|
/// | 0      | position |
/// | 12     | water    |
/// | 24     | colour   |
/// | 40     | uv       |
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuVertex {
    pub position: [f32; 3],
    pub water: [f32; 3],
    pub colour: [f32; 4],
    pub uv: [f32; 2],
}

static_assertions::assert_eq_size!(GpuVertex, [u8; 48]);

impl From<&PatchVertex> for GpuVertex {
    fn from(v: &PatchVertex) -> Self {
        Self {
            position: v.position.to_array(),
            water: v.water.to_array(),
            colour: v.colour.to_array(),
            uv: v.uv.to_array(),
        }
    }
}
