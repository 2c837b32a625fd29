//! Drawable geometry of one quadtree node.
//!
//! A patch is a `side × side` vertex grid laid over its node's cube-face
//! bounds and projected onto the sphere. The index buffer is regenerated only
//! when the node's [`PatchLod`] changes, so a patch whose neighbourhood is
//! stable costs nothing per frame.

use glam::{Vec2, Vec3};
use planetoid_cubesphere::{QuadBounds, spherize};
use planetoid_terrain::{BlendLookup, HeightField};

use crate::{GpuVertex, PatchLod, PatchVertex, max_index_count, patch_indices};

#[derive(Clone, Debug)]
pub struct PatchMesh {
    side: u32,
    vertices: Vec<PatchVertex>,
    indices: Vec<u32>,
    lod: Option<PatchLod>,
    visible: bool,
    min: Vec3,
    max: Vec3,
    indices_dirty: bool,
    vertices_dirty: bool,
    synced_visible: Option<bool>,
}

impl PatchMesh {
    /// Lays a grid of `tri_divs` segments per side over `bounds` and projects
    /// it onto the sphere of `radius`.
    ///
    /// `bounds` must still be planar.
    pub fn new(bounds: &QuadBounds, tri_divs: u32, radius: f64) -> Self {
        assert!(tri_divs >= 1, "a patch needs at least one segment per side");
        let side = tri_divs + 1;
        let segments = f64::from(tri_divs);
        let columns = bounds.column_axis();
        let rows = bounds.row_axis();

        let mut vertices = Vec::with_capacity((side * side) as usize);
        for y in 0..side {
            for x in 0..side {
                let cube = bounds.d
                    + columns * (f64::from(x) / segments)
                    + rows * (f64::from(y) / segments);
                let position = spherize(cube, radius).as_vec3();
                vertices.push(PatchVertex {
                    position,
                    water: position,
                    ..PatchVertex::default()
                });
            }
        }

        let mut patch = Self {
            side,
            vertices,
            indices: Vec::with_capacity(max_index_count(side)),
            lod: None,
            visible: false,
            min: Vec3::ZERO,
            max: Vec3::ZERO,
            indices_dirty: false,
            vertices_dirty: true,
            synced_visible: None,
        };
        patch.update_extent();
        patch
    }

    /// Vertices per grid side.
    pub fn side(&self) -> u32 {
        self.side
    }

    pub fn vertices(&self) -> &[PatchVertex] {
        &self.vertices
    }

    pub fn vertex(&self, x: u32, y: u32) -> &PatchVertex {
        &self.vertices[self.index(x, y)]
    }

    /// Current triangle list.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Index buffer capacity the renderer must reserve.
    pub fn max_index_count(&self) -> usize {
        max_index_count(self.side)
    }

    pub fn gpu_vertices(&self) -> Vec<GpuVertex> {
        self.vertices.iter().map(GpuVertex::from).collect()
    }

    /// Axis-aligned extent of the displaced vertices.
    pub fn extent(&self) -> (Vec3, Vec3) {
        (self.min, self.max)
    }

    pub fn lod(&self) -> Option<PatchLod> {
        self.lod
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (x + y * self.side) as usize
    }

    fn update_extent(&mut self) {
        let (min, max) = self.vertices.iter().fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(lo, hi), v| (lo.min(v.position), hi.max(v.position)),
        );
        self.min = min;
        self.max = max;
    }

    /// Spreads the texture range `min..max` across the grid.
    pub fn set_uv(&mut self, min: Vec2, max: Vec2) {
        let segments = (self.side - 1) as f32;
        let span = max - min;
        for y in 0..self.side {
            for x in 0..self.side {
                let i = self.index(x, y);
                self.vertices[i].uv =
                    min + span * Vec2::new(x as f32 / segments, y as f32 / segments);
            }
        }
        self.vertices_dirty = true;
    }

    /// Displaces every vertex along its radial direction by
    /// `magnitude` per perturbation step. Always starts from the water
    /// level, so reapplying replaces rather than accumulates.
    pub fn set_heights(&mut self, field: &HeightField, magnitude: f32) {
        for v in &mut self.vertices {
            let offset = field.offset_at(v.water);
            v.position = v.water + v.water.normalize() * magnitude * offset;
        }
        self.update_extent();
        self.vertices_dirty = true;
    }

    /// Computes per-vertex height and slope, returning the patch's
    /// `(min, max)` height.
    pub fn calc_slope_height(&mut self) -> (f32, f32) {
        let last = self.side - 1;
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for y in 0..self.side {
            for x in 0..self.side {
                let centre = self.vertex(x, y).position;
                let height = centre.length();
                let mut spread = 0.0;
                for (dx, dy) in NEIGHBOURS {
                    let nx = x.saturating_add_signed(dx).min(last);
                    let ny = y.saturating_add_signed(dy).min(last);
                    spread += (self.vertex(nx, ny).position - centre).length();
                }
                let i = self.index(x, y);
                let v = &mut self.vertices[i];
                v.height = height;
                v.slope = (spread / (8.0 * height)).abs();
                min = min.min(height);
                max = max.max(height);
            }
        }
        (min, max)
    }

    /// Bakes vertex colours from the stored height and slope.
    ///
    /// `range` is the global `max - min` height and must be non-zero.
    pub fn normalize_slope_height(&mut self, min: f32, range: f32, lookup: &BlendLookup) {
        assert!(range != 0.0, "height range must be non-zero");
        for v in &mut self.vertices {
            let height = ((v.height - min) / range).clamp(0.0, 1.0);
            let slope = v.slope.clamp(0.0, 1.0);
            v.colour = lookup.lookup(height, slope);
        }
        self.vertices_dirty = true;
    }

    /// Regenerates the index buffer if `lod` differs from the last one.
    /// Returns whether anything changed.
    pub fn update(&mut self, lod: PatchLod) -> bool {
        if self.lod.is_some_and(|last| last.signature() == lod.signature()) {
            return false;
        }
        patch_indices(&lod, self.side, &mut self.indices);
        self.lod = Some(lod);
        self.indices_dirty = true;
        true
    }

    /// Marks the patch visible at `lod`.
    pub fn show(&mut self, lod: PatchLod) -> bool {
        self.visible = true;
        self.update(lod)
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Returns and clears the "index buffer changed" flag.
    pub fn take_indices_dirty(&mut self) -> bool {
        std::mem::take(&mut self.indices_dirty)
    }

    /// Returns and clears the "vertex data changed" flag.
    pub fn take_vertices_dirty(&mut self) -> bool {
        std::mem::take(&mut self.vertices_dirty)
    }

    /// The new visibility if it changed since the last call.
    pub fn take_visibility_change(&mut self) -> Option<bool> {
        if self.synced_visible == Some(self.visible) {
            return None;
        }
        self.synced_visible = Some(self.visible);
        Some(self.visible)
    }
}

/// Offsets of the 8 surrounding grid cells.
const NEIGHBOURS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];
