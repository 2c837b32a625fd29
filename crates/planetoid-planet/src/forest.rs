//! The six face quadtrees of one planet.
//!
//! A [`FaceForest`] is built once at a fixed depth, finalised once with
//! terrain, then asked each frame which patches to draw. Faces are ranked
//! by distance to the viewer before any node is tested: from outside the
//! sphere at most five cube faces can be seen, and close to the surface
//! only four, so the farthest faces are hidden without a frustum test.

use glam::{DMat4, DVec3, Vec2};
use planetoid_cubesphere::CubeFace;
use planetoid_lod::{LodParams, NodeId, QuadTree, RenderStats, ViewVolume};
use planetoid_terrain::{BlendLookup, HeightField};
use tracing::{debug, info};

use crate::PatchRenderer;

/// Uploads made by one [`FaceForest::sync`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub created: usize,
    pub vertex_uploads: usize,
    pub index_uploads: usize,
    pub visibility_changes: usize,
}

#[derive(Debug)]
pub struct FaceForest {
    tree: QuadTree,
    roots: [NodeId; 6],
    /// Spherized root corner centers, used to rank faces by distance.
    centers: [DVec3; 6],
    radius: f64,
    created: bool,
}

impl FaceForest {
    /// Subdivides every face `depth` levels, links the trees across the
    /// cube and builds a `tri_divs` patch for every node.
    pub fn build(radius: f64, depth: u32, tri_divs: u32) -> Self {
        let mut tree = QuadTree::new();
        let roots = tree.add_cube(radius);

        // Cross-face links walk through neighbouring parents, so every face
        // is split before any is linked.
        for root in roots {
            tree.subdivide(root, depth);
        }
        for root in roots {
            tree.link(root);
        }
        for face in CubeFace::ALL {
            let root = roots[face.index()];
            tree.build_patches(root, tri_divs, radius);
            // Back is mirrored in both directions.
            if face == CubeFace::Back {
                tree.set_uv(root, Vec2::ONE, Vec2::ZERO);
            } else {
                tree.set_uv(root, Vec2::ZERO, Vec2::ONE);
            }
        }

        let centers = roots.map(|r| tree.node(r).bounds().spherized(radius).center());
        let forest = Self {
            tree,
            roots,
            centers,
            radius,
            created: false,
        };
        info!(
            "FaceForest built: {} nodes, {} leaves, {} vertices",
            forest.tree.len(),
            forest.leaf_count(),
            forest.vertex_count()
        );
        forest
    }

    pub fn tree(&self) -> &QuadTree {
        &self.tree
    }

    pub fn roots(&self) -> &[NodeId; 6] {
        &self.roots
    }

    pub fn root(&self, face: CubeFace) -> NodeId {
        self.roots[face.index()]
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn leaf_count(&self) -> usize {
        self.roots.iter().map(|&r| self.tree.leaves(r).len()).sum()
    }

    pub fn vertex_count(&self) -> usize {
        self.tree
            .iter()
            .filter_map(|(_, n)| n.patch())
            .map(|p| p.vertices().len())
            .sum()
    }

    /// Displaces every patch by `field`, then colours it from `lookup` by
    /// height and slope normalised across the whole planet.
    ///
    /// Returns the global `(min, max)` height.
    pub fn finalise(&mut self, field: &HeightField, magnitude: f32, lookup: &BlendLookup) -> (f32, f32) {
        let radius = self.radius as f32;
        let mut min = radius;
        let mut max = radius;
        for root in self.roots {
            let (mut face_min, mut face_max) = (radius, radius);
            for n in self.tree.subtree(root) {
                if let Some(patch) = self.tree.patch_mut(n) {
                    patch.set_heights(field, magnitude);
                    let (lo, hi) = patch.calc_slope_height();
                    face_min = face_min.min(lo);
                    face_max = face_max.max(hi);
                }
            }
            self.tree.refresh_bounds(root, self.radius);
            min = min.min(face_min);
            max = max.max(face_max);
        }

        let range = (max - min).max(f32::EPSILON);
        for root in self.roots {
            for n in self.tree.subtree(root) {
                if let Some(patch) = self.tree.patch_mut(n) {
                    patch.normalize_slope_height(min, range, lookup);
                }
            }
        }
        info!("FaceForest finalised: height range {:.2}..{:.2}", min, max);
        (min, max)
    }

    /// Selects and stitches this frame's patches, then restores the
    /// default neighbour links.
    ///
    /// `transform` maps planet space to world space.
    pub fn render<V: ViewVolume + ?Sized>(
        &mut self,
        view: &V,
        params: &LodParams,
        transform: &DMat4,
    ) -> RenderStats {
        let mut ranked: Vec<(f64, NodeId)> = self
            .roots
            .iter()
            .zip(self.centers)
            .map(|(&root, center)| (view.distance_to(transform.transform_point3(center)), root))
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

        let drawn = if ranked[0].0 < self.radius * 1.5 { 4 } else { 5 };
        for (i, &(_, root)) in ranked.iter().enumerate() {
            if i < drawn {
                self.tree.select_lod(root, view, params, transform);
            } else {
                self.tree.hide(root);
            }
        }

        let mut stats = RenderStats::default();
        for root in self.roots {
            stats += self.tree.render(root);
        }
        for root in self.roots {
            self.tree.link(root);
        }
        debug!(
            "Frame LOD: {} faces ranked, {} patches drawn, {} re-stitched",
            drawn, stats.rendered, stats.rebuilt
        );
        stats
    }

    /// Pushes new patches, changed buffers and visibility to `renderer`.
    pub fn sync<R: PatchRenderer + ?Sized>(&mut self, renderer: &mut R) -> SyncStats {
        let mut stats = SyncStats::default();
        let ids: Vec<NodeId> = self.tree.iter().map(|(id, _)| id).collect();
        for id in ids {
            let face = self.tree.node(id).face();
            let Some(patch) = self.tree.patch_mut(id) else {
                continue;
            };
            if !self.created {
                renderer.create_patch(id, face, &patch.gpu_vertices(), patch.max_index_count());
                patch.take_vertices_dirty();
                stats.created += 1;
            }
            if patch.take_vertices_dirty() {
                renderer.update_vertices(id, &patch.gpu_vertices());
                stats.vertex_uploads += 1;
            }
            if patch.take_indices_dirty() {
                renderer.update_indices(id, patch.indices());
                stats.index_uploads += 1;
            }
            if let Some(visible) = patch.take_visibility_change() {
                renderer.set_visible(id, visible);
                stats.visibility_changes += 1;
            }
        }
        self.created = true;
        stats
    }

    /// Binds `base` plus each face's suffix.
    pub fn set_material<R: PatchRenderer + ?Sized>(&self, base: &str, renderer: &mut R) {
        for face in CubeFace::ALL {
            renderer.set_material(face, &face.material_name(base));
        }
    }
}
