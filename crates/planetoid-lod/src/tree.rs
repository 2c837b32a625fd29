//! Node arena shared by the six face quadtrees.
//!
//! Every face tree lives in one arena so neighbour links can cross faces
//! as plain [`NodeId`]s. Trees are split once at build time and never
//! merged; afterwards only LOD state and the outer edge links of children
//! change, once per frame:
//!
//! 1. [`QuadTree::select_lod`] walks each visible face top-down, picks the
//!    level each region renders at and relinks finer neighbours onto
//!    coarser rendered nodes.
//! 2. [`QuadTree::render`] shows the chosen patches with their stitching
//!    context.
//! 3. [`QuadTree::link`] restores the canonical same-level links.

use std::ops::AddAssign;

use glam::{DMat4, Vec2};
use planetoid_cubesphere::{
    CubeFace, QuadBounds, QuadEdge, QuadPosition, local_neighbour, resolve, root_neighbour,
};
use planetoid_mesh::{PatchLod, PatchMesh};

use crate::{Aabb, LodState, NodeId, QuadNode, ViewVolume};

/// Screen-size test inputs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LodParams {
    /// Sphere radius in world units.
    pub radius: f64,
    /// A node renders once its projected size falls below
    /// `2^level * viewport_width / pixel_divisor`.
    pub pixel_divisor: f64,
}

impl Default for LodParams {
    fn default() -> Self {
        Self {
            radius: 512.0,
            pixel_divisor: 10.0,
        }
    }
}

/// Counts from one [`QuadTree::render`] pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Patches shown.
    pub rendered: usize,
    /// Patches whose index buffer had to be regenerated.
    pub rebuilt: usize,
}

impl AddAssign for RenderStats {
    fn add_assign(&mut self, rhs: Self) {
        self.rendered += rhs.rendered;
        self.rebuilt += rhs.rebuilt;
    }
}

#[derive(Debug, Default)]
pub struct QuadTree {
    nodes: Vec<QuadNode>,
}

impl QuadTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &QuadNode {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut QuadNode {
        &mut self.nodes[id.index()]
    }

    pub fn patch_mut(&mut self, id: NodeId) -> Option<&mut PatchMesh> {
        self.node_mut(id).patch.as_mut()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &QuadNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId::new(i), n))
    }

    /// Adds an unlinked face root.
    pub fn add_root(&mut self, bounds: QuadBounds) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(QuadNode::new(bounds, None, None, 0));
        id
    }

    /// Adds one root per cube face, indexed by [`CubeFace::index`], with
    /// their edges wired around the cube.
    pub fn add_cube(&mut self, radius: f64) -> [NodeId; 6] {
        let roots = CubeFace::ALL.map(|face| self.add_root(QuadBounds::parent(radius, face)));
        for face in CubeFace::ALL {
            for edge in QuadEdge::ALL {
                let neighbour = roots[root_neighbour(face, edge).index()];
                self.set_edge(roots[face.index()], edge, Some(neighbour));
            }
        }
        roots
    }

    pub fn set_edge(&mut self, id: NodeId, edge: QuadEdge, neighbour: Option<NodeId>) {
        self.node_mut(id).edges[edge.index()] = neighbour;
    }

    /// Creates the four children of `id` and links them to each other.
    /// Splitting an already split node returns its children.
    pub fn split(&mut self, id: NodeId) -> [NodeId; 4] {
        if let Some(children) = self.node(id).children {
            return children;
        }
        let parent = self.node(id);
        let level = parent.level + 1;
        let stride = parent.bounds.column_axis().length() / 2.0;
        let quarters = parent.bounds.split(stride);

        let base = self.nodes.len();
        let children = QuadPosition::ALL.map(|pos| NodeId::new(base + pos.index()));
        for pos in QuadPosition::ALL {
            let mut child = QuadNode::new(quarters[pos.index()], Some(id), Some(pos), level);
            for edge in QuadEdge::ALL {
                if !pos.is_outer_edge(edge) {
                    child.edges[edge.index()] = Some(children[local_neighbour(pos, edge).index()]);
                }
            }
            self.nodes.push(child);
        }
        self.node_mut(id).children = Some(children);
        children
    }

    /// Splits `id` uniformly `depth` levels down.
    pub fn subdivide(&mut self, id: NodeId, depth: u32) {
        if depth == 0 {
            return;
        }
        for child in self.split(id) {
            self.subdivide(child, depth - 1);
        }
    }

    /// Points every child's outer edges at the same-level node across them.
    ///
    /// Runs top-down from the parent's links, so every face must be fully
    /// subdivided and its root edges set before any face is linked.
    pub fn link(&mut self, id: NodeId) {
        let Some(children) = self.node(id).children else {
            return;
        };
        let face = self.node(id).face;
        for pos in QuadPosition::ALL {
            for edge in pos.outer_edges() {
                let target = self.node(id).edge(edge).map(|n| {
                    let neighbour = self.node(n);
                    let across = resolve(face, pos, edge, neighbour.face);
                    neighbour.child(across).unwrap_or(n)
                });
                self.set_edge(children[pos.index()], edge, target);
            }
        }
        for child in children {
            self.link(child);
        }
    }

    /// Builds a patch for every node under `id` and sets its culling box.
    pub fn build_patches(&mut self, id: NodeId, tri_divs: u32, radius: f64) {
        for n in self.subtree(id) {
            let node = self.node_mut(n);
            node.patch = Some(PatchMesh::new(&node.bounds, tri_divs, radius));
        }
        self.refresh_bounds(id, radius);
    }

    /// Recomputes culling boxes under `id` from the spherized corners and
    /// the current patch extent.
    pub fn refresh_bounds(&mut self, id: NodeId, radius: f64) {
        for n in self.subtree(id) {
            let node = self.node_mut(n);
            let corners = node.bounds.spherized(radius).corners();
            let mut aabb = Aabb::from_points(corners).unwrap_or(Aabb::new(corners[0], corners[0]));
            if let Some(patch) = &node.patch {
                let (min, max) = patch.extent();
                aabb = aabb.union(&Aabb::new(min.as_dvec3(), max.as_dvec3()));
            }
            node.aabb = Some(aabb);
        }
    }

    /// Spreads the texture range `min..max` over the subtree, each child
    /// taking its quarter.
    pub fn set_uv(&mut self, id: NodeId, min: Vec2, max: Vec2) {
        if let Some(patch) = self.patch_mut(id) {
            patch.set_uv(min, max);
        }
        let Some(children) = self.node(id).children else {
            return;
        };
        let half = (max - min) / 2.0;
        let ranges = [
            (min, min + half),
            (Vec2::new(min.x, min.y + half.y), Vec2::new(min.x + half.x, max.y)),
            (min + half, max),
            (Vec2::new(min.x + half.x, min.y), Vec2::new(max.x, min.y + half.y)),
        ];
        for pos in QuadPosition::ALL {
            let (lo, hi) = ranges[pos.index()];
            self.set_uv(children[pos.index()], lo, hi);
        }
    }

    /// `id` and all its descendants, parents before children.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            out.push(n);
            if let Some(children) = self.node(n).children {
                stack.extend(children.iter().rev());
            }
        }
        out
    }

    pub fn leaves(&self, id: NodeId) -> Vec<NodeId> {
        self.subtree(id)
            .into_iter()
            .filter(|&n| !self.node(n).has_children())
            .collect()
    }

    /// Decides which nodes under `id` render this frame.
    ///
    /// `transform` maps planet space to world space.
    pub fn select_lod<V: ViewVolume + ?Sized>(
        &mut self,
        id: NodeId,
        view: &V,
        params: &LodParams,
        transform: &DMat4,
    ) {
        let node = self.node(id);
        let local = node
            .aabb
            .unwrap_or_else(|| Aabb::new(node.bounds.min(), node.bounds.max()));
        let world = local.transformed(transform);

        if !view.is_visible(&world) {
            self.hide(id);
            return;
        }

        let (level, children) = (node.level, node.children);
        let width = f64::from(view.viewport_width());
        let one_to_one = 2f64.powi(level as i32) * width / params.pixel_divisor;
        let distance = view.distance_to(world.center()).max(f64::MIN_POSITIVE);
        let projected = params.radius * width / distance;

        match children {
            Some(children) if projected >= one_to_one => {
                let node = self.node_mut(id);
                node.lod = LodState::RenderChildren;
                node.hide_patch();
                for child in children {
                    self.select_lod(child, view, params, transform);
                }
            }
            _ => {
                self.node_mut(id).lod = LodState::Rendered;
                self.hide_descendants(id);
                self.relink_neighbours(id);
            }
        }
    }

    /// Shows the patches selected under `id`.
    pub fn render(&mut self, id: NodeId) -> RenderStats {
        match self.node(id).lod {
            LodState::Culled => RenderStats::default(),
            LodState::Rendered => {
                let lod = self.patch_lod(id);
                let rebuilt = self.patch_mut(id).is_some_and(|p| p.show(lod));
                RenderStats {
                    rendered: 1,
                    rebuilt: usize::from(rebuilt),
                }
            }
            LodState::RenderChildren => {
                let mut stats = RenderStats::default();
                let children = self.node(id).children;
                for child in children.into_iter().flatten() {
                    stats += self.render(child);
                }
                stats
            }
        }
    }

    /// Culls `id` and its whole subtree.
    pub fn hide(&mut self, id: NodeId) {
        let node = self.node_mut(id);
        node.lod = LodState::Culled;
        node.hide_patch();
        self.hide_descendants(id);
    }

    fn hide_descendants(&mut self, id: NodeId) {
        for n in self.subtree(id).into_iter().skip(1) {
            let node = self.node_mut(n);
            node.lod = LodState::Culled;
            node.hide_patch();
        }
    }

    /// Level to stitch against across `edge`: the neighbour's level when it
    /// renders, otherwise this node's own level.
    pub fn effective_neighbour_lod(&self, id: NodeId, edge: QuadEdge) -> u32 {
        let node = self.node(id);
        match node.edge(edge).map(|n| self.node(n)) {
            Some(n) if n.lod == LodState::Rendered => n.level,
            _ => node.level,
        }
    }

    pub fn patch_lod(&self, id: NodeId) -> PatchLod {
        PatchLod {
            level: self.node(id).level,
            neighbours: QuadEdge::ALL.map(|e| self.effective_neighbour_lod(id, e)),
        }
    }

    /// Points the children of each neighbour that touch `id` straight at
    /// `id`, all the way down.
    fn relink_neighbours(&mut self, id: NodeId) {
        for edge in QuadEdge::ALL {
            let Some(neighbour) = self.node(id).edge(edge) else {
                continue;
            };
            let back = QuadEdge::ALL
                .into_iter()
                .find(|&e| self.node(neighbour).edge(e) == Some(id));
            if let Some(back) = back {
                self.relink(neighbour, id, back);
            }
        }
    }

    fn relink(&mut self, id: NodeId, target: NodeId, edge: QuadEdge) {
        let Some(children) = self.node(id).children else {
            return;
        };
        for pos in edge.children() {
            let child = children[pos.index()];
            self.set_edge(child, edge, Some(target));
            self.relink(child, target, edge);
        }
    }
}
