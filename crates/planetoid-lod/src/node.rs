use planetoid_cubesphere::{CubeFace, QuadBounds, QuadEdge, QuadPosition};
use planetoid_mesh::PatchMesh;

use crate::Aabb;

/// Handle of a node in a [`QuadTree`](crate::QuadTree) arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Outcome of the last LOD selection for a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LodState {
    /// Outside the view, or covered by a coarser ancestor.
    #[default]
    Culled,
    /// Drawn at its own level.
    Rendered,
    /// Too coarse for the view; its children decide.
    RenderChildren,
}

/// One node of a face quadtree.
#[derive(Debug)]
pub struct QuadNode {
    pub(crate) face: CubeFace,
    /// `None` for a face root.
    pub(crate) position: Option<QuadPosition>,
    pub(crate) parent: Option<NodeId>,
    /// All four or none.
    pub(crate) children: Option<[NodeId; 4]>,
    /// Neighbour across each edge, indexed by [`QuadEdge::index`].
    pub(crate) edges: [Option<NodeId>; 4],
    pub(crate) level: u32,
    /// Planar cube-face bounds.
    pub(crate) bounds: QuadBounds,
    /// Culling box, set once the patch is built.
    pub(crate) aabb: Option<Aabb>,
    pub(crate) lod: LodState,
    pub(crate) patch: Option<PatchMesh>,
}

impl QuadNode {
    pub(crate) fn new(bounds: QuadBounds, parent: Option<NodeId>, position: Option<QuadPosition>, level: u32) -> Self {
        Self {
            face: bounds.face,
            position,
            parent,
            children: None,
            edges: [None; 4],
            level,
            bounds,
            aabb: None,
            lod: LodState::Culled,
            patch: None,
        }
    }

    pub fn face(&self) -> CubeFace {
        self.face
    }

    pub fn position(&self) -> Option<QuadPosition> {
        self.position
    }

    pub fn is_root(&self) -> bool {
        self.position.is_none()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> Option<[NodeId; 4]> {
        self.children
    }

    pub fn child(&self, position: QuadPosition) -> Option<NodeId> {
        self.children.map(|c| c[position.index()])
    }

    pub fn has_children(&self) -> bool {
        self.children.is_some()
    }

    pub fn edge(&self, edge: QuadEdge) -> Option<NodeId> {
        self.edges[edge.index()]
    }

    /// Depth in the tree, 0 at the face root.
    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn bounds(&self) -> &QuadBounds {
        &self.bounds
    }

    pub fn aabb(&self) -> Option<&Aabb> {
        self.aabb.as_ref()
    }

    pub fn lod(&self) -> LodState {
        self.lod
    }

    pub fn patch(&self) -> Option<&PatchMesh> {
        self.patch.as_ref()
    }

    pub fn patch_mut(&mut self) -> Option<&mut PatchMesh> {
        self.patch.as_mut()
    }

    pub(crate) fn hide_patch(&mut self) {
        if let Some(patch) = &mut self.patch {
            patch.hide();
        }
    }
}
