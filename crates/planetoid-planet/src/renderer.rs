//! Boundary to whatever owns GPU buffers and the scene graph.

use planetoid_cubesphere::CubeFace;
use planetoid_lod::NodeId;
use planetoid_mesh::GpuVertex;
use rustc_hash::FxHashSet;

/// Receives patch buffers and visibility from a [`FaceForest`](crate::FaceForest).
///
/// The forest owns buffer contents; the renderer owns residency.
pub trait PatchRenderer {
    /// A new drawable whose index buffer must hold `max_indices`.
    fn create_patch(&mut self, id: NodeId, face: CubeFace, vertices: &[GpuVertex], max_indices: usize);

    fn update_vertices(&mut self, id: NodeId, vertices: &[GpuVertex]);

    fn update_indices(&mut self, id: NodeId, indices: &[u32]);

    fn set_visible(&mut self, id: NodeId, visible: bool);

    /// Binds a material to every patch of `face`.
    fn set_material(&mut self, face: CubeFace, material: &str);
}

/// Headless renderer that only tallies what it is sent.
#[derive(Debug, Default)]
pub struct CountingRenderer {
    pub patches: usize,
    pub vertices: usize,
    pub vertex_uploads: usize,
    pub index_uploads: usize,
    /// Patches currently shown.
    pub visible: FxHashSet<NodeId>,
    pub materials: Vec<(CubeFace, String)>,
}

impl CountingRenderer {
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }
}

impl PatchRenderer for CountingRenderer {
    fn create_patch(&mut self, _id: NodeId, _face: CubeFace, vertices: &[GpuVertex], _max_indices: usize) {
        self.patches += 1;
        self.vertices += vertices.len();
    }

    fn update_vertices(&mut self, _id: NodeId, _vertices: &[GpuVertex]) {
        self.vertex_uploads += 1;
    }

    fn update_indices(&mut self, _id: NodeId, _indices: &[u32]) {
        self.index_uploads += 1;
    }

    fn set_visible(&mut self, id: NodeId, visible: bool) {
        if visible {
            self.visible.insert(id);
        } else {
            self.visible.remove(&id);
        }
    }

    fn set_material(&mut self, face: CubeFace, material: &str) {
        self.materials.push((face, material.to_owned()));
    }
}
