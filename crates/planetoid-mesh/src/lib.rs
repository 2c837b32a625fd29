//! Patch meshes for the planet quadtree: vertex grids projected onto the
//! sphere and index buffers stitched against coarser neighbours.

mod patch;
mod signature;
mod stitch;
mod vertex;

pub use patch::PatchMesh;
pub use signature::{LOD_BITS, MAX_LOD, PatchLod};
pub use stitch::{max_index_count, patch_indices, stitch_edge};
pub use vertex::{GpuVertex, PatchVertex};
