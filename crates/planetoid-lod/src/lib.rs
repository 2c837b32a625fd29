//! Level-of-detail selection over the six face quadtrees: node arena,
//! neighbour linking and relinking, frustum culling and the viewer model.

mod camera;
mod frustum;
mod node;
mod tree;
mod view;

pub use camera::{CameraView, ViewCamera};
pub use frustum::{Aabb, Frustum};
pub use node::{LodState, NodeId, QuadNode};
pub use tree::{LodParams, QuadTree, RenderStats};
pub use view::ViewVolume;
