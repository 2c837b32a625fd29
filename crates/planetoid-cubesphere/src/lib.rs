//! Cube-sphere geometry: the six cube faces, quad corner math, the analytic
//! cube-to-sphere projection, and the fixed adjacency tables that connect
//! quadtree children within a face and across face seams.

mod adjacency;
mod bounds;
mod cube_face;
mod projection;
mod quad;

pub use adjacency::{cube_neighbour, local_neighbour, resolve, root_neighbour};
pub use bounds::QuadBounds;
pub use cube_face::{CubeFace, FacePlane};
pub use projection::{cube_to_sphere_everitt, spherize};
pub use quad::{QuadEdge, QuadPosition};
