//! Planet assembly: the six-face forest, its lifecycle and the renderer
//! boundary.

mod forest;
mod planet;
mod renderer;

pub use forest::{FaceForest, SyncStats};
pub use planet::{Planet, PlanetError, PlanetParams, PlanetState};
pub use renderer::{CountingRenderer, PatchRenderer};
