//! Configuration for the planet demo.
//!
//! Settings persist to disk as RON files, can be overridden from the command
//! line via clap, and tolerate missing or unknown fields.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    BlendConfig, Config, DebugConfig, LodConfig, MAX_BLEND_SIZE, PlanetConfig, TerrainConfig,
    ViewConfig,
};
pub use error::ConfigError;
