//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Planet demo command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "planetoid", about = "Adaptive cube-sphere planet LOD demo")]
pub struct CliArgs {
    /// Planet radius.
    #[arg(long)]
    pub radius: Option<u32>,

    /// Quadtree depth per face.
    #[arg(long)]
    pub depth: Option<u32>,

    /// Segments per patch side.
    #[arg(long)]
    pub tri_divs: Option<u32>,

    /// Terrain seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of height perturbations.
    #[arg(long)]
    pub iterations: Option<u32>,

    /// Frames to simulate.
    #[arg(long, default_value_t = 120)]
    pub frames: u32,

    /// Blend lookup image.
    #[arg(long)]
    pub lookup: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(r) = args.radius {
            self.planet.radius = r;
        }
        if let Some(d) = args.depth {
            self.planet.quad_divs = d;
        }
        if let Some(t) = args.tri_divs {
            self.planet.tri_divs = t;
        }
        if let Some(seed) = args.seed {
            self.terrain.seed = seed;
        }
        if let Some(n) = args.iterations {
            self.terrain.iterations = n;
        }
        if let Some(ref path) = args.lookup {
            self.blend.lookup_path = path.clone();
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            radius: Some(1024),
            seed: Some(5),
            lookup: Some(PathBuf::from("other.png")),
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.planet.radius, 1024);
        assert_eq!(config.terrain.seed, 5);
        assert_eq!(config.blend.lookup_path, PathBuf::from("other.png"));
        // Non-overridden fields retain defaults
        assert_eq!(config.planet.tri_divs, 16);
        assert_eq!(config.terrain.iterations, 200);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::parse_from(["planetoid", "--depth", "3", "--frames", "10", "--log-level", "debug"]);
        assert_eq!(args.depth, Some(3));
        assert_eq!(args.frames, 10);
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(args.radius.is_none());
    }
}
