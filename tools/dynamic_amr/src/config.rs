use amrgen::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global configuration for a run.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_directory")]
    pub directory: String,

    #[serde(default)]
    pub domain: Domain,
    #[serde(default)]
    pub run: Run,
    #[serde(default)]
    pub refine: Refine,
    #[serde(default)]
    pub visualize: Visualize,
}

impl Config {
    /// Retrieves output directory in absolute form.
    pub fn output_dir(&self) -> eyre::Result<PathBuf> {
        let directory = Path::new(&self.directory);
        Ok(amrgen_app::file::abs_or_relative(directory)?)
    }

    /// Parameters of the random walk.
    pub fn driver_params(&self) -> DriverParams {
        DriverParams {
            max_level: self.run.max_level,
            refine_threshold: self.refine.refine_threshold,
            coarsen_threshold: self.refine.coarsen_threshold,
        }
    }

    /// Check that configuration file satisfies requirements.
    pub fn validate(&self) -> eyre::Result<()> {
        eyre::ensure!(!self.name.is_empty(), "name must not be empty");

        // ************************
        // Domain

        let Domain { spacing, origin } = &self.domain;

        eyre::ensure!(
            spacing.iter().all(|&h| h.is_finite() && h > 0.0),
            "domain spacing must be positive and finite"
        );
        eyre::ensure!(
            origin.iter().all(|x| x.is_finite()),
            "domain origin must be finite"
        );

        // ************************
        // Refine

        let Refine {
            refine_threshold,
            coarsen_threshold,
        } = self.refine;

        eyre::ensure!(
            (0.0..=1.0).contains(&refine_threshold) && (0.0..=1.0).contains(&coarsen_threshold),
            "refine thresholds must lie in [0, 1]"
        );
        eyre::ensure!(
            coarsen_threshold <= refine_threshold,
            "coarsen_threshold must be <= refine_threshold"
        );

        // ************************
        // Visualize

        let prefix = &self.visualize.prefix;

        eyre::ensure!(
            !prefix.is_empty() && !prefix.contains(['/', '\\']),
            "visualize prefix must be a non-empty file name"
        );
        // The prefix ends up inside attributes of the xml index.
        eyre::ensure!(
            !prefix.contains(['&', '<', '>', '"', '\'']),
            "visualize prefix must not contain xml markup characters"
        );

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: default_name(),
            directory: default_directory(),
            domain: Domain::default(),
            run: Run::default(),
            refine: Refine::default(),
            visualize: Visualize::default(),
        }
    }
}

/// Geometry of the base patch.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Domain {
    /// Cell spacing on the coarsest level.
    pub spacing: [f64; 2],
    /// Lower left corner of the base patch.
    pub origin: [f64; 2],
}

impl Default for Domain {
    fn default() -> Self {
        Self {
            spacing: [1.0, 1.0],
            origin: [0.0, 0.0],
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Run {
    /// Seed of the random walk.
    pub seed: u64,
    /// Number of steps to take after the initial state.
    pub timesteps: usize,
    /// Deepest refinement level.
    pub max_level: usize,
}

impl Default for Run {
    fn default() -> Self {
        Self {
            seed: 123,
            timesteps: 20,
            max_level: 5,
        }
    }
}

/// Probability bands of the random walk.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
#[serde(default)]
pub struct Refine {
    pub refine_threshold: f64,
    pub coarsen_threshold: f64,
}

impl Default for Refine {
    fn default() -> Self {
        let params = DriverParams::default();

        Self {
            refine_threshold: params.refine_threshold,
            coarsen_threshold: params.coarsen_threshold,
        }
    }
}

/// Output settings.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Visualize {
    /// Datasets are named `<prefix>_<index>.vthb`.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default)]
    pub kind: AmrKind,
    /// Should a `history.csv` be written?
    #[serde(default = "default_true")]
    pub history: bool,
}

impl Default for Visualize {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            kind: AmrKind::default(),
            history: true,
        }
    }
}

// *****************************
// Defaults for serialization

fn default_name() -> String {
    "dynamic_amr".to_string()
}

fn default_directory() -> String {
    "output".to_string()
}

fn default_prefix() -> String {
    "amr".to_string()
}

fn default_true() -> bool {
    true
}
