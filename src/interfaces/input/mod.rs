//! Server configuration from YAML input files.

use std::fs;
use std::path::Path;

use anyhow::{self, Context};
use serde::{Deserialize, Serialize};

use crate::grid::DEFAULT_MARGIN;

#[cfg(test)]
#[path = "input_tests.rs"]
mod input_tests;

/// Default render parameters applied when a request omits the corresponding query parameter.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RenderDefaults {
    /// The grid size for single-orbital requests.
    ///
    /// # Default
    ///
    /// If not specified, this will be taken to be `64`.
    #[serde(default = "RenderDefaults::default_grid_size")]
    pub grid_size: usize,

    /// The grid size for batch requests.
    ///
    /// # Default
    ///
    /// If not specified, this will be taken to be `48`.
    #[serde(default = "RenderDefaults::default_batch_grid_size")]
    pub batch_grid_size: usize,

    /// The margin in Ångström added around the molecular bounding box.
    ///
    /// # Default
    ///
    /// If not specified, this will be taken to be [`DEFAULT_MARGIN`].
    #[serde(default = "RenderDefaults::default_margin")]
    pub margin: f64,

    /// The molecule identifier assumed when a request names none.
    ///
    /// # Default
    ///
    /// If not specified, this will be taken to be `water`.
    #[serde(default = "RenderDefaults::default_molecule")]
    pub molecule: String,
}

impl RenderDefaults {
    fn default_grid_size() -> usize {
        64
    }

    fn default_batch_grid_size() -> usize {
        48
    }

    fn default_margin() -> f64 {
        DEFAULT_MARGIN
    }

    fn default_molecule() -> String {
        "water".to_string()
    }
}

impl Default for RenderDefaults {
    fn default() -> Self {
        RenderDefaults {
            grid_size: Self::default_grid_size(),
            batch_grid_size: Self::default_batch_grid_size(),
            margin: Self::default_margin(),
            molecule: Self::default_molecule(),
        }
    }
}

/// A structure containing server parameters which can be serialised into and deserialised from
/// a YAML input file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The socket address the server binds to.
    ///
    /// # Default
    ///
    /// If not specified, this will be taken to be `127.0.0.1:8080`.
    #[serde(default = "ServerConfig::default_bind")]
    pub bind: String,

    /// The wall-clock budget in seconds for one solver invocation, or `None` for no budget.
    ///
    /// # Default
    ///
    /// If not specified, this will be taken to be `300`.
    #[serde(default = "ServerConfig::default_solver_timeout_secs")]
    pub solver_timeout_secs: Option<u64>,

    /// Default render parameters.
    #[serde(default)]
    pub render: RenderDefaults,
}

impl ServerConfig {
    fn default_bind() -> String {
        "127.0.0.1:8080".to_string()
    }

    fn default_solver_timeout_secs() -> Option<u64> {
        Some(300)
    }

    /// Reads a server configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let contents = fs::read_to_string(&path).with_context(|| {
            format!(
                "Unable to read the configuration file `{}`.",
                path.as_ref().display()
            )
        })?;
        serde_yaml::from_str(&contents).with_context(|| {
            format!(
                "Unable to parse the configuration file `{}`.",
                path.as_ref().display()
            )
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: Self::default_bind(),
            solver_timeout_secs: Self::default_solver_timeout_secs(),
            render: RenderDefaults::default(),
        }
    }
}
