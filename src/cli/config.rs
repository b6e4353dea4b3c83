//! Run configuration file shared by CLI commands
//!
//! `aqtion train --config run.json` reads a [`RunConfig`]; any field left out
//! of the file keeps its default, and explicit command-line flags override
//! whatever the file sets.
//!
//! ```json
//! {
//!   "agent": { "rule": "episode-backward", "discount_factor": 0.9 },
//!   "training": { "train_episodes": 2000, "seed": 7,
//!                 "simulator": { "reward_mode": "terminal" } },
//!   "level_height": 14
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result, app::AgentConfig, level::GridOptions, pipeline::TrainingConfig,
};

/// Everything needed to reproduce a training run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Learning rule and its rates
    pub agent: AgentConfig,

    /// Episode counts, evaluation settings, seed and simulator settings
    pub training: TrainingConfig,

    /// Strict level height; levels are used as loaded when absent
    pub level_height: Option<usize>,
}

impl RunConfig {
    /// Read a run configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read run config {}", path.display()),
            source,
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Write the configuration as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    pub fn grid_options(&self) -> GridOptions {
        match self.level_height {
            Some(height) => GridOptions::new().with_height(height),
            None => GridOptions::new(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.agent.validate()?;
        self.training.validate()
    }
}
