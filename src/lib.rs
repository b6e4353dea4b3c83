//! Tabular Q-learning agents for tile-based side-scrolling levels
//!
//! This crate provides:
//! - Level grids parsed from plain text, bordered by a goal column and a death row
//! - A turn-based simulator with stay/move/jump actions, gravity and shaped rewards
//! - Value tables keyed by local observation fingerprints
//! - One-step Q-learning and episode-level backward credit assignment
//! - A training pipeline with progress, metrics and JSONL observers
//!
//! # Example
//!
//! ```
//! use aqtion::{
//!     app::{AgentConfig, LearningRule, create_learner},
//!     level::{Grid, GridOptions},
//!     pipeline::{TrainingConfig, TrainingPipeline},
//! };
//!
//! let grid = Grid::parse("     \n#####", &GridOptions::new())?;
//! let mut learner = create_learner(&AgentConfig::new(LearningRule::OneStep))?;
//! let config = TrainingConfig::default()
//!     .with_train_episodes(50)
//!     .with_eval_episodes(5)
//!     .with_seed(1);
//!
//! let report = TrainingPipeline::new(config)
//!     .run_curriculum(&[("corridor".to_string(), grid)], learner.as_mut())?;
//! assert_eq!(report.levels[0].evaluation.episodes, 5);
//! # Ok::<(), aqtion::Error>(())
//! ```

pub mod app;
pub mod cli;
pub mod error;
pub mod level;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod sim;
pub mod types;

pub use error::{Error, Result};
pub use level::{Grid, GridOptions, Tile};
pub use sim::{Action, Simulator, SimulatorConfig};
pub use types::{Fingerprint, Position};
